use std::collections::{BTreeMap, BTreeSet};

use crate::animation::ease::Easing;
use crate::animation::interpolate::interpolate_values;
use crate::animation::value::{CssValue, PropertyMap, ValueKind};

/// Keyframe as consumed by the resolver.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackKeyframe {
    /// Normalized offset along the animation, `0..=1`.
    pub position: f64,
    pub properties: PropertyMap,
    /// Easing for the segment that starts at this keyframe. `None` uses the track easing.
    pub easing: Option<Easing>,
}

impl TrackKeyframe {
    pub fn new(position: f64, properties: PropertyMap) -> Self {
        Self {
            position,
            properties,
            easing: None,
        }
    }
}

#[derive(Clone, Debug)]
struct CompiledKey {
    position: f64,
    easing: Option<Easing>,
    raw: PropertyMap,
    parsed: BTreeMap<String, CssValue>,
}

/// Sorted, pre-parsed keyframes of one animation.
#[derive(Clone, Debug)]
pub struct Track {
    keys: Vec<CompiledKey>,
    easing: Easing,
    inconsistent: BTreeSet<String>,
}

impl Track {
    /// Sort keyframes by position (stable, so insertion order breaks ties) and parse every value once.
    pub fn new(mut keyframes: Vec<TrackKeyframe>, easing: Easing) -> Self {
        keyframes.sort_by(|a, b| a.position.total_cmp(&b.position));

        let keys: Vec<CompiledKey> = keyframes
            .into_iter()
            .map(|k| CompiledKey {
                position: k.position,
                easing: k.easing,
                parsed: k
                    .properties
                    .iter()
                    .map(|(name, v)| (name.clone(), CssValue::parse_for(name, v)))
                    .collect(),
                raw: k.properties,
            })
            .collect();

        let mut kinds: BTreeMap<&str, ValueKind> = BTreeMap::new();
        let mut inconsistent = BTreeSet::new();
        for key in &keys {
            for (name, value) in &key.parsed {
                let kind = value.kind();
                match kinds.get(name.as_str()) {
                    Some(seen) if !seen.compatible_with(kind) => {
                        if inconsistent.insert(name.clone()) {
                            tracing::warn!(
                                property = %name,
                                first = %seen,
                                other = %kind,
                                "keyframes mix incompatible value types"
                            );
                        }
                    }
                    Some(_) => {}
                    None => {
                        kinds.insert(name.as_str(), kind);
                    }
                }
            }
        }

        Self {
            keys,
            easing,
            inconsistent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Properties whose keyframes mix value shapes that cannot be interpolated.
    pub fn inconsistent_properties(&self) -> impl Iterator<Item = &str> {
        self.inconsistent.iter().map(String::as_str)
    }

    /// Sorted keyframe positions.
    pub fn positions(&self) -> impl Iterator<Item = f64> + '_ {
        self.keys.iter().map(|k| k.position)
    }

    /// Property map at normalized `position`.
    ///
    /// Outside the keyframe range the boundary keyframe's map is returned verbatim. A
    /// property missing from one side of the bounding pair is interpolated across the
    /// nearest keyframes that define it, or held when only one side does. Properties that
    /// fail to interpolate are left out.
    pub fn resolve_at(&self, position: f64) -> PropertyMap {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return PropertyMap::new();
        };
        if position <= first.position {
            return first.raw.clone();
        }
        if position >= last.position {
            return last.raw.clone();
        }
        let Some(i) = self
            .keys
            .windows(2)
            .position(|w| w[0].position <= position && position <= w[1].position)
        else {
            return first.raw.clone();
        };

        let (left, right) = (&self.keys[i], &self.keys[i + 1]);
        let names: BTreeSet<&String> = left.raw.keys().chain(right.raw.keys()).collect();

        let mut out = PropertyMap::new();
        for name in names {
            let from = self.keys[..=i]
                .iter()
                .rev()
                .find(|k| k.parsed.contains_key(name));
            let to = self.keys[i + 1..]
                .iter()
                .find(|k| k.parsed.contains_key(name));

            let (from, to) = match (from, to) {
                (Some(from), Some(to)) => (from, to),
                (Some(only), None) | (None, Some(only)) => {
                    if let Some(v) = only.raw.get(name) {
                        out.insert(name.clone(), v.clone());
                    }
                    continue;
                }
                (None, None) => continue,
            };

            let local = segment_progress(from.position, to.position, position);
            if local <= 0.0 {
                if let Some(v) = from.raw.get(name) {
                    out.insert(name.clone(), v.clone());
                }
                continue;
            }
            if local >= 1.0 {
                if let Some(v) = to.raw.get(name) {
                    out.insert(name.clone(), v.clone());
                }
                continue;
            }

            let (Some(a), Some(b)) = (from.parsed.get(name), to.parsed.get(name)) else {
                continue;
            };
            let eased = from.easing.unwrap_or(self.easing).apply(local);
            match interpolate_values(a, b, eased) {
                Ok(v) => {
                    out.insert(name.clone(), v.to_property_value());
                }
                Err(err) => {
                    tracing::warn!(property = %name, %err, "skipping property for this segment");
                }
            }
        }
        out
    }
}

/// Resolve `keyframes` (any order) at `position` with a single track easing.
pub fn resolve_at(keyframes: &[TrackKeyframe], position: f64, easing: Easing) -> PropertyMap {
    Track::new(keyframes.to_vec(), easing).resolve_at(position)
}

// Zero-width segments are a degenerate range: progress is pinned to the start.
fn segment_progress(start: f64, end: f64, position: f64) -> f64 {
    let span = end - start;
    if span <= 0.0 {
        tracing::trace!(start, end, "degenerate keyframe range");
        return 0.0;
    }
    ((position - start) / span).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/track.rs"]
mod tests;
