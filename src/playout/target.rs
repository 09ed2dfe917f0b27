use std::collections::BTreeMap;

use crate::animation::value::{PropertyMap, PropertyValue};
use crate::foundation::ids::{ElementId, LayerId};

/// Side-effecting sink for computed properties (DOM styles, canvas, export renderer).
pub trait RenderTarget {
    /// Apply computed properties to one element.
    fn apply(&mut self, layer: &LayerId, element: &ElementId, properties: &PropertyMap);

    /// Drop every animated override on one element (neutral: full opacity, no transform,
    /// no override color).
    fn reset(&mut self, layer: &LayerId, element: &ElementId);
}

/// Update passed to closure targets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StyleUpdate<'a> {
    Apply(&'a PropertyMap),
    Reset,
}

impl<F> RenderTarget for F
where
    F: FnMut(&LayerId, &ElementId, StyleUpdate<'_>),
{
    fn apply(&mut self, layer: &LayerId, element: &ElementId, properties: &PropertyMap) {
        self(layer, element, StyleUpdate::Apply(properties));
    }

    fn reset(&mut self, layer: &LayerId, element: &ElementId) {
        self(layer, element, StyleUpdate::Reset);
    }
}

/// Properties an element shows after a reset.
pub fn neutral_styles() -> PropertyMap {
    PropertyMap::from([
        ("opacity".to_owned(), PropertyValue::Number(1.0)),
        ("transform".to_owned(), PropertyValue::from("none")),
    ])
}

/// In-memory target that keeps the merged styles of every element, like a DOM would.
#[derive(Clone, Debug, Default)]
pub struct RecordingTarget {
    styles: BTreeMap<(LayerId, ElementId), PropertyMap>,
    applies: u64,
    resets: u64,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current merged styles of `element` on `layer`.
    pub fn styles(&self, layer: &LayerId, element: &ElementId) -> Option<&PropertyMap> {
        self.styles.get(&(layer.clone(), element.clone()))
    }

    /// Every element ever touched on `layer`, with its current styles.
    pub fn layer_styles<'a>(
        &'a self,
        layer: &'a LayerId,
    ) -> impl Iterator<Item = (&'a ElementId, &'a PropertyMap)> + 'a {
        self.styles
            .iter()
            .filter(move |((l, _), _)| l == layer)
            .map(|((_, e), props)| (e, props))
    }

    pub fn apply_count(&self) -> u64 {
        self.applies
    }

    pub fn reset_count(&self) -> u64 {
        self.resets
    }
}

impl RenderTarget for RecordingTarget {
    fn apply(&mut self, layer: &LayerId, element: &ElementId, properties: &PropertyMap) {
        self.applies += 1;
        let slot = self
            .styles
            .entry((layer.clone(), element.clone()))
            .or_default();
        for (k, v) in properties {
            slot.insert(k.clone(), v.clone());
        }
    }

    fn reset(&mut self, layer: &LayerId, element: &ElementId) {
        self.resets += 1;
        self.styles
            .insert((layer.clone(), element.clone()), neutral_styles());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playout/target.rs"]
mod tests;
