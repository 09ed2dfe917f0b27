use smallvec::SmallVec;

use crate::animation::transform::parse_function_list;
use crate::animation::value::{Length, Unit};
use crate::foundation::math::{format_number, lerp};

/// CSS filter function supported by the interpolator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Blur,
    Brightness,
    Contrast,
    Grayscale,
    HueRotate,
    Invert,
    Opacity,
    Saturate,
    Sepia,
}

impl FilterKind {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "blur" => Self::Blur,
            "brightness" => Self::Brightness,
            "contrast" => Self::Contrast,
            "grayscale" => Self::Grayscale,
            "hue-rotate" => Self::HueRotate,
            "invert" => Self::Invert,
            "opacity" => Self::Opacity,
            "saturate" => Self::Saturate,
            "sepia" => Self::Sepia,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Grayscale => "grayscale",
            Self::HueRotate => "hue-rotate",
            Self::Invert => "invert",
            Self::Opacity => "opacity",
            Self::Saturate => "saturate",
            Self::Sepia => "sepia",
        }
    }

    /// Amount at which the function has no visual effect.
    pub fn identity(self) -> f64 {
        match self {
            Self::Brightness | Self::Contrast | Self::Opacity | Self::Saturate => 1.0,
            Self::Blur | Self::Grayscale | Self::HueRotate | Self::Invert | Self::Sepia => 0.0,
        }
    }

    // Blur is in px, hue-rotate in degrees, everything else a plain factor.
    fn amount_from(self, arg: Length) -> Option<f64> {
        match self {
            Self::Blur => match arg.unit {
                Unit::Px => Some(arg.value),
                Unit::None if arg.value == 0.0 => Some(0.0),
                _ => None,
            },
            Self::HueRotate => arg.to_degrees(),
            _ => match arg.unit {
                Unit::None => Some(arg.value),
                Unit::Percent => Some(arg.value / 100.0),
                _ => None,
            },
        }
    }

    fn format_amount(self, amount: f64) -> String {
        match self {
            Self::Blur => format!("{}px", format_number(amount, 4)),
            Self::HueRotate => format!("{}deg", format_number(amount, 4)),
            _ => format_number(amount, 4),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterFn {
    pub kind: FilterKind,
    pub amount: f64,
}

/// Ordered list of filter functions. Empty means `none`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterList(pub SmallVec<[FilterFn; 4]>);

impl FilterList {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            return Some(Self::none());
        }
        let mut out = SmallVec::new();
        for call in parse_function_list(s)? {
            let kind = FilterKind::from_name(&call.name)?;
            let amount = match call.args.as_slice() {
                // `blur()` and friends default to their identity.
                [] => kind.identity(),
                [arg] => kind.amount_from(*arg)?,
                _ => return None,
            };
            out.push(FilterFn { kind, amount });
        }
        Some(Self(out))
    }

    fn same_functions(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().zip(other.0.iter()).all(|(a, b)| a.kind == b.kind)
    }

    fn identities_like(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|f| FilterFn {
                    kind: f.kind,
                    amount: f.kind.identity(),
                })
                .collect(),
        )
    }

    /// Pairwise blend. `none` on either side expands to identity amounts;
    /// otherwise both lists must name the same functions in the same order.
    pub fn lerp(&self, to: &Self, t: f64) -> Option<Self> {
        let (from, to) = match (self.is_none(), to.is_none()) {
            (true, false) => (to.identities_like(), to.clone()),
            (false, true) => (self.clone(), self.identities_like()),
            _ => (self.clone(), to.clone()),
        };
        if !from.same_functions(&to) {
            return None;
        }
        Some(Self(
            from.0
                .iter()
                .zip(to.0.iter())
                .map(|(a, b)| FilterFn {
                    kind: a.kind,
                    amount: lerp(a.amount, b.amount, t),
                })
                .collect(),
        ))
    }

    /// Function names only, used in diagnostics.
    pub fn signature(&self) -> String {
        if self.is_none() {
            return "none".to_owned();
        }
        self.0
            .iter()
            .map(|f| f.kind.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_css(&self) -> String {
        if self.is_none() {
            return "none".to_owned();
        }
        self.0
            .iter()
            .map(|f| format!("{}({})", f.kind.as_str(), f.kind.format_amount(f.amount)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/filter.rs"]
mod tests;
