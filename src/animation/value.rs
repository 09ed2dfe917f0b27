use std::collections::BTreeMap;
use std::fmt;

use crate::animation::color::Color;
use crate::animation::filter::FilterList;
use crate::animation::transform::TransformBundle;
use crate::foundation::math::format_number;

/// Authored property value as stored on keyframes and emitted by the evaluator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Plain number (`opacity`, unitless scale, ...).
    Number(f64),
    /// Any CSS-like text: lengths, colors, transforms, filters, keywords.
    Text(String),
}

impl PropertyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => f.write_str(&format_number(*v, 6)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Property name -> value. Ordered so snapshots are deterministic.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// CSS unit attached to a [`Length`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    None,
    Px,
    Percent,
    Em,
    Rem,
    Vw,
    Vh,
    Deg,
    Rad,
    Turn,
    Ms,
    S,
}

impl Unit {
    fn from_suffix(s: &str) -> Option<Self> {
        Some(match s {
            "" => Self::None,
            "px" => Self::Px,
            "%" => Self::Percent,
            "em" => Self::Em,
            "rem" => Self::Rem,
            "vw" => Self::Vw,
            "vh" => Self::Vh,
            "deg" => Self::Deg,
            "rad" => Self::Rad,
            "turn" => Self::Turn,
            "ms" => Self::Ms,
            "s" => Self::S,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Px => "px",
            Self::Percent => "%",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Vw => "vw",
            Self::Vh => "vh",
            Self::Deg => "deg",
            Self::Rad => "rad",
            Self::Turn => "turn",
            Self::Ms => "ms",
            Self::S => "s",
        }
    }
}

/// A number with a unit, e.g. `12px`, `50%`, `45deg`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

impl Length {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, Unit::None)
    }

    pub fn px(value: f64) -> Self {
        Self::new(value, Unit::Px)
    }

    /// Parse `<number><unit>?`. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let split = s
            .char_indices()
            .find(|(i, c)| {
                !(c.is_ascii_digit()
                    || *c == '.'
                    || ((*c == '-' || *c == '+')
                        && (*i == 0 || matches!(s.as_bytes()[*i - 1], b'e' | b'E')))
                    || ((*c == 'e' || *c == 'E') && exponent_follows(s, *i)))
            })
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        let (num, unit) = s.split_at(split);
        if num.is_empty() {
            return None;
        }
        let value = num.parse::<f64>().ok()?;
        if !value.is_finite() {
            return None;
        }
        let unit = Unit::from_suffix(&unit.to_ascii_lowercase())?;
        Some(Self { value, unit })
    }

    /// Units must match; a zero on either side adopts the other side's unit.
    pub fn unify(self, other: Self) -> Option<(Self, Self)> {
        if self.unit == other.unit {
            return Some((self, other));
        }
        if self.value == 0.0 {
            return Some((Self::new(0.0, other.unit), other));
        }
        if other.value == 0.0 {
            return Some((self, Self::new(0.0, self.unit)));
        }
        None
    }

    /// Angle in degrees, if this is an angle or a unitless zero.
    pub fn to_degrees(self) -> Option<f64> {
        match self.unit {
            Unit::Deg => Some(self.value),
            Unit::Rad => Some(self.value.to_degrees()),
            Unit::Turn => Some(self.value * 360.0),
            Unit::None if self.value == 0.0 => Some(0.0),
            _ => None,
        }
    }

    pub fn to_css(self) -> String {
        format!("{}{}", format_number(self.value, 4), self.unit.as_str())
    }
}

fn exponent_follows(s: &str, i: usize) -> bool {
    // Only treat `e` as an exponent when digits follow (so `1em` stays a unit).
    let rest = &s[i + 1..];
    let rest = rest.strip_prefix(['-', '+']).unwrap_or(rest);
    rest.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Shape of a parsed value, used for compatibility checks and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    Length,
    Color,
    Transform,
    Filter,
    Discrete,
}

impl ValueKind {
    /// Whether two shapes may be interpolated (numbers and lengths mix via zero-coercion).
    pub fn compatible_with(self, other: Self) -> bool {
        match (self, other) {
            (Self::Number | Self::Length, Self::Number | Self::Length) => true,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Number => "number",
            Self::Length => "length",
            Self::Color => "color",
            Self::Transform => "transform",
            Self::Filter => "filter",
            Self::Discrete => "discrete",
        })
    }
}

/// A typed, parsed property value ready for interpolation.
#[derive(Clone, Debug, PartialEq)]
pub enum CssValue {
    Number(f64),
    Length(Length),
    Color(Color),
    Transform(TransformBundle),
    Filter(FilterList),
    /// Non-interpolatable value (font family, keyword, ...).
    Discrete(String),
}

/// How a property name constrains parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PropertyHint {
    Transform,
    Filter,
    Any,
}

impl PropertyHint {
    fn for_name(name: &str) -> Self {
        match name {
            "transform" => Self::Transform,
            "filter" | "backdropFilter" | "backdrop-filter" => Self::Filter,
            _ => Self::Any,
        }
    }
}

impl CssValue {
    /// Parse a value without property context.
    pub fn parse(raw: &PropertyValue) -> Self {
        Self::parse_with_hint(PropertyHint::Any, raw)
    }

    /// Parse a value for a named property (`transform` and `filter` are parsed strictly).
    pub fn parse_for(property: &str, raw: &PropertyValue) -> Self {
        Self::parse_with_hint(PropertyHint::for_name(property), raw)
    }

    fn parse_with_hint(hint: PropertyHint, raw: &PropertyValue) -> Self {
        let text = match raw {
            PropertyValue::Number(v) => return Self::Number(*v),
            PropertyValue::Text(s) => s.trim(),
        };

        match hint {
            PropertyHint::Transform => {
                if let Some(t) = TransformBundle::parse(text) {
                    return Self::Transform(t);
                }
            }
            PropertyHint::Filter => {
                if let Some(f) = FilterList::parse(text) {
                    return Self::Filter(f);
                }
            }
            PropertyHint::Any => {}
        }

        if let Some(len) = Length::parse(text) {
            return match len.unit {
                Unit::None => Self::Number(len.value),
                _ => Self::Length(len),
            };
        }
        if let Some(c) = Color::parse(text) {
            return Self::Color(c);
        }
        if hint == PropertyHint::Any && !text.eq_ignore_ascii_case("none") {
            if let Some(t) = TransformBundle::parse(text) {
                return Self::Transform(t);
            }
            if let Some(f) = FilterList::parse(text) {
                return Self::Filter(f);
            }
        }
        Self::Discrete(text.to_owned())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Number(_) => ValueKind::Number,
            Self::Length(_) => ValueKind::Length,
            Self::Color(_) => ValueKind::Color,
            Self::Transform(_) => ValueKind::Transform,
            Self::Filter(_) => ValueKind::Filter,
            Self::Discrete(_) => ValueKind::Discrete,
        }
    }

    /// Serialize back into an authored-style value.
    pub fn to_property_value(&self) -> PropertyValue {
        match self {
            Self::Number(v) => PropertyValue::Number(*v),
            Self::Length(l) => PropertyValue::Text(l.to_css()),
            Self::Color(c) => PropertyValue::Text(c.to_css()),
            Self::Transform(t) => PropertyValue::Text(t.to_css()),
            Self::Filter(f) => PropertyValue::Text(f.to_css()),
            Self::Discrete(s) => PropertyValue::Text(s.clone()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
