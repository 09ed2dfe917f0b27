use crate::animation::value::{CssValue, Length, PropertyValue, ValueKind};

/// Why two endpoint values could not be blended.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum InterpolationError {
    #[error("cannot interpolate {from} into {to}")]
    IncompatibleValueTypes { from: ValueKind, to: ValueKind },

    #[error("cannot interpolate between units `{from}` and `{to}`")]
    IncompatibleUnits { from: String, to: String },

    #[error("cannot interpolate filter functions `{from}` into `{to}`")]
    IncompatibleFunctions { from: String, to: String },
}

/// Blend two authored values without property context.
///
/// `t` is the already-eased progress. Exactly `0` and `1` return the endpoints verbatim.
/// Discrete values (anything that is not a number, length, color, transform or filter)
/// step at the midpoint: `from` while `t < 0.5`, else `to`.
pub fn interpolate(
    from: &PropertyValue,
    to: &PropertyValue,
    t: f64,
) -> Result<PropertyValue, InterpolationError> {
    blend(CssValue::parse(from), CssValue::parse(to), from, to, t)
}

/// Like [`interpolate`], but `transform` and `filter` properties are parsed strictly.
pub fn interpolate_property(
    property: &str,
    from: &PropertyValue,
    to: &PropertyValue,
    t: f64,
) -> Result<PropertyValue, InterpolationError> {
    blend(
        CssValue::parse_for(property, from),
        CssValue::parse_for(property, to),
        from,
        to,
        t,
    )
}

fn blend(
    a: CssValue,
    b: CssValue,
    from: &PropertyValue,
    to: &PropertyValue,
    t: f64,
) -> Result<PropertyValue, InterpolationError> {
    let value = interpolate_values(&a, &b, t)?;
    if t == 0.0 {
        return Ok(from.clone());
    }
    if t == 1.0 {
        return Ok(to.clone());
    }
    Ok(value.to_property_value())
}

/// Typed blend used by the track resolver on pre-parsed values.
pub(crate) fn interpolate_values(
    from: &CssValue,
    to: &CssValue,
    t: f64,
) -> Result<CssValue, InterpolationError> {
    match (from, to) {
        (CssValue::Number(a), CssValue::Number(b)) => Ok(CssValue::Number(a + (b - a) * t)),
        (CssValue::Length(a), CssValue::Length(b)) => lerp_lengths(*a, *b, t),
        (CssValue::Number(a), CssValue::Length(b)) => {
            lerp_lengths(number_as_length(*a, *b)?, *b, t)
        }
        (CssValue::Length(a), CssValue::Number(b)) => {
            lerp_lengths(*a, number_as_length(*b, *a)?, t)
        }
        (CssValue::Color(a), CssValue::Color(b)) => Ok(CssValue::Color(a.lerp(b, t))),
        (CssValue::Transform(a), CssValue::Transform(b)) => a
            .lerp(b, t)
            .map(CssValue::Transform)
            .ok_or_else(|| InterpolationError::IncompatibleUnits {
                from: a.to_css(),
                to: b.to_css(),
            }),
        (CssValue::Filter(a), CssValue::Filter(b)) => a
            .lerp(b, t)
            .map(CssValue::Filter)
            .ok_or_else(|| InterpolationError::IncompatibleFunctions {
                from: a.signature(),
                to: b.signature(),
            }),
        (CssValue::Discrete(_), CssValue::Discrete(_)) => {
            Ok(if t < 0.5 { from.clone() } else { to.clone() })
        }
        (a, b) => Err(InterpolationError::IncompatibleValueTypes {
            from: a.kind(),
            to: b.kind(),
        }),
    }
}

// A bare number only mixes with a length when it is zero.
fn number_as_length(n: f64, like: Length) -> Result<Length, InterpolationError> {
    if n == 0.0 {
        Ok(Length::new(0.0, like.unit))
    } else {
        Err(InterpolationError::IncompatibleUnits {
            from: crate::foundation::math::format_number(n, 4),
            to: like.unit.as_str().to_owned(),
        })
    }
}

fn lerp_lengths(a: Length, b: Length, t: f64) -> Result<CssValue, InterpolationError> {
    let (a, b) = a
        .unify(b)
        .ok_or_else(|| InterpolationError::IncompatibleUnits {
            from: a.unit.as_str().to_owned(),
            to: b.unit.as_str().to_owned(),
        })?;
    Ok(CssValue::Length(Length::new(
        a.value + (b.value - a.value) * t,
        a.unit,
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
