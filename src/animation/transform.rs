use smallvec::SmallVec;

use crate::animation::value::{Length, Unit};
use crate::foundation::math::{format_number, lerp};

/// One `name(arg, arg, ...)` call from a CSS function list.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FunctionCall {
    pub(crate) name: String,
    pub(crate) args: SmallVec<[Length; 4]>,
}

/// Parse a whitespace-separated list of CSS function calls with numeric arguments.
pub(crate) fn parse_function_list(s: &str) -> Option<SmallVec<[FunctionCall; 4]>> {
    let mut out = SmallVec::new();
    let mut rest = s.trim();
    while !rest.is_empty() {
        let open = rest.find('(')?;
        let close = open + rest[open..].find(')')?;
        let name = rest[..open].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return None;
        }
        let args = rest[open + 1..close]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|a| !a.is_empty())
            .map(Length::parse)
            .collect::<Option<SmallVec<[Length; 4]>>>()?;
        out.push(FunctionCall {
            name: name.to_ascii_lowercase(),
            args,
        });
        rest = rest[close + 1..].trim_start();
    }
    (!out.is_empty()).then_some(out)
}

/// Translate/scale/rotate bundle, always recomposed as `translate scale rotate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformBundle {
    pub translate_x: Length,
    pub translate_y: Length,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotate_deg: f64,
}

impl Default for TransformBundle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformBundle {
    pub const IDENTITY: Self = Self {
        translate_x: Length::zero(),
        translate_y: Length::zero(),
        scale_x: 1.0,
        scale_y: 1.0,
        rotate_deg: 0.0,
    };

    /// Decompose a CSS transform string. `none` is the identity.
    ///
    /// Repeated functions accumulate (translations and rotations add, scales multiply).
    /// Returns `None` for unsupported functions such as `skew` or `matrix`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("none") {
            return Some(Self::IDENTITY);
        }
        let mut out = Self::IDENTITY;
        for call in parse_function_list(s)? {
            let args = call.args.as_slice();
            match (call.name.as_str(), args) {
                ("translate", [x]) => out.add_translate(*x, Length::zero())?,
                ("translate", [x, y]) => out.add_translate(*x, *y)?,
                ("translatex", [x]) => out.add_translate(*x, Length::zero())?,
                ("translatey", [y]) => out.add_translate(Length::zero(), *y)?,
                ("scale", [s]) => out.mul_scale(scalar(*s)?, scalar(*s)?),
                ("scale", [sx, sy]) => out.mul_scale(scalar(*sx)?, scalar(*sy)?),
                ("scalex", [sx]) => out.mul_scale(scalar(*sx)?, 1.0),
                ("scaley", [sy]) => out.mul_scale(1.0, scalar(*sy)?),
                ("rotate" | "rotatez", [a]) => out.rotate_deg += a.to_degrees()?,
                _ => return None,
            }
        }
        Some(out)
    }

    fn add_translate(&mut self, x: Length, y: Length) -> Option<()> {
        let (a, b) = self.translate_x.unify(x)?;
        self.translate_x = Length::new(a.value + b.value, a.unit);
        let (a, b) = self.translate_y.unify(y)?;
        self.translate_y = Length::new(a.value + b.value, a.unit);
        Some(())
    }

    fn mul_scale(&mut self, sx: f64, sy: f64) {
        self.scale_x *= sx;
        self.scale_y *= sy;
    }

    /// Component-wise interpolation. `None` when translate units cannot be reconciled.
    pub fn lerp(&self, to: &Self, t: f64) -> Option<Self> {
        let (ax, bx) = self.translate_x.unify(to.translate_x)?;
        let (ay, by) = self.translate_y.unify(to.translate_y)?;
        Some(Self {
            translate_x: Length::new(lerp(ax.value, bx.value, t), ax.unit),
            translate_y: Length::new(lerp(ay.value, by.value, t), ay.unit),
            scale_x: lerp(self.scale_x, to.scale_x, t),
            scale_y: lerp(self.scale_y, to.scale_y, t),
            rotate_deg: lerp(self.rotate_deg, to.rotate_deg, t),
        })
    }

    pub fn to_css(&self) -> String {
        let tx = px_default(self.translate_x).to_css();
        let ty = px_default(self.translate_y).to_css();
        let scale = if self.scale_x == self.scale_y {
            format_number(self.scale_x, 4)
        } else {
            format!(
                "{}, {}",
                format_number(self.scale_x, 4),
                format_number(self.scale_y, 4)
            )
        };
        format!(
            "translate({tx}, {ty}) scale({scale}) rotate({}deg)",
            format_number(self.rotate_deg, 4)
        )
    }

    /// 2D matrix for non-DOM renderers. `None` when translation uses relative units.
    pub fn to_affine(&self) -> Option<kurbo::Affine> {
        let tx = absolute_px(self.translate_x)?;
        let ty = absolute_px(self.translate_y)?;
        Some(
            kurbo::Affine::translate((tx, ty))
                * kurbo::Affine::scale_non_uniform(self.scale_x, self.scale_y)
                * kurbo::Affine::rotate(self.rotate_deg.to_radians()),
        )
    }
}

fn scalar(l: Length) -> Option<f64> {
    match l.unit {
        Unit::None => Some(l.value),
        Unit::Percent => Some(l.value / 100.0),
        _ => None,
    }
}

fn px_default(l: Length) -> Length {
    match l.unit {
        Unit::None => Length::px(l.value),
        _ => l,
    }
}

fn absolute_px(l: Length) -> Option<f64> {
    match l.unit {
        Unit::None | Unit::Px => Some(l.value),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transform.rs"]
mod tests;
