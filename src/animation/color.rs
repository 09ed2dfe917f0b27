use crate::foundation::math::{format_number, lerp};

/// Notation family a color was authored in; interpolated output keeps it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorNotation {
    /// `#rgb`, `#rrggbb` (`alpha`: `#rgba`, `#rrggbbaa`).
    Hex {
        /// Authored with an alpha digit group.
        alpha: bool,
    },
    /// `rgb()` / `rgba()`.
    Rgb {
        /// Authored as `rgba()` or with an alpha component.
        alpha: bool,
    },
    /// `hsl()` / `hsla()`.
    Hsl {
        /// Authored as `hsla()` or with an alpha component.
        alpha: bool,
    },
    /// `hwb()`.
    Hwb {
        /// Authored with a `/ alpha` component.
        alpha: bool,
    },
    /// CSS keyword such as `darkblue` or `transparent`; serialized back as `rgb()`/`rgba()`.
    Named,
}

impl ColorNotation {
    /// Family of `s` judged from its prefix alone. The value itself is parsed elsewhere.
    fn detect(s: &str) -> Option<Self> {
        if let Some(hex) = s.strip_prefix('#') {
            return Some(Self::Hex {
                alpha: matches!(hex.len(), 4 | 8),
            });
        }
        let lower = s.to_ascii_lowercase();
        if let Some((name, args)) = split_call(&lower) {
            let alpha =
                name.ends_with('a') || args.contains('/') || args.split(',').count() == 4;
            return match name {
                "rgb" | "rgba" => Some(Self::Rgb { alpha }),
                "hsl" | "hsla" => Some(Self::Hsl { alpha }),
                "hwb" | "hwba" => Some(Self::Hwb { alpha }),
                _ => None,
            };
        }
        // Keywords only: a bare `abc` or `ffcc00` is not a color without its `#`, and `none` is
        // the transform/filter identity.
        let keyword = !lower.is_empty()
            && lower.bytes().all(|b| b.is_ascii_alphabetic())
            && !lower.bytes().all(|b| b.is_ascii_hexdigit())
            && lower != "none";
        keyword.then_some(Self::Named)
    }
}

/// Straight (non-premultiplied) RGBA color with `r`, `g`, `b` in `0..=255` and `a` in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
    pub notation: ColorNotation,
}

impl Color {
    /// Parse any CSS color notation `csscolorparser` understands and that carries a known
    /// notation family. Returns `None` for non-colors.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let notation = ColorNotation::detect(s)?;
        let parsed = csscolorparser::parse(s).ok()?;
        Some(Self {
            r: channel_from_unit(parsed.r),
            g: channel_from_unit(parsed.g),
            b: channel_from_unit(parsed.b),
            a: if parsed.a.is_finite() {
                parsed.a.clamp(0.0, 1.0)
            } else {
                1.0
            },
            notation,
        })
    }

    /// Channel-wise blend; output keeps `self`'s notation family.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            r: lerp(self.r, to.r, t).clamp(0.0, 255.0),
            g: lerp(self.g, to.g, t).clamp(0.0, 255.0),
            b: lerp(self.b, to.b, t).clamp(0.0, 255.0),
            a: lerp(self.a, to.a, t).clamp(0.0, 1.0),
            notation: self.notation,
        }
    }

    /// Canonical comparison: channels within half a step, alpha within 1/255.
    pub fn canonical_eq(&self, other: &Self) -> bool {
        (self.r - other.r).abs() <= 0.5
            && (self.g - other.g).abs() <= 0.5
            && (self.b - other.b).abs() <= 0.5
            && (self.a - other.a).abs() <= 1.0 / 255.0
    }

    fn translucent(&self) -> bool {
        self.a < 1.0 - 1e-6
    }

    /// Serialize in the color's notation family, switching to the alpha form when needed.
    pub fn to_css(&self) -> String {
        match self.notation {
            ColorNotation::Hex { alpha } => {
                let mut out = format!(
                    "#{:02x}{:02x}{:02x}",
                    channel_u8(self.r),
                    channel_u8(self.g),
                    channel_u8(self.b)
                );
                if alpha || self.translucent() {
                    out.push_str(&format!("{:02x}", channel_u8(self.a * 255.0)));
                }
                out
            }
            ColorNotation::Hsl { alpha } => {
                let (h, s, l) = rgb_to_hsl(self.r / 255.0, self.g / 255.0, self.b / 255.0);
                let h = format_number(h, 2);
                let s = format_number(s * 100.0, 2);
                let l = format_number(l * 100.0, 2);
                if alpha || self.translucent() {
                    format!("hsla({h}, {s}%, {l}%, {})", format_number(self.a, 3))
                } else {
                    format!("hsl({h}, {s}%, {l}%)")
                }
            }
            ColorNotation::Hwb { alpha } => {
                let (r, g, b) = (self.r / 255.0, self.g / 255.0, self.b / 255.0);
                let (h, _, _) = rgb_to_hsl(r, g, b);
                let h = format_number(h, 2);
                let w = format_number(r.min(g).min(b) * 100.0, 2);
                let k = format_number((1.0 - r.max(g).max(b)) * 100.0, 2);
                if alpha || self.translucent() {
                    format!("hwb({h} {w}% {k}% / {})", format_number(self.a, 3))
                } else {
                    format!("hwb({h} {w}% {k}%)")
                }
            }
            ColorNotation::Rgb { alpha } => self.rgb_css(alpha),
            ColorNotation::Named => self.rgb_css(false),
        }
    }

    fn rgb_css(&self, alpha: bool) -> String {
        let (r, g, b) = (
            channel_u8(self.r),
            channel_u8(self.g),
            channel_u8(self.b),
        );
        if alpha || self.translucent() {
            format!("rgba({r}, {g}, {b}, {})", format_number(self.a, 3))
        } else {
            format!("rgb({r}, {g}, {b})")
        }
    }
}

/// `true` when both strings parse as colors that compare canonically equal.
pub fn colors_equal(a: &str, b: &str) -> bool {
    match (Color::parse(a), Color::parse(b)) {
        (Some(a), Some(b)) => a.canonical_eq(&b),
        _ => false,
    }
}

fn channel_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// `0..=1` channel from the parser scaled to `0..=255`, snapping float noise to whole steps.
fn channel_from_unit(v: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    let scaled = (v * 255.0).clamp(0.0, 255.0);
    if (scaled - scaled.round()).abs() < 1e-9 {
        scaled.round()
    } else {
        scaled
    }
}

fn split_call(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let inner = s[open + 1..].trim_end().strip_suffix(')')?;
    Some((s[..open].trim(), inner))
}

/// Normalized sRGB to HSL (hue in degrees, s/l normalized).
fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    if d.abs() < 1e-12 {
        return (0.0, 0.0, l);
    }
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/color.rs"]
mod tests;
