use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Raised when an easing name or curve definition cannot be resolved.
///
/// Never fatal: track compilation falls back to [`Easing::Linear`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown easing \"{name}\"")]
pub struct UnknownEasingError {
    /// The name (or curve definition) exactly as authored.
    pub name: String,
}

impl UnknownEasingError {
    fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Authored easing reference: a curve name or a cubic-bezier control-point tuple.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum EasingDef {
    /// `"ease-in-out"`, `"easeOutBack"`, `"cubic-bezier(0.4, 0, 0.2, 1)"`, `"steps(4)"`...
    Name(String),
    /// `[x1, y1, x2, y2]` control points.
    Bezier([f64; 4]),
}

impl EasingDef {
    /// Resolve into a concrete curve.
    pub fn resolve(&self) -> Result<Easing, UnknownEasingError> {
        match self {
            Self::Name(name) => name.parse(),
            Self::Bezier([x1, y1, x2, y2]) => Easing::cubic_bezier(*x1, *y1, *x2, *y2),
        }
    }
}

impl From<&str> for EasingDef {
    fn from(s: &str) -> Self {
        Self::Name(s.to_owned())
    }
}

/// Easing curves mapping normalized progress to eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    /// Identity.
    #[default]
    Linear,
    /// CSS `ease`, i.e. `cubic-bezier(0.25, 0.1, 0.25, 1)`.
    Ease,
    /// Cubic ease-in.
    EaseIn,
    /// Cubic ease-out.
    EaseOut,
    /// Cubic ease-in/out.
    EaseInOut,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Quartic ease-in.
    InQuart,
    /// Quartic ease-out.
    OutQuart,
    /// Quartic ease-in/out.
    InOutQuart,
    /// Sinusoidal ease-in.
    InSine,
    /// Sinusoidal ease-out.
    OutSine,
    /// Sinusoidal ease-in/out.
    InOutSine,
    /// Exponential ease-in.
    InExpo,
    /// Exponential ease-out.
    OutExpo,
    /// Exponential ease-in/out.
    InOutExpo,
    /// Circular ease-in.
    InCirc,
    /// Circular ease-out.
    OutCirc,
    /// Circular ease-in/out.
    InOutCirc,
    /// Overshooting (back) ease-in.
    InBack,
    /// Overshooting (back) ease-out.
    OutBack,
    /// Overshooting (back) ease-in/out.
    InOutBack,
    /// Elastic ease-in.
    InElastic,
    /// Elastic ease-out.
    OutElastic,
    /// Elastic ease-in/out.
    InOutElastic,
    /// Bouncing ease-in.
    InBounce,
    /// Bouncing ease-out.
    OutBounce,
    /// Bouncing ease-in/out.
    InOutBounce,
    /// CSS cubic-bezier timing function.
    CubicBezier(f64, f64, f64, f64),
    /// CSS `steps(count, jump-start | jump-end)`.
    Steps {
        /// Number of intervals, at least 1.
        count: u32,
        /// Jump at the start of each interval instead of the end.
        jump_start: bool,
    },
}

const BACK_C1: f64 = 1.70158;
const BACK_C2: f64 = BACK_C1 * 1.525;
const BACK_C3: f64 = BACK_C1 + 1.0;
const ELASTIC_C4: f64 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f64 = (2.0 * PI) / 4.5;

impl Easing {
    /// Build a validated cubic-bezier curve. `x1` and `x2` must lie in `[0, 1]`.
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, UnknownEasingError> {
        let finite = [x1, y1, x2, y2].iter().all(|v| v.is_finite());
        if !finite || !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(UnknownEasingError::new(format!(
                "cubic-bezier({x1}, {y1}, {x2}, {y2})"
            )));
        }
        Ok(Self::CubicBezier(x1, y1, x2, y2))
    }

    /// Apply this curve to progress `t`.
    ///
    /// `t` is not clamped: overshooting curves (back, elastic) and callers passing values
    /// outside `[0, 1]` get the curve's natural extrapolation.
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier_ease(t, 0.25, 0.1, 0.25, 1.0),
            Self::EaseIn | Self::InCubic => t * t * t,
            Self::EaseOut | Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut | Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::InExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Self::OutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::InOutExpo => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            // sqrt arguments floored at 0 so out-of-range t stays finite.
            Self::InCirc => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Self::OutCirc => (1.0 - (t - 1.0).powi(2)).max(0.0).sqrt(),
            Self::InOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).max(0.0).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).max(0.0).sqrt() + 1.0) / 2.0
                }
            }
            Self::InBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Self::OutBack => 1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2),
            Self::InOutBack => {
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2)
                        + 2.0)
                        / 2.0
                }
            }
            Self::InElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    -(2f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
                }
            }
            Self::OutElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
                }
            }
            Self::InOutElastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    -(2f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin())
                        / 2.0
                } else {
                    (2f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin())
                        / 2.0
                        + 1.0
                }
            }
            Self::InBounce => 1.0 - out_bounce(1.0 - t),
            Self::OutBounce => out_bounce(t),
            Self::InOutBounce => {
                if t < 0.5 {
                    (1.0 - out_bounce(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + out_bounce(2.0 * t - 1.0)) / 2.0
                }
            }
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, x1, y1, x2, y2),
            Self::Steps { count, jump_start } => {
                let n = f64::from(count.max(1));
                if jump_start {
                    (t * n).ceil() / n
                } else {
                    (t * n).floor() / n
                }
            }
        }
    }
}

fn out_bounce(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// Cubic bezier timing (CSS semantics): solve `x(p) = t` then return `y(p)`.
///
/// Newton-Raphson with a bisection fallback. Outside `[0, 1]` the input passes through.
fn cubic_bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }

    let mut p = t;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - t;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2);
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = t;
    for _ in 0..30 {
        let val = bezier_sample(p, x1, x2);
        if (val - t).abs() < 1e-7 {
            break;
        }
        if val < t {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2)
}

#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

fn parse_call_args<'a>(s: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let rest = s.strip_prefix(name)?.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.split(',').map(str::trim).collect())
}

impl FromStr for Easing {
    type Err = UnknownEasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();

        if let Some(args) = parse_call_args(&raw, "cubic-bezier") {
            let nums = args
                .iter()
                .map(|a| a.parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| UnknownEasingError::new(s))?;
            let [x1, y1, x2, y2] = nums[..] else {
                return Err(UnknownEasingError::new(s));
            };
            return Self::cubic_bezier(x1, y1, x2, y2);
        }

        if let Some(args) = parse_call_args(&raw, "steps") {
            let count = args
                .first()
                .and_then(|c| c.parse::<u32>().ok())
                .filter(|c| *c > 0)
                .ok_or_else(|| UnknownEasingError::new(s))?;
            let jump_start = match args.get(1).copied() {
                None | Some("end") | Some("jump-end") => false,
                Some("start") | Some("jump-start") => true,
                Some(_) => return Err(UnknownEasingError::new(s)),
            };
            return Ok(Self::Steps { count, jump_start });
        }

        let key: String = raw
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        let easing = match key.as_str() {
            "linear" => Self::Linear,
            "ease" => Self::Ease,
            "easein" => Self::EaseIn,
            "easeout" => Self::EaseOut,
            "easeinout" => Self::EaseInOut,
            "stepstart" => Self::Steps {
                count: 1,
                jump_start: true,
            },
            "stepend" => Self::Steps {
                count: 1,
                jump_start: false,
            },
            "easeinquad" => Self::InQuad,
            "easeoutquad" => Self::OutQuad,
            "easeinoutquad" => Self::InOutQuad,
            "easeincubic" => Self::InCubic,
            "easeoutcubic" => Self::OutCubic,
            "easeinoutcubic" => Self::InOutCubic,
            "easeinquart" => Self::InQuart,
            "easeoutquart" => Self::OutQuart,
            "easeinoutquart" => Self::InOutQuart,
            "easeinsine" => Self::InSine,
            "easeoutsine" => Self::OutSine,
            "easeinoutsine" => Self::InOutSine,
            "easeinexpo" => Self::InExpo,
            "easeoutexpo" => Self::OutExpo,
            "easeinoutexpo" => Self::InOutExpo,
            "easeincirc" => Self::InCirc,
            "easeoutcirc" => Self::OutCirc,
            "easeinoutcirc" => Self::InOutCirc,
            "easeinback" => Self::InBack,
            "easeoutback" => Self::OutBack,
            "easeinoutback" => Self::InOutBack,
            "easeinelastic" => Self::InElastic,
            "easeoutelastic" => Self::OutElastic,
            "easeinoutelastic" => Self::InOutElastic,
            "easeinbounce" => Self::InBounce,
            "easeoutbounce" => Self::OutBounce,
            "easeinoutbounce" => Self::InOutBounce,
            _ => return Err(UnknownEasingError::new(s)),
        };
        Ok(easing)
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::Ease => "ease",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::InQuad => "ease-in-quad",
            Self::OutQuad => "ease-out-quad",
            Self::InOutQuad => "ease-in-out-quad",
            Self::InCubic => "ease-in-cubic",
            Self::OutCubic => "ease-out-cubic",
            Self::InOutCubic => "ease-in-out-cubic",
            Self::InQuart => "ease-in-quart",
            Self::OutQuart => "ease-out-quart",
            Self::InOutQuart => "ease-in-out-quart",
            Self::InSine => "ease-in-sine",
            Self::OutSine => "ease-out-sine",
            Self::InOutSine => "ease-in-out-sine",
            Self::InExpo => "ease-in-expo",
            Self::OutExpo => "ease-out-expo",
            Self::InOutExpo => "ease-in-out-expo",
            Self::InCirc => "ease-in-circ",
            Self::OutCirc => "ease-out-circ",
            Self::InOutCirc => "ease-in-out-circ",
            Self::InBack => "ease-in-back",
            Self::OutBack => "ease-out-back",
            Self::InOutBack => "ease-in-out-back",
            Self::InElastic => "ease-in-elastic",
            Self::OutElastic => "ease-out-elastic",
            Self::InOutElastic => "ease-in-out-elastic",
            Self::InBounce => "ease-in-bounce",
            Self::OutBounce => "ease-out-bounce",
            Self::InOutBounce => "ease-in-out-bounce",
            Self::CubicBezier(x1, y1, x2, y2) => {
                return write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})");
            }
            Self::Steps { count, jump_start } => {
                let pos = if *jump_start { "start" } else { "end" };
                return write!(f, "steps({count}, {pos})");
            }
        };
        f.write_str(name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
