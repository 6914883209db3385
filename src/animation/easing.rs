//! Easing Curves
//!
//! Interpolation curves for tween animations. Curves are named in the
//! animation payload so the renderer can evaluate them per frame; `apply`
//! exists for hosts that sample positions on the CPU.

use serde::{Deserialize, Serialize};

/// Named easing curve for a tween
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EasingCurve {
    /// Constant speed
    #[default]
    Linear,
    /// Slow start, fast end
    EaseIn,
    /// Fast start, slow end (chips settling into a stack)
    EaseOut,
    /// Slow start and end
    EaseInOut,
    /// Cubic ease out, for longer pot movements
    EaseOutCubic,
    /// Overshoot then settle, for the chip push
    EaseOutBack,
}

impl EasingCurve {
    /// Evaluate the curve at progress `t` (clamped to 0..=1)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(2),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseOutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u.powi(3) + c1 * u.powi(2)
            }
        }
    }
}
