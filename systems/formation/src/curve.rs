//! Piecewise-linear keyframe curves used to shape formation speed.

use serde::{Deserialize, Serialize};

/// Single control point of a [`Curve`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Normalised input position, usually within `[0, 1]`.
    pub time: f32,
    /// Output produced at `time`.
    pub value: f32,
}

impl Keyframe {
    /// Creates a new keyframe.
    #[must_use]
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Curve sampled by linear interpolation between sorted keyframes.
///
/// Inputs before the first keyframe or after the last one are clamped to the
/// nearest keyframe value. An empty curve evaluates to zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    /// Builds a curve from keyframes in any order.
    #[must_use]
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|left, right| left.time.total_cmp(&right.time));
        Self { keys }
    }

    /// Builds a curve that yields `value` everywhere.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self::new(vec![Keyframe::new(0.0, value)])
    }

    /// Builds a straight line from `(0, start)` to `(1, end)`.
    #[must_use]
    pub fn linear(start: f32, end: f32) -> Self {
        Self::new(vec![Keyframe::new(0.0, start), Keyframe::new(1.0, end)])
    }

    /// Keyframes in ascending time order.
    #[must_use]
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Samples the curve at `time`.
    #[must_use]
    pub fn evaluate(&self, time: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        for pair in self.keys.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if time <= end.time {
                let span = end.time - start.time;
                if span <= f32::EPSILON {
                    return end.value;
                }
                let t = (time - start.time) / span;
                return start.value + (end.value - start.value) * t;
            }
        }

        last.value
    }
}

impl From<Vec<Keyframe>> for Curve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Self::new(keys)
    }
}

impl From<Curve> for Vec<Keyframe> {
    fn from(curve: Curve) -> Self {
        curve.keys
    }
}
