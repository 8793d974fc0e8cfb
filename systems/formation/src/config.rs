//! Tunables for the formation controller.

use glam::Vec2;
use landers_core::WAVE_CLEAR_BONUS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curve::Curve;

/// Horizontal sweep direction of the formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepDirection {
    /// Column angles decrease.
    Negative,
    /// Column angles increase.
    Positive,
}

impl SweepDirection {
    /// Multiplier applied to rotation deltas.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Negative => -1.0,
            Self::Positive => 1.0,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Negative => Self::Positive,
            Self::Positive => Self::Negative,
        }
    }
}

/// Aggregated tuning knobs for a single formation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of enemy rows; row zero is nearest the pivot.
    pub rows: u32,
    /// Number of enemy columns, each swinging on its own pivot.
    pub columns: u32,
    /// Angular spacing between neighbouring columns, in degrees.
    pub degrees_between_invaders: f32,
    /// Radial distance between neighbouring rows.
    pub height_padding: f32,
    /// Radial distance from the pivot to row zero, derived from the camera.
    pub base_radius: f32,
    /// World position of the pivot shared by every column.
    pub origin: Vec2,
    /// Formation rotation offset; the formation is rotated to `starting_degree - 90`.
    pub starting_degree: f32,
    /// Sweep direction used before the first edge is reached.
    pub starting_direction: SweepDirection,
    /// Radial distance covered by one descend step.
    pub drop_amount: f32,
    /// Radial distance covered by one bounce recoil.
    pub bounce_amount: f32,
    /// Scale applied to the sweep rotation, in degrees per second.
    pub rotation_speed: f32,
    /// Increase of the speed multiplier at every round start.
    pub speed_increment: f32,
    /// Speed sampled by kill fraction; drives descend and sweep speed.
    pub move_speed: Curve,
    /// Recoil speed sampled by bounce progress.
    pub bounce_speed: Curve,
    /// Radial speed of the entry motion.
    pub entry_speed: f32,
    /// Radial distance travelled while moving into frame.
    pub entry_amount: f32,
    /// Column angle below which a negative sweep flips.
    pub low_angle_bound: f32,
    /// Column angle above which a positive sweep flips.
    pub high_angle_bound: f32,
    /// Points awarded for clearing the formation.
    pub wave_clear_bonus: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 5,
            columns: 11,
            degrees_between_invaders: 5.0,
            height_padding: 2.0,
            base_radius: 10.0,
            origin: Vec2::ZERO,
            starting_degree: 90.0,
            starting_direction: SweepDirection::Positive,
            drop_amount: 1.0,
            bounce_amount: 1.0,
            rotation_speed: 1.0,
            speed_increment: 0.25,
            move_speed: Curve::linear(1.0, 3.0),
            bounce_speed: Curve::linear(4.0, 1.0),
            entry_speed: 1.0,
            entry_amount: 10.0,
            low_angle_bound: 50.0,
            high_angle_bound: 130.0,
            wave_clear_bonus: WAVE_CLEAR_BONUS,
        }
    }
}

impl Config {
    /// Total number of slots in the formation.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }

    /// Checks that the configuration produces a formation that terminates
    /// every motion it starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }

        for (field, value) in [
            ("drop_amount", self.drop_amount),
            ("bounce_amount", self.bounce_amount),
            ("rotation_speed", self.rotation_speed),
            ("entry_speed", self.entry_speed),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        for (field, value) in [
            ("entry_amount", self.entry_amount),
            ("speed_increment", self.speed_increment),
            ("height_padding", self.height_padding),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        validate_curve("move_speed", &self.move_speed)?;
        validate_curve("bounce_speed", &self.bounce_speed)?;

        let (low, high) = (self.low_angle_bound, self.high_angle_bound);
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(ConfigError::InvertedAngleBounds {
                low: self.low_angle_bound,
                high: self.high_angle_bound,
            });
        }

        Ok(())
    }
}

fn validate_curve(field: &'static str, curve: &Curve) -> Result<(), ConfigError> {
    if curve.keys().is_empty() {
        return Err(ConfigError::EmptyCurve { field });
    }
    if let Some(key) = curve
        .keys()
        .iter()
        .find(|key| !(key.value.is_finite() && key.value > 0.0))
    {
        return Err(ConfigError::CurveNotPositive {
            field,
            time: key.time,
            value: key.value,
        });
    }
    Ok(())
}

/// Reasons a formation configuration is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid has no slots.
    #[error("formation grid must have at least one slot (rows = {rows}, columns = {columns})")]
    EmptyGrid {
        /// Configured rows.
        rows: u32,
        /// Configured columns.
        columns: u32,
    },
    /// A rate or distance that must be strictly positive is not.
    #[error("`{field}` must be positive, got {value}")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A distance that must not be negative is.
    #[error("`{field}` must not be negative, got {value}")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A curve has no keyframes.
    #[error("curve `{field}` has no keyframes")]
    EmptyCurve {
        /// Offending field.
        field: &'static str,
    },
    /// A curve would stall motion.
    #[error("curve `{field}` must stay positive, got {value} at t = {time}")]
    CurveNotPositive {
        /// Offending field.
        field: &'static str,
        /// Keyframe time.
        time: f32,
        /// Keyframe value.
        value: f32,
    },
    /// The sweep bounds are not finite or leave no room to move.
    #[error("angle bounds must be finite with low {low} below high {high}")]
    InvertedAngleBounds {
        /// Configured low bound.
        low: f32,
        /// Configured high bound.
        high: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Keyframe;

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
        assert_eq!(Config::default().capacity(), 55);
    }

    #[test]
    fn rejects_empty_grid() {
        let config = Config {
            columns: 0,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                rows: 5,
                columns: 0
            })
        );
    }

    #[test]
    fn rejects_stalling_motion() {
        let config = Config {
            bounce_amount: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "bounce_amount",
                ..
            })
        ));

        let config = Config {
            move_speed: Curve::new(vec![Keyframe::new(0.0, 1.0), Keyframe::new(1.0, 0.0)]),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CurveNotPositive {
                field: "move_speed",
                ..
            })
        ));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let config = Config {
            low_angle_bound: 140.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedAngleBounds { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_bounds() {
        for (low, high) in [(f32::NAN, 130.0), (50.0, f32::NAN), (50.0, f32::INFINITY)] {
            let config = Config {
                low_angle_bound: low,
                high_angle_bound: high,
                ..Config::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::InvertedAngleBounds { .. })
                ),
                "bounds ({low}, {high}) accepted"
            );
        }
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            rows = 3
            starting_direction = "negative"
            move_speed = [{ time = 0.0, value = 2.0 }]
            "#,
        )
        .expect("parse formation config");

        assert_eq!(config.rows, 3);
        assert_eq!(config.columns, 11);
        assert_eq!(config.starting_direction, SweepDirection::Negative);
        assert_eq!(config.move_speed.evaluate(0.7), 2.0);
    }
}
