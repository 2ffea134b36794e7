//! Tone mapping operators
//!
//! Exposure is applied first (never below 0.001), then one of three curves
//! maps the result into [0, 1].

use serde::{Deserialize, Serialize};

use crate::foundation::color::Color3;
use crate::foundation::math::utils::saturate;

/// Smallest exposure multiplier applied
const MIN_EXPOSURE: f32 = 0.001;

// ACES filmic fit coefficients
const ACES_A: f32 = 2.51;
const ACES_B: f32 = 0.03;
const ACES_C: f32 = 2.43;
const ACES_D: f32 = 0.59;
const ACES_E: f32 = 0.14;

/// Tone mapping curves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneMapOperator {
    /// ACES filmic approximation (the default for any unrecognised name)
    Aces,
    /// `c / (1 + c)`
    Reinhard,
    /// Plain clamp
    Linear,
}

impl ToneMapOperator {
    /// Resolve an operator name, case-insensitively
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "reinhard" => Self::Reinhard,
            "linear" => Self::Linear,
            _ => Self::Aces,
        }
    }

    /// Map a single exposed channel into [0, 1]
    pub fn map_channel(self, channel: f32) -> f32 {
        let mapped = match self {
            Self::Reinhard => channel / (1.0 + channel),
            Self::Linear => channel,
            Self::Aces => {
                (channel * (ACES_A * channel + ACES_B)) / (channel * (ACES_C * channel + ACES_D) + ACES_E)
            }
        };
        saturate(mapped)
    }
}

/// Tone mapping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneMappingSettings {
    /// Operator name as configured
    pub operator: String,
    /// Exposure multiplier
    pub exposure: f32,
}

impl ToneMappingSettings {
    /// The curve selected by `operator`
    pub fn curve(&self) -> ToneMapOperator {
        ToneMapOperator::from_name(&self.operator)
    }
}

impl Default for ToneMappingSettings {
    fn default() -> Self {
        Self {
            operator: "aces".to_string(),
            exposure: 1.0,
        }
    }
}

/// Expose and tone map a color
pub fn apply_tone_mapping(color: Color3, settings: &ToneMappingSettings) -> Color3 {
    let exposed = color * settings.exposure.max(MIN_EXPOSURE);
    let curve = settings.curve();
    exposed.map(|channel| curve.map_channel(channel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn settings(operator: &str, exposure: f32) -> ToneMappingSettings {
        ToneMappingSettings { operator: operator.to_string(), exposure }
    }

    #[test]
    fn test_operator_names() {
        assert_eq!(ToneMapOperator::from_name("Reinhard"), ToneMapOperator::Reinhard);
        assert_eq!(ToneMapOperator::from_name("LINEAR"), ToneMapOperator::Linear);
        assert_eq!(ToneMapOperator::from_name("aces"), ToneMapOperator::Aces);
        assert_eq!(ToneMapOperator::from_name("filmic"), ToneMapOperator::Aces);
        assert_eq!(ToneMapOperator::from_name(""), ToneMapOperator::Aces);
    }

    #[test]
    fn test_reinhard() {
        let mapped = apply_tone_mapping(Color3::hdr(1.0, 3.0, 0.0), &settings("reinhard", 1.0));

        assert_relative_eq!(mapped.r, 0.5, epsilon = 1e-6);
        assert_relative_eq!(mapped.g, 0.75, epsilon = 1e-6);
        assert_relative_eq!(mapped.b, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_linear_clamps_after_exposure() {
        let mapped = apply_tone_mapping(Color3::hdr(0.25, 0.75, 2.0), &settings("linear", 2.0));

        assert_eq!(mapped, Color3::hdr(0.5, 1.0, 1.0));
    }

    #[test]
    fn test_aces_curve_values() {
        let mapped = apply_tone_mapping(Color3::hdr(0.0, 0.5, 1.0), &settings("aces", 1.0));

        assert_relative_eq!(mapped.r, 0.0, epsilon = 1e-6);
        // 0.5 * 1.285 / (0.5 * 1.805 + 0.14)
        assert_relative_eq!(mapped.g, 0.642_5 / 1.042_5, epsilon = 1e-5);
        // 2.54 / 3.16
        assert_relative_eq!(mapped.b, 2.54 / 3.16, epsilon = 1e-5);
    }

    #[test]
    fn test_exposure_floor() {
        let mapped = apply_tone_mapping(Color3::WHITE, &settings("linear", -4.0));

        assert_relative_eq!(mapped.r, 0.001, epsilon = 1e-7);
    }

    #[test]
    fn test_every_operator_stays_in_unit_range() {
        let inputs = [0.0_f32, 1e-4, 0.18, 0.5, 1.0, 2.0, 10.0, 1_000.0, 1e6];
        for operator in ["aces", "reinhard", "linear"] {
            for exposure in [0.0_f32, 0.5, 1.0, 4.0] {
                for &value in &inputs {
                    let mapped = apply_tone_mapping(Color3::hdr(value, value * 0.5, value * 2.0), &settings(operator, exposure));
                    for channel in mapped.to_array() {
                        assert!(
                            (0.0..=1.0).contains(&channel),
                            "{operator} at exposure {exposure} mapped {value} to {channel}"
                        );
                    }
                }
            }
        }
    }
}
