//! Light definitions and the lighting environment
//!
//! Lights are pure data: the lighting pass interprets them. Kind-specific
//! fields are optional because configuration may omit them; a light missing
//! what its kind needs is skipped at shading time instead of being rejected
//! here.

use crate::foundation::color::Color3;
use crate::foundation::math::{normalize_or, Vec3};

/// Direction used when a directional light's raw direction is degenerate
pub const DEFAULT_LIGHT_DIRECTION: [f32; 3] = [0.0, 0.0, -1.0];

/// Light types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightKind {
    /// Parallel rays (like sunlight)
    Directional,
    /// Omnidirectional with linear falloff (like a lightbulb)
    Point,
    /// Any kind the pipeline does not shade; kept for diagnostics
    Other(String),
}

impl LightKind {
    /// Parse a kind name, case-insensitively
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "directional" => Self::Directional,
            "point" => Self::Point,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical lower-case name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Directional => "directional",
            Self::Point => "point",
            Self::Other(name) => name,
        }
    }
}

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Name reported in contribution records
    pub name: String,
    /// Light type
    pub kind: LightKind,
    /// Light color
    pub color: Color3,
    /// Light intensity
    pub intensity: f32,
    /// Unit direction the light travels (directional lights)
    pub direction: Option<Vec3>,
    /// Light position (point lights)
    pub position: Option<Vec3>,
    /// Distance at which a point light fades to zero
    pub range: Option<f32>,
}

impl Light {
    /// Create a directional light; the direction is normalised
    pub fn directional(name: impl Into<String>, direction: [f32; 3], color: Color3, intensity: f32) -> Self {
        Self {
            name: name.into(),
            kind: LightKind::Directional,
            color,
            intensity,
            direction: Some(normalize_or(direction, Vec3::from(DEFAULT_LIGHT_DIRECTION))),
            position: None,
            range: None,
        }
    }

    /// Create a point light
    pub fn point(name: impl Into<String>, position: Vec3, color: Color3, intensity: f32, range: f32) -> Self {
        Self {
            name: name.into(),
            kind: LightKind::Point,
            color,
            intensity,
            direction: None,
            position: Some(position),
            range: Some(range),
        }
    }
}

/// Ambient lighting plus an ordered list of lights
///
/// Light order only affects the order of contribution records; the summed
/// color is order-independent.
#[derive(Debug, Clone, PartialEq)]
pub struct LightingEnvironment {
    /// Ambient light color, multiplied with every albedo
    pub ambient_color: Color3,
    /// Lights in registration order
    pub lights: Vec<Light>,
}

impl LightingEnvironment {
    /// Default ambient term
    pub const DEFAULT_AMBIENT: Color3 = Color3::hdr(0.1, 0.1, 0.1);

    /// Create an environment with no lights
    pub const fn new(ambient_color: Color3) -> Self {
        Self { ambient_color, lights: Vec::new() }
    }

    /// Add a light to the environment
    #[must_use]
    pub fn add_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }
}

impl Default for LightingEnvironment {
    fn default() -> Self {
        Self::new(Self::DEFAULT_AMBIENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(LightKind::from_name("Directional"), LightKind::Directional);
        assert_eq!(LightKind::from_name(" POINT "), LightKind::Point);
        assert_eq!(LightKind::from_name("Spot"), LightKind::Other("spot".to_string()));
        assert_eq!(LightKind::from_name("spot").as_str(), "spot");
    }

    #[test]
    fn test_directional_direction_is_normalised() {
        let light = Light::directional("sun", [0.0, -2.0, 0.0], Color3::WHITE, 1.0);
        let direction = light.direction.unwrap();

        assert_relative_eq!(direction.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(direction.y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_direction_uses_default() {
        let light = Light::directional("sun", [0.0, 0.0, 0.0], Color3::WHITE, 1.0);

        assert_eq!(light.direction, Some(Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_environment_builder_keeps_order() {
        let environment = LightingEnvironment::default()
            .add_light(Light::directional("a", [0.0, 0.0, -1.0], Color3::WHITE, 1.0))
            .add_light(Light::point("b", Vec3::zeros(), Color3::WHITE, 1.0, 5.0));

        assert_eq!(environment.ambient_color, LightingEnvironment::DEFAULT_AMBIENT);
        let names: Vec<_> = environment.lights.iter().map(|light| light.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
