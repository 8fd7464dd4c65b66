//! Round settings
//!
//! Every tunable of a round in one serde struct. Missing JSON fields fall
//! back to the defaults in [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Round configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundSettings {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub wall_thickness: f32,
    /// Distance below the playfield the ball must pass to cost a life
    pub out_of_bounds_margin: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Paddle centre as a fraction of playfield height
    pub paddle_y_ratio: f32,
    /// Rounding of the paddle ends (clamped to half the paddle height)
    pub paddle_corner_radius: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub launch_speed: f32,
    /// Launch direction, normalized at use; must point up (negative y)
    pub launch_direction: [f32; 2],
    pub attach_gap: f32,

    // === Round ===
    pub starting_lives: u32,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            out_of_bounds_margin: OUT_OF_BOUNDS_MARGIN,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_y_ratio: PADDLE_Y_RATIO,
            paddle_corner_radius: PADDLE_CORNER_RADIUS,

            ball_radius: BALL_RADIUS,
            launch_speed: BALL_LAUNCH_SPEED,
            launch_direction: BALL_LAUNCH_DIR,
            attach_gap: BALL_ATTACH_GAP,

            starting_lives: STARTING_LIVES,
        }
    }
}

impl RoundSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings no round could be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("wall_thickness", self.wall_thickness),
            ("out_of_bounds_margin", self.out_of_bounds_margin),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_y_ratio", self.paddle_y_ratio),
            ("paddle_corner_radius", self.paddle_corner_radius),
            ("ball_radius", self.ball_radius),
            ("launch_speed", self.launch_speed),
            ("launch_direction", self.launch_direction[0]),
            ("launch_direction", self.launch_direction[1]),
            ("attach_gap", self.attach_gap),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(field));
            }
        }

        let positive = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("wall_thickness", self.wall_thickness),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_radius", self.ball_radius),
            ("launch_speed", self.launch_speed),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(invalid(field, format!("must be > 0, got {}", value)));
            }
        }

        let non_negative = [
            ("out_of_bounds_margin", self.out_of_bounds_margin),
            ("paddle_corner_radius", self.paddle_corner_radius),
            ("attach_gap", self.attach_gap),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(invalid(field, format!("must be >= 0, got {}", value)));
            }
        }

        if self.paddle_width > self.playfield_width {
            return Err(invalid(
                "paddle_width",
                format!(
                    "{} is wider than the playfield ({})",
                    self.paddle_width, self.playfield_width
                ),
            ));
        }
        if self.paddle_y_ratio <= 0.0 || self.paddle_y_ratio >= 1.0 {
            return Err(invalid(
                "paddle_y_ratio",
                format!("must be inside (0, 1), got {}", self.paddle_y_ratio),
            ));
        }
        if self.ball_radius * 2.0 >= self.playfield_width {
            return Err(invalid("ball_radius", "ball does not fit the playfield".to_string()));
        }
        if self.launch_direction[1] >= 0.0 {
            return Err(invalid(
                "launch_direction",
                "must point up, away from the paddle (negative y)".to_string(),
            ));
        }
        if self.starting_lives == 0 {
            return Err(invalid("starting_lives", "must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Fixed paddle centre height
    pub fn paddle_y(&self) -> f32 {
        self.playfield_height * self.paddle_y_ratio
    }

    /// Velocity given to the ball on launch
    pub fn launch_velocity(&self) -> Vec2 {
        Vec2::from(self.launch_direction).normalize_or_zero() * self.launch_speed
    }
}

fn invalid(field: &'static str, message: String) -> ConfigError {
    ConfigError::InvalidValue { field, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = RoundSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.starting_lives, 3);
        assert_eq!(settings.paddle_y(), 540.0);
    }

    #[test]
    fn test_launch_velocity_has_configured_speed() {
        let settings = RoundSettings::default();
        let v = settings.launch_velocity();
        assert!((v.length() - settings.launch_speed).abs() < 1e-3);
        assert!(v.y < 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = RoundSettings::from_json(r#"{ "starting_lives": 5, "ball_radius": 8.0 }"#).unwrap();
        assert_eq!(settings.starting_lives, 5);
        assert_eq!(settings.ball_radius, 8.0);
        assert_eq!(settings.playfield_width, PLAYFIELD_WIDTH);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = RoundSettings {
            launch_speed: 300.0,
            ..RoundSettings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(RoundSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_zero_lives() {
        let err = RoundSettings::from_json(r#"{ "starting_lives": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "starting_lives", .. }));
    }

    #[test]
    fn test_rejects_downward_launch() {
        let settings = RoundSettings {
            launch_direction: [0.0, 1.0],
            ..RoundSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { field: "launch_direction", .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite() {
        let settings = RoundSettings {
            paddle_width: f32::NAN,
            ..RoundSettings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::NonFinite("paddle_width"))));
    }

    #[test]
    fn test_rejects_oversized_paddle() {
        let settings = RoundSettings {
            paddle_width: 900.0,
            ..RoundSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            RoundSettings::from_json("{ starting_lives: "),
            Err(ConfigError::Json(_))
        ));
    }
}
