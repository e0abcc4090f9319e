//! Player preferences the simulation consults
//!
//! Persisted by the host alongside its own display preferences; the core only
//! reads the fields below.

use serde::{Deserialize, Serialize};

use crate::consts::AIM_ASSIST_RADIUS;

/// Gameplay-affecting preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Snap the aim point to the nearest non-hazard target
    pub aim_assist: bool,
    /// How far (pixels) the aim point may snap
    pub aim_assist_radius: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            aim_assist: false,
            aim_assist_radius: AIM_ASSIST_RADIUS,
        }
    }
}

impl Settings {
    /// Settings with aim assist turned on at the default radius
    pub fn assisted() -> Self {
        Self {
            aim_assist: true,
            ..Self::default()
        }
    }

    /// Load settings from a JSON string, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(err) => {
                log::warn!("Ignoring unreadable settings ({}), using defaults", err);
                Self::default()
            }
        }
    }

    /// Serialize for the host's storage
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Effective snap radius (zero when assist is off)
    pub fn snap_radius(&self) -> f32 {
        if self.aim_assist {
            self.aim_assist_radius.max(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_radius_respects_toggle() {
        assert_eq!(Settings::default().snap_radius(), 0.0);
        assert_eq!(Settings::assisted().snap_radius(), AIM_ASSIST_RADIUS);
    }

    #[test]
    fn test_json_fallback() {
        let settings = Settings::from_json("{ broken");
        assert!(!settings.aim_assist);

        let settings = Settings::from_json(r#"{ "aim_assist": true }"#);
        assert!(settings.aim_assist);
        assert_eq!(settings.aim_assist_radius, AIM_ASSIST_RADIUS);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::assisted();
        settings.aim_assist_radius = 42.0;
        let restored = Settings::from_json(&settings.to_json());
        assert!(restored.aim_assist);
        assert_eq!(restored.aim_assist_radius, 42.0);
    }
}
