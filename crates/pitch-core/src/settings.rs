use std::{fs, path::Path};

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::FieldVariant;

/// Configuration for the shoot-task environment. Fixed at construction; none
/// of these values change at runtime.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EnvSettings {
    /// Number of robots on the controlled (blue) team.
    pub n_robots_blue: usize,
    /// Number of robots on the opponent (yellow) team.
    pub n_robots_yellow: usize,
    /// Which field preset to play on.
    pub field: FieldVariant,
    /// Duration of one control tick, in seconds.
    pub time_step: f64,
    /// Maximum commanded linear speed, in m/s.
    pub max_linear_speed: f64,
    /// Maximum commanded angular speed, in rad/s.
    pub max_angular_speed: f64,
    /// Kick speed along the robot's forward axis when the kicker fires, in m/s.
    pub kick_speed: f64,
    /// Maximum wheel speed, in rad/s. Used to scale the energy penalty.
    pub max_wheel_speed: f64,
    /// Episode length limit in ticks; also part of the energy penalty scale.
    pub max_episode_steps: u32,
    /// Maximum ball distance at which a robot can hold possession, in meters.
    pub possession_distance: f64,
    /// Minimum facing-alignment score, in [0, 1], required for possession.
    /// 0.9 corresponds to facing the ball within about 18 degrees.
    pub facing_alignment_min: f64,
    /// Minimum separation between any two placed entities at reset, in meters.
    pub min_separation: f64,
    /// Distance between the controlled robot and the ball at reset, in meters.
    pub spawn_offset: f64,
    /// Margin kept from the field boundary when sampling positions, in meters.
    pub spawn_margin: f64,
    /// How far behind its starting x the controlled robot (or the ball) may
    /// retreat before the episode is terminated, in meters.
    pub retreat_margin: f64,
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self {
            n_robots_blue: 3,
            n_robots_yellow: 3,
            field: FieldVariant::HardwareChallenge,
            time_step: 0.025,
            max_linear_speed: 2.5,
            max_angular_speed: 10.0,
            kick_speed: 5.0,
            max_wheel_speed: 160.0,
            max_episode_steps: 1000,
            possession_distance: 0.15,
            facing_alignment_min: 0.9,
            min_separation: 0.2,
            spawn_offset: 0.09,
            spawn_margin: 0.2,
            retreat_margin: 0.5,
        }
    }
}

impl EnvSettings {
    /// The normalizing constant for the energy penalty: the total wheel effort
    /// of one robot driving all four wheels at full speed for a whole episode.
    pub fn energy_scale(&self) -> f64 {
        self.max_wheel_speed * 4.0 * self.max_episode_steps as f64
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.n_robots_blue >= 1, "at least one blue robot is required");
        ensure!(self.time_step > 0.0, "time step must be positive");
        ensure!(
            self.max_linear_speed > 0.0
                && self.max_angular_speed > 0.0
                && self.max_wheel_speed > 0.0
                && self.kick_speed > 0.0,
            "speed limits must be positive"
        );
        ensure!(self.max_episode_steps > 0, "episode length must be positive");
        ensure!(
            self.possession_distance > 0.0,
            "possession distance must be positive"
        );
        ensure!(
            (0.0..=1.0).contains(&self.facing_alignment_min),
            "facing alignment threshold must be in [0, 1]"
        );
        ensure!(
            self.min_separation > 0.0 && self.spawn_offset > 0.0 && self.spawn_margin >= 0.0,
            "placement distances must be positive"
        );
        ensure!(self.retreat_margin > 0.0, "retreat margin must be positive");
        Ok(())
    }

    /// Load the settings from a file, storing the default settings first if
    /// the file does not exist. A file that exists but fails to parse is left
    /// untouched and the defaults are returned.
    ///
    /// # Panics
    ///
    /// Panics if the file exists but cannot be read or if creating the file fails.
    pub fn load_or_insert(path: impl AsRef<Path>) -> Self {
        match fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    log::error!("Failed to parse env settings: {}", err);
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                fs::write(
                    path,
                    serde_json::to_string_pretty(&settings).expect("settings are serializable"),
                )
                .expect("Failed to write env settings");
                settings
            }
            Err(err) => panic!("Failed to read env settings: {}", err),
        }
    }

    /// Store the settings in the given file.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        EnvSettings::default().validate().unwrap();
    }

    #[test]
    fn test_energy_scale() {
        let settings = EnvSettings::default();
        assert_eq!(settings.energy_scale(), 160.0 * 4.0 * 1000.0);
    }

    #[test]
    fn test_validate_rejects_empty_blue_roster() {
        let settings = EnvSettings {
            n_robots_blue: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_roundtrip() {
        let settings = EnvSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: EnvSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.n_robots_blue, settings.n_robots_blue);
        assert_eq!(parsed.max_episode_steps, settings.max_episode_steps);
    }

    #[test]
    fn test_load_or_insert_creates_and_rereads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env-settings.json");

        // First call: no file yet, so the defaults get written out
        let settings = EnvSettings::load_or_insert(&path);
        assert!(path.exists());
        assert_eq!(settings.max_episode_steps, EnvSettings::default().max_episode_steps);

        // Stored changes survive a reload
        let mut settings = settings;
        settings.max_episode_steps = 250;
        settings.store(&path).unwrap();
        let reloaded = EnvSettings::load_or_insert(&path);
        assert_eq!(reloaded.max_episode_steps, 250);
    }

    #[test]
    fn test_load_or_insert_falls_back_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env-settings.json");
        fs::write(&path, "not json").unwrap();
        let settings = EnvSettings::load_or_insert(&path);
        assert_eq!(settings.n_robots_blue, EnvSettings::default().n_robots_blue);
    }
}
