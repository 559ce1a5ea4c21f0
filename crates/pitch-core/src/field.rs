use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::Vector2;

/// The static field geometry. All dimensions are in meters.
///
/// The field is centered on the origin. The defended goal sits on the negative
/// x goal line, the attacking goal on the positive one.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct FieldGeometry {
    /// Field length (distance between goal lines)
    pub length: f64,
    /// Field width (distance between touch lines)
    pub width: f64,
    /// Penalty area depth, measured from the goal line
    pub penalty_length: f64,
    /// Penalty area width
    pub penalty_width: f64,
    /// Goal width (distance between the inner edges of the goal posts)
    pub goal_width: f64,
}

/// Preset field sizes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldVariant {
    /// Standard SSL Division B field, 9 x 6 m
    DivisionB,
    /// The small hardware-challenge field, 4.5 x 3 m
    HardwareChallenge,
}

impl FieldGeometry {
    pub fn from_variant(variant: FieldVariant) -> Self {
        match variant {
            FieldVariant::DivisionB => FieldGeometry {
                length: 9.0,
                width: 6.0,
                penalty_length: 1.0,
                penalty_width: 2.0,
                goal_width: 1.0,
            },
            FieldVariant::HardwareChallenge => FieldGeometry {
                length: 4.5,
                width: 3.0,
                penalty_length: 0.5,
                penalty_width: 1.35,
                goal_width: 0.7,
            },
        }
    }

    /// Check the geometric invariants: every dimension positive, goal and
    /// penalty area narrower than the field.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.length > 0.0
                && self.width > 0.0
                && self.penalty_length > 0.0
                && self.penalty_width > 0.0
                && self.goal_width > 0.0,
            "field dimensions must be positive"
        );
        ensure!(
            self.goal_width < self.width,
            "goal width ({}) must be smaller than field width ({})",
            self.goal_width,
            self.width
        );
        ensure!(
            self.penalty_width < self.width,
            "penalty width ({}) must be smaller than field width ({})",
            self.penalty_width,
            self.width
        );
        Ok(())
    }

    pub fn half_length(&self) -> f64 {
        self.length / 2.0
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn half_goal_width(&self) -> f64 {
        self.goal_width / 2.0
    }

    /// Center of the attacking goal mouth.
    pub fn attacking_goal_center(&self) -> Vector2 {
        Vector2::new(self.half_length(), 0.0)
    }

    /// The attacking goal's center and two posts, the targets used for
    /// approach-distance calculations.
    pub fn attacking_goal_targets(&self) -> [Vector2; 3] {
        [
            self.attacking_goal_center(),
            Vector2::new(self.half_length(), self.half_goal_width()),
            Vector2::new(self.half_length(), -self.half_goal_width()),
        ]
    }

    /// Whether a position lies inside the attacking-side penalty area (the
    /// goalkeeper area the ball must not be spawned in).
    pub fn in_attacking_penalty_area(&self, pos: Vector2) -> bool {
        pos.x > self.half_length() - self.penalty_length && pos.y.abs() < self.penalty_width / 2.0
    }
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self::from_variant(FieldVariant::HardwareChallenge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        FieldGeometry::from_variant(FieldVariant::DivisionB)
            .validate()
            .unwrap();
        FieldGeometry::from_variant(FieldVariant::HardwareChallenge)
            .validate()
            .unwrap();
    }

    #[test]
    fn test_validate_rejects_wide_goal() {
        let mut geom = FieldGeometry::default();
        geom.goal_width = geom.width + 1.0;
        assert!(geom.validate().is_err());
    }

    #[test]
    fn test_penalty_area_membership() {
        let geom = FieldGeometry::from_variant(FieldVariant::HardwareChallenge);
        assert!(geom.in_attacking_penalty_area(Vector2::new(2.0, 0.0)));
        assert!(!geom.in_attacking_penalty_area(Vector2::new(0.0, 0.0)));
        assert!(!geom.in_attacking_penalty_area(Vector2::new(2.0, 1.0)));
        // Defended side is never the attacking penalty area
        assert!(!geom.in_attacking_penalty_area(Vector2::new(-2.0, 0.0)));
    }

    #[test]
    fn test_goal_targets() {
        let geom = FieldGeometry::from_variant(FieldVariant::DivisionB);
        let [center, upper, lower] = geom.attacking_goal_targets();
        assert_eq!(center, Vector2::new(4.5, 0.0));
        assert_eq!(upper, Vector2::new(4.5, 0.5));
        assert_eq!(lower, Vector2::new(4.5, -0.5));
    }
}
