use serde::{Deserialize, Serialize};

use crate::{RobotId, TeamColor, Vector2};

/// A low-level command for one robot, produced fresh every tick.
///
/// The linear velocity is expressed in the robot's local frame (the action
/// decoder rotates the agent's global-frame request before building the
/// command), in m/s.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RobotCommand {
    pub team: TeamColor,
    pub id: RobotId,
    /// Desired velocity in the robot's local frame, in m/s
    pub velocity: Vector2,
    /// Desired angular velocity, counter-clockwise positive, in rad/s
    pub angular_velocity: f64,
    /// Kick speed along the robot's forward axis in m/s; 0 means no kick
    pub kick_speed: f64,
    /// Whether the dribbler is engaged
    pub dribbler: bool,
}

impl RobotCommand {
    pub fn zero(team: TeamColor, id: RobotId) -> Self {
        Self {
            team,
            id,
            velocity: Vector2::zeros(),
            angular_velocity: 0.0,
            kick_speed: 0.0,
            dribbler: false,
        }
    }
}
