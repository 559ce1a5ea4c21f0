use serde::{Deserialize, Serialize};

use crate::{Angle, RobotId, TeamColor, Vector2};

/// The ball's state in a single frame.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct BallState {
    /// Position of the ball in meters
    pub position: Vector2,
    /// Velocity of the ball in m/s
    pub velocity: Vector2,
}

impl BallState {
    pub fn at(position: Vector2) -> Self {
        Self {
            position,
            velocity: Vector2::zeros(),
        }
    }
}

impl Default for BallState {
    fn default() -> Self {
        Self::at(Vector2::zeros())
    }
}

/// A single robot's state in a single frame.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct RobotState {
    /// The robot's roster index within its team
    pub id: RobotId,
    /// Position of the robot in meters
    pub position: Vector2,
    /// Heading of the robot, where 0 is the positive x direction and pi/2 the
    /// positive y direction
    pub heading: Angle,
    /// Velocity of the robot in m/s, in the global frame
    pub velocity: Vector2,
    /// Angular speed of the robot in rad/s
    pub angular_velocity: f64,
    /// The most recently commanded speed of each of the four wheels, in rad/s
    pub wheel_speeds: [f64; 4],
}

impl RobotState {
    pub fn new(id: RobotId) -> Self {
        Self {
            id,
            position: Vector2::zeros(),
            heading: Angle::default(),
            velocity: Vector2::zeros(),
            angular_velocity: 0.0,
            wheel_speeds: [0.0; 4],
        }
    }

    pub fn placed(id: RobotId, position: Vector2, heading: Angle) -> Self {
        Self {
            position,
            heading,
            ..Self::new(id)
        }
    }
}

/// A complete positional/kinematic snapshot of the ball and all robots at one
/// tick. Frames are immutable once produced; the environment keeps the current
/// and the previous frame as two distinct snapshots.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Frame {
    pub ball: BallState,
    pub blue: Vec<RobotState>,
    pub yellow: Vec<RobotState>,
}

impl Frame {
    /// Create a frame with all robots at the origin.
    pub fn with_rosters(n_blue: usize, n_yellow: usize) -> Self {
        Self {
            ball: BallState::default(),
            blue: (0..n_blue).map(|i| RobotState::new(RobotId::new(i as u32))).collect(),
            yellow: (0..n_yellow)
                .map(|i| RobotState::new(RobotId::new(i as u32)))
                .collect(),
        }
    }

    pub fn team(&self, color: TeamColor) -> &[RobotState] {
        match color {
            TeamColor::Blue => &self.blue,
            TeamColor::Yellow => &self.yellow,
        }
    }

    pub fn robot(&self, color: TeamColor, index: usize) -> Option<&RobotState> {
        self.team(color).get(index)
    }
}
