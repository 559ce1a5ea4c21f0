use pitch_core::{Angle, EnvSettings, Frame, RobotCommand, RobotId, TeamColor, Vector2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A normalized 4-dimensional agent action, all components in [-1, 1]:
/// global x speed, global y speed, angular speed, kick intent.
///
/// Out-of-range values are not rejected; callers are expected to respect the
/// action-space contract.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Action(pub [f64; 4]);

impl Action {
    pub fn vx(&self) -> f64 {
        self.0[0]
    }

    pub fn vy(&self) -> f64 {
        self.0[1]
    }

    pub fn angular(&self) -> f64 {
        self.0[2]
    }

    pub fn kick(&self) -> f64 {
        self.0[3]
    }
}

/// A source of actions for robots the external policy does not control.
///
/// Keeping this behind a trait lets tests swap the default random behavior for
/// deterministic scripts.
pub trait Policy {
    fn action(&mut self, frame: &Frame, team: TeamColor, index: usize) -> Action;
}

/// Samples every component uniformly from [-1, 1] each tick. This is the
/// default opponent/teammate behavior: cheap, policy-free exploration noise.
pub struct RandomPolicy<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Policy for RandomPolicy<R> {
    fn action(&mut self, _frame: &Frame, _team: TeamColor, _index: usize) -> Action {
        Action([
            self.rng.gen_range(-1.0..1.0),
            self.rng.gen_range(-1.0..1.0),
            self.rng.gen_range(-1.0..1.0),
            self.rng.gen_range(-1.0..1.0),
        ])
    }
}

/// Convert a normalized action into a robot command.
///
/// The (x, y) request is denormalized by the max linear speed, rotated from
/// the global frame into the robot's local frame, and clamped to the max
/// linear speed by scaling the whole vector (per-axis clamping would distort
/// the direction). The kick fires when a uniform draw in [-1, 1] falls below
/// the kick intent, so intent 1 always kicks and intent -1 never does. The
/// dribbler is always engaged.
pub fn decode_command(
    team: TeamColor,
    id: RobotId,
    action: Action,
    heading: Angle,
    settings: &EnvSettings,
    rng: &mut impl Rng,
) -> RobotCommand {
    let global = Vector2::new(
        action.vx() * settings.max_linear_speed,
        action.vy() * settings.max_linear_speed,
    );
    let mut local = heading.global_to_local(&global);

    let norm = local.norm();
    if norm > settings.max_linear_speed {
        // norm > 0 here, so the division is safe
        local *= settings.max_linear_speed / norm;
    }

    let kick_speed = if rng.gen_range(-1.0..1.0) < action.kick() {
        settings.kick_speed
    } else {
        0.0
    };

    RobotCommand {
        team,
        id,
        velocity: local,
        angular_velocity: action.angular() * settings.max_angular_speed,
        kick_speed,
        dribbler: true,
    }
}
