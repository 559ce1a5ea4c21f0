use pitch_core::{EnvSettings, FieldGeometry, Frame, Vector2};
use serde::Serialize;

const GOAL_REWARD: f64 = 50.0;
const RETREAT_REWARD: f64 = -10.0;
/// Gradient terms convert meters of progress into reward at 10 per meter,
/// then clamp, so a single tick can never contribute more than +-1.
const GRADIENT_SCALE: f64 = 10.0;
const ROBOT_GRADIENT_WEIGHT: f64 = 0.2;

/// Per-episode accumulators of every named reward term and termination cause.
/// Reported alongside the scalar reward each tick; reset with the episode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ShapingReport {
    /// Net goals: +1 for each goal scored, -1 for each own goal conceded
    pub goal: f64,
    /// Episodes ended by retreating past the done limit
    pub done_left_out: f64,
    /// Episodes ended by the ball leaving the field outside a goal mouth
    pub done_ball_out: f64,
    /// Episodes ended by the controlled robot leaving the field
    pub done_robot_out: f64,
    /// Accumulated ball-progress gradient reward
    pub rw_ball_grad: f64,
    /// Accumulated robot-progress gradient reward
    pub rw_robot_grad: f64,
    /// Accumulated (negative) energy penalty
    pub rw_energy: f64,
}

/// Why an episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TerminalEvent {
    /// The controlled robot or the ball retreated past the done limit
    RetreatLimit,
    /// The controlled robot left the field
    RobotOut,
    /// The ball left the field without scoring
    BallOut,
    /// The ball crossed the defended goal mouth
    OwnGoal,
    /// The ball crossed the attacking goal mouth
    Goal,
}

/// The reward engine's verdict for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
    pub reward: f64,
    pub done: bool,
    pub event: Option<TerminalEvent>,
}

impl TickOutcome {
    fn in_play(reward: f64) -> Self {
        Self {
            reward,
            done: false,
            event: None,
        }
    }

    fn terminal(reward: f64, event: TerminalEvent) -> Self {
        Self {
            reward,
            done: true,
            event: Some(event),
        }
    }
}

/// Evaluate the termination ladder and, failing that, the shaped reward terms
/// for one tick.
///
/// The ladder is strictly ordered and mutually exclusive: only the first
/// matching rule applies. A robot leaving the field while the ball sits in a
/// goal mouth is reported as a robot-out, never a goal. The designated
/// controlled robot (blue roster index 0) is the one watched by the ladder
/// and charged for energy; the progress gradient follows the active robot.
pub fn evaluate_tick(
    prev: Option<&Frame>,
    current: &Frame,
    geom: &FieldGeometry,
    settings: &EnvSettings,
    done_limit: f64,
    active_index: usize,
    shaping: &mut ShapingReport,
) -> TickOutcome {
    let robot = match current.blue.first() {
        Some(robot) => robot,
        None => return TickOutcome::in_play(0.0),
    };
    let ball = &current.ball;
    let half_len = geom.half_length();
    let half_wid = geom.half_width();
    let half_goal = geom.half_goal_width();

    if robot.position.x < done_limit || ball.position.x < done_limit {
        shaping.done_left_out += 1.0;
        return TickOutcome::terminal(RETREAT_REWARD, TerminalEvent::RetreatLimit);
    }
    if robot.position.y.abs() > half_wid || robot.position.x.abs() > half_len {
        shaping.done_robot_out += 1.0;
        return TickOutcome::terminal(0.0, TerminalEvent::RobotOut);
    }
    if ball.position.y.abs() > half_wid {
        shaping.done_ball_out += 1.0;
        return TickOutcome::terminal(0.0, TerminalEvent::BallOut);
    }
    if ball.position.x < -half_len {
        return if ball.position.y.abs() < half_goal {
            shaping.goal -= 1.0;
            TickOutcome::terminal(-GOAL_REWARD, TerminalEvent::OwnGoal)
        } else {
            shaping.done_ball_out += 1.0;
            TickOutcome::terminal(0.0, TerminalEvent::BallOut)
        };
    }
    if ball.position.x > half_len {
        return if ball.position.y.abs() < half_goal {
            shaping.goal += 1.0;
            TickOutcome::terminal(GOAL_REWARD, TerminalEvent::Goal)
        } else {
            shaping.done_ball_out += 1.0;
            TickOutcome::terminal(0.0, TerminalEvent::BallOut)
        };
    }

    let prev = match prev {
        Some(prev) => prev,
        None => return TickOutcome::in_play(0.0),
    };

    let ball_grad = ball_progress(prev, current, geom);
    shaping.rw_ball_grad += ball_grad;

    let robot_grad = ROBOT_GRADIENT_WEIGHT * robot_progress(prev, current, geom, active_index);
    shaping.rw_robot_grad += robot_grad;

    let energy = -wheel_effort(robot.wheel_speeds) / settings.energy_scale();
    shaping.rw_energy += energy;

    TickOutcome::in_play(ball_grad + robot_grad + energy)
}

/// How much closer the ball got to the attacking goal center since the last
/// frame, scaled and clamped to [-1, 1].
fn ball_progress(prev: &Frame, current: &Frame, geom: &FieldGeometry) -> f64 {
    let goal = geom.attacking_goal_center();
    let last_dist = (goal - prev.ball.position).norm();
    let dist = (goal - current.ball.position).norm();
    ((last_dist - dist) * GRADIENT_SCALE).clamp(-1.0, 1.0)
}

/// How much closer the active robot got to the nearest of the attacking goal's
/// center and posts since the last frame, scaled and clamped to [-1, 1].
fn robot_progress(prev: &Frame, current: &Frame, geom: &FieldGeometry, active_index: usize) -> f64 {
    let (last_robot, robot) = match (prev.blue.get(active_index), current.blue.get(active_index)) {
        (Some(last), Some(now)) => (last, now),
        _ => return 0.0,
    };
    let last_dist = min_target_dist(last_robot.position, geom);
    let dist = min_target_dist(robot.position, geom);
    ((last_dist - dist) * GRADIENT_SCALE).clamp(-1.0, 1.0)
}

fn min_target_dist(pos: Vector2, geom: &FieldGeometry) -> f64 {
    geom.attacking_goal_targets()
        .iter()
        .map(|target| (target - pos).norm())
        .fold(f64::INFINITY, f64::min)
}

fn wheel_effort(wheel_speeds: [f64; 4]) -> f64 {
    wheel_speeds.iter().map(|w| w.abs()).sum()
}
