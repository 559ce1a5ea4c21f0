use pitch_core::{Angle, EnvSettings, Frame, RobotCommand, RobotState, TeamColor, Vector2};

/// Which robot, if any, currently controls the ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Possession {
    None,
    Held { team: TeamColor, index: usize },
}

impl Possession {
    /// Encode as a single index: blue robots keep their roster index, yellow
    /// indices are offset by the blue roster size, no possession is -1.
    pub fn encoded(&self, n_blue: usize) -> i64 {
        match self {
            Possession::None => -1,
            Possession::Held {
                team: TeamColor::Blue,
                index,
            } => *index as i64,
            Possession::Held {
                team: TeamColor::Yellow,
                index,
            } => (n_blue + index) as i64,
        }
    }
}

/// Find the robot of the given team closest to the ball. Returns the roster
/// index and the distance, or `None` for an empty roster.
pub fn nearest_robot(frame: &Frame, team: TeamColor) -> Option<(usize, f64)> {
    let ball = frame.ball.position;
    frame
        .team(team)
        .iter()
        .enumerate()
        .map(|(i, robot)| (i, (robot.position - ball).norm()))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
}

/// How directly a robot faces a target, as a score in [0, 1]: 1 means looking
/// straight at it, 0 means looking straight away. The signed heading error is
/// folded into (-pi, pi] and mapped linearly.
pub fn facing_alignment(robot: &RobotState, target: Vector2) -> f64 {
    let bearing = Angle::between_points(robot.position, target);
    let error = bearing - robot.heading;
    (std::f64::consts::PI - error.abs()) / std::f64::consts::PI
}

/// Decide ball possession from a frame and the most recent command set.
///
/// A side holds the ball only if its nearest robot is within the possession
/// distance, had its dribbler engaged in the latest command, and faces the
/// ball within the alignment threshold. Ties between the teams' nearest
/// distances favor blue. With no command set yet (the first tick after
/// reset), nobody holds the ball.
pub fn resolve_possession(
    frame: &Frame,
    commands: Option<&[RobotCommand]>,
    settings: &EnvSettings,
) -> Possession {
    let commands = match commands {
        Some(commands) => commands,
        None => return Possession::None,
    };

    let blue = nearest_robot(frame, TeamColor::Blue);
    let yellow = nearest_robot(frame, TeamColor::Yellow);
    let (team, index, dist) = match (blue, yellow) {
        (Some((bi, bd)), Some((_, yd))) if bd <= yd => (TeamColor::Blue, bi, bd),
        (Some((bi, bd)), None) => (TeamColor::Blue, bi, bd),
        (_, Some((yi, yd))) => (TeamColor::Yellow, yi, yd),
        (None, None) => return Possession::None,
    };

    if dist > settings.possession_distance {
        return Possession::None;
    }
    let robot = match frame.robot(team, index) {
        Some(robot) => robot,
        None => return Possession::None,
    };
    let dribbling = commands
        .iter()
        .find(|cmd| cmd.team == team && cmd.id == robot.id)
        .map(|cmd| cmd.dribbler)
        .unwrap_or(false);
    if !dribbling {
        return Possession::None;
    }
    if facing_alignment(robot, frame.ball.position) < settings.facing_alignment_min {
        return Possession::None;
    }

    Possession::Held { team, index }
}
