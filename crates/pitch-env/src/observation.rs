use pitch_core::{EnvSettings, FieldGeometry, Frame};

/// Symmetric bound of every observation component.
const NORM_BOUND: f64 = 1.2;

/// Fixed scale constants mapping physical units into [-NORM_BOUND, NORM_BOUND].
///
/// Positions are scaled by the larger half-dimension of the field, speeds by
/// the commanded speed limits; out-of-range values are clamped to the bound.
#[derive(Clone, Copy, Debug)]
pub struct Normalizer {
    max_pos: f64,
    max_speed: f64,
    max_angular_speed: f64,
}

impl Normalizer {
    pub fn new(geom: &FieldGeometry, settings: &EnvSettings) -> Self {
        Self {
            max_pos: geom.half_length().max(geom.half_width()),
            max_speed: settings.max_linear_speed,
            max_angular_speed: settings.max_angular_speed,
        }
    }

    pub fn pos(&self, v: f64) -> f64 {
        (v * NORM_BOUND / self.max_pos).clamp(-NORM_BOUND, NORM_BOUND)
    }

    pub fn speed(&self, v: f64) -> f64 {
        (v * NORM_BOUND / self.max_speed).clamp(-NORM_BOUND, NORM_BOUND)
    }

    pub fn angular_speed(&self, v: f64) -> f64 {
        (v * NORM_BOUND / self.max_angular_speed).clamp(-NORM_BOUND, NORM_BOUND)
    }
}

/// Length of the observation vector for the given roster sizes.
pub fn observation_len(n_blue: usize, n_yellow: usize) -> usize {
    4 + 7 * n_blue + 5 * n_yellow
}

/// Encode a frame into the fixed-layout observation vector:
///
/// - ball `{x, y, vx, vy}`
/// - per blue robot `{x, y, sin(heading), cos(heading), vx, vy, w}`
/// - per yellow robot `{x, y, vx, vy, w}`
///
/// The heading is encoded as (sin, cos) so the policy never sees the +-pi
/// wrap-around discontinuity.
pub fn encode_observation(frame: &Frame, norm: &Normalizer) -> Vec<f64> {
    let mut obs = Vec::with_capacity(observation_len(frame.blue.len(), frame.yellow.len()));

    obs.push(norm.pos(frame.ball.position.x));
    obs.push(norm.pos(frame.ball.position.y));
    obs.push(norm.speed(frame.ball.velocity.x));
    obs.push(norm.speed(frame.ball.velocity.y));

    for robot in &frame.blue {
        obs.push(norm.pos(robot.position.x));
        obs.push(norm.pos(robot.position.y));
        obs.push(robot.heading.sin());
        obs.push(robot.heading.cos());
        obs.push(norm.speed(robot.velocity.x));
        obs.push(norm.speed(robot.velocity.y));
        obs.push(norm.angular_speed(robot.angular_velocity));
    }

    for robot in &frame.yellow {
        obs.push(norm.pos(robot.position.x));
        obs.push(norm.pos(robot.position.y));
        obs.push(norm.speed(robot.velocity.x));
        obs.push(norm.speed(robot.velocity.y));
        obs.push(norm.angular_speed(robot.angular_velocity));
    }

    obs
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use pitch_core::{Angle, Vector2};

    use super::*;

    fn setup() -> (Frame, Normalizer) {
        let settings = EnvSettings::default();
        let geom = FieldGeometry::from_variant(settings.field);
        let frame = Frame::with_rosters(settings.n_robots_blue, settings.n_robots_yellow);
        (frame, Normalizer::new(&geom, &settings))
    }

    #[test]
    fn test_layout_and_length() {
        let (frame, norm) = setup();
        let obs = encode_observation(&frame, &norm);
        assert_eq!(obs.len(), observation_len(3, 3));
        assert_eq!(obs.len(), 4 + 21 + 15);
    }

    #[test]
    fn test_all_components_bounded() {
        let (mut frame, norm) = setup();
        // Way outside any physical range
        frame.ball.position = Vector2::new(100.0, -100.0);
        frame.ball.velocity = Vector2::new(50.0, -50.0);
        frame.blue[0].angular_velocity = 1e6;
        let obs = encode_observation(&frame, &norm);
        for v in obs {
            assert!(v.abs() <= NORM_BOUND + 1e-12, "component {} out of bounds", v);
        }
    }

    #[test]
    fn test_heading_on_unit_circle() {
        let (mut frame, norm) = setup();
        frame.blue[1].heading = Angle::from_degrees(123.0);
        let obs = encode_observation(&frame, &norm);
        // Blue robot 1 starts at index 4 + 7; sin/cos occupy offsets 2 and 3
        let sin = obs[4 + 7 + 2];
        let cos = obs[4 + 7 + 3];
        assert_relative_eq!(sin * sin + cos * cos, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_position_scaling() {
        let (mut frame, norm) = setup();
        let geom = FieldGeometry::default();
        frame.ball.position = Vector2::new(geom.half_length(), 0.0);
        let obs = encode_observation(&frame, &norm);
        // half_length is the larger half-dimension, so it maps to the bound
        assert_relative_eq!(obs[0], NORM_BOUND, epsilon = 1e-12);
        assert_relative_eq!(obs[1], 0.0, epsilon = 1e-12);
    }
}
