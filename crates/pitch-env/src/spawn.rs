use pitch_core::{Angle, BallState, EnvSettings, FieldGeometry, Frame, RobotState, Vector2};
use rand::Rng;

/// Resampling attempts between "placement is taking unusually long" warnings.
const RETRY_WARN_INTERVAL: u32 = 10_000;

/// Positions already claimed during placement. The roster is at most a handful
/// of points, so a flat list with a linear nearest scan is all the index needs
/// to be.
#[derive(Debug, Default)]
pub struct PlacementIndex {
    points: Vec<Vector2>,
}

impl PlacementIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, point: Vector2) {
        self.points.push(point);
    }

    /// Distance to the closest claimed point, or `None` if nothing has been
    /// placed yet.
    pub fn nearest_dist(&self, point: Vector2) -> Option<f64> {
        self.points
            .iter()
            .map(|p| (p - point).norm())
            .min_by(f64::total_cmp)
    }
}

/// A legal randomized starting state together with the retreat boundary
/// derived from it.
#[derive(Debug, Clone)]
pub struct SpawnedFrame {
    pub frame: Frame,
    /// The x threshold behind which the episode terminates, fixed for the
    /// whole episode: the controlled robot's starting x minus the retreat
    /// margin.
    pub done_limit: f64,
}

/// Generate a random legal starting frame.
///
/// Placement order: the ball first, resampled until it is outside the
/// attacking penalty area; then the controlled robot at a fixed offset from
/// the ball at a random bearing, turned to face it; then the remaining blue
/// and all yellow robots, rejection-sampled so no two placed entities are
/// closer than the minimum separation. Retries are unbounded; on a sanely
/// sized field they finish almost immediately.
pub fn initial_frame(
    settings: &EnvSettings,
    geom: &FieldGeometry,
    rng: &mut impl Rng,
) -> SpawnedFrame {
    let mut frame = Frame::with_rosters(settings.n_robots_blue, settings.n_robots_yellow);
    let mut places = PlacementIndex::new();
    let mut attempts = 0u32;

    // Ball anywhere outside the goalkeeper area
    let mut ball_pos = sample_pos(settings, geom, rng, &mut attempts);
    while geom.in_attacking_penalty_area(ball_pos) {
        ball_pos = sample_pos(settings, geom, rng, &mut attempts);
    }
    frame.ball = BallState::at(ball_pos);
    places.insert(ball_pos);

    // Controlled robot right next to the ball, facing it
    let bearing = Angle::random(rng);
    let robot_pos = ball_pos + bearing.to_vector() * settings.spawn_offset;
    frame.blue[0] = RobotState::placed(frame.blue[0].id, robot_pos, bearing + Angle::PI);
    places.insert(robot_pos);
    let done_limit = robot_pos.x - settings.retreat_margin;

    // Everyone else anywhere that keeps the minimum separation
    for i in 1..frame.blue.len() {
        let pos = sample_separated(settings, geom, &places, rng, &mut attempts);
        frame.blue[i] = RobotState::placed(frame.blue[i].id, pos, Angle::random(rng));
        places.insert(pos);
    }
    for i in 0..frame.yellow.len() {
        let pos = sample_separated(settings, geom, &places, rng, &mut attempts);
        frame.yellow[i] = RobotState::placed(frame.yellow[i].id, pos, Angle::random(rng));
        places.insert(pos);
    }

    SpawnedFrame { frame, done_limit }
}

/// One uniform draw from the field interior, keeping the spawn margin from
/// every boundary.
fn sample_pos(
    settings: &EnvSettings,
    geom: &FieldGeometry,
    rng: &mut impl Rng,
    attempts: &mut u32,
) -> Vector2 {
    *attempts += 1;
    if *attempts % RETRY_WARN_INTERVAL == 0 {
        log::warn!(
            "initial placement still unresolved after {} samples; \
             the field may be too small for the configured rosters",
            attempts
        );
    }
    Vector2::new(
        rng.gen_range(
            -geom.half_length() + settings.spawn_margin..geom.half_length() - settings.spawn_margin,
        ),
        rng.gen_range(
            -geom.half_width() + settings.spawn_margin..geom.half_width() - settings.spawn_margin,
        ),
    )
}

fn sample_separated(
    settings: &EnvSettings,
    geom: &FieldGeometry,
    places: &PlacementIndex,
    rng: &mut impl Rng,
    attempts: &mut u32,
) -> Vector2 {
    loop {
        let pos = sample_pos(settings, geom, rng, attempts);
        match places.nearest_dist(pos) {
            Some(dist) if dist < settings.min_separation => continue,
            _ => return pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;

    fn all_positions(frame: &Frame) -> Vec<Vector2> {
        let mut positions = vec![frame.ball.position];
        positions.extend(frame.blue.iter().map(|r| r.position));
        positions.extend(frame.yellow.iter().map(|r| r.position));
        positions
    }

    #[test]
    fn test_separation_and_exclusion_across_seeds() {
        let settings = EnvSettings::default();
        let geom = FieldGeometry::from_variant(settings.field);
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let spawned = initial_frame(&settings, &geom, &mut rng);
            let positions = all_positions(&spawned.frame);

            assert!(
                !geom.in_attacking_penalty_area(spawned.frame.ball.position),
                "seed {}: ball spawned in the goalkeeper area",
                seed
            );

            // Pair (0, 1) is ball/controlled-robot, which sit at the spawn
            // offset by construction; every other pair keeps the separation.
            for i in 0..positions.len() {
                for j in (i + 1)..positions.len() {
                    if (i, j) == (0, 1) {
                        continue;
                    }
                    let dist = (positions[i] - positions[j]).norm();
                    assert!(
                        dist >= settings.min_separation,
                        "seed {}: entities {} and {} only {:.3} m apart",
                        seed,
                        i,
                        j,
                        dist
                    );
                }
            }
        }
    }

    #[test]
    fn test_controlled_robot_faces_ball() {
        let settings = EnvSettings::default();
        let geom = FieldGeometry::from_variant(settings.field);
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let spawned = initial_frame(&settings, &geom, &mut rng);
            let robot = &spawned.frame.blue[0];
            let offset = (robot.position - spawned.frame.ball.position).norm();
            assert!((offset - settings.spawn_offset).abs() < 1e-9);
            let score = crate::facing_alignment(robot, spawned.frame.ball.position);
            assert!(score > 0.999, "seed {}: alignment only {}", seed, score);
        }
    }

    #[test]
    fn test_done_limit_tracks_robot_start() {
        let settings = EnvSettings::default();
        let geom = FieldGeometry::from_variant(settings.field);
        let mut rng = SmallRng::seed_from_u64(42);
        let spawned = initial_frame(&settings, &geom, &mut rng);
        assert!(
            (spawned.done_limit - (spawned.frame.blue[0].position.x - settings.retreat_margin))
                .abs()
                < 1e-12
        );
    }

    #[test]
    fn test_placement_index_nearest() {
        let mut index = PlacementIndex::new();
        assert!(index.nearest_dist(Vector2::zeros()).is_none());
        index.insert(Vector2::new(1.0, 0.0));
        index.insert(Vector2::new(0.0, 3.0));
        let dist = index.nearest_dist(Vector2::zeros()).unwrap();
        assert_eq!(dist, 1.0);
    }
}
