use anyhow::Result;
use pitch_core::{Frame, RobotCommand};

/// The boundary to the external physics engine.
///
/// One `step` call advances the world by exactly one control tick and blocks
/// until the new frame is available; there are no partial results. The
/// environment owns its simulation exclusively, so implementations need no
/// internal synchronization.
pub trait Simulation {
    /// Replace the simulated world with the given frame.
    fn reset(&mut self, frame: &Frame) -> Result<()>;

    /// Apply one command per robot, advance the physics by `dt` seconds and
    /// return the resulting frame.
    fn step(&mut self, commands: &[RobotCommand], dt: f64) -> Result<Frame>;
}
