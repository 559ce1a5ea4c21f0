//! The per-tick decision pipeline for the robot-soccer "shoot" task: encoding
//! observations, decoding agent actions into robot commands, shaping rewards,
//! deciding termination, and generating randomized starting positions.
//!
//! The physics themselves live behind the [`Simulation`] trait; one external
//! call advances the world by exactly one tick.

mod action;
mod env;
mod observation;
mod possession;
mod reward;
mod sim;
mod spawn;

pub use action::{decode_command, Action, Policy, RandomPolicy};
pub use env::{ShootEnv, StepOutput};
pub use observation::{encode_observation, observation_len, Normalizer};
pub use possession::{facing_alignment, nearest_robot, resolve_possession, Possession};
pub use reward::{evaluate_tick, ShapingReport, TerminalEvent, TickOutcome};
pub use sim::Simulation;
pub use spawn::{initial_frame, PlacementIndex, SpawnedFrame};
