mod angle;
mod command;
mod field;
mod frame;
mod settings;
mod team;

pub use angle::*;
pub use command::*;
pub use field::*;
pub use frame::*;
pub use settings::*;
pub use team::*;

/// A 2D vector in field coordinates, in meters. The x axis points toward the
/// attacking goal, the y axis toward the left touch line.
pub type Vector2 = nalgebra::Vector2<f64>;
