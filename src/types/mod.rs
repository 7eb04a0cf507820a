//! Plain data types shared by the engine.

mod bounds;
mod config;
mod geometry;
mod keys;
mod merge;
mod selection;

pub use bounds::*;
pub use config::*;
pub use geometry::*;
pub use keys::*;
pub use merge::*;
pub use selection::*;
