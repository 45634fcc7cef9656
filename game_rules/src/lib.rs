//! # Game Rules
//!
//! The rules crate: the player aggregate, the static catalog and the
//! subsystem engines that mutate the player under its invariants.
//! It knows nothing about scenes or routing.

pub mod catalog;
pub mod entities;
pub mod error;
pub mod mechanics;
pub mod systems;
pub mod world_state;

pub use catalog::*;
pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use systems::*;
pub use world_state::*;
