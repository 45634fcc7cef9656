//! # Narrative Core
//!
//! The story half of Mystic Quest. This crate sits on top of `game_rules`
//! and drives the journey: scenes emit outcome tokens, the scene graph
//! routes them, the resolution dispatcher settles the climactic encounter
//! and the ending catalog turns the final token into a summary.
//!
//! ## Core Components
//!
//! - **scene**: Immutable scene definitions and the context their effects run in
//! - **graph**: The `(scene, outcome) -> transition` table and its validation
//! - **dispatcher**: Priority tables that pick the boss resolution from flags
//! - **endings**: Terminal tokens, their titles and the final summary
//! - **engine**: The state machine that plays scenes and follows transitions
//! - **session**: The adventure loop and menu actions between scenes
//! - **persistence**: Named save slots on disk
//! - **io**: Presentation and input collaborators
//!
//! ## Design Philosophy
//!
//! - **Table-Driven**: Routing and boss precedence are data, checked at startup
//! - **Terminal-Free**: All output and input go through collaborator traits
//! - **Reproducible**: Every random branch draws from one seedable source

pub mod dispatcher;
pub mod endings;
pub mod engine;
pub mod error;
pub mod graph;
pub mod io;
pub mod outcome;
pub mod persistence;
pub mod scene;
pub mod session;

pub use dispatcher::{resolve, select_path, BossPath, Resolution};
pub use endings::*;
pub use engine::*;
pub use error::*;
pub use graph::*;
pub use io::*;
pub use outcome::*;
pub use persistence::*;
pub use scene::{Scene, SceneContext, SceneId};
pub use session::*;
