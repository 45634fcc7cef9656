//! Error types for routing, sessions and save slots.

use game_rules::CatalogError;
use std::path::PathBuf;
use thiserror::Error;

use crate::outcome::Outcome;
use crate::scene::SceneId;

/// Save slot failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("No save slot named '{0}'")]
    SaveSlotNotFound(String),

    #[error("Save slot '{slot}' is corrupt: {reason}")]
    CorruptSaveRecord { slot: String, reason: String },

    #[error("Invalid slot name '{0}': use letters, digits, '-' or '_'")]
    InvalidSlotName(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistenceError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures of the narrative layer.
///
/// Routing errors indicate a broken scene graph and are caught by
/// [`SceneGraph::validate`](crate::graph::SceneGraph::validate) at startup.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("scene {0:?} is not in the graph")]
    UnknownScene(SceneId),

    #[error("scene {scene:?} has no route for outcome '{outcome}'")]
    UnroutableOutcome { scene: SceneId, outcome: Outcome },

    #[error("scene {scene:?} choice '{choice}' emitted undeclared outcome '{outcome}'")]
    UndeclaredOutcome {
        scene: SceneId,
        choice: String,
        outcome: Outcome,
    },

    #[error("no ending for outcome '{0}'")]
    UnknownEnding(Outcome),

    #[error("input closed")]
    InputClosed,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type NarrativeResult<T> = Result<T, NarrativeError>;
