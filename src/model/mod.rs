//! Domain model types (pure).
//!
//! All types in this module are pure data.

pub mod error;
pub mod key_action;
pub mod resource;
pub mod screen;

// Re-export for convenience
pub use error::{ErrorReport, SourceError};
pub use key_action::KeyAction;
pub use resource::{KubeContext, Namespace, Workload, WorkloadStatus};
pub use screen::{CycleDirection, Panel, Screen};
