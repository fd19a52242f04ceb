//! # Actors
//!
//! The supervisor actor owning the current snapshot, its message protocol, and the
//! artifact sources it reloads from.

pub mod loader;
pub mod messages;
pub mod supervisor;
pub mod traits;

pub use loader::JsonFileSource;
pub use messages::SupervisorMessage;
pub use supervisor::{ChatSupervisorHandle, ReloadReport};
pub use traits::{ArtifactSource, DatasetRows};
