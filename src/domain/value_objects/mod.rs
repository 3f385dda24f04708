//! Value objects: immutable types with no identity

mod hash;
mod os_class;
mod stage;
mod timestamp;

pub use hash::ContentHash;
pub use os_class::{OsClass, OsProfile, EXISTS_MARKER};
pub use stage::DeployStage;
pub use timestamp::DeployTimestamp;
