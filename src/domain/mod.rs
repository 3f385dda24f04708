//! Domain layer
//!
//! - `value_objects`: OS classification and capability table, hashes,
//!   timestamps, the stage machine
//! - `ports`: traits the application layer drives (local commands, SSH
//!   session, event sink)

pub mod ports;
pub mod value_objects;
