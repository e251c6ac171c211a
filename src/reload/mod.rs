//! Live reload over push connections.
//!
//! ```text
//! watcher --on_change--> Registry --"reload"--> socket tasks --> browsers
//! ```
//!
//! # Modules
//!
//! - `message` - Signal token and connection identifiers
//! - `registry` - Connection set and broadcast

mod message;
mod registry;

pub use registry::{ChangeHandler, Connection, Registry};
