//! Process-wide runtime state.

mod state;

pub use state::{is_shutdown, set_serving, setup_shutdown_handler, shutdown_signal};
