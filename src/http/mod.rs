//! HTTP server module.
//!
//! The server includes:
//! - A plain HTTP accept loop with one task per connection
//! - Shutdown on SIGTERM/SIGINT with a bounded drain of in-flight requests

mod server;
mod shutdown;

pub use server::{serve, start_server, ServerError};
pub use shutdown::trigger_shutdown;
