//! Network Module
//!
//! HTTP server exposing the parts service.
//!
//! ## Architecture
//! - axum router, one handler per endpoint
//! - Service calls run on tokio's blocking pool under a per-request timeout
//! - Service errors mapped 1:1 to status codes and `{message}` bodies

mod handlers;
mod server;

pub use handlers::{error_response, AppContext};
pub use server::Server;
