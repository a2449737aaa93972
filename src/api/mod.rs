//! HTTP API over triage, hospital ranking, the emergency protocol and the
//! incident log.
//!
//! `api_router()` returns a composable `Router` with every route nested
//! under `/api/`; `server` binds it to a socket.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server, ApiServer, ApiSession};
pub use types::ApiContext;
