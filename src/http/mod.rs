//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → dispatch.rs (path → version + check name → registry)
//!     → probe::JoinCoordinator (fan-out / fan-in)
//!     → JSON body written once
//! ```

pub mod dispatch;
pub mod server;

pub use dispatch::{parse_check_path, CheckPath, DispatchError, Dispatcher};
pub use server::{build_router, HttpServer, ServerError, X_REQUEST_ID};
