//! Synchronous client core and optimistic list state for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps a local mirror of
//! the server's list that applies user actions optimistically.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `TodoController` follows the same split with `begin_*` / `settle`, and
//!   offers drivers that run a request through any `Transport`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use controller::{PendingRequest, TodoController};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
pub use types::{Counts, CreateTodo, Filter, Todo, TodoId, TodoPage, UpdateTodo};
