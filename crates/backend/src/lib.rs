//! HTTP access to the ConvoSphere backend.
//!
//! [`ConsoleApi`] is the seam the console core talks through;
//! [`HttpBackend`] is its `reqwest` implementation.

pub mod api;
pub mod http;

/// Backend operation trait used by the console core.
pub use api::ConsoleApi;
/// `reqwest`-based backend client.
pub use http::{DEFAULT_API_BASE, HttpBackend};
