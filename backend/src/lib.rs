//! Accounts backend library.
//!
//! Turns a pending external-login registration into a user account inside
//! one storage transaction. The domain layer holds the rules and ports,
//! `inbound` exposes them over HTTP, and `outbound` provides PostgreSQL and
//! in-memory stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
pub mod startup;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
