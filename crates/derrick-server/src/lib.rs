//! HTTP read API for derrick.
//!
//! Two endpoints over the record store, plus a health probe:
//!
//! - `GET /well?api-number=<id>`: one record as a flat JSON object
//! - `GET /wells/in-polygon?coordinates=<flat lat,lon list>`: identifiers
//!   of wells strictly inside the polygon
//! - `GET /health`: service liveness
//!
//! Built on Hyper and Tokio in the same shape as the rest of the stack:
//! a TCP accept loop, one task per connection, graceful shutdown with a
//! bounded drain.

pub mod routes;
pub mod server;
pub mod shutdown;

pub use server::{Server, ServerBuilder, ServerError};
pub use shutdown::ShutdownSignal;
