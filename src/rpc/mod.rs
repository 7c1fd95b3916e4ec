//! Typed procedures grouped by resource.
//!
//! A call is looked up in [`PROCEDURES`], checked against the caller's
//! session, parsed by its input schema and then handed to exactly one
//! collaborator. Nothing is retried.

pub mod error;
pub mod procedures;
pub mod router;
pub mod schema;

pub use error::{ErrorCode, RpcError, RpcResult, ValidationError};
pub use procedures::{lookup, Access, ProcedureDef, ProcedureKind, PROCEDURES};
pub use router::{Caller, RpcOutput, RpcRouter, SessionEffect};
pub use schema::{parse_input, InputSchema};
