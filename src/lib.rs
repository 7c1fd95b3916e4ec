//! Wholesale ordering backend.
//!
//! Typed RPC procedures for the storefront, dealer portal and admin console,
//! served over HTTP and backed by PostgreSQL or a seeded in-memory store.

pub mod chat;
pub mod config;
pub mod http;
pub mod model;
pub mod recommend;
pub mod rpc;
pub mod seed;
pub mod session;
pub mod store;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use http::{app, AppState};
pub use rpc::{Caller, ProcedureKind, RpcError, RpcOutput, RpcRouter};
pub use store::{MemoryStore, PgStore, Repositories, StoreError, StoreResult};
