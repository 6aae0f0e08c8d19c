//! Application core — pure orchestration logic, zero direct I/O.
//!
//! Holds the server round scheduler, the client reactive loop, and the
//! per-board context and cooperative task harness that wire them to
//! concrete adapters. All interaction with hardware happens through the
//! port traits in [`ports`].

pub mod client_role;
pub mod context;
pub mod ports;
pub mod server_role;
pub mod task_harness;
