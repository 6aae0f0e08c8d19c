//! Transport layer: wire framing and the two physical links.
//!
//! ```text
//! ┌─────────────┐   ┌────────┐   ┌──────────────┐
//! │ SerialLink   │──▶│ codec  │   │ companion PU │
//! └─────────────┘   └────────┘   └──────────────┘
//! ┌─────────────┐   ┌─────────┐  ┌─────────┐  ┌───────────┐
//! │ RadioLink    │──▶│ command │─▶│ chunked │─▶│ peer board│
//! └─────────────┘   └─────────┘  └─────────┘  └───────────┘
//! ```

pub mod channels;
pub mod chunked;
pub mod codec;
pub mod command;
pub mod radio_link;
pub mod serial_link;
