//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements  | Connects to                             |
//! |--------------|-------------|------------------------------------------|
//! | `log_sink`   | —           | drains `RoundEvent`s to the `log` facade  |
//! | `nvs`        | `BlobStore` | real filesystem / in-memory simulation    |
//! | `time`       | `Clock`     | `std::time::Instant`                      |
//! | `sim_radio`  | `RadioPort` | in-process lossy channel pair (host sim)  |
//! | `sim_serial` | `Transport` | canned companion-computer responder       |

pub mod log_sink;
pub mod nvs;
pub mod sim_radio;
pub mod sim_serial;
pub mod time;
