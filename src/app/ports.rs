//! Hexagonal port traits — the core depends on these, never on concrete
//! hardware or OS types. Real adapters and host-simulation adapters both
//! implement the same traits, so role logic is identical either way.

use core::time::Duration;

use crate::error::Result;

/// Which named blob a [`BlobStore`] operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobName {
    /// This board's latest local model.
    Local,
    /// The current global model.
    Global,
    /// Server-only: most recently received update from client `n` (1-indexed).
    Client(u8),
}

/// Opaque byte-blob storage — `params/local.bin`, `params/global.bin`,
/// `params/client{i}.bin`. Blobs are created lazily; mutation is whole-file
/// rewrite, never partial patch.
pub trait BlobStore {
    /// Length in bytes, or `0` if the blob has never been written.
    fn len(&self, name: BlobName) -> Result<u32>;

    /// Read the full contents. Empty if never written.
    fn read(&self, name: BlobName) -> Result<Vec<u8>>;

    /// Overwrite the blob's full contents.
    fn write(&self, name: BlobName, data: &[u8]) -> Result<()>;
}

/// Monotonic clock, used for the timeouts named in the concurrency model.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Half-duplex radio link, abstracted down to its two primitive operations.
///
/// Everything else — command framing, packetization, retry bookkeeping — is
/// built on top of these in [`crate::rpc::radio_link`], generic over any
/// `RadioPort` implementation.
pub trait RadioPort {
    /// Set the link-layer destination address for every subsequent
    /// transmission, until changed again. A real radio routes by this
    /// register (`radio.destination = ...` in the source this is grounded
    /// on); a simulated point-to-point pair has only one possible peer and
    /// just records the value.
    fn set_destination(&mut self, addr: crate::addressing::LinkAddr);

    /// Transmit `frame` and synchronously wait for the peer's ACK.
    ///
    /// Returns `None` if no ACK arrived (timeout or CRC error) — this is
    /// the "ack_valid" half of the source's `(ack_msg, ack_valid)` pair.
    fn send_with_ack(&mut self, frame: &[u8]) -> Option<heapless::Vec<u8, 5>>;

    /// Suspend until a packet is ready to read or `timeout` elapses.
    ///
    /// This is a genuine cooperative suspension point — the only one on the
    /// radio side — and yields control back to the task harness while
    /// waiting.
    async fn await_rx(&mut self, timeout: Duration) -> bool;

    /// Read one already-ready packet. The radio auto-emits a `!` ACK for
    /// data packets as a side effect of this call.
    fn receive(&mut self) -> Option<heapless::Vec<u8, 248>>;

    /// Power down the radio PHY between transactions.
    fn sleep(&mut self);

    /// Safety interlock — `false` means no antenna is attached and every
    /// transmit attempt must be refused before it reaches the PHY.
    fn antenna_attached(&self) -> bool;
}

/// Raw byte channel to the companion computer. `SerialLink` builds the
/// 12-byte header framing and the four logical calls (push-blob, pull-blob,
/// get-counter, request-local-aggregate) on top of this.
pub use crate::rpc::serial_link::Transport as SerialTransport;
