//! Framed blob transfer over the companion-computer byte channel.
//!
//! Exposes the four logical calls named in the external-interfaces boundary:
//! push-blob (`send_blob`), pull-blob (`recv_blob`), get-counter
//! (`get_sample_count` / `get_epoch_count`), and request-local-aggregate.
//! Built on the [`Transport`] byte channel below — this crate's single
//! serial companion link, not a multi-transport RPC bridge, so the trait
//! lives here rather than as its own module.

use std::time::{Duration, Instant};

use log::warn;

use crate::config::SERIAL_BUFFER_SIZE;
use crate::error::{Result, TransportError};
use crate::rpc::codec::{SerialAck, SerialCmd, SerialHeader, Scope, ACK_SIZE, HEADER_SIZE};

/// Byte-oriented channel to the companion computer. `SerialLink` is generic
/// over this, so swapping the real UART for an in-memory host simulation
/// requires no change to the header/ACK framing logic above.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> core::result::Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> core::result::Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> core::result::Result<(), Self::Error>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;
}

/// Stand-in for "no companion computer wired up". Discards every write and
/// never has data available; `SerialLink::require_connected` is what
/// actually guards against using one of these in a real transaction.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> core::result::Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> core::result::Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> core::result::Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }
}

/// Header/ACK I/O timeout, per the concurrency model (§5).
pub const IO_TIMEOUT: Duration = Duration::from_secs(300);

pub struct SerialLink<T> {
    transport: T,
    connected: bool,
}

impl<T: Transport> SerialLink<T> {
    pub fn new(transport: T, connected: bool) -> Self {
        Self { transport, connected }
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    fn require_connected(&self) -> Result<()> {
        if !self.connected {
            return Err(TransportError::SerialNotConnected.into());
        }
        Ok(())
    }

    fn write_exact(&mut self, buf: &[u8]) -> Result<()> {
        let mut written = 0;
        let deadline = Instant::now() + IO_TIMEOUT;
        while written < buf.len() {
            if Instant::now() > deadline {
                return Err(TransportError::SerialTimeout.into());
            }
            let n = self
                .transport
                .write(&buf[written..])
                .map_err(|_| TransportError::SerialNotConnected)?;
            written += n;
        }
        Ok(())
    }

    fn read_exact_timed(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(len);
        let mut scratch = vec![0u8; len];
        let deadline = Instant::now() + IO_TIMEOUT;
        while out.len() < len {
            if Instant::now() > deadline {
                return Err(TransportError::SerialTimeout.into());
            }
            let n = self
                .transport
                .read(&mut scratch[..len - out.len()])
                .map_err(|_| TransportError::SerialNotConnected)?;
            out.extend_from_slice(&scratch[..n]);
        }
        Ok(out)
    }

    /// `push-blob`: write the header, read the ACK, and on `!` stream `blob`
    /// in `SERIAL_BUFFER_SIZE`-byte chunks. No per-chunk ACK — truncation is
    /// caught by the caller comparing the declared length to what arrives.
    pub fn send_blob(
        &mut self,
        cmd: SerialCmd,
        scope: Scope,
        blob: &[u8],
        client_id: u16,
        sample_count: u32,
    ) -> Result<SerialAck> {
        self.require_connected()?;
        let header = SerialHeader {
            cmd,
            scope,
            payload_len: blob.len() as u32,
            client_id,
            sample_count,
        };
        self.write_exact(&header.encode())?;
        let ack_bytes = self.read_exact_timed(ACK_SIZE)?;
        let ack = SerialAck::decode(&ack_bytes)?;
        if !ack.ok {
            warn!("serial send_blob: peer refused with ack value {}", ack.value);
            return Ok(ack);
        }
        for chunk in blob.chunks(SERIAL_BUFFER_SIZE) {
            self.write_exact(chunk)?;
        }
        Ok(ack)
    }

    /// `pull-blob`: write an `S`-header, read the ACK, parse the declared
    /// incoming length from it, then read exactly that many bytes.
    pub fn recv_blob(&mut self, scope: Scope, client_id: u16) -> Result<Vec<u8>> {
        self.require_connected()?;
        let header = SerialHeader {
            cmd: SerialCmd::Send,
            scope,
            payload_len: 0,
            client_id,
            sample_count: 0,
        };
        self.write_exact(&header.encode())?;
        let ack_bytes = self.read_exact_timed(ACK_SIZE)?;
        let ack = SerialAck::decode(&ack_bytes)?;
        if !ack.ok {
            return Err(TransportError::SerialNotConnected.into());
        }
        self.read_exact_timed(ack.value as usize)
    }

    /// `get-counter(samples)`.
    pub fn get_sample_count(&mut self, client_id: u16) -> Result<u32> {
        self.query_counter(SerialCmd::SampleCount, client_id)
    }

    /// `get-counter(epochs)`.
    pub fn get_epoch_count(&mut self, client_id: u16) -> Result<u32> {
        self.query_counter(SerialCmd::EpochCount, client_id)
    }

    fn query_counter(&mut self, cmd: SerialCmd, client_id: u16) -> Result<u32> {
        self.require_connected()?;
        let header = SerialHeader {
            cmd,
            scope: Scope::Local,
            payload_len: 0,
            client_id,
            sample_count: 0,
        };
        self.write_exact(&header.encode())?;
        let ack_bytes = self.read_exact_timed(ACK_SIZE)?;
        let ack = SerialAck::decode(&ack_bytes)?;
        Ok(ack.value)
    }

    /// `request-local-aggregate`: instruct the PU to fold the received
    /// global model into its own training state.
    pub fn request_local_aggregate(&mut self, client_id: u16) -> Result<()> {
        self.require_connected()?;
        let header = SerialHeader {
            cmd: SerialCmd::Aggregate,
            scope: Scope::Local,
            payload_len: 0,
            client_id,
            sample_count: 0,
        };
        self.write_exact(&header.encode())?;
        let ack_bytes = self.read_exact_timed(ACK_SIZE)?;
        let ack = SerialAck::decode(&ack_bytes)?;
        if !ack.ok {
            return Err(TransportError::SerialNotConnected.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// In-memory transport: writes append to `written`, reads drain `inbox`.
    struct MemTransport {
        written: Vec<u8>,
        inbox: VecDeque<u8>,
    }

    impl MemTransport {
        fn new() -> Self {
            Self {
                written: Vec::new(),
                inbox: VecDeque::new(),
            }
        }

        fn queue(&mut self, bytes: &[u8]) {
            self.inbox.extend(bytes);
        }
    }

    impl Transport for MemTransport {
        type Error = ();

        fn read(&mut self, buf: &mut [u8]) -> std::result::Result<usize, ()> {
            let mut n = 0;
            while n < buf.len() {
                match self.inbox.pop_front() {
                    Some(b) => {
                        buf[n] = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }

        fn write(&mut self, data: &[u8]) -> std::result::Result<usize, ()> {
            self.written.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> std::result::Result<(), ()> {
            Ok(())
        }

        fn available(&self) -> bool {
            !self.inbox.is_empty()
        }
    }

    #[test]
    fn send_blob_streams_payload_after_ack() {
        let mut t = MemTransport::new();
        t.queue(&SerialAck { ok: true, value: 0 }.encode());
        let mut link = SerialLink::new(t, true);
        let ack = link
            .send_blob(SerialCmd::Receive, Scope::Global, &[1, 2, 3], 7, 0)
            .unwrap();
        assert!(ack.ok);
        assert_eq!(&link.transport.written[HEADER_SIZE..], &[1, 2, 3]);
    }

    #[test]
    fn send_blob_stops_streaming_on_refusal() {
        let mut t = MemTransport::new();
        t.queue(&SerialAck { ok: false, value: 0 }.encode());
        let mut link = SerialLink::new(t, true);
        let ack = link
            .send_blob(SerialCmd::Receive, Scope::Global, &[1, 2, 3], 1, 0)
            .unwrap();
        assert!(!ack.ok);
        assert_eq!(link.transport.written.len(), HEADER_SIZE);
    }

    #[test]
    fn recv_blob_reads_declared_length() {
        let mut t = MemTransport::new();
        t.queue(&SerialAck { ok: true, value: 5 }.encode());
        t.queue(&[10, 20, 30, 40, 50]);
        let mut link = SerialLink::new(t, true);
        let data = link.recv_blob(Scope::Local, 2).unwrap();
        assert_eq!(data, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn not_connected_fails_immediately() {
        let t = MemTransport::new();
        let mut link = SerialLink::new(t, false);
        assert!(link.get_sample_count(0).is_err());
    }

    #[test]
    fn get_sample_count_parses_ack_value() {
        let mut t = MemTransport::new();
        t.queue(&SerialAck { ok: true, value: 42 }.encode());
        let mut link = SerialLink::new(t, true);
        assert_eq!(link.get_sample_count(0).unwrap(), 42);
    }
}
