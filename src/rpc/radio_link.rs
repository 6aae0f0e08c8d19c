//! Reliable blob transfer over the half-duplex radio.
//!
//! Generic over any [`RadioPort`], so the exact same send/receive/retry
//! logic runs against the real LoRa PHY and against the host mock radio in
//! tests. This is where the per-packet-ACK, per-blob-retry-budget, and
//! `max_retries`-consecutive-misses semantics from the concurrency model
//! live.

use core::time::Duration;

use log::{info, warn};

use crate::app::ports::RadioPort;
use crate::config::RADIO_PACKET_SIZE;
use crate::error::{ConfigError, ProtocolError, Result, TransportError};
use crate::rpc::chunked::{packetize, PacketReassembler};
use crate::rpc::command::{RadioAck, RadioCommand, ReadyMarker};

/// Per-packet RX timeout, per the concurrency model (§5).
pub const PACKET_RX_TIMEOUT: Duration = Duration::from_secs(2);
/// Consecutive RX misses before `recv_blob` aborts.
pub const MAX_RETRIES: u32 = 5;

/// Wraps a [`RadioPort`] with the blob-transfer and command-framing logic.
pub struct RadioLink<P> {
    port: P,
}

impl<P: RadioPort> RadioLink<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Set the link-layer destination for every transmission until changed
    /// again — the per-transaction addressing step the source performs via
    /// `radio.destination = get_radiohead_ID(target_board)`.
    pub fn set_destination(&mut self, addr: crate::addressing::LinkAddr) {
        self.port.set_destination(addr);
    }

    fn check_antenna(&self) -> Result<()> {
        if !self.port.antenna_attached() {
            return Err(ConfigError::AntennaNotAttached.into());
        }
        Ok(())
    }

    /// Send a command frame and synchronously wait for its ACK.
    pub fn send_cmd(&mut self, cmd: RadioCommand) -> Result<RadioAck> {
        self.check_antenna()?;
        let mut frame = heapless::Vec::new();
        cmd.encode(&mut frame);
        let reply = self
            .port
            .send_with_ack(&frame)
            .ok_or(TransportError::AckTimeout)?;
        RadioAck::decode(&reply)
    }

    /// Send the local "ready to transmit" marker and wait for the `#` echo.
    pub fn send_ready(&mut self, length: u32) -> Result<bool> {
        self.check_antenna()?;
        let marker = ReadyMarker { length };
        let reply = self.port.send_with_ack(&marker.encode());
        Ok(reply.is_some_and(|r| r.first() == Some(&b'#')))
    }

    /// Transmit `blob` packet-by-packet, ACKed individually.
    ///
    /// Returns the number of bytes actually transmitted — on the first
    /// missing/invalid ACK the transfer aborts and the running total is
    /// returned; there is no packet-level retransmission on the send side.
    pub fn send_blob(&mut self, blob: &[u8]) -> Result<u32> {
        self.check_antenna()?;
        let mut sent = 0u32;
        for packet in packetize(blob, RADIO_PACKET_SIZE) {
            let reply = self.port.send_with_ack(packet);
            match reply {
                Some(ack) if ack.first() == Some(&b'!') => {
                    sent += packet.len() as u32;
                }
                _ => {
                    warn!("radio send_blob: no ack for packet at offset {sent}, aborting");
                    return Ok(sent);
                }
            }
        }
        info!("radio send_blob: transmitted {sent} bytes");
        Ok(sent)
    }

    /// Receive a blob of `expected_len` bytes, retrying on missed packets.
    ///
    /// The retry counter resets to 0 only after a successfully-received
    /// packet, never at the top of the loop — one source variant had this
    /// backwards, defeating the retry budget entirely.
    pub async fn recv_blob(&mut self, expected_len: u32, max_retries: u32) -> Result<Vec<u8>> {
        let mut reassembler = PacketReassembler::new(expected_len);
        let mut retries = 0u32;

        while !reassembler.is_complete() {
            let ready = self.port.await_rx(PACKET_RX_TIMEOUT).await;
            let packet = if ready { self.port.receive() } else { None };

            match packet {
                Some(buf) if !buf.is_empty() => {
                    reassembler.feed(&buf);
                    retries = 0;
                }
                _ => {
                    retries += 1;
                    if retries >= max_retries {
                        warn!(
                            "radio recv_blob: exceeded {max_retries} retries, aborting at {} of {expected_len} bytes",
                            reassembler.bytes_received()
                        );
                        return Err(TransportError::RetriesExhausted.into());
                    }
                }
            }
        }

        info!("radio recv_blob: received {} bytes", reassembler.bytes_received());
        Ok(reassembler.into_bytes())
    }

    /// Cooperatively wait for an incoming command, ACKing with `own_local_len`
    /// (the board's own local-blob length, per the radio ACK convention).
    pub async fn listen_for_cmd(
        &mut self,
        timeout: Duration,
        own_local_len: u32,
    ) -> Result<Option<RadioCommand>> {
        let ready = self.port.await_rx(timeout).await;
        if !ready {
            return Ok(None);
        }
        let Some(buf) = self.port.receive() else {
            return Ok(None);
        };
        let cmd = RadioCommand::decode(&buf)?;
        // The port's `receive()` already emitted the link-level `!` ACK as a
        // side effect; `own_local_len` is carried in that ACK payload by the
        // port implementation, not composed here.
        let _ = own_local_len;
        Ok(Some(cmd))
    }

    pub fn sleep(&mut self) {
        self.port.sleep();
    }

    /// Send a bare 4-byte little-endian value as its own packet and wait
    /// for its ACK — how `N`/`E` follow-up counts are carried: the
    /// command's own ACK only confirms receipt, the value rides a second
    /// packet (mirrors the source's `send_with_ack(struct.pack("I", n))`).
    pub fn send_value(&mut self, value: u32) -> Result<bool> {
        self.check_antenna()?;
        let reply = self.port.send_with_ack(&value.to_le_bytes());
        Ok(reply.is_some_and(|r| r.first() == Some(&b'!')))
    }

    /// Receive one bare 4-byte little-endian value packet within `timeout`.
    pub async fn recv_value(&mut self, timeout: Duration) -> Result<u32> {
        let ready = self.port.await_rx(timeout).await;
        if !ready {
            return Err(TransportError::AckTimeout.into());
        }
        let buf = self.port.receive().ok_or(TransportError::AckTimeout)?;
        if buf.len() < 4 {
            return Err(ProtocolError::FrameTooShort.into());
        }
        Ok(u32::from_le_bytes(buf[..4].try_into().unwrap()))
    }

    /// Server-side counterpart to [`Self::send_ready`]: wait up to `timeout`
    /// for the client's `#` ready marker and return its declared length.
    /// `None` means the client never announced readiness in time.
    pub async fn recv_ready(&mut self, timeout: Duration) -> Result<Option<u32>> {
        let ready = self.port.await_rx(timeout).await;
        if !ready {
            return Ok(None);
        }
        let Some(buf) = self.port.receive() else {
            return Ok(None);
        };
        let marker = ReadyMarker::decode(&buf)?;
        Ok(Some(marker.length))
    }
}
