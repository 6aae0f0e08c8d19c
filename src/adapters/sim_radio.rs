//! Simulated half-duplex radio pair for host tests and demos.
//!
//! Models the physical radio as two channel pairs between exactly two
//! endpoints, with independent, configurable packet loss — enough to
//! exercise `RadioLink`'s retry and timeout paths without real hardware.
//! The real LoRa PHY driver is out of this core's scope; this is the only
//! `RadioPort` implementation the crate ships.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use rand::Rng;

use crate::addressing::LinkAddr;
use crate::app::ports::RadioPort;
use crate::rpc::command::RadioAck;

struct Channel<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

pub struct SimRadioPort {
    data: Channel<Vec<u8>>,
    ack: Channel<Vec<u8>>,
    pending: Option<Vec<u8>>,
    antenna_attached: bool,
    loss_prob: f32,
    own_local_len: u32,
    destination: LinkAddr,
}

impl SimRadioPort {
    /// Build a connected pair. `loss_prob` applies independently to each
    /// side's outbound data packets.
    pub fn pair(loss_prob: f32) -> (Self, Self) {
        let (a_data_tx, b_data_rx) = mpsc::channel();
        let (b_data_tx, a_data_rx) = mpsc::channel();
        let (a_ack_tx, b_ack_rx) = mpsc::channel();
        let (b_ack_tx, a_ack_rx) = mpsc::channel();

        let a = Self {
            data: Channel { tx: a_data_tx, rx: a_data_rx },
            ack: Channel { tx: a_ack_tx, rx: a_ack_rx },
            pending: None,
            antenna_attached: true,
            loss_prob,
            own_local_len: 0,
            destination: 0,
        };
        let b = Self {
            data: Channel { tx: b_data_tx, rx: b_data_rx },
            ack: Channel { tx: b_ack_tx, rx: b_ack_rx },
            pending: None,
            antenna_attached: true,
            loss_prob,
            own_local_len: 0,
            destination: 0,
        };
        (a, b)
    }

    /// Set the value this endpoint echoes back in its synthesized ACKs —
    /// the radio ACK convention carries the receiver's own local-blob length.
    pub fn set_own_local_len(&mut self, len: u32) {
        self.own_local_len = len;
    }

    /// The address most recently passed to [`RadioPort::set_destination`].
    pub fn destination(&self) -> LinkAddr {
        self.destination
    }

    pub fn set_antenna_attached(&mut self, attached: bool) {
        self.antenna_attached = attached;
    }

    fn dropped(&self) -> bool {
        self.loss_prob > 0.0 && rand::thread_rng().r#gen::<f32>() < self.loss_prob
    }
}

impl RadioPort for SimRadioPort {
    fn set_destination(&mut self, addr: LinkAddr) {
        // A `SimRadioPort` pair has exactly one peer, so there is nothing to
        // route — this only records the value for inspection by tests.
        self.destination = addr;
    }

    fn send_with_ack(&mut self, frame: &[u8]) -> Option<heapless::Vec<u8, 5>> {
        if self.dropped() || self.data.tx.send(frame.to_vec()).is_err() {
            return None;
        }
        let bytes = self.ack.rx.recv_timeout(Duration::from_secs(2)).ok()?;
        heapless::Vec::from_slice(&bytes).ok()
    }

    async fn await_rx(&mut self, timeout: Duration) -> bool {
        match self.data.rx.recv_timeout(timeout) {
            Ok(bytes) => {
                self.pending = Some(bytes);
                true
            }
            Err(_) => false,
        }
    }

    fn receive(&mut self) -> Option<heapless::Vec<u8, 248>> {
        let bytes = self.pending.take()?;
        let ack = RadioAck { ok: true, value: self.own_local_len }.encode();
        let _ = self.ack.tx.send(ack.to_vec());
        heapless::Vec::from_slice(&bytes).ok()
    }

    fn sleep(&mut self) {}

    fn antenna_attached(&self) -> bool {
        self.antenna_attached
    }
}
