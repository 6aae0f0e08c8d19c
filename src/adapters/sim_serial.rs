//! Simulated companion computer.
//!
//! Answers `SerialLink` requests the way a real training process would,
//! without one running — a canned local blob and sample/epoch counts,
//! dispatched synchronously as soon as a full header (and payload) has
//! been written. Used for host integration tests and for demoing the full
//! round schedule without real hardware attached.

use std::collections::VecDeque;

use crate::rpc::codec::{Scope, SerialAck, SerialCmd, SerialHeader, HEADER_SIZE};
use crate::rpc::serial_link::Transport;

pub struct SimCompanion {
    local_blob: Vec<u8>,
    global_blob: Vec<u8>,
    sample_count: u32,
    epoch_count: u32,
    out: VecDeque<u8>,
    in_buf: Vec<u8>,
    aggregate_calls: u32,
}

impl SimCompanion {
    pub fn new(local_blob: Vec<u8>, sample_count: u32, epoch_count: u32) -> Self {
        Self {
            local_blob,
            global_blob: Vec::new(),
            sample_count,
            epoch_count,
            out: VecDeque::new(),
            in_buf: Vec::new(),
            aggregate_calls: 0,
        }
    }

    /// Canned reply for a server's `Scope::Global` pull — the latest
    /// aggregated model this companion computer holds.
    pub fn with_global_blob(mut self, global_blob: Vec<u8>) -> Self {
        self.global_blob = global_blob;
        self
    }

    pub fn aggregate_calls(&self) -> u32 {
        self.aggregate_calls
    }

    fn push(&mut self, bytes: &[u8]) {
        self.out.extend(bytes.iter().copied());
    }

    fn try_dispatch(&mut self) {
        loop {
            if self.in_buf.len() < HEADER_SIZE {
                return;
            }
            let Ok(header) = SerialHeader::decode(&self.in_buf[..HEADER_SIZE]) else {
                self.in_buf.drain(..HEADER_SIZE);
                continue;
            };
            let needed = HEADER_SIZE + header.payload_len as usize;
            if self.in_buf.len() < needed {
                return;
            }
            self.in_buf.drain(..needed);

            match header.cmd {
                SerialCmd::Receive => {
                    self.push(&SerialAck { ok: true, value: 0 }.encode());
                }
                SerialCmd::Send => {
                    let blob = match header.scope {
                        Scope::Local => self.local_blob.clone(),
                        Scope::Global => self.global_blob.clone(),
                    };
                    self.push(&SerialAck { ok: true, value: blob.len() as u32 }.encode());
                    self.push(&blob);
                }
                SerialCmd::SampleCount => {
                    self.push(&SerialAck { ok: true, value: self.sample_count }.encode());
                }
                SerialCmd::EpochCount => {
                    self.push(&SerialAck { ok: true, value: self.epoch_count }.encode());
                }
                SerialCmd::Aggregate => {
                    self.aggregate_calls += 1;
                    self.push(&SerialAck { ok: true, value: 0 }.encode());
                }
            }
        }
    }
}

impl Transport for SimCompanion {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let n = buf.len().min(self.out.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.out.pop_front().expect("checked len above");
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.in_buf.extend_from_slice(data);
        self.try_dispatch();
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        !self.out.is_empty()
    }
}
