//! Log-based round-event sink.
//!
//! Drains [`RoundEvent`]s pushed by the roles and writes one structured
//! log line per event — the same job the reference firmware's log sink
//! does for its own application events, just against this core's event
//! type.

use log::info;

use crate::rpc::channels::{RoundEvent, ROUND_EVENTS};

/// Drain and log every event currently queued, without blocking.
pub fn drain_and_log() {
    while let Ok(event) = ROUND_EVENTS.try_receive() {
        log_event(&event);
    }
}

fn log_event(event: &RoundEvent) {
    match event {
        RoundEvent::ClientInitialized { board } => {
            info!("ROUND | client {board} initialized");
        }
        RoundEvent::EpochGated { board, reported, required } => {
            info!("ROUND | client {board} gated: {reported}/{required} epochs");
        }
        RoundEvent::BlobTransferred { board, bytes } => {
            info!("ROUND | client {board} transfer: {bytes} bytes");
        }
        RoundEvent::StepFailed { board, reason } => {
            info!("ROUND | client {board} step failed: {reason}");
        }
        RoundEvent::SelfAggregated => {
            info!("ROUND | server self-aggregate");
        }
        RoundEvent::CursorAdvanced { target, round_num } => {
            info!("ROUND | cursor -> board {target}, round {round_num}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_and_log_does_not_panic_when_empty() {
        drain_and_log();
    }

    #[test]
    fn drain_and_log_consumes_queued_events() {
        crate::rpc::channels::emit(RoundEvent::SelfAggregated);
        drain_and_log();
    }
}
