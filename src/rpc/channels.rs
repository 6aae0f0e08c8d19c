//! Round-event observability channel.
//!
//! Decouples the role loops from whatever is watching them: role code
//! pushes one [`RoundEvent`] per noteworthy transition, and the host binary
//! (or a test) drains the channel independently. Uses the same
//! `embassy-sync` bounded channel primitive the rest of this codebase uses
//! for inter-task communication, sized generously since events are cheap
//! and consumption is best-effort — a full channel simply drops the oldest
//! opportunity to log, never blocks a role.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// One noteworthy transition in a role's per-tick state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    /// Client `board` was sent its first global model and is now initialized.
    ClientInitialized { board: u8 },
    /// Client `board` reported fewer than `required` epochs; round step skipped.
    EpochGated { board: u8, reported: u32, required: u32 },
    /// A blob transfer of `bytes` bytes completed for `board`.
    BlobTransferred { board: u8, bytes: u32 },
    /// A round step failed and the cursor advanced without completing.
    StepFailed { board: u8, reason: &'static str },
    /// The server instructed its own companion computer to aggregate.
    SelfAggregated,
    /// The round cursor advanced; `round_num` is the value after advancing.
    CursorAdvanced { target: u8, round_num: u32 },
}

const EVENT_DEPTH: usize = 16;

pub static ROUND_EVENTS: Channel<CriticalSectionRawMutex, RoundEvent, EVENT_DEPTH> = Channel::new();

/// Push an event, silently dropping it if the channel is full.
pub fn emit(event: RoundEvent) {
    let _ = ROUND_EVENTS.try_send(event);
}
