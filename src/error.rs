//! Unified error types for the FL satellite core.
//!
//! Follows the same pattern the rest of this codebase uses throughout: a
//! single `Error` enum that every subsystem converts into, keeping the role
//! loops' error handling uniform. All variants are `Copy` so they can be
//! cheaply returned from deep inside a transfer without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level core error — one variant per §7 tier
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Tier 1 — bad board id, antenna not attached, invalid static config.
    Config(ConfigError),
    /// Tier 2 — ACK timeout, CRC error, missing packet, serial not connected.
    Transport(TransportError),
    /// Tier 3 — wrong ACK byte, length mismatch, unknown command tag.
    Protocol(ProtocolError),
    /// Tier 4 — blob file could not be opened or written.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors (tier 1)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `board_num` outside `[1, N]`.
    BadBoardId(u8),
    /// Radio transmission attempted with `antenna_attached = false`.
    AntennaNotAttached,
    /// A static config field failed its range check.
    OutOfRange(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadBoardId(n) => write!(f, "board id {n} out of range"),
            Self::AntennaNotAttached => write!(f, "antenna not attached, refusing to transmit"),
            Self::OutOfRange(field) => write!(f, "config field out of range: {field}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Transient transport errors (tier 2)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No ACK arrived within the per-operation timeout.
    AckTimeout,
    /// The radio reported a CRC failure on the received packet.
    CrcError,
    /// `max_retries` consecutive RX misses.
    RetriesExhausted,
    /// The serial peer is not connected.
    SerialNotConnected,
    /// Serial header/ACK I/O exceeded its 300 s budget.
    SerialTimeout,
    /// The client `#` ready message did not arrive within its wait window.
    ClientReadyTimeout,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AckTimeout => write!(f, "ACK timeout"),
            Self::CrcError => write!(f, "CRC error"),
            Self::RetriesExhausted => write!(f, "retries exhausted"),
            Self::SerialNotConnected => write!(f, "serial peer not connected"),
            Self::SerialTimeout => write!(f, "serial timeout"),
            Self::ClientReadyTimeout => write!(f, "client ready (#) timeout"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Protocol mismatch errors (tier 3)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// ACK's leading byte was not `!` (or `#` where expected).
    BadAckByte(u8),
    /// Declared length did not match the bytes actually transferred.
    LengthMismatch { expected: u32, actual: u32 },
    /// Command tag byte did not match any known tag.
    UnknownCommandTag(u8),
    /// Frame shorter than its fixed header size.
    FrameTooShort,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadAckByte(b) => write!(f, "bad ack byte: 0x{b:02x}"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "length mismatch: expected {expected}, got {actual}")
            }
            Self::UnknownCommandTag(b) => write!(f, "unknown command tag: 0x{b:02x}"),
            Self::FrameTooShort => write!(f, "frame shorter than header"),
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

// ---------------------------------------------------------------------------
// Storage errors (tier 4)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    NotFound,
    OpenFailed,
    WriteFailed,
    ReadFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "blob not found"),
            Self::OpenFailed => write!(f, "blob open failed"),
            Self::WriteFailed => write!(f, "blob write failed"),
            Self::ReadFailed => write!(f, "blob read failed"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Core-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
