//! Radio link command alphabet: the 1/5-byte command frame, the 5-byte ACK,
//! and the client `#` ready marker.
//!
//! Same framing discipline as [`super::codec`] — all multi-byte integers
//! little-endian — but over the tiny radio command frame rather than the
//! serial header.

use crate::error::{Error, ProtocolError};

/// A decoded radio command frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioCommand {
    /// "Receive: I am about to send you a blob of this length."
    Receive { length: u32 },
    /// "Send: please transmit your local blob; my global blob is this long."
    Send { length: u32 },
    /// "Report your local sample count."
    SampleCount,
    /// "Report your local epoch count."
    EpochCount,
    /// Reserved (LED toggle / liveness).
    Led,
}

impl RadioCommand {
    /// Encode to the wire frame: 1 tag byte, plus 4 little-endian length
    /// bytes for `Receive`/`Send`, empty otherwise.
    pub fn encode(self, out: &mut heapless::Vec<u8, 5>) {
        out.clear();
        match self {
            Self::Receive { length } => {
                let _ = out.push(b'R');
                out.extend_from_slice(&length.to_le_bytes()).ok();
            }
            Self::Send { length } => {
                let _ = out.push(b'S');
                out.extend_from_slice(&length.to_le_bytes()).ok();
            }
            Self::SampleCount => {
                let _ = out.push(b'N');
            }
            Self::EpochCount => {
                let _ = out.push(b'E');
            }
            Self::Led => {
                let _ = out.push(b'L');
            }
        }
    }

    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let tag = *buf.first().ok_or(ProtocolError::FrameTooShort)?;
        match tag {
            b'R' | b'S' => {
                if buf.len() < 5 {
                    return Err(ProtocolError::FrameTooShort.into());
                }
                let length = u32::from_le_bytes(buf[1..5].try_into().unwrap());
                Ok(if tag == b'R' {
                    Self::Receive { length }
                } else {
                    Self::Send { length }
                })
            }
            b'N' => Ok(Self::SampleCount),
            b'E' => Ok(Self::EpochCount),
            b'L' => Ok(Self::Led),
            other => Err(ProtocolError::UnknownCommandTag(other).into()),
        }
    }
}

/// A radio ACK: `!` + 4-byte little-endian payload, meaning per command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioAck {
    pub ok: bool,
    pub value: u32,
}

impl RadioAck {
    pub fn encode(self) -> [u8; 5] {
        let mut out = [0u8; 5];
        out[0] = if self.ok { b'!' } else { b'?' };
        out[1..5].copy_from_slice(&self.value.to_le_bytes());
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < 5 {
            return Err(ProtocolError::FrameTooShort.into());
        }
        Ok(Self {
            ok: buf[0] == b'!',
            value: u32::from_le_bytes(buf[1..5].try_into().unwrap()),
        })
    }
}

/// Client→server "I'm ready to transmit" marker: `#` + 4-byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyMarker {
    pub length: u32,
}

impl ReadyMarker {
    pub fn encode(self) -> [u8; 5] {
        let mut out = [0u8; 5];
        out[0] = b'#';
        out[1..5].copy_from_slice(&self.length.to_le_bytes());
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < 5 || buf[0] != b'#' {
            return Err(ProtocolError::FrameTooShort.into());
        }
        Ok(Self {
            length: u32::from_le_bytes(buf[1..5].try_into().unwrap()),
        })
    }
}
