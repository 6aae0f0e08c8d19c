//! Serial link wire framing: the 12-byte command header and 5-byte ACK.
//!
//! All multi-byte integers are little-endian. This module only encodes and
//! decodes bytes; it knows nothing about files, timeouts, or retries — that
//! lives in [`super::serial_link`].

use crate::error::{Error, ProtocolError};

pub const HEADER_SIZE: usize = 12;
pub const ACK_SIZE: usize = 5;

/// Command tag carried in byte 0 of the serial header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialCmd {
    /// Request the peer to send a blob.
    Send,
    /// Request the peer to receive a blob.
    Receive,
    /// Request the peer's sample count.
    SampleCount,
    /// Instruct the peer to aggregate its local model.
    Aggregate,
    /// Request the peer's local-epoch count.
    EpochCount,
}

impl SerialCmd {
    const fn tag(self) -> u8 {
        match self {
            Self::Send => b'S',
            Self::Receive => b'R',
            Self::SampleCount => b'N',
            Self::Aggregate => b'O',
            Self::EpochCount => b'E',
        }
    }

    const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'S' => Some(Self::Send),
            b'R' => Some(Self::Receive),
            b'N' => Some(Self::SampleCount),
            b'O' => Some(Self::Aggregate),
            b'E' => Some(Self::EpochCount),
            _ => None,
        }
    }
}

/// `local` or `global` — byte 1 of the serial header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Local,
    Global,
}

impl Scope {
    const fn tag(self) -> u8 {
        match self {
            Self::Local => b'L',
            Self::Global => b'G',
        }
    }

    const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'L' => Some(Self::Local),
            b'G' => Some(Self::Global),
            _ => None,
        }
    }
}

/// A fully-decoded 12-byte serial header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialHeader {
    pub cmd: SerialCmd,
    pub scope: Scope,
    pub payload_len: u32,
    pub client_id: u16,
    pub sample_count: u32,
}

impl SerialHeader {
    pub fn encode(self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0] = self.cmd.tag();
        out[1] = self.scope.tag();
        out[2..6].copy_from_slice(&self.payload_len.to_le_bytes());
        out[6..8].copy_from_slice(&self.client_id.to_le_bytes());
        out[8..12].copy_from_slice(&self.sample_count.to_le_bytes());
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < HEADER_SIZE {
            return Err(ProtocolError::FrameTooShort.into());
        }
        let cmd = SerialCmd::from_tag(buf[0]).ok_or(ProtocolError::UnknownCommandTag(buf[0]))?;
        let scope = Scope::from_tag(buf[1]).ok_or(ProtocolError::UnknownCommandTag(buf[1]))?;
        let payload_len = u32::from_le_bytes(buf[2..6].try_into().unwrap());
        let client_id = u16::from_le_bytes(buf[6..8].try_into().unwrap());
        let sample_count = u32::from_le_bytes(buf[8..12].try_into().unwrap());
        Ok(Self {
            cmd,
            scope,
            payload_len,
            client_id,
            sample_count,
        })
    }
}

/// A 5-byte serial ACK: leading `!` on success, any other byte on refusal,
/// followed by a little-endian `u32` whose meaning depends on the command
/// that provoked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialAck {
    pub ok: bool,
    pub value: u32,
}

impl SerialAck {
    pub fn encode(self) -> [u8; ACK_SIZE] {
        let mut out = [0u8; ACK_SIZE];
        out[0] = if self.ok { b'!' } else { b'?' };
        out[1..5].copy_from_slice(&self.value.to_le_bytes());
        out
    }

    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < ACK_SIZE {
            return Err(ProtocolError::FrameTooShort.into());
        }
        let ok = buf[0] == b'!';
        let value = u32::from_le_bytes(buf[1..5].try_into().unwrap());
        Ok(Self { ok, value })
    }
}
