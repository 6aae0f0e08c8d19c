//! Static board configuration.
//!
//! Every tunable named in the external-interfaces configuration table is a
//! field here. Loaded once at startup from a TOML file (or [`BoardConfig::default`]
//! for host tests) and never mutated afterwards — live reconfiguration is out
//! of scope.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Fixed enumeration of LoRa-style signal bandwidths, in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalBandwidth {
    Hz7800,
    Hz10400,
    Hz15600,
    Hz20800,
    Hz31250,
    Hz41700,
    Hz62500,
    Hz125000,
    Hz250000,
    Hz500000,
}

impl SignalBandwidth {
    pub const fn as_hz(self) -> u32 {
        match self {
            Self::Hz7800 => 7_800,
            Self::Hz10400 => 10_400,
            Self::Hz15600 => 15_600,
            Self::Hz20800 => 20_800,
            Self::Hz31250 => 31_250,
            Self::Hz41700 => 41_700,
            Self::Hz62500 => 62_500,
            Self::Hz125000 => 125_000,
            Self::Hz250000 => 250_000,
            Self::Hz500000 => 500_000,
        }
    }
}

/// Radio PHY knobs, fixed at init and never renegotiated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RadioPhyConfig {
    /// Spreading factor, 6..=12.
    pub spreading_factor: u8,
    /// Coding rate denominator, 5..=8 (i.e. 4/5 .. 4/8).
    pub coding_rate: u8,
    pub signal_bandwidth: SignalBandwidth,
    /// Delay before a synthesized ACK is sent, in seconds.
    pub ack_delay_secs: f32,
    pub low_datarate_optimize: bool,
}

impl Default for RadioPhyConfig {
    fn default() -> Self {
        Self {
            spreading_factor: 7,
            coding_rate: 5,
            signal_bandwidth: SignalBandwidth::Hz125000,
            ack_delay_secs: 0.05,
            low_datarate_optimize: false,
        }
    }
}

/// Fixed wire-format sizes. Not configurable, named here so every component
/// shares one source of truth instead of repeating the literal.
pub const SERIAL_BUFFER_SIZE: usize = 256;
pub const RADIO_PACKET_SIZE: usize = 248;

/// Per-board static configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// This board's identity, 1-indexed.
    pub board_num: u8,
    /// Identity of the round coordinator.
    pub server_board_num: u8,
    /// Cardinality of the client set.
    pub num_clients: u8,
    /// Server terminates after this many successful visits.
    pub num_rounds: u32,
    /// Gating threshold for admitting a client's update.
    pub minimum_epochs: u32,
    /// Whether the server board also runs as a client for its own slot.
    pub server_also_client: bool,
    /// Safety interlock: refuse all radio transmission when false.
    pub antenna_attached: bool,
    pub server_task_freq_hz: f32,
    pub client_task_freq_hz: f32,
    pub task_priority: u8,
    pub radio_phy: RadioPhyConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            board_num: 3,
            server_board_num: 3,
            num_clients: 5,
            num_rounds: 30,
            minimum_epochs: 5,
            server_also_client: false,
            antenna_attached: true,
            server_task_freq_hz: 0.02,
            client_task_freq_hz: 0.2,
            task_priority: 1,
            radio_phy: RadioPhyConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Parse a board configuration from a TOML document.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range-check every field, the same way the storage adapter validates
    /// a config struct before it is allowed to take effect.
    pub fn validate(&self) -> Result<()> {
        if self.board_num == 0 {
            return Err(ConfigError::BadBoardId(self.board_num).into());
        }
        if self.server_board_num == 0 || self.server_board_num > self.num_clients.max(self.server_board_num)
        {
            return Err(ConfigError::BadBoardId(self.server_board_num).into());
        }
        if self.num_clients == 0 {
            return Err(ConfigError::OutOfRange("num_clients").into());
        }
        if self.board_num > self.num_clients && self.board_num != self.server_board_num {
            return Err(ConfigError::BadBoardId(self.board_num).into());
        }
        if !(6..=12).contains(&self.radio_phy.spreading_factor) {
            return Err(ConfigError::OutOfRange("radio_phy.spreading_factor").into());
        }
        if !(5..=8).contains(&self.radio_phy.coding_rate) {
            return Err(ConfigError::OutOfRange("radio_phy.coding_rate").into());
        }
        if self.server_task_freq_hz <= 0.0 || self.client_task_freq_hz <= 0.0 {
            return Err(ConfigError::OutOfRange("task frequency").into());
        }
        Ok(())
    }

    /// `true` if this board is the round coordinator.
    pub fn is_server(&self) -> bool {
        self.board_num == self.server_board_num
    }
}
