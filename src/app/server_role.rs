//! Server-side round scheduler: one client visit per tick, epoch-gated,
//! cursor advancing exactly once per visit attempt regardless of outcome.

use core::time::Duration;

use log::{info, warn};

use crate::app::context::BoardContext;
use crate::app::ports::{BlobName, BlobStore, Clock, RadioPort};
use crate::config::BoardConfig;
use crate::error::{Result, TransportError};
use crate::rpc::channels::{emit, RoundEvent};
use crate::rpc::codec::Scope;
use crate::rpc::command::RadioCommand;
use crate::rpc::radio_link::MAX_RETRIES;
use crate::rpc::serial_link::Transport;

/// Per-client bookkeeping the server keeps across rounds (§3).
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    pub initialized: bool,
    pub last_epochs: u32,
    pub last_samples: u32,
}

/// Which client the server visits next and how many visits have completed.
#[derive(Debug, Clone, Copy)]
pub struct RoundCursor {
    pub target_board: u8,
    pub round_num: u32,
}

impl RoundCursor {
    /// `target ← (target mod NUM_CLIENTS) + 1`, skipping the server's own
    /// slot unless it also plays client; `round_num` increments once per
    /// visit attempt, not per hop.
    fn advance(&mut self, num_clients: u8, server_board: u8, server_also_client: bool) {
        loop {
            self.target_board = (self.target_board % num_clients) + 1;
            if server_also_client || self.target_board != server_board {
                break;
            }
        }
        self.round_num += 1;
    }
}

/// How long the server waits for a client's `#` ready marker (§5).
const READY_TIMEOUT: Duration = Duration::from_secs(120);

/// Drives one client visit per call, per the server-side state machine (§4.4).
pub struct ServerRole {
    cursor: RoundCursor,
    clients: Vec<ClientState>,
}

impl ServerRole {
    pub fn new(config: &BoardConfig) -> Self {
        let mut target = 1u8;
        if !config.server_also_client {
            while target == config.server_board_num {
                target = (target % config.num_clients) + 1;
            }
        }
        Self {
            cursor: RoundCursor { target_board: target, round_num: 0 },
            clients: vec![ClientState::default(); config.num_clients as usize],
        }
    }

    pub fn round_num(&self) -> u32 {
        self.cursor.round_num
    }

    pub fn is_done(&self, num_rounds: u32) -> bool {
        self.cursor.round_num >= num_rounds
    }

    fn client_mut(&mut self, board: u8) -> &mut ClientState {
        &mut self.clients[board as usize - 1]
    }

    /// One full visit attempt: `GET_GLOBAL_FROM_PU`, then self-aggregate,
    /// init, epoch gate, or full round-trip, followed unconditionally by
    /// `ADVANCE_CURSOR` — unless the PU pull itself fails, in which case the
    /// round is skipped outright and the cursor does not move.
    pub async fn tick<R, T, B, C>(&mut self, ctx: &mut BoardContext<R, T, B, C>) -> Result<()>
    where
        R: RadioPort,
        T: Transport,
        B: BlobStore,
        C: Clock,
    {
        let target = self.cursor.target_board;

        let global = match ctx.serial.recv_blob(Scope::Global, ctx.config.board_num as u16) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("server: pull of global model from companion failed: {e}");
                emit(RoundEvent::StepFailed { board: target, reason: "global pull from companion failed" });
                return Ok(());
            }
        };
        if let Err(e) = ctx.blobs.write(BlobName::Global, &global) {
            warn!("server: caching pulled global model failed: {e}");
            emit(RoundEvent::StepFailed { board: target, reason: "global blob cache write failed" });
            return Ok(());
        }

        let num_clients = ctx.config.num_clients;
        let server_board = ctx.config.server_board_num;
        let also_client = ctx.config.server_also_client;

        if target == server_board {
            if let Err(e) = ctx.serial.request_local_aggregate(target as u16) {
                warn!("server: self-aggregate request failed: {e}");
            }
            emit(RoundEvent::SelfAggregated);
        } else {
            match crate::addressing::addr(target) {
                Ok(addr) => ctx.radio.set_destination(addr),
                Err(e) => warn!("server: no link address for board {target}: {e}"),
            }
            if let Err(e) = self.visit_client(ctx, target).await {
                warn!("server: step for board {target} failed: {e}");
                emit(RoundEvent::StepFailed { board: target, reason: "step failed" });
            }
        }

        self.cursor.advance(num_clients, server_board, also_client);
        info!("server: cursor advanced to board {} (round {})", self.cursor.target_board, self.cursor.round_num);
        emit(RoundEvent::CursorAdvanced { target: self.cursor.target_board, round_num: self.cursor.round_num });
        Ok(())
    }

    async fn visit_client<R, T, B, C>(
        &mut self,
        ctx: &mut BoardContext<R, T, B, C>,
        target: u8,
    ) -> Result<()>
    where
        R: RadioPort,
        T: Transport,
        B: BlobStore,
        C: Clock,
    {
        let global = ctx.blobs.read(BlobName::Global)?;

        if !self.client_mut(target).initialized {
            let ack = ctx.radio.send_cmd(RadioCommand::Receive { length: global.len() as u32 })?;
            if !ack.ok {
                return Err(TransportError::AckTimeout.into());
            }
            ctx.radio.send_blob(&global)?;
            self.client_mut(target).initialized = true;
            emit(RoundEvent::ClientInitialized { board: target });
            return Ok(());
        }

        ctx.radio.send_cmd(RadioCommand::EpochCount)?;
        let epochs = ctx.radio.recv_value(READY_TIMEOUT).await?;
        self.client_mut(target).last_epochs = epochs;
        let required = ctx.config.minimum_epochs;
        if epochs < required {
            emit(RoundEvent::EpochGated { board: target, reported: epochs, required });
            return Ok(());
        }

        let ack = ctx.radio.send_cmd(RadioCommand::Receive { length: global.len() as u32 })?;
        if !ack.ok {
            return Err(TransportError::AckTimeout.into());
        }
        let sent = ctx.radio.send_blob(&global)?;
        emit(RoundEvent::BlobTransferred { board: target, bytes: sent });

        let local_len = ctx.blobs.len(BlobName::Local)?;
        let ack = ctx.radio.send_cmd(RadioCommand::Send { length: local_len })?;
        if !ack.ok {
            return Err(TransportError::AckTimeout.into());
        }

        let Some(declared_len) = ctx.radio.recv_ready(READY_TIMEOUT).await? else {
            return Err(TransportError::ClientReadyTimeout.into());
        };
        let received = ctx.radio.recv_blob(declared_len, MAX_RETRIES).await?;
        ctx.blobs.write(BlobName::Client(target), &received)?;

        ctx.radio.send_cmd(RadioCommand::SampleCount)?;
        let samples = ctx.radio.recv_value(READY_TIMEOUT).await?;
        self.client_mut(target).last_samples = samples;

        if let Err(e) = ctx.serial.send_blob(
            crate::rpc::codec::SerialCmd::Receive,
            crate::rpc::codec::Scope::Local,
            &received,
            target as u16,
            samples,
        ) {
            warn!("server: forwarding client {target}'s update to the PU failed: {e}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_skips_server_slot_unless_also_client() {
        let mut cursor = RoundCursor { target_board: 2, round_num: 0 };
        cursor.advance(3, 3, false);
        assert_eq!(cursor.target_board, 3 % 3 + 1); // wraps to 1, skipping 3 isn't needed here
        cursor.advance(3, 1, false);
        assert_ne!(cursor.target_board, 1);
    }

    #[test]
    fn cursor_visits_server_slot_when_also_client() {
        let mut cursor = RoundCursor { target_board: 2, round_num: 0 };
        cursor.advance(3, 3, true);
        assert_eq!(cursor.target_board, 3);
    }

    #[test]
    fn round_num_increments_once_per_visit() {
        let mut cursor = RoundCursor { target_board: 1, round_num: 5 };
        cursor.advance(4, 4, false);
        assert_eq!(cursor.round_num, 6);
    }

    #[test]
    fn new_server_role_skips_own_slot() {
        let config = BoardConfig { server_board_num: 1, num_clients: 3, server_also_client: false, ..BoardConfig::default() };
        let role = ServerRole::new(&config);
        assert_ne!(role.cursor.target_board, 1);
    }
}
