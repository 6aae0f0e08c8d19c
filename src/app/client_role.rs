//! Client-side reactive loop: listen for one command per wake, dispatch by
//! tag, sleep the radio. Mirrors the per-tick state machine: any failure
//! logs and falls through to sleep — it never propagates past this loop.

use log::{info, warn};

use crate::app::context::BoardContext;
use crate::app::ports::{BlobName, BlobStore, Clock, RadioPort};
use crate::error::{Result, TransportError};
use crate::rpc::codec::{Scope, SerialCmd};
use crate::rpc::command::RadioCommand;
use crate::rpc::radio_link::MAX_RETRIES;
use crate::rpc::serial_link::Transport;

pub struct ClientRole;

impl Default for ClientRole {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientRole {
    pub fn new() -> Self {
        Self
    }

    /// One wake: listen, dispatch, sleep. Errors are logged, never returned —
    /// the task harness advances to the next tick either way.
    pub async fn tick<R, T, B, C>(&mut self, ctx: &mut BoardContext<R, T, B, C>) -> Result<()>
    where
        R: RadioPort,
        T: Transport,
        B: BlobStore,
        C: Clock,
    {
        match crate::addressing::addr(ctx.config.server_board_num) {
            Ok(addr) => ctx.radio.set_destination(addr),
            Err(e) => warn!("client: no link address for server board {}: {e}", ctx.config.server_board_num),
        }

        let own_local_len = ctx.blobs.len(BlobName::Local).unwrap_or(0);
        let listen_timeout = core::time::Duration::from_secs_f32(1.0 / ctx.config.client_task_freq_hz);

        let cmd = match ctx.radio.listen_for_cmd(listen_timeout, own_local_len).await {
            Ok(Some(cmd)) => cmd,
            Ok(None) => {
                ctx.radio.sleep();
                return Ok(());
            }
            Err(e) => {
                warn!("client: listen_for_cmd failed: {e}");
                ctx.radio.sleep();
                return Ok(());
            }
        };

        if let Err(e) = self.dispatch(ctx, cmd).await {
            warn!("client: command {cmd:?} failed: {e}");
        }
        ctx.radio.sleep();
        Ok(())
    }

    async fn dispatch<R, T, B, C>(
        &mut self,
        ctx: &mut BoardContext<R, T, B, C>,
        cmd: RadioCommand,
    ) -> Result<()>
    where
        R: RadioPort,
        T: Transport,
        B: BlobStore,
        C: Clock,
    {
        match cmd {
            RadioCommand::Receive { length } => {
                let blob = ctx.radio.recv_blob(length, MAX_RETRIES).await?;
                ctx.blobs.write(BlobName::Global, &blob)?;
                if let Err(e) = ctx.serial.send_blob(SerialCmd::Receive, Scope::Global, &blob, 0, 0) {
                    warn!("client: serial push of global blob failed: {e}");
                }
                info!("client: received global blob ({} bytes)", blob.len());
                Ok(())
            }
            RadioCommand::Send { .. } => {
                let local = ctx.serial.recv_blob(Scope::Local, 0)?;
                let acked = ctx.radio.send_ready(local.len() as u32)?;
                if !acked {
                    return Err(TransportError::ClientReadyTimeout.into());
                }
                let sent = ctx.radio.send_blob(&local)?;
                info!("client: transmitted local blob ({sent} bytes)");
                Ok(())
            }
            RadioCommand::SampleCount => {
                let count = ctx.serial.get_sample_count(0)?;
                ctx.radio.send_value(count)?;
                Ok(())
            }
            RadioCommand::EpochCount => {
                let count = ctx.serial.get_epoch_count(0)?;
                ctx.radio.send_value(count)?;
                Ok(())
            }
            RadioCommand::Led => {
                info!("client: LED liveness ping");
                Ok(())
            }
        }
    }
}
