//! Cooperative scheduling glue: one role per board, driven by a single-task
//! `edge-executor` loop with `async-io-mini` timers for the tick period —
//! the same reactor-driven pattern the RPC I/O task uses, scaled down to
//! one task since a board runs exactly one role.

use core::time::Duration;

use log::{error, info};

use crate::app::client_role::ClientRole;
use crate::app::context::BoardContext;
use crate::app::ports::{BlobStore, Clock, RadioPort};
use crate::app::server_role::ServerRole;
use crate::rpc::serial_link::Transport;

pub struct TaskHarness;

impl TaskHarness {
    /// Runs the board's role loop to completion. The server role returns
    /// once `NUM_ROUNDS` visits have completed; the client role runs until
    /// the process is stopped.
    pub fn run<R, T, B, C>(mut ctx: BoardContext<R, T, B, C>)
    where
        R: RadioPort,
        T: Transport,
        B: BlobStore,
        C: Clock,
    {
        let executor: edge_executor::LocalExecutor<'_, 1> = edge_executor::LocalExecutor::new();
        let is_server = ctx.config.is_server();

        let role_loop = async {
            if is_server {
                Self::run_server(&mut ctx).await;
            } else {
                Self::run_client(&mut ctx).await;
            }
        };

        futures_lite::future::block_on(executor.run(role_loop));
    }

    async fn run_server<R, T, B, C>(ctx: &mut BoardContext<R, T, B, C>)
    where
        R: RadioPort,
        T: Transport,
        B: BlobStore,
        C: Clock,
    {
        let period = Duration::from_secs_f32(1.0 / ctx.config.server_task_freq_hz);
        let num_rounds = ctx.config.num_rounds;
        let mut role = ServerRole::new(&ctx.config);

        info!("server: starting round schedule, {num_rounds} rounds at {period:?}/tick");
        while !role.is_done(num_rounds) {
            // Only an error escaping the role itself (never one surfaced
            // through its own Result, which is always Ok per §4.5's
            // failure policy) would reach here — logged as the tier-5
            // fatal case and the loop continues rather than panicking.
            if let Err(e) = role.tick(ctx).await {
                error!("server: unrecoverable tick error: {e}");
            }
            async_io_mini::Timer::after(period).await;
        }
        info!("server: completed {num_rounds} rounds (final round_num={})", role.round_num());
    }

    async fn run_client<R, T, B, C>(ctx: &mut BoardContext<R, T, B, C>)
    where
        R: RadioPort,
        T: Transport,
        B: BlobStore,
        C: Clock,
    {
        let period = Duration::from_secs_f32(1.0 / ctx.config.client_task_freq_hz);
        let mut role = ClientRole::new();

        // Each tick's own `listen_for_cmd` wait already spans `period` — it
        // is the listen window, not a delay before it — so there is no
        // additional sleep between ticks (§4.4's client-side IDLE state has
        // no duration of its own).
        info!("client: listening for {period:?} per wake");
        loop {
            if let Err(e) = role.tick(ctx).await {
                error!("client: unrecoverable tick error: {e}");
            }
        }
    }
}
