//! FL satellite core — host simulation entry point.
//!
//! Loads a board's static configuration, wires up the adapters, and runs
//! that board's role loop (server or client, selected by comparing
//! `board_num` to `server_board_num`). The real LoRa PHY and SD-card
//! drivers are external collaborators this core never depends on directly;
//! this binary exercises the same role logic against the host-simulation
//! radio and companion-computer adapters.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                          │
//! │  SimRadioPort   SimCompanion   SimBlobStore   SystemClock      │
//! │  (RadioPort)    (Transport)    (BlobStore)    (Clock)          │
//! │  ──────────────── Port Trait Boundary ──────────────────       │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          ClientRole / ServerRole (pure logic)          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │  TaskHarness (cooperative, one role per board)                 │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::env;

use anyhow::{Context, Result};
use log::info;

use fl_satcore::adapters::nvs::SimBlobStore;
use fl_satcore::adapters::sim_radio::SimRadioPort;
use fl_satcore::adapters::sim_serial::SimCompanion;
use fl_satcore::adapters::time::SystemClock;
use fl_satcore::app::context::BoardContext;
use fl_satcore::app::task_harness::TaskHarness;
use fl_satcore::config::BoardConfig;
use fl_satcore::rpc::radio_link::RadioLink;
use fl_satcore::rpc::serial_link::SerialLink;

fn load_config() -> Result<BoardConfig> {
    match env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading board config at {path}"))?;
            BoardConfig::from_toml(&text).context("parsing board config")
        }
        None => {
            info!("no config path given, running with BoardConfig::default()");
            Ok(BoardConfig::default())
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    info!("fl-satcore v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    config.validate().context("board config failed validation")?;
    info!(
        "board_num={} server_board_num={} num_clients={} is_server={}",
        config.board_num,
        config.server_board_num,
        config.num_clients,
        config.is_server()
    );

    // This binary runs one endpoint of a loopback pair standing in for the
    // peer board's radio — enough to demonstrate the role loop end to end
    // without a second process. A multi-board demo would share the peer
    // endpoint across processes via a real transport instead.
    let (radio_port, _peer_radio) = SimRadioPort::pair(0.0);
    let companion = SimCompanion::new(vec![0xAA, 0xBB, 0xCC, 0xDD], 64, config.minimum_epochs + 1)
        .with_global_blob(vec![0xAA, 0xBB, 0xCC, 0xDD]);

    let ctx = BoardContext::new(
        config,
        RadioLink::new(radio_port),
        SerialLink::new(companion, true),
        SimBlobStore::new(),
        SystemClock::new(),
    );

    TaskHarness::run(ctx);
    Ok(())
}
