//! Per-board context: the one value every role is constructed with.
//!
//! Grounded on the "globally reachable satellite object" design note —
//! rather than a process-wide handle, every port the roles need is bundled
//! into one struct generic over the four port traits and passed by
//! reference. No global/static state.

use crate::app::ports::{BlobStore, Clock, RadioPort};
use crate::config::BoardConfig;
use crate::rpc::radio_link::RadioLink;
use crate::rpc::serial_link::{SerialLink, Transport};

pub struct BoardContext<R, T, B, C> {
    pub config: BoardConfig,
    pub radio: RadioLink<R>,
    pub serial: SerialLink<T>,
    pub blobs: B,
    pub clock: C,
}

impl<R, T, B, C> BoardContext<R, T, B, C>
where
    R: RadioPort,
    T: Transport,
    B: BlobStore,
    C: Clock,
{
    pub fn new(config: BoardConfig, radio: RadioLink<R>, serial: SerialLink<T>, blobs: B, clock: C) -> Self {
        Self { config, radio, serial, blobs, clock }
    }
}
