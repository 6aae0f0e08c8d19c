//! Parameter-blob storage adapter.
//!
//! Implements [`BlobStore`] against the `params/{local,global,client{i}}.bin`
//! layout on a real filesystem, and against an in-memory map for host
//! development and tests — the same real-vs-simulation split the firmware
//! this is grounded on uses for its own NVS adapter.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use log::{info, warn};

use crate::app::ports::{BlobName, BlobStore};
use crate::error::{Result, StorageError};

fn blob_key(name: BlobName) -> String {
    match name {
        BlobName::Local => "local".to_string(),
        BlobName::Global => "global".to_string(),
        BlobName::Client(i) => format!("client{i}"),
    }
}

/// Reads and writes parameter blobs under `params/` on the real filesystem.
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        info!("FsBlobStore: params directory {:?}", dir);
        Ok(Self { dir })
    }

    fn path(&self, name: BlobName) -> PathBuf {
        self.dir.join(format!("{}.bin", blob_key(name)))
    }
}

impl BlobStore for FsBlobStore {
    fn len(&self, name: BlobName) -> Result<u32> {
        match std::fs::metadata(self.path(name)) {
            Ok(meta) => Ok(meta.len() as u32),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(_) => Err(StorageError::ReadFailed.into()),
        }
    }

    fn read(&self, name: BlobName) -> Result<Vec<u8>> {
        match std::fs::read(self.path(name)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(_) => Err(StorageError::ReadFailed.into()),
        }
    }

    fn write(&self, name: BlobName, data: &[u8]) -> Result<()> {
        std::fs::write(self.path(name), data).map_err(|e| {
            warn!("FsBlobStore: write {:?} failed: {e}", name);
            StorageError::WriteFailed.into()
        })
    }
}

/// In-memory blob store for host simulation and tests — no filesystem.
pub struct SimBlobStore {
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl SimBlobStore {
    pub fn new() -> Self {
        info!("SimBlobStore: in-memory backend");
        Self { store: RefCell::new(HashMap::new()) }
    }
}

impl Default for SimBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for SimBlobStore {
    fn len(&self, name: BlobName) -> Result<u32> {
        Ok(self.store.borrow().get(&blob_key(name)).map_or(0, |b| b.len() as u32))
    }

    fn read(&self, name: BlobName) -> Result<Vec<u8>> {
        Ok(self.store.borrow().get(&blob_key(name)).cloned().unwrap_or_default())
    }

    fn write(&self, name: BlobName, data: &[u8]) -> Result<()> {
        self.store.borrow_mut().insert(blob_key(name), data.to_vec());
        Ok(())
    }
}
