// SPDX-License-Identifier: GPL-3.0

use std::future::Future;

#[cfg(test)]
mod memory;

#[cfg(test)]
pub use memory::MemoryStore;

/// Opaque byte-blob storage addressed by key
///
/// Everything the app persists goes through this trait so the repositories can
/// be exercised against [`MemoryStore`] in tests.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the bytes saved under `key`, or `None` if nothing was saved
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, anywho::Error>> + Send;

    /// Saves `bytes` under `key`, replacing whatever was there
    fn save(
        &self,
        key: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<(), anywho::Error>> + Send;
}
