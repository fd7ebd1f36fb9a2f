//! On-disk logo cache: the storage directory and the index describing it

pub mod index;
pub mod storage;

pub use index::{CacheIndex, CacheIndexStore};
pub use storage::{LogoAssetStorage, StoredLogo};
