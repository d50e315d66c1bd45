//! Local persistence: JSON values under fixed string keys.
//!
//! [`PersistedStore`] is the only thing domain code talks to. It caches every
//! value it has seen, writes through to a [`StorageBackend`] on each change,
//! and never surfaces storage trouble as an error: corrupt data falls back to a
//! default and failed writes are logged and reported as [`Durability`].

mod backend;
mod file;
mod lenient;
mod persisted;

pub use backend::{MemoryBackend, StorageBackend};
pub use file::FileBackend;
pub use lenient::LenientVec;
pub use persisted::{Durability, PersistedStore};
