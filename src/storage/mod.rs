//! Durable partitions and the typed ticket store
//!
//! Tickets live in exactly one of three partitions (pending, active,
//! resolved); administrative actions go to a fourth, append-only audit table.
//! The raw medium sits behind [`PartitionBackend`] so the flat-file layout
//! can be swapped for another store without touching validation or
//! lifecycle code.
//!
//! # Concurrency
//!
//! Reads never lock. Every mutation runs inside the store's write gate
//! (an in-process mutex plus the backend's advisory lock), so id allocation,
//! duplicate detection and whole-partition rewrites cannot interleave.

mod backend;
mod codec;
mod duplicates;
mod file;
mod lock;
mod memory;
mod repository;
mod sequencer;

pub use backend::{PartitionBackend, Row, Table};
pub use duplicates::{DuplicateScope, description_key};
pub use file::FileBackend;
pub use lock::FileLock;
pub use memory::MemoryBackend;
pub use repository::{Admission, TicketStore, WriteGuard};
pub use sequencer::MIN_TICKET_ID;
