//! Kaybee board persistence and synchronization.
//!
//! Boards of columns of cards, a registry of known boards, fragment routing
//! between them and a storage adapter that falls back to memory when the
//! persistent store is unavailable. `Session` ties these together.

pub mod board;
pub mod command;
pub mod config;
pub mod export;
pub mod filter;
pub mod keys;
pub mod preferences;
pub mod registry;
pub mod router;
pub mod session;
pub mod storage;
pub mod types;

pub use board::Outcome;
pub use command::{Command, CommandOutcome};
pub use config::KaybeeConfig;
pub use session::{BoardDeletion, Session, SessionError};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, SafeStorage, StorageError};
pub use types::{Board, BoardEntry, BoardId, Card, CardColor, Column};
