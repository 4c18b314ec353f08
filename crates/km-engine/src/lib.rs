//! Turn engine for Kingmaker Ledger.
//!
//! Commands are pure over the kingdom they read: [`dispatch`] takes a
//! [`Command`] and the current [`km_core::Kingdom`] and returns a
//! [`Transition`], a single patch plus the effects to report. A
//! [`KingdomLedger`] pairs that with a [`KingdomStore`] so each command is one
//! load and at most one save.

pub mod command;
pub mod config;
pub mod error;
pub mod ledger;
pub mod store;
pub mod transition;
pub mod turn;
pub mod xp;

pub use command::{Command, XpSource, dispatch};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use ledger::{Executed, KingdomLedger, LedgerHandle};
pub use store::{JsonFileStore, KingdomStore, MemoryStore};
pub use transition::{Effect, Transition};
pub use turn::HexFeature;
