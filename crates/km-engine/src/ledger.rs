//! The kingdom ledger: one kingdom, its store, and a dice roller.
//!
//! [`KingdomLedger`] runs commands one at a time: load, dispatch, save. Each
//! command's patch is merged in one store write, so two commands never
//! interleave their updates. [`LedgerHandle`] moves a ledger onto a worker
//! thread and feeds it commands over a channel, for hosts that share one
//! kingdom between several callers.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use km_core::{Kingdom, SettlementContext};
use km_mechanics::DiceRoller;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::command::{Command, dispatch};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::store::KingdomStore;
use crate::transition::Effect;

/// What running a command left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Executed {
    /// The kingdom after the command.
    pub kingdom: Kingdom,
    /// What to show the player.
    pub effects: Vec<Effect>,
}

/// Runs commands against one stored kingdom.
pub struct KingdomLedger<S, R> {
    store: S,
    id: String,
    ctx: SettlementContext,
    config: EngineConfig,
    roller: R,
}

impl<S: KingdomStore, R: DiceRoller> KingdomLedger<S, R> {
    /// A ledger for the kingdom stored under `id`.
    pub fn new(store: S, id: impl Into<String>, config: EngineConfig, roller: R) -> Self {
        Self {
            store,
            id: id.into(),
            ctx: SettlementContext::default(),
            config,
            roller,
        }
    }

    /// Use structure bonuses supplied by the host.
    pub fn with_context(mut self, ctx: SettlementContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// The kingdom id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The settlement context in use.
    pub fn context(&self) -> &SettlementContext {
        &self.ctx
    }

    /// The engine settings in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current kingdom.
    pub fn kingdom(&self) -> EngineResult<Kingdom> {
        self.store.load(&self.id)
    }

    /// Run one command and save its patch.
    ///
    /// A failing command leaves the stored kingdom untouched.
    pub fn execute(&mut self, command: Command) -> EngineResult<Executed> {
        let name = command.name();
        let kingdom = self.store.load(&self.id)?;
        let transition = dispatch(command, &kingdom, &self.ctx, &self.config, &mut self.roller)?;
        let kingdom = match transition.patch {
            Some(patch) => {
                info!(id = %self.id, command = name, "saving kingdom");
                self.store.save(&self.id, patch)?
            }
            None => {
                debug!(id = %self.id, command = name, "nothing to save");
                kingdom
            }
        };
        Ok(Executed {
            kingdom,
            effects: transition.effects,
        })
    }
}

enum Request {
    Execute {
        command: Command,
        reply: mpsc::Sender<EngineResult<Executed>>,
    },
    Snapshot {
        reply: mpsc::Sender<EngineResult<Kingdom>>,
    },
}

/// A ledger running on its own thread.
///
/// Requests are served in the order they arrive. Dropping the handle stops
/// the worker once the queued requests are done.
pub struct LedgerHandle {
    sender: Option<mpsc::Sender<Request>>,
    worker: Option<JoinHandle<()>>,
}

impl LedgerHandle {
    /// Move `ledger` onto a worker thread.
    pub fn spawn<S, R>(mut ledger: KingdomLedger<S, R>) -> Self
    where
        S: KingdomStore + 'static,
        R: DiceRoller + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<Request>();
        let worker = thread::spawn(move || {
            debug!(id = %ledger.id, "ledger worker started");
            for request in receiver {
                match request {
                    Request::Execute { command, reply } => {
                        let _ = reply.send(ledger.execute(command));
                    }
                    Request::Snapshot { reply } => {
                        let _ = reply.send(ledger.kingdom());
                    }
                }
            }
            debug!(id = %ledger.id, "ledger worker stopped");
        });
        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    fn request<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<EngineResult<T>>) -> Request,
    ) -> EngineResult<T> {
        let sender = self.sender.as_ref().ok_or(EngineError::LedgerClosed)?;
        let (reply, response) = mpsc::channel();
        sender
            .send(build(reply))
            .map_err(|_| EngineError::LedgerClosed)?;
        response.recv().map_err(|_| EngineError::LedgerClosed)?
    }

    /// Run a command on the worker and wait for its result.
    pub fn execute(&self, command: Command) -> EngineResult<Executed> {
        self.request(|reply| Request::Execute { command, reply })
    }

    /// The current kingdom.
    pub fn kingdom(&self) -> EngineResult<Kingdom> {
        self.request(|reply| Request::Snapshot { reply })
    }

    /// Stop accepting requests and wait for the worker to finish.
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("ledger worker panicked");
            }
        }
    }
}

impl Drop for LedgerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use km_core::KingdomPatch;
    use km_mechanics::ScriptedRoller;

    fn ledger(rolls: &[u32]) -> KingdomLedger<MemoryStore, ScriptedRoller> {
        KingdomLedger::new(
            MemoryStore::new(),
            "k",
            EngineConfig::default(),
            ScriptedRoller::new(rolls.iter().copied()),
        )
    }

    #[test]
    fn execute_saves_the_patch() {
        let mut ledger = ledger(&[]);
        let executed = ledger.execute(Command::GainFame(2)).unwrap();
        assert_eq!(executed.kingdom.fame.now, 2);
        assert_eq!(ledger.kingdom().unwrap().fame.now, 2);
    }

    #[test]
    fn failed_command_changes_nothing() {
        let mut ledger = ledger(&[]);
        ledger
            .execute(Command::Update(KingdomPatch {
                unrest: Some(3),
                ..KingdomPatch::default()
            }))
            .unwrap();
        assert!(ledger.execute(Command::LevelUp).is_err());
        // no scripted rolls left, so the roll fails
        assert!(ledger.execute(Command::ReduceUnrest).is_err());
        assert_eq!(ledger.kingdom().unwrap().unrest, 3);
    }

    #[test]
    fn handle_serves_commands_in_order() {
        let mut handle = LedgerHandle::spawn(ledger(&[11, 11]));
        handle
            .execute(Command::Update(KingdomPatch {
                unrest: Some(2),
                ..KingdomPatch::default()
            }))
            .unwrap();
        handle.execute(Command::ReduceUnrest).unwrap();
        handle.execute(Command::ReduceUnrest).unwrap();
        assert_eq!(handle.kingdom().unwrap().unrest, 0);
        handle.shutdown();
        assert!(matches!(
            handle.execute(Command::EndTurn),
            Err(EngineError::LedgerClosed)
        ));
    }
}
