//! The open kingdom: its ledger, settings and last rolled check.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use km_core::{Kingdom, KmError, SettlementContext};
use km_engine::{
    Command, Effect, EngineConfig, Executed, JsonFileStore, KingdomLedger, KingdomStore,
};
use km_mechanics::{ActivityOutcome, RollMeta, ScriptedRoller};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::GlobalArgs;
use crate::output;

/// The most recent check and outcome, kept between invocations so they can
/// be re-rolled, upgraded and applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LastResult {
    pub roll: Option<RollMeta>,
    pub outcome: Option<ActivityOutcome>,
}

pub struct Session {
    id: String,
    store: JsonFileStore,
    ledger: KingdomLedger<JsonFileStore, ScriptedRoller>,
    last_path: PathBuf,
}

fn load_context(path: Option<&PathBuf>) -> Result<SettlementContext, String> {
    let Some(path) = path else {
        return Ok(SettlementContext::default());
    };
    let json = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    match SettlementContext::from_json(&json) {
        Ok(ctx) => Ok(ctx),
        Err(e @ KmError::MalformedStructure { .. }) => {
            eprintln!(
                "{} {e}; continuing without structure bonuses",
                "warning:".yellow().bold()
            );
            Ok(SettlementContext::default())
        }
        Err(e) => Err(e.to_string()),
    }
}

impl Session {
    pub fn open(args: &GlobalArgs) -> Result<Self, String> {
        let config = match &args.config {
            Some(path) => EngineConfig::from_json_file(path)
                .map_err(|e| format!("cannot load {}: {e}", path.display()))?,
            None => EngineConfig::default(),
        };
        let config = match args.seed {
            Some(seed) => config.with_seed(Some(seed)),
            None => config,
        };
        let ctx = load_context(args.context.as_ref())?;
        let roller = ScriptedRoller::new(args.rolls.iter().copied()).with_fallback(config.roller());
        let store = JsonFileStore::new(&args.store).map_err(|e| e.to_string())?;
        let last_path = store.base_dir().join("last").join(format!("{}.json", args.kingdom));
        let ledger = KingdomLedger::new(store.clone(), args.kingdom.clone(), config, roller)
            .with_context(ctx);
        Ok(Self {
            id: args.kingdom.clone(),
            store,
            ledger,
            last_path,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn exists(&self) -> bool {
        self.store.exists(&self.id)
    }

    pub fn kingdom(&self) -> Result<Kingdom, String> {
        self.ledger.kingdom().map_err(|e| e.to_string())
    }

    pub fn context(&self) -> &SettlementContext {
        self.ledger.context()
    }

    pub fn config(&self) -> &EngineConfig {
        self.ledger.config()
    }

    /// Overwrite the stored kingdom and forget the last check.
    pub fn replace(&mut self, kingdom: &Kingdom) -> Result<(), String> {
        self.store
            .replace(&self.id, kingdom)
            .map_err(|e| e.to_string())?;
        if self.last_path.exists() {
            fs::remove_file(&self.last_path).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    pub fn last(&self) -> Result<LastResult, String> {
        if !self.last_path.exists() {
            return Ok(LastResult::default());
        }
        let json = fs::read_to_string(&self.last_path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| format!("cannot read last result: {e}"))
    }

    fn remember(&self, effects: &[Effect]) -> Result<(), String> {
        let mut last = self.last()?;
        let mut changed = false;
        for effect in effects {
            match effect {
                Effect::Check { result, outcome } => {
                    last.roll = Some(result.meta.clone());
                    last.outcome = Some(outcome.clone());
                    changed = true;
                }
                Effect::Outcome { outcome } => {
                    last.outcome = Some(outcome.clone());
                    changed = true;
                }
                _ => {}
            }
        }
        if !changed {
            return Ok(());
        }
        if let Some(dir) = self.last_path.parent() {
            fs::create_dir_all(dir).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(&last).map_err(|e| e.to_string())?;
        fs::write(&self.last_path, json).map_err(|e| e.to_string())?;
        debug!(path = %self.last_path.display(), "saved last result");
        Ok(())
    }

    /// Run a command without printing anything.
    pub fn execute(&mut self, command: Command) -> Result<Executed, String> {
        let executed = self.ledger.execute(command).map_err(|e| e.to_string())?;
        self.remember(&executed.effects)?;
        Ok(executed)
    }

    /// Run a command and print its effects.
    pub fn run(&mut self, command: Command) -> Result<(), String> {
        let executed = self.execute(command)?;
        output::print_effects(&executed.effects);
        Ok(())
    }
}
