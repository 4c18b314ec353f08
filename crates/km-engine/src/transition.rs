//! What a command produces: a patch to save and effects to report.

use km_core::{Kingdom, KingdomPatch};
use km_mechanics::{ActivityOutcome, CheckResult, ResourceChange};
use serde::Serialize;

/// Something the host should show the player once a command ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    /// Plain information.
    Notice {
        /// Text to show.
        message: String,
    },
    /// A roll the engine made.
    Rolled {
        /// What was rolled for.
        label: String,
        /// Formula rolled.
        formula: String,
        /// Result.
        total: i32,
    },
    /// A rolled kingdom check and its outcome.
    Check {
        /// The roll.
        result: CheckResult,
        /// The outcome at the rolled degree.
        outcome: ActivityOutcome,
    },
    /// An outcome re-derived at a new degree.
    Outcome {
        /// The new outcome.
        outcome: ActivityOutcome,
    },
    /// An optional change the player may apply.
    Offer {
        /// The change.
        change: ResourceChange,
    },
    /// An effect was applied before and is not applied again.
    AlreadyConsumed {
        /// Its token.
        token: String,
    },
    /// Gained XP.
    XpGained {
        /// Amount.
        amount: i32,
    },
    /// Ruin points to distribute across the axes.
    RuinTriggered {
        /// Points rolled.
        points: i32,
    },
    /// The kingdom loses a hex of the player's choice.
    HexLost,
    /// A kingdom event occurs this turn.
    EventOccurs,
    /// Unrest reached the anarchy threshold.
    Anarchy {
        /// The threshold.
        threshold: i32,
    },
}

impl Effect {
    /// A notice.
    pub fn notice(message: impl Into<String>) -> Self {
        Self::Notice {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Notice { message } => f.write_str(message),
            Self::Rolled {
                label,
                formula,
                total,
            } => write!(f, "{label}: {formula} = {total}"),
            Self::Check { result, outcome } => write!(
                f,
                "{}: {} vs DC {}, {}. {}",
                result.meta.label(),
                result.meta.total,
                result.meta.dc,
                result.meta.degree,
                outcome.message
            ),
            Self::Outcome { outcome } => write!(f, "{}: {}", outcome.degree, outcome.message),
            Self::Offer { change } => write!(f, "Offer: {}", change.label()),
            Self::AlreadyConsumed { token } => write!(f, "Already applied: {token}"),
            Self::XpGained { amount } => write!(f, "Gained {amount} Kingdom XP"),
            Self::RuinTriggered { points } => {
                write!(f, "Gain {points} Ruin, distributed as you wish")
            }
            Self::HexLost => f.write_str("You lose one hex of your choice"),
            Self::EventOccurs => f.write_str("An event occurs, roll a Kingdom Event!"),
            Self::Anarchy { threshold } => write!(
                f,
                "Unrest reached {threshold}: the kingdom falls into anarchy unless you spend all fame points"
            ),
        }
    }
}

/// The result of one command: at most one patch, plus effects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Partial update to save, if anything changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<KingdomPatch>,
    /// What to report.
    pub effects: Vec<Effect>,
}

impl Transition {
    /// A transition that saves `patch`.
    pub fn patch(patch: KingdomPatch) -> Self {
        Self {
            patch: (!patch.is_empty()).then_some(patch),
            effects: Vec::new(),
        }
    }

    /// A transition that changes nothing and reports one effect.
    pub fn only(effect: Effect) -> Self {
        Self {
            patch: None,
            effects: vec![effect],
        }
    }

    /// Add an effect.
    pub fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Fold a later transition in: its patch fields win, its effects follow.
    pub fn then(mut self, later: Transition) -> Self {
        if let Some(next) = later.patch {
            match &mut self.patch {
                Some(patch) => patch.merge(next),
                slot @ None => *slot = Some(next),
            }
        }
        self.effects.extend(later.effects);
        self
    }

    /// The kingdom after the patch.
    pub fn applied_to(&self, kingdom: &Kingdom) -> Kingdom {
        match &self.patch {
            Some(patch) => patch.clone().applied_to(kingdom),
            None => kingdom.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_dropped() {
        assert!(Transition::patch(KingdomPatch::default()).patch.is_none());
    }

    #[test]
    fn then_merges_patches_and_effects() {
        let first = Transition::patch(KingdomPatch {
            unrest: Some(2),
            ..KingdomPatch::default()
        })
        .with(Effect::notice("one"));
        let second = Transition::patch(KingdomPatch {
            unrest: Some(3),
            xp: Some(10),
            ..KingdomPatch::default()
        })
        .with(Effect::HexLost);
        let merged = first.then(second);
        let patch = merged.patch.unwrap();
        assert_eq!(patch.unrest, Some(3));
        assert_eq!(patch.xp, Some(10));
        assert_eq!(merged.effects.len(), 2);
    }

    #[test]
    fn effects_serialize_with_a_type_tag() {
        let json = serde_json::to_string(&Effect::XpGained { amount: 40 }).unwrap();
        assert_eq!(json, r#"{"type":"xpGained","amount":40}"#);
    }
}
