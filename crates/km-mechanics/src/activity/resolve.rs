//! Turning a degree of success into a concrete, replayable outcome.

use std::fmt;
use std::str::FromStr;

use km_core::{Activity, Kingdom, KmError, Modifier};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::results::{ResourceChange, activity_result, skill_check_result};
use crate::degree::DegreeOfSuccess;

/// Replay record of an activity outcome, enough to upgrade or downgrade it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResultMeta {
    /// The activity, or none for a plain skill check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
    /// Degree the outcome was resolved at.
    pub degree: DegreeOfSuccess,
    /// Identifier the consume tokens derive from.
    pub result_id: String,
}

/// One offered effect of an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectRef {
    /// The modifier at this index.
    Modifier(usize),
    /// The resource change at this index.
    Change(usize),
    /// The "gain 1 fame" offer of a critical success.
    Fame,
}

impl fmt::Display for EffectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modifier(index) => write!(f, "modifier:{index}"),
            Self::Change(index) => write!(f, "change:{index}"),
            Self::Fame => f.write_str("fame"),
        }
    }
}

impl FromStr for EffectRef {
    type Err = KmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || KmError::UnknownName {
            kind: "effect",
            name: s.to_string(),
        };
        if s == "fame" {
            return Ok(Self::Fame);
        }
        let (kind, index) = s.split_once(':').ok_or_else(unknown)?;
        let index: usize = index.parse().map_err(|_| unknown())?;
        match kind {
            "modifier" => Ok(Self::Modifier(index)),
            "change" => Ok(Self::Change(index)),
            _ => Err(unknown()),
        }
    }
}

/// The single-use token of one effect of one outcome.
pub fn effect_token(result_id: &str, effect: EffectRef) -> String {
    format!("{result_id}:{effect}")
}

/// The id of the roll an outcome id descends from.
pub fn root_result_id(result_id: &str) -> &str {
    result_id.split_once('@').map_or(result_id, |(root, _)| root)
}

/// The id an outcome gets when its roll is re-judged at `degree`.
///
/// Every degree of one roll shares the root id before the `@`, so judging
/// the same roll at the same degree twice yields the same tokens.
pub fn regraded_id(result_id: &str, degree: DegreeOfSuccess) -> String {
    format!("{}@{}", root_result_id(result_id), degree.as_str())
}

/// A resolved activity outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityOutcome {
    /// Fresh identifier of this outcome.
    pub result_id: String,
    /// The activity, or none for a plain skill check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
    /// Degree of success.
    pub degree: DegreeOfSuccess,
    /// Outcome text.
    pub message: String,
    /// Offered modifiers. Single-use ones carry their consume token.
    pub modifiers: Vec<Modifier>,
    /// Offered resource changes.
    pub changes: Vec<ResourceChange>,
    /// Whether a point of fame is offered.
    pub offers_fame: bool,
}

impl ActivityOutcome {
    /// Replay record for later upgrades and downgrades.
    pub fn meta(&self) -> ActivityResultMeta {
        ActivityResultMeta {
            activity: self.activity,
            degree: self.degree,
            result_id: self.result_id.clone(),
        }
    }

    /// Token guarding one offered effect.
    pub fn token(&self, effect: EffectRef) -> String {
        effect_token(&self.result_id, effect)
    }

    /// Whether `token` was spent by another degree of the same roll.
    pub fn is_sibling_token(&self, token: &str) -> bool {
        let Some(rest) = token.strip_prefix(root_result_id(&self.result_id)) else {
            return false;
        };
        let same_roll = rest.starts_with(':') || rest.starts_with('@');
        same_roll && !token.starts_with(&format!("{}:", self.result_id))
    }

    /// Whether `effect` refers to something this outcome offers.
    pub fn offers(&self, effect: EffectRef) -> bool {
        match effect {
            EffectRef::Modifier(index) => index < self.modifiers.len(),
            EffectRef::Change(index) => index < self.changes.len(),
            EffectRef::Fame => self.offers_fame,
        }
    }

    /// Every effect on offer, modifiers first.
    pub fn effects(&self) -> Vec<EffectRef> {
        let mut out: Vec<EffectRef> = (0..self.modifiers.len()).map(EffectRef::Modifier).collect();
        out.extend((0..self.changes.len()).map(EffectRef::Change));
        if self.offers_fame {
            out.push(EffectRef::Fame);
        }
        out
    }
}

/// Resolve an outcome under a new result id.
pub fn resolve_activity(
    activity: Option<Activity>,
    degree: DegreeOfSuccess,
    kingdom: &Kingdom,
) -> ActivityOutcome {
    resolve_with_id(Uuid::new_v4().to_string(), activity, degree, kingdom)
}

/// Resolve an outcome under a known result id.
///
/// The outcome is recomputed from the catalog and the live kingdom, so the
/// same id always yields the same offers for the same kingdom.
pub fn resolve_with_id(
    result_id: String,
    activity: Option<Activity>,
    degree: DegreeOfSuccess,
    kingdom: &Kingdom,
) -> ActivityOutcome {
    let result = match activity {
        Some(activity) => activity_result(activity, degree),
        None => skill_check_result(degree),
    };
    let modifiers = result
        .modifiers_for(kingdom)
        .into_iter()
        .enumerate()
        .map(|(index, mut modifier)| {
            if result.single_use {
                modifier.consume_id = Some(effect_token(&result_id, EffectRef::Modifier(index)));
            }
            modifier
        })
        .collect();
    debug!(?activity, ?degree, %result_id, "resolved activity outcome");
    ActivityOutcome {
        message: result.message.to_string(),
        changes: result.changes_for(kingdom),
        offers_fame: degree == DegreeOfSuccess::CriticalSuccess,
        modifiers,
        activity,
        degree,
        result_id,
    }
}

/// Manual correction of a judged outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DegreeChange {
    /// One degree better.
    Upgrade,
    /// One degree worse.
    Downgrade,
}

/// Re-derive an outcome one degree up or down.
///
/// The new outcome keeps the roll's root id (see [`regraded_id`]). Once an
/// effect of one degree is applied, the other degrees of that roll count as
/// spent.
pub fn change_degree(
    meta: &ActivityResultMeta,
    change: DegreeChange,
    kingdom: &Kingdom,
) -> ActivityOutcome {
    let degree = match change {
        DegreeChange::Upgrade => meta.degree.upgrade(),
        DegreeChange::Downgrade => meta.degree.downgrade(),
    };
    resolve_with_id(regraded_id(&meta.result_id, degree), meta.activity, degree, kingdom)
}
