//! Kingdom check mechanics for Kingmaker Ledger.
//!
//! Provides dice formulas and rollers, the modifier builder and stacking
//! rules, the degree-of-success resolver, check preparation and re-rolls,
//! the scripted activity results catalog, and kingdom validation. Nothing
//! here touches persistence; functions take kingdom state and return values.

pub mod activity;
pub mod check;
pub mod degree;
pub mod dice;
pub mod error;
pub mod modifiers;
pub mod validate;

pub use activity::{
    ActivityOutcome, ActivityResultMeta, Amount, ChangeMode, DegreeChange, EffectRef, Resource,
    ResourceChange, change_degree, resolve_activity,
};
pub use check::{
    CheckRequest, CheckResult, CheckSettings, PreparedCheck, RerollKind, RollMeta, RollMode,
    TotalAndModifiers, calculate_skills, prepare_check, reroll, roll_check,
};
pub use degree::{DegreeOfSuccess, determine_degree_of_success};
pub use dice::{DiceRoller, Die, DieResult, Formula, RollResult, ScriptedRoller, StdRoller};
pub use error::{MechError, MechResult};
pub use modifiers::{
    ModifierTotal, ModifierTotals, ModifierWithId, SkillModifiers, UnrestScale,
    calculate_modifiers, process_modifiers,
};
pub use validate::{ValidationIssue, validate_kingdom};
