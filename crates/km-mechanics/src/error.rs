//! Error types for the mechanics engine.

use km_core::{Activity, KmError, Skill};

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A dice formula could not be parsed.
    #[error("invalid dice formula \"{formula}\": {reason}")]
    InvalidFormula {
        /// The formula text.
        formula: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A supplied die result does not fit the die.
    #[error("rolled {value} on a d{sides}")]
    InvalidRoll {
        /// The supplied value.
        value: u32,
        /// Faces of the die.
        sides: u32,
    },

    /// Every scripted die result has been used up.
    #[error("no rolled value left for a d{0}")]
    NoMoreRolls(u32),

    /// An activity without a DC was attempted as a check.
    #[error("{0} can not be attempted as a check, it has no DC")]
    NoDc(Activity),

    /// An activity with a game-master-set DC was attempted without one.
    #[error("{0} needs a DC chosen by the game master")]
    DcRequired(Activity),

    /// The skill can not be used for the activity at the kingdom's ranks.
    #[error("{skill} can not be used for {activity}")]
    SkillNotAvailable {
        /// The requested skill.
        skill: Skill,
        /// The activity.
        activity: Activity,
    },

    /// A check named neither a skill nor an activity.
    #[error("a check needs a skill or an activity")]
    NoSkill,

    /// The activity is blacklisted or not unlocked.
    #[error("{0} is not available to the kingdom")]
    ActivityUnavailable(Activity),

    /// A core data error.
    #[error(transparent)]
    Core(#[from] KmError),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
