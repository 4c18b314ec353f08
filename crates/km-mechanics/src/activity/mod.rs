//! Activity outcomes: the scripted results catalog and its resolution into
//! offers the player can apply once each.

pub mod resolve;
pub mod results;

pub use resolve::{
    ActivityOutcome, ActivityResultMeta, DegreeChange, EffectRef, change_degree, effect_token,
    resolve_activity,
};
pub use results::{
    ActivityResult, Amount, ChangeMode, Resource, ResourceChange, activity_result,
    skill_check_result,
};
