//! Assembling and totalling the modifiers of a kingdom check.
//!
//! [`builder`] turns kingdom state into the ordered list of modifiers for one
//! skill; [`aggregate`] applies the stacking rules to that list.

pub mod aggregate;
pub mod builder;

pub use aggregate::{ModifierTotal, ModifierTotals, calculate_modifiers};
pub use builder::{ModifierWithId, SkillModifiers, UnrestScale, process_modifiers};
