//! Consistency checks over a stored kingdom.
//!
//! Reports values a hand-edited or migrated kingdom blob can get wrong:
//! out-of-range levels and counters, settlements that do not line up, and
//! stockpiles above what the kingdom can store.

use std::collections::BTreeSet;

use km_core::kingdom::MAX_LEVEL;
use km_core::skill::MAX_RANK;
use km_core::{Kingdom, MAX_FAME, RuinAxis, SettlementContext, SettlementType};

/// A warning or error found while validating a kingdom.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// The part of the kingdom the issue was found in.
    pub subject: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.subject, self.message)
    }
}

/// Validate a kingdom against the structure bonuses of its settlements.
pub fn validate_kingdom(kingdom: &Kingdom, ctx: &SettlementContext) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    validate_progress(kingdom, &mut issues);
    validate_counters(kingdom, &mut issues);
    validate_settlements(kingdom, &mut issues);
    validate_stockpile(kingdom, ctx, &mut issues);
    issues
}

fn validate_progress(kingdom: &Kingdom, issues: &mut Vec<ValidationIssue>) {
    if !(1..=MAX_LEVEL).contains(&kingdom.level) {
        issues.push(ValidationIssue::error(
            "level",
            format!("level {} is outside 1 to {MAX_LEVEL}", kingdom.level),
        ));
    }
    if kingdom.xp_threshold <= 0 {
        issues.push(ValidationIssue::error(
            "xp",
            format!("xp threshold must be positive, got {}", kingdom.xp_threshold),
        ));
    } else if kingdom.xp >= kingdom.xp_threshold && kingdom.level < MAX_LEVEL {
        issues.push(ValidationIssue::warning(
            "xp",
            format!(
                "{} xp reaches the threshold of {}; the kingdom can level up",
                kingdom.xp, kingdom.xp_threshold
            ),
        ));
    }
    for (skill, rank) in kingdom.skill_ranks.iter() {
        if rank > MAX_RANK {
            issues.push(ValidationIssue::error(
                format!("skill '{skill}'"),
                format!("rank {rank} is above {MAX_RANK}"),
            ));
        }
    }
}

fn validate_counters(kingdom: &Kingdom, issues: &mut Vec<ValidationIssue>) {
    let counters = [
        ("unrest", kingdom.unrest),
        ("size", kingdom.size),
        ("xp", kingdom.xp),
        ("resource points", kingdom.resource_points.now),
        ("resource dice", kingdom.resource_dice.now),
        ("creative solutions", kingdom.creative_solutions),
        ("supernatural solutions", kingdom.supernatural_solutions),
        ("turns without event", kingdom.turns_without_event),
    ];
    for (name, value) in counters {
        if value < 0 {
            issues.push(ValidationIssue::error(name, format!("negative value {value}")));
        }
    }
    for (commodity, value) in kingdom.commodities.now.iter() {
        if value < 0 {
            issues.push(ValidationIssue::error(
                format!("commodity '{commodity}'"),
                format!("negative value {value}"),
            ));
        }
    }
    if !(0..=MAX_FAME).contains(&kingdom.fame.now) {
        issues.push(ValidationIssue::error(
            kingdom.fame.label().to_lowercase(),
            format!("{} is outside 0 to {MAX_FAME}", kingdom.fame.now),
        ));
    }
    for axis in RuinAxis::ALL {
        let ruin = kingdom.ruin.get(*axis);
        if ruin.threshold <= 0 {
            issues.push(ValidationIssue::error(
                format!("ruin '{axis}'"),
                format!("threshold must be positive, got {}", ruin.threshold),
            ));
        }
        if ruin.value < 0 || ruin.penalty < 0 {
            issues.push(ValidationIssue::error(
                format!("ruin '{axis}'"),
                "value and penalty can not be negative",
            ));
        }
    }
    if kingdom.in_anarchy() {
        issues.push(ValidationIssue::warning(
            "unrest",
            format!(
                "unrest {} has reached the anarchy threshold of {}",
                kingdom.unrest,
                kingdom.anarchy_threshold()
            ),
        ));
    }
}

fn validate_settlements(kingdom: &Kingdom, issues: &mut Vec<ValidationIssue>) {
    let mut seen = BTreeSet::new();
    for settlement in &kingdom.settlements {
        if !seen.insert(settlement.scene_id.as_str()) {
            issues.push(ValidationIssue::error(
                format!("settlement '{}'", settlement.scene_id),
                "listed more than once",
            ));
        }
        if settlement.level < 0 || settlement.lots < 0 {
            issues.push(ValidationIssue::error(
                format!("settlement '{}'", settlement.scene_id),
                "level and lots can not be negative",
            ));
        }
    }
    let capitals = kingdom
        .settlements
        .iter()
        .filter(|s| s.kind == SettlementType::Capital)
        .count();
    if capitals > 1 {
        issues.push(ValidationIssue::error(
            "settlements",
            format!("{capitals} settlements are marked as capital"),
        ));
    }
    if let Some(active) = &kingdom.active_settlement {
        if kingdom.active_settlement().is_none() {
            issues.push(ValidationIssue::warning(
                "active settlement",
                format!("'{active}' is not one of the kingdom's settlements"),
            ));
        }
    }
}

fn validate_stockpile(kingdom: &Kingdom, ctx: &SettlementContext, issues: &mut Vec<ValidationIssue>) {
    let capacity = kingdom.commodity_capacity(ctx);
    for (commodity, value) in kingdom.commodities.now.iter() {
        let cap = capacity.get(commodity);
        if value > cap {
            issues.push(ValidationIssue::warning(
                format!("commodity '{commodity}'"),
                format!("{value} is above the storage capacity of {cap}"),
            ));
        }
    }
    let overcrowded = ctx.overcrowded(&kingdom.settlements);
    if overcrowded > 0 {
        issues.push(ValidationIssue::warning(
            "settlements",
            format!("{overcrowded} settlement(s) are overcrowded"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use km_core::Settlement;

    fn settlement(id: &str, kind: SettlementType) -> Settlement {
        Settlement {
            scene_id: id.to_string(),
            level: 1,
            kind,
            ..Settlement::default()
        }
    }

    #[test]
    fn default_kingdom_is_clean() {
        let issues = validate_kingdom(&Kingdom::default(), &SettlementContext::default());
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn out_of_range_values_are_errors() {
        let mut kingdom = Kingdom::default();
        kingdom.level = 21;
        kingdom.unrest = -1;
        kingdom.fame.now = 4;
        kingdom.ruin.decay.threshold = 0;
        let issues = validate_kingdom(&kingdom, &SettlementContext::default());
        let subjects: Vec<&str> = issues.iter().map(|i| i.subject.as_str()).collect();
        assert!(subjects.contains(&"level"));
        assert!(subjects.contains(&"unrest"));
        assert!(subjects.contains(&"fame"));
        assert!(subjects.contains(&"ruin 'decay'"));
        assert!(issues.iter().all(|i| i.is_error));
    }

    #[test]
    fn settlement_problems() {
        let mut kingdom = Kingdom::default();
        kingdom.settlements = vec![
            settlement("a", SettlementType::Capital),
            settlement("a", SettlementType::Settlement),
            settlement("b", SettlementType::Capital),
        ];
        kingdom.active_settlement = Some("missing".to_string());
        let issues = validate_kingdom(&kingdom, &SettlementContext::default());
        let text: Vec<String> = issues.iter().map(ToString::to_string).collect();
        assert!(text.contains(&"error: settlement 'a': listed more than once".to_string()));
        assert!(text.contains(&"error: settlements: 2 settlements are marked as capital".to_string()));
        assert!(text.iter().any(|t| t.starts_with("warning: active settlement")));
    }

    #[test]
    fn stockpile_over_capacity_warns() {
        let mut kingdom = Kingdom::default();
        kingdom.commodities.now.food = 5;
        let issues = validate_kingdom(&kingdom, &SettlementContext::default());
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error);
        assert_eq!(issues[0].subject, "commodity 'food'");
    }

    #[test]
    fn level_up_ready_warns() {
        let mut kingdom = Kingdom::default();
        kingdom.xp = 1000;
        let issues = validate_kingdom(&kingdom, &SettlementContext::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].subject, "xp");
    }
}
