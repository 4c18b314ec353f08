//! Stacking rules for typed modifiers.

use km_core::{Modifier, ModifierType};
use serde::{Deserialize, Serialize};

/// Bonus and penalty counted for one category. Both are non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierTotal {
    /// Counted bonus.
    pub bonus: i32,
    /// Counted penalty, as a positive number.
    pub penalty: i32,
}

impl ModifierTotal {
    /// Bonus minus penalty.
    pub fn net(&self) -> i32 {
        self.bonus - self.penalty
    }
}

/// Per-category totals of a modifier list and the grand total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierTotals {
    /// Ability modifier.
    pub ability: ModifierTotal,
    /// Proficiency.
    pub proficiency: ModifierTotal,
    /// Item bonuses and penalties.
    pub item: ModifierTotal,
    /// Status bonuses and penalties.
    pub status: ModifierTotal,
    /// Circumstance bonuses and penalties.
    pub circumstance: ModifierTotal,
    /// Untyped bonuses and penalties.
    pub untyped: ModifierTotal,
    /// Sum of every bonus minus every penalty.
    pub value: i32,
}

impl ModifierTotals {
    /// Totals for one category.
    pub fn get(&self, kind: ModifierType) -> &ModifierTotal {
        match kind {
            ModifierType::Ability => &self.ability,
            ModifierType::Proficiency => &self.proficiency,
            ModifierType::Item => &self.item,
            ModifierType::Status => &self.status,
            ModifierType::Circumstance => &self.circumstance,
            ModifierType::Untyped => &self.untyped,
        }
    }

    fn get_mut(&mut self, kind: ModifierType) -> &mut ModifierTotal {
        match kind {
            ModifierType::Ability => &mut self.ability,
            ModifierType::Proficiency => &mut self.proficiency,
            ModifierType::Item => &mut self.item,
            ModifierType::Status => &mut self.status,
            ModifierType::Circumstance => &mut self.circumstance,
            ModifierType::Untyped => &mut self.untyped,
        }
    }
}

/// Total a modifier list.
///
/// Disabled modifiers are skipped. Untyped modifiers and hand-entered custom
/// adjustments add up; every other modifier only counts as the largest
/// bonus and the largest penalty of its category.
pub fn calculate_modifiers<'a>(modifiers: impl IntoIterator<Item = &'a Modifier>) -> ModifierTotals {
    let mut extremes = ModifierTotals::default();
    let mut stacked = ModifierTotals::default();
    for m in modifiers.into_iter().filter(|m| m.enabled) {
        let stacks = m.custom || m.kind == ModifierType::Untyped;
        if stacks {
            let total = stacked.get_mut(m.kind);
            total.bonus += m.value.max(0);
            total.penalty += (-m.value).max(0);
        } else {
            let total = extremes.get_mut(m.kind);
            total.bonus = total.bonus.max(m.value);
            total.penalty = total.penalty.max(-m.value);
        }
    }

    let mut totals = ModifierTotals::default();
    for kind in ModifierType::ALL {
        let total = totals.get_mut(*kind);
        total.bonus = extremes.get(*kind).bonus + stacked.get(*kind).bonus;
        total.penalty = extremes.get(*kind).penalty + stacked.get(*kind).penalty;
    }
    totals.value = ModifierType::ALL.iter().map(|k| totals.get(*k).net()).sum();
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn m(kind: ModifierType, value: i32) -> Modifier {
        Modifier::new("test", kind, value)
    }

    #[test]
    fn empty_is_zero() {
        let totals = calculate_modifiers(std::iter::empty());
        assert_eq!(totals, ModifierTotals::default());
    }

    #[test]
    fn typed_bonuses_do_not_stack() {
        let list = [
            m(ModifierType::Item, 1),
            m(ModifierType::Item, 2),
            m(ModifierType::Item, -1),
            m(ModifierType::Item, -3),
        ];
        let totals = calculate_modifiers(&list);
        assert_eq!(totals.item, ModifierTotal { bonus: 2, penalty: 3 });
        assert_eq!(totals.value, -1);
    }

    #[test]
    fn untyped_and_custom_stack() {
        let list = [
            m(ModifierType::Untyped, 1),
            m(ModifierType::Untyped, 2),
            m(ModifierType::Circumstance, 2),
            Modifier::custom(ModifierType::Circumstance, 1),
            Modifier::custom(ModifierType::Circumstance, -2),
        ];
        let totals = calculate_modifiers(&list);
        assert_eq!(totals.untyped.bonus, 3);
        assert_eq!(totals.circumstance, ModifierTotal { bonus: 3, penalty: 2 });
        assert_eq!(totals.value, 4);
    }

    #[test]
    fn disabled_modifiers_are_ignored() {
        let mut off = m(ModifierType::Status, -4);
        off.enabled = false;
        let list = [m(ModifierType::Ability, 3), off];
        let totals = calculate_modifiers(&list);
        assert_eq!(totals.status, ModifierTotal::default());
        assert_eq!(totals.value, 3);
    }

    fn any_type() -> impl Strategy<Value = ModifierType> {
        prop::sample::select(ModifierType::ALL.to_vec())
    }

    fn any_modifier() -> impl Strategy<Value = Modifier> {
        (any_type(), -6..6i32, any::<bool>(), any::<bool>()).prop_map(|(kind, value, enabled, custom)| {
            let mut modifier = Modifier::new("p", kind, value);
            modifier.enabled = enabled;
            modifier.custom = custom;
            modifier
        })
    }

    proptest! {
        #[test]
        fn all_disabled_totals_zero(list in prop::collection::vec(any_modifier(), 0..12)) {
            let disabled: Vec<Modifier> = list
                .into_iter()
                .map(|mut m| { m.enabled = false; m })
                .collect();
            prop_assert_eq!(calculate_modifiers(&disabled).value, 0);
        }

        #[test]
        fn extra_typed_bonus_never_exceeds_max(
            kind in prop::sample::select(vec![
                ModifierType::Ability,
                ModifierType::Proficiency,
                ModifierType::Item,
                ModifierType::Status,
                ModifierType::Circumstance,
            ]),
            a in 0..8i32,
            b in 0..8i32,
        ) {
            let totals = calculate_modifiers(&[m(kind, a), m(kind, b)]);
            prop_assert_eq!(totals.get(kind).bonus, a.max(b));
            let totals = calculate_modifiers(&[m(kind, -a), m(kind, -b)]);
            prop_assert_eq!(totals.get(kind).penalty, a.max(b));
        }

        #[test]
        fn value_is_sum_of_nets(list in prop::collection::vec(any_modifier(), 0..12)) {
            let totals = calculate_modifiers(&list);
            let nets: i32 = ModifierType::ALL.iter().map(|k| totals.get(*k).net()).sum();
            prop_assert_eq!(totals.value, nets);
        }
    }
}
