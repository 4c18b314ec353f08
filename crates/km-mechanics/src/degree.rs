//! The four degrees of success and how a check lands on one.

use std::fmt;
use std::str::FromStr;

use km_core::names::normalize;
use serde::{Deserialize, Serialize};

use crate::error::MechError;

/// Outcome tier of a check, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DegreeOfSuccess {
    /// Missed the DC by 10 or more, or a natural 1 that failed.
    CriticalFailure,
    /// Below the DC.
    Failure,
    /// Met or beat the DC.
    Success,
    /// Beat the DC by 10 or more, or a natural 20 that succeeded.
    CriticalSuccess,
}

impl DegreeOfSuccess {
    /// Every degree, worst first.
    pub const ALL: [DegreeOfSuccess; 4] = [
        Self::CriticalFailure,
        Self::Failure,
        Self::Success,
        Self::CriticalSuccess,
    ];

    /// One step better; critical success stays put.
    pub fn upgrade(self) -> Self {
        match self {
            Self::CriticalFailure => Self::Failure,
            Self::Failure => Self::Success,
            Self::Success | Self::CriticalSuccess => Self::CriticalSuccess,
        }
    }

    /// One step worse; critical failure stays put.
    pub fn downgrade(self) -> Self {
        match self {
            Self::CriticalSuccess => Self::Success,
            Self::Success => Self::Failure,
            Self::Failure | Self::CriticalFailure => Self::CriticalFailure,
        }
    }

    /// Wire name, e.g. `criticalSuccess`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CriticalFailure => "criticalFailure",
            Self::Failure => "failure",
            Self::Success => "success",
            Self::CriticalSuccess => "criticalSuccess",
        }
    }

    /// Display label, e.g. `Critical Success`.
    pub fn label(self) -> &'static str {
        match self {
            Self::CriticalFailure => "Critical Failure",
            Self::Failure => "Failure",
            Self::Success => "Success",
            Self::CriticalSuccess => "Critical Success",
        }
    }
}

impl fmt::Display for DegreeOfSuccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DegreeOfSuccess {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|d| normalize(d.as_str()) == wanted)
            .ok_or_else(|| {
                MechError::Core(km_core::KmError::UnknownName {
                    kind: "degree of success",
                    name: s.to_string(),
                })
            })
    }
}

/// Classify a check.
///
/// The total against the DC picks the tier (±10 for the critical tiers),
/// then a natural 20 upgrades and a natural 1 downgrades it by one step.
pub fn determine_degree_of_success(natural: i32, total: i32, dc: i32) -> DegreeOfSuccess {
    let base = if total >= dc + 10 {
        DegreeOfSuccess::CriticalSuccess
    } else if total >= dc {
        DegreeOfSuccess::Success
    } else if total <= dc - 10 {
        DegreeOfSuccess::CriticalFailure
    } else {
        DegreeOfSuccess::Failure
    };
    match natural {
        20 => base.upgrade(),
        1 => base.downgrade(),
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_checks() {
        use DegreeOfSuccess::*;
        assert_eq!(determine_degree_of_success(10, 25, 15), CriticalSuccess);
        assert_eq!(determine_degree_of_success(10, 14, 15), Failure);
        assert_eq!(determine_degree_of_success(1, 14, 15), CriticalFailure);
        assert_eq!(determine_degree_of_success(20, 15, 15), CriticalSuccess);
        assert_eq!(determine_degree_of_success(10, 5, 15), CriticalFailure);
        assert_eq!(determine_degree_of_success(1, 4, 15), CriticalFailure);
        assert_eq!(determine_degree_of_success(20, 30, 15), CriticalSuccess);
    }

    #[test]
    fn boundaries_saturate() {
        assert_eq!(DegreeOfSuccess::CriticalSuccess.upgrade(), DegreeOfSuccess::CriticalSuccess);
        assert_eq!(DegreeOfSuccess::CriticalFailure.downgrade(), DegreeOfSuccess::CriticalFailure);
    }

    #[test]
    fn parse_and_wire_names() {
        assert_eq!("criticalSuccess".parse::<DegreeOfSuccess>().unwrap(), DegreeOfSuccess::CriticalSuccess);
        assert_eq!("critical-failure".parse::<DegreeOfSuccess>().unwrap(), DegreeOfSuccess::CriticalFailure);
        assert!("great".parse::<DegreeOfSuccess>().is_err());
        assert_eq!(
            serde_json::to_string(&DegreeOfSuccess::CriticalFailure).unwrap(),
            "\"criticalFailure\""
        );
    }

    fn any_degree() -> impl Strategy<Value = DegreeOfSuccess> {
        prop::sample::select(DegreeOfSuccess::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn upgrade_then_downgrade_round_trips(degree in any_degree()) {
            if degree != DegreeOfSuccess::CriticalSuccess {
                prop_assert_eq!(degree.upgrade().downgrade(), degree);
            }
            if degree != DegreeOfSuccess::CriticalFailure {
                prop_assert_eq!(degree.downgrade().upgrade(), degree);
            }
        }

        #[test]
        fn upgrade_never_worsens(degree in any_degree()) {
            prop_assert!(degree.upgrade() >= degree);
            prop_assert!(degree.downgrade() <= degree);
        }

        #[test]
        fn higher_totals_never_do_worse(natural in 2..20i32, total in -20..60i32, dc in 0..40i32) {
            let lower = determine_degree_of_success(natural, total, dc);
            let higher = determine_degree_of_success(natural, total + 1, dc);
            prop_assert!(higher >= lower);
        }
    }
}
