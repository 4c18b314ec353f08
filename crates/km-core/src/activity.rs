use crate::skill::{Skill, SkillRanks};

keyword_enum! {
    /// A phase of the kingdom turn.
    pub enum KingdomPhase: "phase" {
        /// Upkeep: assign leaders, adjust unrest.
        Upkeep => "upkeep",
        /// Commerce: taxes, trade, lifestyle.
        Commerce => "commerce",
        /// Leadership: each leader takes an activity.
        Leadership => "leadership",
        /// Region: claim and develop hexes.
        Region => "region",
        /// Civic: build in settlements.
        Civic => "civic",
        /// Army deployment and battles.
        Army => "army",
        /// Kingdom events.
        Event => "event",
    }
}

/// How the DC of an activity is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityDc {
    /// The kingdom's control DC.
    Control,
    /// Supplied by the game master for each attempt.
    Custom,
    /// The activity is never rolled.
    None,
}

keyword_enum! {
    /// A kingdom activity that can be attempted as a check.
    pub enum Activity: "activity" {
        /// Give up a claimed hex.
        AbandonHex => "abandonHex",
        /// Build roads through a claimed hex.
        BuildRoads => "buildRoads",
        /// Claim a reconnoitered hex.
        ClaimHex => "claimHex",
        /// Set up a farm, camp, mine or quarry.
        EstablishWorkSite => "establishWorkSite",
        /// Raise defenses in a hex.
        FortifyHex => "fortifyHex",
        /// Fish the rivers and lakes for food.
        GoFishing => "goFishing",
        /// Round up wild livestock for food.
        GatherLivestock => "gatherLivestock",
        /// Levy taxes for resource dice.
        CollectTaxes => "collectTaxes",
        /// Spend on the quality of life of the citizens.
        ImproveLifestyle => "improveLifestyle",
        /// Sell commodities for resource points.
        TradeCommodities => "tradeCommodities",
        /// Use trade agreements for extra resources.
        ManageTradeAgreements => "manageTradeAgreements",
        /// Throw a festival.
        CelebrateHoliday => "celebrateHoliday",
        /// Bank an improvised solution for a later check.
        CreativeSolution => "creativeSolution",
        /// Bank a magical solution for a later check.
        SupernaturalSolution => "supernaturalSolution",
        /// Read the omens ahead of the event phase.
        Prognostication => "prognostication",
        /// Tend to the kingdom's sick and poor.
        ProvideCare => "provideCare",
        /// Calm the populace.
        QuellUnrest => "quellUnrest",
        /// Ask an ally for resources.
        RequestForeignAid => "requestForeignAid",
        /// Take a turn off from expansion.
        RestAndRelax => "restAndRelax",
        /// Open trade with a group the kingdom has diplomatic relations with.
        EstablishTradeAgreement => "establishTradeAgreement",
        /// Construct a structure in a settlement.
        BuildStructure => "buildStructure",
        /// Found a new settlement.
        EstablishSettlement => "establishSettlement",
    }
}

impl Activity {
    /// The turn phase the activity belongs to.
    pub fn phase(self) -> KingdomPhase {
        use Activity::*;
        match self {
            AbandonHex | BuildRoads | ClaimHex | EstablishWorkSite | FortifyHex | GoFishing
            | GatherLivestock => KingdomPhase::Region,
            CollectTaxes | ImproveLifestyle | TradeCommodities | ManageTradeAgreements => {
                KingdomPhase::Commerce
            }
            CelebrateHoliday | CreativeSolution | SupernaturalSolution | Prognostication
            | ProvideCare | QuellUnrest | RequestForeignAid | RestAndRelax
            | EstablishTradeAgreement => KingdomPhase::Leadership,
            BuildStructure | EstablishSettlement => KingdomPhase::Civic,
        }
    }

    /// How the DC is set.
    pub fn dc(self) -> ActivityDc {
        match self {
            Self::EstablishTradeAgreement | Self::BuildStructure => ActivityDc::Custom,
            Self::EstablishSettlement => ActivityDc::None,
            _ => ActivityDc::Control,
        }
    }

    /// Skills usable for the activity, each with the minimum rank required.
    pub fn skills(self) -> &'static [(Skill, u8)] {
        use Skill::*;
        match self {
            Self::AbandonHex => &[(Exploration, 0), (Wilderness, 0)],
            Self::BuildRoads => &[(Engineering, 0)],
            Self::ClaimHex => &[(Exploration, 0), (Intrigue, 1), (Magic, 1), (Wilderness, 0)],
            Self::EstablishWorkSite => &[(Engineering, 0)],
            Self::FortifyHex => &[(Defense, 0)],
            Self::GoFishing => &[(Boating, 1)],
            Self::GatherLivestock => &[(Wilderness, 1)],
            Self::CollectTaxes => &[(Trade, 0)],
            Self::ImproveLifestyle => &[(Politics, 0)],
            Self::TradeCommodities => &[(Industry, 1)],
            Self::ManageTradeAgreements => &[(Trade, 2)],
            Self::CelebrateHoliday => &[(Folklore, 0)],
            Self::CreativeSolution => &[(Scholarship, 0)],
            Self::SupernaturalSolution | Self::Prognostication => &[(Magic, 0)],
            Self::ProvideCare => &[(Folklore, 0), (Statecraft, 0)],
            Self::QuellUnrest => &[
                (Arts, 0),
                (Folklore, 0),
                (Intrigue, 0),
                (Magic, 0),
                (Politics, 0),
                (Warfare, 0),
            ],
            Self::RequestForeignAid => &[(Statecraft, 0)],
            Self::RestAndRelax => &[
                (Arts, 0),
                (Boating, 0),
                (Scholarship, 0),
                (Trade, 0),
                (Wilderness, 0),
            ],
            Self::EstablishTradeAgreement => &[(Trade, 1)],
            Self::BuildStructure => &[(Industry, 0)],
            Self::EstablishSettlement => &[],
        }
    }

    /// Whether a structure has to unlock the activity first.
    pub fn requires_unlock(self) -> bool {
        matches!(self, Self::Prognostication)
    }

    /// Skills the kingdom is proficient enough to use for this activity.
    pub fn available_skills(self, ranks: &SkillRanks) -> Vec<Skill> {
        self.skills()
            .iter()
            .filter(|(skill, min)| ranks.rank(*skill) >= *min)
            .map(|(skill, _)| *skill)
            .collect()
    }
}
