use serde::{Deserialize, Serialize};

/// Hard ceiling on fame and infamy points.
pub const MAX_FAME: i32 = 3;

/// A value that accrues during a turn and lands at the end of it.
///
/// `now` is what the kingdom can spend this turn; `next` collects gains that
/// only become available once the turn ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Buffered<T> {
    /// Available this turn.
    pub now: T,
    /// Arrives at the end of the turn.
    pub next: T,
}

keyword_enum! {
    /// A stockpiled kingdom commodity.
    pub enum Commodity: "commodity" {
        /// Food.
        Food => "food",
        /// Lumber.
        Lumber => "lumber",
        /// Luxuries.
        Luxuries => "luxuries",
        /// Ore.
        Ore => "ore",
        /// Stone.
        Stone => "stone",
    }
}

/// One amount per commodity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commodities {
    /// Food.
    pub food: i32,
    /// Lumber.
    pub lumber: i32,
    /// Luxuries.
    pub luxuries: i32,
    /// Ore.
    pub ore: i32,
    /// Stone.
    pub stone: i32,
}

impl Commodities {
    /// The same amount of every commodity.
    pub fn splat(amount: i32) -> Self {
        Self {
            food: amount,
            lumber: amount,
            luxuries: amount,
            ore: amount,
            stone: amount,
        }
    }

    /// Amount of one commodity.
    pub fn get(&self, commodity: Commodity) -> i32 {
        match commodity {
            Commodity::Food => self.food,
            Commodity::Lumber => self.lumber,
            Commodity::Luxuries => self.luxuries,
            Commodity::Ore => self.ore,
            Commodity::Stone => self.stone,
        }
    }

    /// Mutable amount of one commodity.
    pub fn get_mut(&mut self, commodity: Commodity) -> &mut i32 {
        match commodity {
            Commodity::Food => &mut self.food,
            Commodity::Lumber => &mut self.lumber,
            Commodity::Luxuries => &mut self.luxuries,
            Commodity::Ore => &mut self.ore,
            Commodity::Stone => &mut self.stone,
        }
    }

    /// Iterate commodities with their amounts.
    pub fn iter(&self) -> impl Iterator<Item = (Commodity, i32)> + '_ {
        Commodity::ALL.iter().map(|c| (*c, self.get(*c)))
    }

    /// Element-wise sum.
    pub fn plus(&self, other: &Commodities) -> Commodities {
        let mut out = *self;
        for (c, amount) in other.iter() {
            *out.get_mut(c) += amount;
        }
        out
    }

    /// Clamp every commodity into `0..=capacity` for that commodity.
    pub fn clamp_to(&self, capacity: &Commodities) -> Commodities {
        let mut out = *self;
        for (c, cap) in capacity.iter() {
            let v = out.get_mut(c);
            *v = (*v).clamp(0, cap.max(0));
        }
        out
    }
}

keyword_enum! {
    /// A kind of work site.
    pub enum WorkSiteKind: "work site" {
        /// Farmland hexes; they feed the kingdom instead of stockpiling.
        Farmlands => "farmlands",
        /// Lumber camps.
        LumberCamps => "lumberCamps",
        /// Mines.
        Mines => "mines",
        /// Quarries.
        Quarries => "quarries",
        /// Luxury sources.
        LuxurySources => "luxurySources",
    }
}

impl WorkSiteKind {
    /// The commodity this kind of site produces.
    pub fn commodity(self) -> Commodity {
        match self {
            Self::Farmlands => Commodity::Food,
            Self::LumberCamps => Commodity::Lumber,
            Self::Mines => Commodity::Ore,
            Self::Quarries => Commodity::Stone,
            Self::LuxurySources => Commodity::Luxuries,
        }
    }
}

/// Work sites of one kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkSite {
    /// Sites in ordinary hexes.
    pub quantity: i32,
    /// Sites in hexes with a matching resource.
    pub resources: i32,
}

impl WorkSite {
    /// Commodities produced per turn.
    pub fn production(&self) -> i32 {
        self.quantity + self.resources
    }
}

/// Every work site the kingdom has established.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkSites {
    /// Farmlands.
    pub farmlands: WorkSite,
    /// Lumber camps.
    pub lumber_camps: WorkSite,
    /// Mines.
    pub mines: WorkSite,
    /// Quarries.
    pub quarries: WorkSite,
    /// Luxury sources.
    pub luxury_sources: WorkSite,
}

impl WorkSites {
    /// Sites of one kind.
    pub fn get(&self, kind: WorkSiteKind) -> &WorkSite {
        match kind {
            WorkSiteKind::Farmlands => &self.farmlands,
            WorkSiteKind::LumberCamps => &self.lumber_camps,
            WorkSiteKind::Mines => &self.mines,
            WorkSiteKind::Quarries => &self.quarries,
            WorkSiteKind::LuxurySources => &self.luxury_sources,
        }
    }

    /// Mutable sites of one kind.
    pub fn get_mut(&mut self, kind: WorkSiteKind) -> &mut WorkSite {
        match kind {
            WorkSiteKind::Farmlands => &mut self.farmlands,
            WorkSiteKind::LumberCamps => &mut self.lumber_camps,
            WorkSiteKind::Mines => &mut self.mines,
            WorkSiteKind::Quarries => &mut self.quarries,
            WorkSiteKind::LuxurySources => &mut self.luxury_sources,
        }
    }

    /// Farmland hexes, with or without a food resource.
    pub fn farmland_count(&self) -> i32 {
        self.farmlands.quantity + self.farmlands.resources
    }

    /// Stockpiled commodities gathered in one turn. Farmlands produce none.
    pub fn production(&self) -> Commodities {
        let mut out = Commodities::default();
        for kind in WorkSiteKind::ALL {
            if *kind != WorkSiteKind::Farmlands {
                *out.get_mut(kind.commodity()) += self.get(*kind).production();
            }
        }
        out
    }
}

/// Food consumed each turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Consumption {
    /// Extra consumption this turn.
    pub now: i32,
    /// Extra consumption queued for the next turn.
    pub next: i32,
    /// Food eaten by the kingdom's armies.
    pub armies: i32,
}

keyword_enum! {
    /// Whether the kingdom trades on fame or infamy.
    #[derive(Default)]
    pub enum FameType: "fame type" {
        /// Fame.
        #[default]
        Famous => "famous",
        /// Infamy.
        Infamous => "infamous",
    }
}

/// Fame (or infamy) points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fame {
    /// Points available to spend.
    pub now: i32,
    /// Points gained for the next turn.
    pub next: i32,
    /// Fame or infamy.
    #[serde(rename = "type")]
    pub kind: FameType,
}

impl Fame {
    /// Display name for the points.
    pub fn label(&self) -> &'static str {
        match self.kind {
            FameType::Famous => "Fame",
            FameType::Infamous => "Infamy",
        }
    }

    /// Add points to `now`, staying within `0..=MAX_FAME`.
    pub fn gain(&self, amount: i32) -> Fame {
        Fame {
            now: (self.now + amount).clamp(0, MAX_FAME),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_to_capacity_and_zero() {
        let stock = Commodities {
            food: 12,
            lumber: -2,
            ..Commodities::splat(3)
        };
        let clamped = stock.clamp_to(&Commodities::splat(4));
        assert_eq!(clamped.food, 4);
        assert_eq!(clamped.lumber, 0);
        assert_eq!(clamped.ore, 3);
    }

    #[test]
    fn work_site_production() {
        let mut sites = WorkSites::default();
        sites.mines = WorkSite {
            quantity: 2,
            resources: 1,
        };
        sites.farmlands.quantity = 5;
        let produced = sites.production();
        assert_eq!(produced.ore, 3);
        assert_eq!(produced.food, 0);
        assert_eq!(sites.farmland_count(), 5);
    }

    #[test]
    fn fame_gain_saturates() {
        let fame = Fame::default();
        assert_eq!(fame.gain(5).now, MAX_FAME);
        assert_eq!(fame.gain(-1).now, 0);
    }

    #[test]
    fn work_sites_wire_names() {
        let sites: WorkSites =
            serde_json::from_str(r#"{"lumberCamps": {"quantity": 1}}"#).unwrap();
        assert_eq!(sites.lumber_camps.quantity, 1);
        assert_eq!(sites.lumber_camps.resources, 0);
    }

    #[test]
    fn fame_type_defaults_famous() {
        let fame: Fame = serde_json::from_str(r#"{"now": 2}"#).unwrap();
        assert_eq!(fame.kind, FameType::Famous);
        assert_eq!(fame.label(), "Fame");
    }
}
