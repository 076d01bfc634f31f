use std::fmt;

use serde::Serialize;

pub const AGENTS: [&str; 22] = [
    "Astra",
    "Breach",
    "Brimstone",
    "Chamber",
    "Cypher",
    "Deadlock",
    "Fade",
    "Gekko",
    "Harbor",
    "Jett",
    "KAY/O",
    "Killjoy",
    "Neon",
    "Omen",
    "Phoenix",
    "Raze",
    "Reyna",
    "Sage",
    "Skye",
    "Sova",
    "Viper",
    "Yoru",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RankTier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Ascendant,
    Immortal,
    Radiant,
}

impl RankTier {
    pub const ALL: [RankTier; 9] = [
        RankTier::Iron,
        RankTier::Bronze,
        RankTier::Silver,
        RankTier::Gold,
        RankTier::Platinum,
        RankTier::Diamond,
        RankTier::Ascendant,
        RankTier::Immortal,
        RankTier::Radiant,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RankTier::Iron => "Iron",
            RankTier::Bronze => "Bronze",
            RankTier::Silver => "Silver",
            RankTier::Gold => "Gold",
            RankTier::Platinum => "Platinum",
            RankTier::Diamond => "Diamond",
            RankTier::Ascendant => "Ascendant",
            RankTier::Immortal => "Immortal",
            RankTier::Radiant => "Radiant",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(raw))
    }

    pub fn sub_ranks(self) -> impl Iterator<Item = &'static SubRank> {
        SUB_RANKS.iter().filter(move |sub| sub.tier == self)
    }
}

impl fmt::Display for RankTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MapName {
    Ascent,
    Bind,
    Haven,
    Split,
    Fracture,
    Pearl,
    Lotus,
}

impl MapName {
    pub const ALL: [MapName; 7] = [
        MapName::Ascent,
        MapName::Bind,
        MapName::Haven,
        MapName::Split,
        MapName::Fracture,
        MapName::Pearl,
        MapName::Lotus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MapName::Ascent => "Ascent",
            MapName::Bind => "Bind",
            MapName::Haven => "Haven",
            MapName::Split => "Split",
            MapName::Fracture => "Fracture",
            MapName::Pearl => "Pearl",
            MapName::Lotus => "Lotus",
        }
    }

    /// Lowercased form used in stats URLs and raw file names.
    pub fn slug(self) -> String {
        self.name().to_ascii_lowercase()
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|map| map.name().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for MapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numbered sub-rank as the stats site knows it. Storage collapses these
/// to their tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubRank {
    pub id: u32,
    pub label: &'static str,
    pub tier: RankTier,
}

impl SubRank {
    const fn new(id: u32, label: &'static str, tier: RankTier) -> Self {
        Self { id, label, tier }
    }

    /// "Gold 2" -> "gold2"
    pub fn file_stem(&self) -> String {
        self.label.replace(' ', "").to_lowercase()
    }

    pub fn raw_file_name(&self, map: MapName) -> String {
        format!("{}_{}.csv", self.file_stem(), map.slug())
    }
}

pub const SUB_RANKS: [SubRank; 25] = [
    SubRank::new(3, "Iron 1", RankTier::Iron),
    SubRank::new(4, "Iron 2", RankTier::Iron),
    SubRank::new(5, "Iron 3", RankTier::Iron),
    SubRank::new(6, "Bronze 1", RankTier::Bronze),
    SubRank::new(7, "Bronze 2", RankTier::Bronze),
    SubRank::new(8, "Bronze 3", RankTier::Bronze),
    SubRank::new(9, "Silver 1", RankTier::Silver),
    SubRank::new(10, "Silver 2", RankTier::Silver),
    SubRank::new(11, "Silver 3", RankTier::Silver),
    SubRank::new(12, "Gold 1", RankTier::Gold),
    SubRank::new(13, "Gold 2", RankTier::Gold),
    SubRank::new(14, "Gold 3", RankTier::Gold),
    SubRank::new(15, "Platinum 1", RankTier::Platinum),
    SubRank::new(16, "Platinum 2", RankTier::Platinum),
    SubRank::new(17, "Platinum 3", RankTier::Platinum),
    SubRank::new(18, "Diamond 1", RankTier::Diamond),
    SubRank::new(19, "Diamond 2", RankTier::Diamond),
    SubRank::new(20, "Diamond 3", RankTier::Diamond),
    SubRank::new(21, "Ascendant 1", RankTier::Ascendant),
    SubRank::new(22, "Ascendant 2", RankTier::Ascendant),
    SubRank::new(23, "Ascendant 3", RankTier::Ascendant),
    SubRank::new(24, "Immortal 1", RankTier::Immortal),
    SubRank::new(25, "Immortal 2", RankTier::Immortal),
    SubRank::new(26, "Immortal 3", RankTier::Immortal),
    SubRank::new(27, "Radiant", RankTier::Radiant),
];

/// Case-insensitive lookup returning the catalog spelling.
pub fn canonical_agent(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    AGENTS
        .iter()
        .copied()
        .find(|agent| agent.eq_ignore_ascii_case(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tiers_and_maps_case_insensitively() {
        assert_eq!(RankTier::parse(" gold "), Some(RankTier::Gold));
        assert_eq!(RankTier::parse("RADIANT"), Some(RankTier::Radiant));
        assert_eq!(RankTier::parse("Gold 2"), None);
        assert_eq!(MapName::parse("ascent"), Some(MapName::Ascent));
        assert_eq!(MapName::parse(""), None);
    }

    #[test]
    fn every_tier_has_sub_ranks() {
        for tier in RankTier::ALL {
            let count = tier.sub_ranks().count();
            if tier == RankTier::Radiant {
                assert_eq!(count, 1);
            } else {
                assert_eq!(count, 3, "{tier}");
            }
        }
        let ids: Vec<u32> = SUB_RANKS.iter().map(|s| s.id).collect();
        assert_eq!(ids, (3..=27).collect::<Vec<_>>());
    }

    #[test]
    fn raw_file_names_strip_spaces() {
        let gold2 = SUB_RANKS.iter().find(|s| s.id == 13).unwrap();
        assert_eq!(gold2.raw_file_name(MapName::Ascent), "gold2_ascent.csv");
        let radiant = SUB_RANKS.last().unwrap();
        assert_eq!(radiant.raw_file_name(MapName::Lotus), "radiant_lotus.csv");
    }

    #[test]
    fn canonical_agent_keeps_catalog_spelling() {
        assert_eq!(canonical_agent("kay/o"), Some("KAY/O"));
        assert_eq!(canonical_agent("Jett"), Some("Jett"));
        assert_eq!(canonical_agent("Tejo"), None);
    }
}
