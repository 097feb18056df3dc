//! Enum <-> database string conversions.
//!
//! Enumerated values are stored as TEXT with CHECK constraints (see the
//! migrations). Conversions are centralized here so every store agrees
//! on the wire strings; `from_db` fails loudly on an unknown value
//! rather than guessing.

use daybreak_types::{
    ActionStatus, ActionType, Biome, BuildingKind, ElectionPhase, ImpeachmentStatus, ItemKind,
    LawStatus, ProfessionKind, ProfessionTier, QualityTier, Race, ToolKind,
};

use crate::error::DbError;

/// The database string for an action type.
pub const fn action_type_to_db(value: ActionType) -> &'static str {
    match value {
        ActionType::Gather => "gather",
        ActionType::Craft => "craft",
        ActionType::Travel => "travel",
        ActionType::Rest => "rest",
        ActionType::Guard => "guard",
        ActionType::Ambush => "ambush",
        ActionType::Enlist => "enlist",
        ActionType::ProposeLaw => "propose_law",
    }
}

/// Parse an action type from its database string.
pub fn action_type_from_db(value: &str) -> Result<ActionType, DbError> {
    match value {
        "gather" => Ok(ActionType::Gather),
        "craft" => Ok(ActionType::Craft),
        "travel" => Ok(ActionType::Travel),
        "rest" => Ok(ActionType::Rest),
        "guard" => Ok(ActionType::Guard),
        "ambush" => Ok(ActionType::Ambush),
        "enlist" => Ok(ActionType::Enlist),
        "propose_law" => Ok(ActionType::ProposeLaw),
        other => Err(DbError::Decode(format!("unknown action type {other:?}"))),
    }
}

/// The database string for an action status.
pub const fn action_status_to_db(value: ActionStatus) -> &'static str {
    match value {
        ActionStatus::LockedIn => "locked_in",
        ActionStatus::Completed => "completed",
        ActionStatus::Failed => "failed",
    }
}

/// Parse an action status from its database string.
pub fn action_status_from_db(value: &str) -> Result<ActionStatus, DbError> {
    match value {
        "locked_in" => Ok(ActionStatus::LockedIn),
        "completed" => Ok(ActionStatus::Completed),
        "failed" => Ok(ActionStatus::Failed),
        other => Err(DbError::Decode(format!("unknown action status {other:?}"))),
    }
}

/// The database string for a race.
pub const fn race_to_db(value: Race) -> &'static str {
    match value {
        Race::Human => "human",
        Race::Elf => "elf",
        Race::Dwarf => "dwarf",
        Race::Orc => "orc",
        Race::Merfolk => "merfolk",
        Race::Duskborn => "duskborn",
        Race::Halfbreed => "halfbreed",
        Race::Revenant => "revenant",
    }
}

/// Parse a race from its database string.
pub fn race_from_db(value: &str) -> Result<Race, DbError> {
    match value {
        "human" => Ok(Race::Human),
        "elf" => Ok(Race::Elf),
        "dwarf" => Ok(Race::Dwarf),
        "orc" => Ok(Race::Orc),
        "merfolk" => Ok(Race::Merfolk),
        "duskborn" => Ok(Race::Duskborn),
        "halfbreed" => Ok(Race::Halfbreed),
        "revenant" => Ok(Race::Revenant),
        other => Err(DbError::Decode(format!("unknown race {other:?}"))),
    }
}

/// The database string for a profession.
pub const fn profession_to_db(value: ProfessionKind) -> &'static str {
    match value {
        ProfessionKind::Miner => "miner",
        ProfessionKind::Lumberjack => "lumberjack",
        ProfessionKind::Herbalist => "herbalist",
        ProfessionKind::Fisher => "fisher",
        ProfessionKind::Blacksmith => "blacksmith",
        ProfessionKind::Alchemist => "alchemist",
        ProfessionKind::Carpenter => "carpenter",
        ProfessionKind::Tailor => "tailor",
        ProfessionKind::Innkeeper => "innkeeper",
        ProfessionKind::Healer => "healer",
    }
}

/// Parse a profession from its database string.
pub fn profession_from_db(value: &str) -> Result<ProfessionKind, DbError> {
    match value {
        "miner" => Ok(ProfessionKind::Miner),
        "lumberjack" => Ok(ProfessionKind::Lumberjack),
        "herbalist" => Ok(ProfessionKind::Herbalist),
        "fisher" => Ok(ProfessionKind::Fisher),
        "blacksmith" => Ok(ProfessionKind::Blacksmith),
        "alchemist" => Ok(ProfessionKind::Alchemist),
        "carpenter" => Ok(ProfessionKind::Carpenter),
        "tailor" => Ok(ProfessionKind::Tailor),
        "innkeeper" => Ok(ProfessionKind::Innkeeper),
        "healer" => Ok(ProfessionKind::Healer),
        other => Err(DbError::Decode(format!("unknown profession {other:?}"))),
    }
}

/// The database string for a profession tier.
pub const fn tier_to_db(value: ProfessionTier) -> &'static str {
    match value {
        ProfessionTier::Apprentice => "apprentice",
        ProfessionTier::Journeyman => "journeyman",
        ProfessionTier::Adept => "adept",
        ProfessionTier::Expert => "expert",
        ProfessionTier::Master => "master",
        ProfessionTier::Grandmaster => "grandmaster",
    }
}

/// Parse a profession tier from its database string.
pub fn tier_from_db(value: &str) -> Result<ProfessionTier, DbError> {
    match value {
        "apprentice" => Ok(ProfessionTier::Apprentice),
        "journeyman" => Ok(ProfessionTier::Journeyman),
        "adept" => Ok(ProfessionTier::Adept),
        "expert" => Ok(ProfessionTier::Expert),
        "master" => Ok(ProfessionTier::Master),
        "grandmaster" => Ok(ProfessionTier::Grandmaster),
        other => Err(DbError::Decode(format!("unknown tier {other:?}"))),
    }
}

/// The database string for a quality tier.
pub const fn quality_to_db(value: QualityTier) -> &'static str {
    match value {
        QualityTier::Poor => "poor",
        QualityTier::Common => "common",
        QualityTier::Fine => "fine",
        QualityTier::Superior => "superior",
        QualityTier::Exceptional => "exceptional",
        QualityTier::Legendary => "legendary",
    }
}

/// Parse a quality tier from its database string.
pub fn quality_from_db(value: &str) -> Result<QualityTier, DbError> {
    match value {
        "poor" => Ok(QualityTier::Poor),
        "common" => Ok(QualityTier::Common),
        "fine" => Ok(QualityTier::Fine),
        "superior" => Ok(QualityTier::Superior),
        "exceptional" => Ok(QualityTier::Exceptional),
        "legendary" => Ok(QualityTier::Legendary),
        other => Err(DbError::Decode(format!("unknown quality {other:?}"))),
    }
}

/// The database string for an item kind.
pub const fn item_to_db(value: ItemKind) -> &'static str {
    match value {
        ItemKind::IronOre => "iron_ore",
        ItemKind::Timber => "timber",
        ItemKind::Herbs => "herbs",
        ItemKind::Fish => "fish",
        ItemKind::Clay => "clay",
        ItemKind::Stone => "stone",
        ItemKind::IronIngot => "iron_ingot",
        ItemKind::Planks => "planks",
        ItemKind::Tincture => "tincture",
        ItemKind::Cloak => "cloak",
        ItemKind::Meal => "meal",
    }
}

/// Parse an item kind from its database string.
pub fn item_from_db(value: &str) -> Result<ItemKind, DbError> {
    match value {
        "iron_ore" => Ok(ItemKind::IronOre),
        "timber" => Ok(ItemKind::Timber),
        "herbs" => Ok(ItemKind::Herbs),
        "fish" => Ok(ItemKind::Fish),
        "clay" => Ok(ItemKind::Clay),
        "stone" => Ok(ItemKind::Stone),
        "iron_ingot" => Ok(ItemKind::IronIngot),
        "planks" => Ok(ItemKind::Planks),
        "tincture" => Ok(ItemKind::Tincture),
        "cloak" => Ok(ItemKind::Cloak),
        "meal" => Ok(ItemKind::Meal),
        other => Err(DbError::Decode(format!("unknown item {other:?}"))),
    }
}

/// The database string for a tool kind.
pub const fn tool_to_db(value: ToolKind) -> &'static str {
    match value {
        ToolKind::Pickaxe => "pickaxe",
        ToolKind::FellingAxe => "felling_axe",
        ToolKind::Sickle => "sickle",
        ToolKind::FishingRod => "fishing_rod",
        ToolKind::SmithingHammer => "smithing_hammer",
        ToolKind::Mortar => "mortar",
        ToolKind::Saw => "saw",
        ToolKind::NeedleSet => "needle_set",
    }
}

/// Parse a tool kind from its database string.
pub fn tool_from_db(value: &str) -> Result<ToolKind, DbError> {
    match value {
        "pickaxe" => Ok(ToolKind::Pickaxe),
        "felling_axe" => Ok(ToolKind::FellingAxe),
        "sickle" => Ok(ToolKind::Sickle),
        "fishing_rod" => Ok(ToolKind::FishingRod),
        "smithing_hammer" => Ok(ToolKind::SmithingHammer),
        "mortar" => Ok(ToolKind::Mortar),
        "saw" => Ok(ToolKind::Saw),
        "needle_set" => Ok(ToolKind::NeedleSet),
        other => Err(DbError::Decode(format!("unknown tool {other:?}"))),
    }
}

/// The database string for a biome.
pub const fn biome_to_db(value: Biome) -> &'static str {
    match value {
        Biome::Coast => "coast",
        Biome::Forest => "forest",
        Biome::Mountain => "mountain",
        Biome::Plains => "plains",
    }
}

/// Parse a biome from its database string.
pub fn biome_from_db(value: &str) -> Result<Biome, DbError> {
    match value {
        "coast" => Ok(Biome::Coast),
        "forest" => Ok(Biome::Forest),
        "mountain" => Ok(Biome::Mountain),
        "plains" => Ok(Biome::Plains),
        other => Err(DbError::Decode(format!("unknown biome {other:?}"))),
    }
}

/// The database string for a building kind.
pub const fn building_to_db(value: BuildingKind) -> &'static str {
    match value {
        BuildingKind::Cottage => "cottage",
        BuildingKind::Workshop => "workshop",
        BuildingKind::Forge => "forge",
        BuildingKind::Inn => "inn",
        BuildingKind::Warehouse => "warehouse",
        BuildingKind::Manor => "manor",
    }
}

/// Parse a building kind from its database string.
pub fn building_from_db(value: &str) -> Result<BuildingKind, DbError> {
    match value {
        "cottage" => Ok(BuildingKind::Cottage),
        "workshop" => Ok(BuildingKind::Workshop),
        "forge" => Ok(BuildingKind::Forge),
        "inn" => Ok(BuildingKind::Inn),
        "warehouse" => Ok(BuildingKind::Warehouse),
        "manor" => Ok(BuildingKind::Manor),
        other => Err(DbError::Decode(format!("unknown building kind {other:?}"))),
    }
}

/// The database string for an election phase.
pub const fn phase_to_db(value: ElectionPhase) -> &'static str {
    match value {
        ElectionPhase::Nominations => "nominations",
        ElectionPhase::Voting => "voting",
        ElectionPhase::Completed => "completed",
    }
}

/// Parse an election phase from its database string.
pub fn phase_from_db(value: &str) -> Result<ElectionPhase, DbError> {
    match value {
        "nominations" => Ok(ElectionPhase::Nominations),
        "voting" => Ok(ElectionPhase::Voting),
        "completed" => Ok(ElectionPhase::Completed),
        other => Err(DbError::Decode(format!("unknown election phase {other:?}"))),
    }
}

/// The database string for a law status.
pub const fn law_status_to_db(value: LawStatus) -> &'static str {
    match value {
        LawStatus::Proposed => "proposed",
        LawStatus::Active => "active",
        LawStatus::Rejected => "rejected",
        LawStatus::Expired => "expired",
    }
}

/// Parse a law status from its database string.
pub fn law_status_from_db(value: &str) -> Result<LawStatus, DbError> {
    match value {
        "proposed" => Ok(LawStatus::Proposed),
        "active" => Ok(LawStatus::Active),
        "rejected" => Ok(LawStatus::Rejected),
        "expired" => Ok(LawStatus::Expired),
        other => Err(DbError::Decode(format!("unknown law status {other:?}"))),
    }
}

/// The database string for an impeachment status.
pub const fn impeachment_status_to_db(value: ImpeachmentStatus) -> &'static str {
    match value {
        ImpeachmentStatus::Active => "active",
        ImpeachmentStatus::Passed => "passed",
        ImpeachmentStatus::Failed => "failed",
    }
}

/// Parse an impeachment status from its database string.
pub fn impeachment_status_from_db(value: &str) -> Result<ImpeachmentStatus, DbError> {
    match value {
        "active" => Ok(ImpeachmentStatus::Active),
        "passed" => Ok(ImpeachmentStatus::Passed),
        "failed" => Ok(ImpeachmentStatus::Failed),
        other => Err(DbError::Decode(format!(
            "unknown impeachment status {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_types_round_trip() {
        for action in ActionType::ALL {
            assert_eq!(action_type_from_db(action_type_to_db(action)).ok(), Some(action));
        }
    }

    #[test]
    fn unknown_strings_fail_to_decode() {
        assert!(action_type_from_db("loiter").is_err());
        assert!(race_from_db("gnome").is_err());
        assert!(item_from_db("mithril").is_err());
    }
}
