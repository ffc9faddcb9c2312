//! Configuration schema types
//!
//! The settings tree for Deep Mob Learning: Refabricated. Every section is a
//! flat set of numeric and boolean values with a documented default; keys
//! missing from a file keep their default. Persisted keys are camelCase.

use serde::{Deserialize, Serialize};

// ============================================================================
// Root
// ============================================================================

/// Root of the settings tree.
///
/// Owns one value per section. Sections never reference each other; the
/// only cross-section behavior is the root's post-load cascade
/// (see [`crate::config::validation`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigRoot {
    /// Trial arena settings
    pub trial: Trial,

    /// Loot Fabricator machine settings
    pub loot_fabricator: LootFabricator,

    /// Data model tier thresholds
    pub data_model: DataModel,

    /// System Glitch boss settings
    pub system_glitch: SystemGlitch,

    /// Data collection settings
    pub data_collection: DataCollection,

    /// Trial affix settings
    pub affix: TrialAffix,

    /// Matter Condenser machine settings
    pub matter_condenser: MatterCondenser,

    /// Glitch Armor upgrade and ability settings
    pub glitch_armor: GlitchArmor,
}

// ============================================================================
// Trial
// ============================================================================

/// Trial arena rules.
///
/// Times are in game ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Trial {
    pub max_mobs_in_arena: i32,
    pub post_end_timeout: i32,
    pub arena_radius: i32,
    pub warmup_time: i32,
    pub max_time: i32,

    pub allow_start_in_wrong_terrain: bool,
    pub allow_players_leaving_arena: bool,
    pub allow_mobs_leaving_arena: bool,
    pub build_grief_prevention: bool,
    pub interact_grief_prevention: bool,
    pub explosion_grief_prevention: bool,

    pub trial_key_consume: bool,
    pub trial_key_return_if_succeed: bool,
}

impl Default for Trial {
    fn default() -> Self {
        Self {
            max_mobs_in_arena: 8,
            post_end_timeout: 60,
            arena_radius: 12,
            warmup_time: 60,
            max_time: 24000,
            allow_start_in_wrong_terrain: false,
            allow_players_leaving_arena: false,
            allow_mobs_leaving_arena: false,
            build_grief_prevention: true,
            interact_grief_prevention: true,
            explosion_grief_prevention: true,
            trial_key_consume: true,
            trial_key_return_if_succeed: true,
        }
    }
}

// ============================================================================
// Trial Affix
// ============================================================================

/// Affixes that can be rolled onto a trial key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct TrialAffix {
    pub max_affixes_in_key: i32,
    pub enable_mob_strength: bool,
    pub enable_mob_speed: bool,
    pub enable_mob_resistance: bool,
    pub enable_thunderstorm: bool,
    pub enable_party_poison: bool,

    /// Per-tick chance of a lightning bolt while the thunderstorm affix is active
    pub thunderstorm_bolt_chance: f32,

    /// Per-tick chance of poisoning the party while the party poison affix is active
    pub party_poison_chance: f32,
}

impl Default for TrialAffix {
    fn default() -> Self {
        Self {
            max_affixes_in_key: 3,
            enable_mob_strength: true,
            enable_mob_speed: true,
            enable_mob_resistance: true,
            enable_thunderstorm: true,
            enable_party_poison: true,
            thunderstorm_bolt_chance: 0.05,
            party_poison_chance: 0.005,
        }
    }
}

// ============================================================================
// Loot Fabricator
// ============================================================================

/// Loot Fabricator: turns pristine matter into loot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LootFabricator {
    /// Pristine matter consumed per fabricated stack
    pub pristine_exchange_rate: i32,

    /// Ticks per fabrication
    pub process_time: i32,
}

impl Default for LootFabricator {
    fn default() -> Self {
        Self {
            pristine_exchange_rate: 16,
            process_time: 200,
        }
    }
}

// ============================================================================
// Data Model
// ============================================================================

/// Data required to reach each data model tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataModel {
    pub basic_data_required: i32,
    pub advanced_data_required: i32,
    pub superior_data_required: i32,
    pub self_aware_data_required: i32,
}

impl Default for DataModel {
    fn default() -> Self {
        Self {
            basic_data_required: 8,
            advanced_data_required: 16,
            superior_data_required: 32,
            self_aware_data_required: 64,
        }
    }
}

// ============================================================================
// System Glitch
// ============================================================================

/// System Glitch: the entity that haunts trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemGlitch {
    pub teleport_chance: f32,
    pub teleport_min_distance: i32,
    pub teleport_delay: i32,
    pub teleport_around_player_radius: i32,

    /// Maximum damage taken from a single hit
    pub damage_limiter: f32,
}

impl Default for SystemGlitch {
    fn default() -> Self {
        Self {
            teleport_chance: 0.05,
            teleport_min_distance: 5,
            teleport_delay: 100,
            teleport_around_player_radius: 2,
            damage_limiter: 20.0,
        }
    }
}

// ============================================================================
// Data Collection
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataCollection {
    pub base_data_gain_per_kill: i32,
}

impl Default for DataCollection {
    fn default() -> Self {
        Self {
            base_data_gain_per_kill: 1,
        }
    }
}

// ============================================================================
// Matter Condenser
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatterCondenser {
    /// Ticks per condensing operation
    pub process_time: i32,
}

impl Default for MatterCondenser {
    fn default() -> Self {
        Self { process_time: 40 }
    }
}

// ============================================================================
// Glitch Armor
// ============================================================================

/// Glitch Armor upgrade thresholds and ability tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlitchArmor {
    pub data_amount_to_basic: i32,
    pub data_amount_to_advanced: i32,
    pub data_amount_to_superior: i32,
    pub data_amount_to_self_aware: i32,
    pub soul_vision_range: i32,
    pub max_flight_ticks_per_level: i32,
    pub undying_cooldown_time: i32,

    /// Data consumed per use of each armor ability
    pub costs: GlitchArmorCosts,
}

impl Default for GlitchArmor {
    fn default() -> Self {
        Self {
            data_amount_to_basic: 32,
            data_amount_to_advanced: 96,
            data_amount_to_superior: 192,
            data_amount_to_self_aware: 384,
            soul_vision_range: 12,
            max_flight_ticks_per_level: 30 * 20,
            undying_cooldown_time: 36000,
            costs: GlitchArmorCosts::default(),
        }
    }
}

/// Data cost of each Glitch Armor ability, per activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlitchArmorCosts {
    pub fire_protection: f32,
    pub auto_extinguish: f32,
    pub feather_falling: f32,
    pub fire_immunity: f32,
    pub jump_boost: f32,
    pub plenty: f32,
    pub unrotten_flesh: f32,
    pub rot_resistance: f32,
    pub zombie_friendly: f32,
    pub archery: f32,
    pub skeleton_friendly: f32,
    pub fall_immunity: f32,
    pub endermen_proof_vision: f32,
    pub shulker_friendly: f32,
    pub teleports: f32,
    pub soul_vision: f32,
    pub night_vision: f32,
    pub fly: f32,
    pub underwater_haste: f32,
    pub depth_strider: f32,
    pub water_breathing: f32,
    pub poseidon_bless: f32,
    pub resistance: f32,
    pub undying: f32,
}

impl Default for GlitchArmorCosts {
    fn default() -> Self {
        Self {
            fire_protection: 1.0,
            auto_extinguish: 4.0,
            feather_falling: 3.0,
            fire_immunity: 1.0,
            jump_boost: 0.0075,
            plenty: 1.0,
            unrotten_flesh: 0.5,
            rot_resistance: 0.5,
            zombie_friendly: 0.1,
            archery: 0.5,
            skeleton_friendly: 0.1,
            fall_immunity: 1.0,
            endermen_proof_vision: 1.0,
            shulker_friendly: 0.2,
            teleports: 1.5,
            soul_vision: 8.0,
            night_vision: 0.005,
            fly: 0.05,
            underwater_haste: 0.01,
            depth_strider: 0.01,
            water_breathing: 0.01,
            poseidon_bless: 0.015,
            resistance: 0.3,
            undying: 8.0,
        }
    }
}

impl GlitchArmorCosts {
    /// Every multiplier with its persisted key.
    pub fn entries_mut(&mut self) -> [(&'static str, &mut f32); 24] {
        [
            ("fireProtection", &mut self.fire_protection),
            ("autoExtinguish", &mut self.auto_extinguish),
            ("featherFalling", &mut self.feather_falling),
            ("fireImmunity", &mut self.fire_immunity),
            ("jumpBoost", &mut self.jump_boost),
            ("plenty", &mut self.plenty),
            ("unrottenFlesh", &mut self.unrotten_flesh),
            ("rotResistance", &mut self.rot_resistance),
            ("zombieFriendly", &mut self.zombie_friendly),
            ("archery", &mut self.archery),
            ("skeletonFriendly", &mut self.skeleton_friendly),
            ("fallImmunity", &mut self.fall_immunity),
            ("endermenProofVision", &mut self.endermen_proof_vision),
            ("shulkerFriendly", &mut self.shulker_friendly),
            ("teleports", &mut self.teleports),
            ("soulVision", &mut self.soul_vision),
            ("nightVision", &mut self.night_vision),
            ("fly", &mut self.fly),
            ("underwaterHaste", &mut self.underwater_haste),
            ("depthStrider", &mut self.depth_strider),
            ("waterBreathing", &mut self.water_breathing),
            ("poseidonBless", &mut self.poseidon_bless),
            ("resistance", &mut self.resistance),
            ("undying", &mut self.undying),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================
