//! Configuration descriptor
//!
//! An explicit description of the settings tree: for every field its kind,
//! default, bound and display metadata. Form renderers, documentation and
//! the loader's unknown-key check all read this instead of the structs.
//!
//! Defaults are read from the section `Default` impls, so the two cannot
//! drift apart.

use std::fmt;

use serde::Serialize;

use crate::config::schema::{
    DataCollection, DataModel, GlitchArmor, GlitchArmorCosts, LootFabricator, MatterCondenser,
    SystemGlitch, Trial, TrialAffix,
};
use crate::config::validation::FieldValue;

/// Identifier the settings are registered under.
pub const MOD_ID: &str = "dml-refabricated";

// ============================================================================
// Descriptor types
// ============================================================================

/// Value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Integer,
    Float,
    Boolean,
}

/// Constraint the post-load validator enforces on a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Bound {
    /// Any value is kept.
    Unbounded,
    /// Floored at a constant.
    AtLeast(FieldValue),
    /// Floored at another, already repaired field of the same section.
    AtLeastField(&'static str),
    /// Clamped to `[0, 1]`.
    UnitInterval,
    /// Reset to another field when below `below`.
    ResetTo {
        /// Field whose value triggers the reset when exceeded
        below: &'static str,
        /// Field whose value is assigned on reset
        target: &'static str,
    },
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        })
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => Ok(()),
            Self::AtLeast(value) => write!(f, ">= {value}"),
            Self::AtLeastField(field) => write!(f, ">= {field}"),
            Self::UnitInterval => f.write_str("0..=1"),
            Self::ResetTo { below, target } => write!(f, "reset to {target} if < {below}"),
        }
    }
}

/// How a section is laid out by a form renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layout {
    /// Fields are shown inline in the parent's category.
    Transitive,
    /// Fields are shown in a collapsible group.
    Collapsible {
        /// Whether the group starts expanded
        start_expanded: bool,
    },
}

/// Description of one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Persisted key
    pub key: &'static str,
    pub kind: FieldKind,
    pub default: FieldValue,
    pub bound: Bound,
    /// Whether the renderer should show a tooltip
    pub tooltip: bool,
}

/// Description of one section and its nested subsections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionDescriptor {
    /// Persisted key
    pub key: &'static str,
    /// Display category the section appears under
    pub category: &'static str,
    pub layout: Layout,
    pub tooltip: bool,
    pub fields: Vec<FieldDescriptor>,
    pub subsections: Vec<SectionDescriptor>,
}

impl SectionDescriptor {
    fn new(key: &'static str, category: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            key,
            category,
            layout: Layout::Transitive,
            tooltip: false,
            fields,
            subsections: Vec::new(),
        }
    }

    /// Looks up a field by persisted key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Looks up a nested subsection by persisted key.
    #[must_use]
    pub fn subsection(&self, key: &str) -> Option<&Self> {
        self.subsections.iter().find(|s| s.key == key)
    }

    /// All keys valid directly inside this section.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .map(|f| f.key)
            .chain(self.subsections.iter().map(|s| s.key))
    }

    /// Translation key of the section's category heading.
    #[must_use]
    pub fn category_translation_key(&self) -> String {
        format!("text.autoconfig.{MOD_ID}.category.{}", self.category)
    }
}

/// Translation key of the option at `path` (dotted, e.g. `trial.arenaRadius`).
#[must_use]
pub fn option_translation_key(path: &str) -> String {
    format!("text.autoconfig.{MOD_ID}.option.{path}")
}

/// Translation key of the tooltip for the option at `path`.
#[must_use]
pub fn tooltip_translation_key(path: &str) -> String {
    format!("{}.@Tooltip", option_translation_key(path))
}

// ============================================================================
// Field constructors
// ============================================================================

fn int(key: &'static str, default: i32, bound: Bound) -> FieldDescriptor {
    FieldDescriptor {
        key,
        kind: FieldKind::Integer,
        default: default.into(),
        bound,
        tooltip: false,
    }
}

fn float(key: &'static str, default: f32, bound: Bound) -> FieldDescriptor {
    FieldDescriptor {
        key,
        kind: FieldKind::Float,
        default: default.into(),
        bound,
        tooltip: false,
    }
}

fn flag(key: &'static str, default: bool) -> FieldDescriptor {
    FieldDescriptor {
        key,
        kind: FieldKind::Boolean,
        default: default.into(),
        bound: Bound::Unbounded,
        tooltip: false,
    }
}

fn at_least(value: impl Into<FieldValue>) -> Bound {
    Bound::AtLeast(value.into())
}

fn with_tooltip(mut field: FieldDescriptor) -> FieldDescriptor {
    field.tooltip = true;
    field
}

// ============================================================================
// The tree
// ============================================================================

/// Describes every section of the settings tree, in persisted order.
#[must_use]
pub fn describe() -> Vec<SectionDescriptor> {
    vec![
        trial(),
        loot_fabricator(),
        data_model(),
        system_glitch(),
        data_collection(),
        affix(),
        matter_condenser(),
        glitch_armor(),
    ]
}

/// Looks up a top-level section by persisted key.
#[must_use]
pub fn find_section(key: &str) -> Option<SectionDescriptor> {
    describe().into_iter().find(|s| s.key == key)
}

fn trial() -> SectionDescriptor {
    let d = Trial::default();
    SectionDescriptor::new("trial", "trial", vec![
        int("maxMobsInArena", d.max_mobs_in_arena, at_least(0)),
        int("postEndTimeout", d.post_end_timeout, at_least(0)),
        int("arenaRadius", d.arena_radius, at_least(1)),
        int("warmupTime", d.warmup_time, Bound::AtLeastField("maxTime")),
        int("maxTime", d.max_time, at_least(0)),
        flag("allowStartInWrongTerrain", d.allow_start_in_wrong_terrain),
        flag("allowPlayersLeavingArena", d.allow_players_leaving_arena),
        flag("allowMobsLeavingArena", d.allow_mobs_leaving_arena),
        flag("buildGriefPrevention", d.build_grief_prevention),
        flag("interactGriefPrevention", d.interact_grief_prevention),
        flag("explosionGriefPrevention", d.explosion_grief_prevention),
        flag("trialKeyConsume", d.trial_key_consume),
        flag("trialKeyReturnIfSucceed", d.trial_key_return_if_succeed),
    ])
}

fn loot_fabricator() -> SectionDescriptor {
    let d = LootFabricator::default();
    SectionDescriptor::new("lootFabricator", "loot_fabricator", vec![
        int("pristineExchangeRate", d.pristine_exchange_rate, at_least(0)),
        int("processTime", d.process_time, at_least(0)),
    ])
}

fn data_model() -> SectionDescriptor {
    let d = DataModel::default();
    SectionDescriptor::new("dataModel", "data_model", vec![
        int("basicDataRequired", d.basic_data_required, at_least(1)),
        int(
            "advancedDataRequired",
            d.advanced_data_required,
            Bound::AtLeastField("basicDataRequired"),
        ),
        int("superiorDataRequired", d.superior_data_required, Bound::ResetTo {
            below: "advancedDataRequired",
            target: "basicDataRequired",
        }),
        int(
            "selfAwareDataRequired",
            d.self_aware_data_required,
            Bound::AtLeastField("advancedDataRequired"),
        ),
    ])
}

fn system_glitch() -> SectionDescriptor {
    let d = SystemGlitch::default();
    SectionDescriptor::new("systemGlitch", "system_glitch", vec![
        float("teleportChance", d.teleport_chance, Bound::UnitInterval),
        int("teleportMinDistance", d.teleport_min_distance, at_least(0)),
        int("teleportDelay", d.teleport_delay, at_least(0)),
        int(
            "teleportAroundPlayerRadius",
            d.teleport_around_player_radius,
            at_least(1),
        ),
        with_tooltip(float("damageLimiter", d.damage_limiter, at_least(0.0_f32))),
    ])
}

fn data_collection() -> SectionDescriptor {
    let d = DataCollection::default();
    SectionDescriptor::new("dataCollection", "data_collection", vec![int(
        "baseDataGainPerKill",
        d.base_data_gain_per_kill,
        Bound::Unbounded,
    )])
}

fn affix() -> SectionDescriptor {
    let d = TrialAffix::default();
    SectionDescriptor::new("affix", "affix", vec![
        int("maxAffixesInKey", d.max_affixes_in_key, at_least(0)),
        flag("enableMobStrength", d.enable_mob_strength),
        flag("enableMobSpeed", d.enable_mob_speed),
        flag("enableMobResistance", d.enable_mob_resistance),
        flag("enableThunderstorm", d.enable_thunderstorm),
        flag("enablePartyPoison", d.enable_party_poison),
        float(
            "thunderstormBoltChance",
            d.thunderstorm_bolt_chance,
            Bound::UnitInterval,
        ),
        float("partyPoisonChance", d.party_poison_chance, Bound::UnitInterval),
    ])
}

fn matter_condenser() -> SectionDescriptor {
    let d = MatterCondenser::default();
    SectionDescriptor::new("matterCondenser", "matter_condenser", vec![int(
        "processTime",
        d.process_time,
        at_least(1),
    )])
}

fn glitch_armor() -> SectionDescriptor {
    let d = GlitchArmor::default();
    let mut section = SectionDescriptor::new("glitchArmor", "glitch_armor", vec![
        int("dataAmountToBasic", d.data_amount_to_basic, at_least(0)),
        int(
            "dataAmountToAdvanced",
            d.data_amount_to_advanced,
            Bound::AtLeastField("dataAmountToBasic"),
        ),
        int(
            "dataAmountToSuperior",
            d.data_amount_to_superior,
            Bound::AtLeastField("dataAmountToAdvanced"),
        ),
        int(
            "dataAmountToSelfAware",
            d.data_amount_to_self_aware,
            Bound::AtLeastField("dataAmountToSuperior"),
        ),
        int("soulVisionRange", d.soul_vision_range, Bound::Unbounded),
        int(
            "maxFlightTicksPerLevel",
            d.max_flight_ticks_per_level,
            Bound::Unbounded,
        ),
        int("undyingCooldownTime", d.undying_cooldown_time, Bound::Unbounded),
    ]);
    section.subsections.push(glitch_armor_costs(&d.costs));
    section
}

fn glitch_armor_costs(c: &GlitchArmorCosts) -> SectionDescriptor {
    let cost = |key, default| float(key, default, Bound::Unbounded);
    let mut section = SectionDescriptor::new("costs", "glitch_armor", vec![
        cost("fireProtection", c.fire_protection),
        cost("autoExtinguish", c.auto_extinguish),
        cost("featherFalling", c.feather_falling),
        cost("fireImmunity", c.fire_immunity),
        cost("jumpBoost", c.jump_boost),
        cost("plenty", c.plenty),
        cost("unrottenFlesh", c.unrotten_flesh),
        cost("rotResistance", c.rot_resistance),
        cost("zombieFriendly", c.zombie_friendly),
        cost("archery", c.archery),
        cost("skeletonFriendly", c.skeleton_friendly),
        cost("fallImmunity", c.fall_immunity),
        cost("endermenProofVision", c.endermen_proof_vision),
        cost("shulkerFriendly", c.shulker_friendly),
        cost("teleports", c.teleports),
        cost("soulVision", c.soul_vision),
        cost("nightVision", c.night_vision),
        cost("fly", c.fly),
        cost("underwaterHaste", c.underwater_haste),
        cost("depthStrider", c.depth_strider),
        cost("waterBreathing", c.water_breathing),
        cost("poseidonBless", c.poseidon_bless),
        cost("resistance", c.resistance),
        cost("undying", c.undying),
    ]);
    section.layout = Layout::Collapsible {
        start_expanded: true,
    };
    section.tooltip = true;
    section
}

// ============================================================================
// Tests
// ============================================================================
