//! Post-load validation
//!
//! Every section repairs its own out-of-range values after it has been
//! populated from disk. Nothing here can fail: a bad value is clamped or
//! floored, never rejected. Repairs are recorded in a [`RepairLog`] so
//! callers can tell whether their input was honored verbatim.
//!
//! Ordering inside a validator matters where one field's floor is another
//! field: the dependency is always repaired first.

use std::fmt;

use serde::Serialize;

use crate::config::schema::{
    ConfigRoot, DataModel, GlitchArmor, LootFabricator, MatterCondenser, SystemGlitch, Trial,
    TrialAffix,
};

// ============================================================================
// Values and repairs
// ============================================================================

/// A scalar setting value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i32),
    Float(f32),
    Boolean(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
        }
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// One value changed by a validator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Repair {
    /// Dotted path of the field, e.g. `trial.arenaRadius`
    pub path: String,
    /// Value as loaded
    pub from: FieldValue,
    /// Value after repair
    pub to: FieldValue,
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.path, self.from, self.to)
    }
}

/// Collects repairs made during one validation pass.
#[derive(Debug, Default)]
pub struct RepairLog {
    repairs: Vec<Repair>,
}

impl RepairLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a recorder that prefixes field names with `section`.
    pub fn section(&mut self, section: &'static str) -> SectionRepairs<'_> {
        SectionRepairs { log: self, section }
    }

    #[must_use]
    pub fn repairs(&self) -> &[Repair] {
        &self.repairs
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repairs.is_empty()
    }

    #[must_use]
    pub fn into_repairs(self) -> Vec<Repair> {
        self.repairs
    }

    fn record(&mut self, section: &str, field: &str, from: FieldValue, to: FieldValue) {
        let path = format!("{section}.{field}");
        tracing::debug!(field = %path, %from, %to, "repaired out-of-range value");
        self.repairs.push(Repair { path, from, to });
    }
}

/// Repair primitives scoped to one section.
pub struct SectionRepairs<'a> {
    log: &'a mut RepairLog,
    section: &'static str,
}

impl SectionRepairs<'_> {
    /// `value = max(lower, value)`. NaN is repaired to `lower`, an
    /// infinite float to the largest finite value.
    pub fn floor<T: Scalar>(&mut self, field: &'static str, value: &mut T, lower: T) {
        if (*value).is_nan() || *value < lower {
            self.set(field, value, lower);
        } else {
            let finite = (*value).saturate();
            self.set(field, value, finite);
        }
    }

    /// Keeps an unbounded float serializable: infinities become the finite
    /// extremes and NaN becomes 0.
    pub fn finite(&mut self, field: &'static str, value: &mut f32) {
        if value.is_nan() {
            self.set(field, value, 0.0);
        } else {
            let finite = value.saturate();
            self.set(field, value, finite);
        }
    }

    /// `value = max(0, min(1, value))`. NaN is repaired to 0.
    pub fn unit_interval(&mut self, field: &'static str, value: &mut f32) {
        if value.is_nan() || *value < 0.0 {
            self.set(field, value, 0.0);
        } else if *value > 1.0 {
            self.set(field, value, 1.0);
        }
    }

    /// Replaces `value` with `to`, recording the change if there is one.
    pub fn set<T: Scalar>(&mut self, field: &'static str, value: &mut T, to: T) {
        if *value == to {
            return;
        }
        self.log
            .record(self.section, field, (*value).into(), to.into());
        *value = to;
    }
}

/// Numeric types the repair primitives operate on.
pub trait Scalar: Copy + PartialOrd + Into<FieldValue> {
    fn is_nan(self) -> bool {
        false
    }

    /// Nearest value the persisted formats can represent.
    #[must_use]
    fn saturate(self) -> Self {
        self
    }
}

impl Scalar for i32 {}

impl Scalar for f32 {
    fn is_nan(self) -> bool {
        Self::is_nan(self)
    }

    fn saturate(self) -> Self {
        self.clamp(Self::MIN, Self::MAX)
    }
}

// ============================================================================
// PostLoad
// ============================================================================

/// Post-load normalization of a settings section.
pub trait PostLoad {
    /// Repairs every out-of-range field in place, recording each change.
    fn repair(&mut self, log: &mut RepairLog);

    /// Repairs every out-of-range field in place.
    fn validate_post_load(&mut self) {
        self.repair(&mut RepairLog::new());
    }

    /// Repairs in place and returns what changed.
    fn normalize(&mut self) -> Vec<Repair> {
        let mut log = RepairLog::new();
        self.repair(&mut log);
        log.into_repairs()
    }
}

impl PostLoad for ConfigRoot {
    /// Cascades into every section that declares invariants, in a fixed order.
    /// `dataCollection` has none.
    fn repair(&mut self, log: &mut RepairLog) {
        self.trial.repair(log);
        self.loot_fabricator.repair(log);
        self.data_model.repair(log);
        self.affix.repair(log);
        self.matter_condenser.repair(log);
        self.glitch_armor.repair(log);
        self.system_glitch.repair(log);
    }
}

impl PostLoad for Trial {
    fn repair(&mut self, log: &mut RepairLog) {
        let mut s = log.section("trial");
        s.floor("maxTime", &mut self.max_time, 0);
        let max_time = self.max_time;
        s.floor("warmupTime", &mut self.warmup_time, max_time);
        s.floor("maxMobsInArena", &mut self.max_mobs_in_arena, 0);
        s.floor("postEndTimeout", &mut self.post_end_timeout, 0);
        s.floor("arenaRadius", &mut self.arena_radius, 1);
    }
}

impl PostLoad for TrialAffix {
    fn repair(&mut self, log: &mut RepairLog) {
        let mut s = log.section("affix");
        s.floor("maxAffixesInKey", &mut self.max_affixes_in_key, 0);
        s.unit_interval("thunderstormBoltChance", &mut self.thunderstorm_bolt_chance);
        s.unit_interval("partyPoisonChance", &mut self.party_poison_chance);
    }
}

impl PostLoad for LootFabricator {
    fn repair(&mut self, log: &mut RepairLog) {
        let mut s = log.section("lootFabricator");
        s.floor("pristineExchangeRate", &mut self.pristine_exchange_rate, 0);
        s.floor("processTime", &mut self.process_time, 0);
    }
}

impl PostLoad for DataModel {
    /// Note: a `superiorDataRequired` below the advanced tier is reset to the
    /// *basic* tier. Saved configurations depend on this.
    fn repair(&mut self, log: &mut RepairLog) {
        let mut s = log.section("dataModel");
        s.floor("basicDataRequired", &mut self.basic_data_required, 1);
        let basic = self.basic_data_required;
        s.floor("advancedDataRequired", &mut self.advanced_data_required, basic);
        let advanced = self.advanced_data_required;
        if self.superior_data_required < advanced {
            s.set("superiorDataRequired", &mut self.superior_data_required, basic);
        }
        s.floor("selfAwareDataRequired", &mut self.self_aware_data_required, advanced);
    }
}

impl PostLoad for SystemGlitch {
    fn repair(&mut self, log: &mut RepairLog) {
        let mut s = log.section("systemGlitch");
        s.unit_interval("teleportChance", &mut self.teleport_chance);
        s.floor("teleportMinDistance", &mut self.teleport_min_distance, 0);
        s.floor("teleportDelay", &mut self.teleport_delay, 0);
        s.floor(
            "teleportAroundPlayerRadius",
            &mut self.teleport_around_player_radius,
            1,
        );
        s.floor("damageLimiter", &mut self.damage_limiter, 0.0);
    }
}

impl PostLoad for MatterCondenser {
    fn repair(&mut self, log: &mut RepairLog) {
        log.section("matterCondenser")
            .floor("processTime", &mut self.process_time, 1);
    }
}

impl PostLoad for GlitchArmor {
    fn repair(&mut self, log: &mut RepairLog) {
        let mut s = log.section("glitchArmor");
        s.floor("dataAmountToBasic", &mut self.data_amount_to_basic, 0);
        let basic = self.data_amount_to_basic;
        s.floor("dataAmountToAdvanced", &mut self.data_amount_to_advanced, basic);
        let advanced = self.data_amount_to_advanced;
        s.floor("dataAmountToSuperior", &mut self.data_amount_to_superior, advanced);
        let superior = self.data_amount_to_superior;
        s.floor("dataAmountToSelfAware", &mut self.data_amount_to_self_aware, superior);

        let mut costs = log.section("glitchArmor.costs");
        for (key, value) in self.costs.entries_mut() {
            costs.finite(key, value);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
