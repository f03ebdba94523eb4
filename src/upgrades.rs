//! Upgrade shop
//!
//! Coins collected in flight buy levels in three categories. Each level adds a
//! fixed fraction to the category's multiplier; costs grow geometrically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Upgrade categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Launch power
    Engine,
    /// Lift
    Wings,
    /// Drag reduction
    Fuselage,
}

/// Balance numbers for one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeParams {
    pub max_level: u32,
    pub base_cost: u64,
    pub cost_multiplier: f64,
    pub value_per_level: f64,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [
        UpgradeKind::Engine,
        UpgradeKind::Wings,
        UpgradeKind::Fuselage,
    ];

    /// Persistence key
    pub fn key(&self) -> &'static str {
        match self {
            UpgradeKind::Engine => "engine",
            UpgradeKind::Wings => "wings",
            UpgradeKind::Fuselage => "fuselage",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        match s {
            "engine" => Some(UpgradeKind::Engine),
            "wings" => Some(UpgradeKind::Wings),
            "fuselage" => Some(UpgradeKind::Fuselage),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UpgradeKind::Engine => "Engine",
            UpgradeKind::Wings => "Wings",
            UpgradeKind::Fuselage => "Fuselage",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UpgradeKind::Engine => "More launch power",
            UpgradeKind::Wings => "More lift",
            UpgradeKind::Fuselage => "Less air resistance",
        }
    }

    pub fn params(&self) -> UpgradeParams {
        match self {
            UpgradeKind::Engine => UpgradeParams {
                max_level: 10,
                base_cost: 100,
                cost_multiplier: 1.5,
                value_per_level: 0.15,
            },
            UpgradeKind::Wings => UpgradeParams {
                max_level: 10,
                base_cost: 100,
                cost_multiplier: 1.5,
                value_per_level: 0.12,
            },
            UpgradeKind::Fuselage => UpgradeParams {
                max_level: 10,
                base_cost: 100,
                cost_multiplier: 1.5,
                value_per_level: 0.1,
            },
        }
    }
}

/// Scalars applied to the plane: engine scales launch velocity, wings scale
/// lift, fuselage divides drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multipliers {
    pub engine: f64,
    pub wings: f64,
    pub fuselage: f64,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            engine: 1.0,
            wings: 1.0,
            fuselage: 1.0,
        }
    }
}

/// Persisted player progress: level per category plus the coin balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub levels: BTreeMap<String, u32>,
    pub currency: u64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            levels: UpgradeKind::ALL
                .iter()
                .map(|k| (k.key().to_string(), 1))
                .collect(),
            currency: 0,
        }
    }
}

impl Progress {
    /// Level of a category, clamped to [1, max_level]
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        self.levels
            .get(kind.key())
            .copied()
            .unwrap_or(1)
            .clamp(1, kind.params().max_level)
    }
}

/// UI-facing snapshot of one category
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeInfo {
    pub kind: UpgradeKind,
    pub level: u32,
    pub max_level: u32,
    /// None when maxed out
    pub cost: Option<u64>,
    pub can_upgrade: bool,
    pub multiplier: f64,
}

/// Levels and coin balance, with purchase rules
#[derive(Debug, Clone, Default)]
pub struct UpgradeShop {
    progress: Progress,
}

impl UpgradeShop {
    pub fn new(progress: Progress) -> Self {
        Self { progress }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn currency(&self) -> u64 {
        self.progress.currency
    }

    pub fn level(&self, kind: UpgradeKind) -> u32 {
        self.progress.level(kind)
    }

    pub fn add_currency(&mut self, amount: u64) {
        self.progress.currency = self.progress.currency.saturating_add(amount);
    }

    /// Price of the next level, or None at max level
    pub fn cost(&self, kind: UpgradeKind) -> Option<u64> {
        let params = kind.params();
        let level = self.level(kind);
        if level >= params.max_level {
            return None;
        }
        let cost = params.base_cost as f64 * params.cost_multiplier.powi(level as i32 - 1);
        Some(cost.floor() as u64)
    }

    pub fn can_upgrade(&self, kind: UpgradeKind) -> bool {
        self.cost(kind).is_some_and(|c| self.progress.currency >= c)
    }

    /// Buy the next level. Returns false (and changes nothing) if maxed out
    /// or not affordable.
    pub fn upgrade(&mut self, kind: UpgradeKind) -> bool {
        let Some(cost) = self.cost(kind) else {
            return false;
        };
        if self.progress.currency < cost {
            return false;
        }
        self.progress.currency -= cost;
        let level = self.level(kind) + 1;
        self.progress.levels.insert(kind.key().to_string(), level);
        log::info!("Upgraded {} to level {} for {}", kind.label(), level, cost);
        true
    }

    pub fn multiplier(&self, kind: UpgradeKind) -> f64 {
        1.0 + (self.level(kind) - 1) as f64 * kind.params().value_per_level
    }

    pub fn multipliers(&self) -> Multipliers {
        Multipliers {
            engine: self.multiplier(UpgradeKind::Engine),
            wings: self.multiplier(UpgradeKind::Wings),
            fuselage: self.multiplier(UpgradeKind::Fuselage),
        }
    }

    pub fn info(&self, kind: UpgradeKind) -> UpgradeInfo {
        UpgradeInfo {
            kind,
            level: self.level(kind),
            max_level: kind.params().max_level,
            cost: self.cost(kind),
            can_upgrade: self.can_upgrade(kind),
            multiplier: self.multiplier(kind),
        }
    }
}
