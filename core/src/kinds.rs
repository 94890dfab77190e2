//! Authored enemy and tower parameters.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kinds of enemies that walk the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fragile, quick shadow creature.
    Schattenwesen,
    /// Armored, slow and rewarding.
    Daemon,
    /// The fast, lightly armored corrupted.
    Verderbte,
    /// Heavily armored fallen.
    Gefallene,
    /// Fastest kind, no armor.
    Huellen,
    /// Slowest kind with heavy armor.
    Untote,
}

/// Stats attached to an enemy kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Health at spawn.
    pub max_health: u32,
    /// Distance travelled per tick at full speed.
    pub speed: f32,
    /// Flat damage mitigation per hit.
    pub armor: u32,
    /// Gold paid out on death.
    pub gold_reward: u32,
    /// Score paid out on death.
    pub score_reward: u32,
    /// Lives removed when the enemy reaches the end of the path.
    pub damage_to_base: u32,
}

impl EnemyKind {
    /// Every enemy kind in catalog order.
    pub const ALL: [EnemyKind; 6] = [
        Self::Schattenwesen,
        Self::Daemon,
        Self::Verderbte,
        Self::Gefallene,
        Self::Huellen,
        Self::Untote,
    ];

    /// Returns the authored stats for the kind.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Schattenwesen => EnemyStats {
                max_health: 50,
                speed: 0.08,
                armor: 0,
                gold_reward: 10,
                score_reward: 10,
                damage_to_base: 1,
            },
            Self::Daemon => EnemyStats {
                max_health: 100,
                speed: 0.06,
                armor: 5,
                gold_reward: 20,
                score_reward: 25,
                damage_to_base: 2,
            },
            Self::Verderbte => EnemyStats {
                max_health: 80,
                speed: 0.1,
                armor: 2,
                gold_reward: 15,
                score_reward: 15,
                damage_to_base: 1,
            },
            Self::Gefallene => EnemyStats {
                max_health: 150,
                speed: 0.05,
                armor: 10,
                gold_reward: 30,
                score_reward: 40,
                damage_to_base: 3,
            },
            Self::Huellen => EnemyStats {
                max_health: 60,
                speed: 0.12,
                armor: 0,
                gold_reward: 12,
                score_reward: 12,
                damage_to_base: 1,
            },
            Self::Untote => EnemyStats {
                max_health: 120,
                speed: 0.04,
                armor: 8,
                gold_reward: 25,
                score_reward: 30,
                damage_to_base: 2,
            },
        }
    }

    /// Display name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Schattenwesen => "Schattenwesen",
            Self::Daemon => "Dämon",
            Self::Verderbte => "Verderbte",
            Self::Gefallene => "Gefallene",
            Self::Huellen => "Hüllen",
            Self::Untote => "Untote",
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TowerKind {
    /// Slows the target and enemies around it.
    WaterWind,
    /// Slow, heavy single-target projectiles.
    Fire,
    /// Instant short-range strikes at a high rate.
    Melee,
    /// Strong slow on the target, weaker slow around it.
    Illusion,
}

/// Purchase and combat parameters of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Gold required to place the tower.
    pub cost: u32,
    /// Damage dealt per attack before armor.
    pub damage: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Attacks per second.
    pub attacks_per_second: f32,
    /// Gold refunded when the tower is sold.
    pub sell_value: u32,
}

impl TowerStats {
    /// Seconds between consecutive attacks.
    #[must_use]
    pub fn attack_interval(&self) -> f32 {
        1.0 / self.attacks_per_second
    }
}

/// Temporary speed reduction applied to an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlowEffect {
    /// Fraction of speed removed, in `[0, 1)`.
    pub fraction: f32,
    /// Time until the enemy reverts to full speed.
    pub duration: Duration,
}

impl SlowEffect {
    /// Creates a slow removing `fraction` of speed for `duration_ms` milliseconds.
    #[must_use]
    pub const fn new(fraction: f32, duration_ms: u64) -> Self {
        Self {
            fraction,
            duration: Duration::from_millis(duration_ms),
        }
    }

    /// Speed multiplier the effect imposes on its own.
    #[must_use]
    pub fn multiplier(&self) -> f32 {
        1.0 - self.fraction
    }
}

/// Slow applied on impact to the target and to enemies around it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlowAura {
    /// Slow applied to the enemy that was hit.
    pub target: SlowEffect,
    /// Slow applied to other live enemies inside `radius`.
    pub splash: SlowEffect,
    /// Radius around the target in world units.
    pub radius: f32,
}

/// How a tower delivers its damage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttackStyle {
    /// Fires a homing projectile.
    Projectile {
        /// Distance the projectile travels per tick.
        speed: f32,
        /// Side effect resolved when the projectile hits.
        on_hit: Option<SlowAura>,
    },
    /// Damages the target instantly.
    Melee,
}

impl TowerKind {
    /// Every tower kind in hotkey order.
    pub const ALL: [TowerKind; 4] = [Self::WaterWind, Self::Fire, Self::Melee, Self::Illusion];

    /// Returns the authored stats for the kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::WaterWind => TowerStats {
                cost: 100,
                damage: 10,
                range: 8.0,
                attacks_per_second: 1.0,
                sell_value: 75,
            },
            Self::Fire => TowerStats {
                cost: 150,
                damage: 40,
                range: 6.0,
                attacks_per_second: 0.5,
                sell_value: 110,
            },
            Self::Melee => TowerStats {
                cost: 80,
                damage: 15,
                range: 3.0,
                attacks_per_second: 2.0,
                sell_value: 60,
            },
            Self::Illusion => TowerStats {
                cost: 120,
                damage: 5,
                range: 7.0,
                attacks_per_second: 0.8,
                sell_value: 90,
            },
        }
    }

    /// Returns the attack delivery of the kind.
    #[must_use]
    pub const fn attack_style(self) -> AttackStyle {
        match self {
            Self::WaterWind => AttackStyle::Projectile {
                speed: 0.5,
                on_hit: Some(SlowAura {
                    target: SlowEffect::new(0.5, 2000),
                    splash: SlowEffect::new(0.25, 2000),
                    radius: 3.0,
                }),
            },
            Self::Fire => AttackStyle::Projectile {
                speed: 0.3,
                on_hit: None,
            },
            Self::Melee => AttackStyle::Melee,
            Self::Illusion => AttackStyle::Projectile {
                speed: 0.5,
                on_hit: Some(SlowAura {
                    target: SlowEffect::new(0.7, 3000),
                    splash: SlowEffect::new(0.3, 3000),
                    radius: 4.0,
                }),
            },
        }
    }

    /// Canonical lowercase name used by configuration files and flags.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::WaterWind => "water-wind",
            Self::Fire => "fire",
            Self::Melee => "melee",
            Self::Illusion => "illusion",
        }
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A tower kind name did not match any known kind.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown tower kind `{0}`")]
pub struct UnknownTowerKind(pub String);

impl FromStr for TowerKind {
    type Err = UnknownTowerKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "water-wind" | "water" | "wind" => Ok(Self::WaterWind),
            "fire" => Ok(Self::Fire),
            "melee" => Ok(Self::Melee),
            "illusion" => Ok(Self::Illusion),
            _ => Err(UnknownTowerKind(value.to_owned())),
        }
    }
}
