//! Stat derivation
//!
//! The battle system only reads numbers through the `Formulas` trait, so a
//! host can swap in its own balance without touching the state machine.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    GUARD_DEFENSE_BONUS, GUARD_RESISTANCE_BONUS, HASTE_SPEED_BONUS, SLOW_MOVEMENT_PENALTY,
    SLOW_SPEED_PENALTY,
};
use crate::battle::status::StatusKind;
use crate::battle::units::Unit;

/// Base attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Level,
    Strength,
    Intelligence,
    Dexterity,
    Vitality,
    Agility,
}

/// Values derived from base attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStat {
    MaxHp,
    MaxMp,
    Attack,
    Magic,
    Defense,
    Resistance,
    Speed,
    Movement,
}

/// Pure stat derivation. Implementations must not have side effects.
pub trait Formulas {
    fn stat(&self, unit: &Unit, key: StatKey) -> f32;

    fn derived_stat(&self, unit: &Unit, stat: CombatStat, include_equipment: bool) -> f32;
}

/// Shipped balance
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormulas;

impl Formulas for StandardFormulas {
    fn stat(&self, unit: &Unit, key: StatKey) -> f32 {
        let s = &unit.stats;
        let value = match key {
            StatKey::Level => s.level,
            StatKey::Strength => s.strength,
            StatKey::Intelligence => s.intelligence,
            StatKey::Dexterity => s.dexterity,
            StatKey::Vitality => s.vitality,
            StatKey::Agility => s.agility,
        };
        value as f32
    }

    fn derived_stat(&self, unit: &Unit, stat: CombatStat, include_equipment: bool) -> f32 {
        let lvl = self.stat(unit, StatKey::Level);
        let str = self.stat(unit, StatKey::Strength);
        let int = self.stat(unit, StatKey::Intelligence);
        let dex = self.stat(unit, StatKey::Dexterity);
        let vit = self.stat(unit, StatKey::Vitality);
        let agi = self.stat(unit, StatKey::Agility);

        let base = match stat {
            CombatStat::MaxHp => 40.0 + 8.0 * vit + 5.0 * lvl,
            CombatStat::MaxMp => 10.0 + 4.0 * int + 2.0 * lvl,
            CombatStat::Attack => 2.0 * str + (dex / 2.0).floor(),
            CombatStat::Magic => 2.0 * int,
            CombatStat::Defense => vit + (str / 2.0).floor(),
            CombatStat::Resistance => (int / 2.0).floor() + (vit / 2.0).floor(),
            CombatStat::Speed => 2.0 * agi + dex,
            CombatStat::Movement => 3.0 + (agi / 10.0).floor(),
        };

        let gear = if include_equipment {
            let e = &unit.equipment;
            (match stat {
                CombatStat::Attack => e.attack,
                CombatStat::Magic => e.magic,
                CombatStat::Defense => e.defense,
                CombatStat::Resistance => e.resistance,
                CombatStat::Speed => e.speed,
                CombatStat::Movement => e.movement,
                CombatStat::MaxHp | CombatStat::MaxMp => 0,
            }) as f32
        } else {
            0.0
        };

        (base + gear + status_adjustment(unit, stat)).max(0.0)
    }
}

fn status_adjustment(unit: &Unit, stat: CombatStat) -> f32 {
    let mut delta = 0.0;
    match stat {
        CombatStat::Speed => {
            if unit.has_status(StatusKind::Haste) {
                delta += HASTE_SPEED_BONUS;
            }
            if unit.has_status(StatusKind::Slow) {
                delta -= SLOW_SPEED_PENALTY;
            }
        }
        CombatStat::Movement => {
            if unit.has_status(StatusKind::Slow) {
                delta -= SLOW_MOVEMENT_PENALTY;
            }
        }
        CombatStat::Defense => {
            if unit.has_status(StatusKind::Guard) {
                delta += GUARD_DEFENSE_BONUS;
            }
        }
        CombatStat::Resistance => {
            if unit.has_status(StatusKind::Guard) {
                delta += GUARD_RESISTANCE_BONUS;
            }
        }
        _ => {}
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::units::{EquipmentBonus, StatBlock};

    fn unit() -> Unit {
        Unit::new(
            "Test",
            "TEST",
            StatBlock {
                level: 2,
                strength: 6,
                intelligence: 4,
                dexterity: 3,
                vitality: 5,
                agility: 12,
            },
        )
    }

    #[test]
    fn test_base_stats_read_through() {
        let u = unit();
        assert_eq!(StandardFormulas.stat(&u, StatKey::Strength), 6.0);
        assert_eq!(StandardFormulas.stat(&u, StatKey::Level), 2.0);
    }

    #[test]
    fn test_derived_values() {
        let u = unit();
        let f = StandardFormulas;
        assert_eq!(f.derived_stat(&u, CombatStat::MaxHp, false), 40.0 + 40.0 + 10.0);
        assert_eq!(f.derived_stat(&u, CombatStat::Attack, false), 12.0 + 1.0);
        assert_eq!(f.derived_stat(&u, CombatStat::Speed, false), 24.0 + 3.0);
        assert_eq!(f.derived_stat(&u, CombatStat::Movement, false), 4.0);
    }

    #[test]
    fn test_equipment_only_when_requested() {
        let mut u = unit();
        u.equipment = EquipmentBonus {
            attack: 7,
            ..EquipmentBonus::default()
        };
        let f = StandardFormulas;
        let bare = f.derived_stat(&u, CombatStat::Attack, false);
        let geared = f.derived_stat(&u, CombatStat::Attack, true);
        assert_eq!(geared - bare, 7.0);
    }

    #[test]
    fn test_statuses_adjust_additively() {
        let mut u = unit();
        let f = StandardFormulas;
        let speed = f.derived_stat(&u, CombatStat::Speed, true);
        u.add_status(StatusKind::Haste, 2);
        assert_eq!(f.derived_stat(&u, CombatStat::Speed, true), speed + HASTE_SPEED_BONUS);

        let movement = f.derived_stat(&u, CombatStat::Movement, true);
        u.add_status(StatusKind::Slow, 2);
        assert_eq!(
            f.derived_stat(&u, CombatStat::Movement, true),
            movement - SLOW_MOVEMENT_PENALTY
        );
    }

    #[test]
    fn test_never_negative() {
        let mut u = unit();
        u.stats.agility = 0;
        u.stats.dexterity = 0;
        u.add_status(StatusKind::Slow, 1);
        assert_eq!(StandardFormulas.derived_stat(&u, CombatStat::Speed, false), 0.0);
    }
}
