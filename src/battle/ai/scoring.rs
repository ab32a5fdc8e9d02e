//! Action scoring
//!
//! Estimates what a skill would do from a given cell, then weighs the
//! estimate by personality.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::ai::personality::AiPersonality;
use crate::battle::ai::BattleView;
use crate::battle::effects::{damage_amount, heal_amount};
use crate::battle::skills::{EffectKind, Skill};
use crate::battle::targeting::affected_units;
use crate::battle::units::Unit;
use crate::core::types::UnitId;
use crate::grid::hex::HexCoord;

/// Expected outcome of one skill use
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionEstimate {
    pub damage_to_foes: i32,
    pub kills: u32,
    pub friendly_damage: i32,
    pub healing: i32,
    pub foe_healing: i32,
    pub useful_statuses: u32,
    pub mana_spent: i32,
}

/// Simulate `skill` from `origin` at `target` without touching the battle
pub fn evaluate(
    view: &BattleView<'_>,
    caster: &Unit,
    origin: HexCoord,
    skill: &Skill,
    target: HexCoord,
) -> ActionEstimate {
    let mut estimate = ActionEstimate {
        mana_spent: skill.cost,
        ..ActionEstimate::default()
    };
    let affected = affected_units(view.grid, view.units, caster, origin, skill, target);
    let mut hp: AHashMap<UnitId, i32> = AHashMap::new();

    let kinds = std::iter::once(skill.effect.kind).chain(skill.secondary);
    for kind in kinds {
        for id in &affected {
            let Some(unit) = view.unit(*id) else { continue };
            let current = *hp.entry(*id).or_insert(unit.hp);
            if current <= 0 {
                continue;
            }
            let foe = caster.team.is_hostile_to(unit.team);
            match kind {
                EffectKind::Damage { power, element } => {
                    let dealt = damage_amount(view.formulas, caster, unit, power, element).min(current);
                    if foe {
                        estimate.damage_to_foes += dealt;
                        if dealt >= current {
                            estimate.kills += 1;
                        }
                    } else {
                        estimate.friendly_damage += dealt;
                    }
                    hp.insert(*id, current - dealt);
                }
                EffectKind::Heal { power } => {
                    let restored = heal_amount(view.formulas, caster, power).min(unit.max_hp - current).max(0);
                    if foe {
                        estimate.foe_healing += restored;
                    } else {
                        estimate.healing += restored;
                    }
                    hp.insert(*id, current + restored);
                }
                EffectKind::Status { kind, .. } => {
                    if foe == kind.is_harmful() && !unit.has_status(kind) {
                        estimate.useful_statuses += 1;
                    }
                }
            }
        }
    }
    estimate
}

/// Weighted value of an estimate; zero or below means not worth doing
pub fn score_action(estimate: &ActionEstimate, personality: &AiPersonality) -> f32 {
    let w = &personality.weights;
    let aggression = personality.behavior.aggression;
    let caution = personality.behavior.caution;

    let mut score = 0.0;
    score += estimate.damage_to_foes as f32 * w.damage_value * (0.5 + aggression);
    score += estimate.kills as f32 * w.kill_bonus;
    score -= estimate.friendly_damage as f32 * w.friendly_fire_penalty * (0.5 + caution);
    score += estimate.healing as f32 * w.healing_value * (0.5 + caution);
    score -= estimate.foe_healing as f32 * w.healing_value;
    score += estimate.useful_statuses as f32 * w.status_value;
    score -= estimate.mana_spent as f32 * w.mana_cost;
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::formulas::StandardFormulas;
    use crate::battle::skills::Element;
    use crate::battle::status::StatusKind;
    use crate::battle::units::StatBlock;
    use crate::core::types::TeamId;
    use crate::grid::hex_grid::HexGrid;
    use crate::grid::reachable::Reachable;

    fn unit(id: u32, team: TeamId, q: i32, hp: i32) -> Unit {
        let mut u = Unit::new("u", "U", StatBlock::default()).on_team(team);
        u.id = UnitId(id);
        u.position = HexCoord::new(q, 0);
        u.max_hp = 50;
        u.hp = hp;
        u
    }

    fn with_view<R>(units: &[Unit], f: impl FnOnce(&BattleView<'_>) -> R) -> R {
        let grid = HexGrid::new();
        let reachable = Reachable::origin_only(units[0].position);
        let view = BattleView {
            grid: &grid,
            units,
            formulas: &StandardFormulas,
            reachable: &reachable,
            round: 1,
            confine_to_map: false,
        };
        f(&view)
    }

    #[test]
    fn test_kill_detected() {
        let units = vec![unit(0, TeamId::PLAYER, 0, 50), unit(1, TeamId::ENEMY, 1, 3)];
        let strike = Skill::line("strike", 1, EffectKind::Damage { power: 5, element: Element::Physical });
        let estimate = with_view(&units, |v| evaluate(v, &units[0], units[0].position, &strike, HexCoord::new(1, 0)));
        assert_eq!(estimate.kills, 1);
        assert_eq!(estimate.damage_to_foes, 3);
    }

    #[test]
    fn test_friendly_fire_lowers_score() {
        let units = vec![
            unit(0, TeamId::PLAYER, 0, 50),
            unit(1, TeamId::PLAYER, 1, 50),
            unit(2, TeamId::ENEMY, 2, 50),
        ];
        let blast = Skill::area("blast", 2, 1, EffectKind::Damage { power: 5, element: Element::Physical })
            .affecting(crate::battle::skills::Affinity::Everyone);
        let personality = AiPersonality::default();
        let (near, far) = with_view(&units, |v| {
            (
                evaluate(v, &units[0], units[0].position, &blast, HexCoord::new(1, 0)),
                evaluate(v, &units[0], units[0].position, &blast, HexCoord::new(2, 0)),
            )
        });
        assert!(near.friendly_damage > 0);
        assert!(score_action(&far, &personality) > score_action(&near, &personality));
    }

    #[test]
    fn test_redundant_status_not_counted() {
        let mut units = vec![unit(0, TeamId::PLAYER, 0, 50), unit(1, TeamId::ENEMY, 1, 50)];
        let poison = Skill::line("venom", 2, EffectKind::Status { kind: StatusKind::Poison, duration: 3 });
        let fresh = with_view(&units, |v| evaluate(v, &units[0], units[0].position, &poison, HexCoord::new(1, 0)));
        assert_eq!(fresh.useful_statuses, 1);

        units[1].add_status(StatusKind::Poison, 2);
        let stale = with_view(&units, |v| evaluate(v, &units[0], units[0].position, &poison, HexCoord::new(1, 0)));
        assert_eq!(stale.useful_statuses, 0);
    }

    #[test]
    fn test_overheal_capped() {
        let units = vec![unit(0, TeamId::PLAYER, 0, 48)];
        let mend = Skill::self_only("mend", EffectKind::Heal { power: 20 });
        let estimate = with_view(&units, |v| evaluate(v, &units[0], units[0].position, &mend, units[0].position));
        assert_eq!(estimate.healing, 2);
    }
}
