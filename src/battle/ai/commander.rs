//! AI Commander - default battle AI implementation
//!
//! Enumerates every (destination, skill, target) the acting unit could
//! commit to this turn, scores each with the personality weights, and picks
//! the best. With nothing worth doing it repositions instead.

use ordered_float::OrderedFloat;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::battle::ai::personality::{AiPersonality, RangePreference};
use crate::battle::ai::scoring::{evaluate, score_action};
use crate::battle::ai::{AiAction, AiDecision, AiStrategy, BattleView};
use crate::battle::constants::AI_APPROACH_MAX_COST;
use crate::battle::targeting::candidate_targets;
use crate::battle::units::Unit;
use crate::core::types::UnitId;
use crate::grid::hex::HexCoord;

/// Candidates considered when the commander slips up
const MISTAKE_POOL: usize = 3;
/// Score lost per movement point, so equal actions prefer staying put
const MOVE_COST_PENALTY: f32 = 0.01;

pub struct AiCommander {
    personality: AiPersonality,
    rng: ChaCha8Rng,
}

impl AiCommander {
    /// Create a new AI commander with default seed
    pub fn new(personality: AiPersonality) -> Self {
        Self::with_seed(personality, 42)
    }

    /// Create with specific RNG seed for deterministic behavior
    pub fn with_seed(personality: AiPersonality, seed: u64) -> Self {
        Self {
            personality,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn personality(&self) -> &AiPersonality {
        &self.personality
    }

    /// Roll for making a mistake based on difficulty settings
    fn makes_mistake(&mut self) -> bool {
        self.rng.gen::<f32>() < self.personality.difficulty.mistake_chance
    }

    /// Every positive-scoring action, best first. Order among equal scores
    /// follows destination (r, q), then skill slot, then target (r, q).
    fn rank_actions(&self, view: &BattleView<'_>, unit: &Unit) -> Vec<(OrderedFloat<f32>, AiDecision)> {
        let mut ranked = Vec::new();
        for destination in view.reachable.sorted() {
            let travel = view.reachable.cost_to(destination).unwrap_or(0) as f32;
            for (slot, skill) in unit.skills.iter().enumerate() {
                if !unit.can_use(slot) {
                    continue;
                }
                for target in candidate_targets(view.grid, view.units, unit, destination, skill) {
                    let estimate = evaluate(view, unit, destination, skill, target);
                    let score = score_action(&estimate, &self.personality) - travel * MOVE_COST_PENALTY;
                    if score > 0.0 {
                        ranked.push((
                            OrderedFloat(score),
                            AiDecision {
                                destination: Some(destination),
                                action: Some(AiAction { skill: slot, target }),
                            },
                        ));
                    }
                }
            }
        }
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked
    }

    /// Where to stand when no action scores: toward the nearest foe, or away
    /// from it when badly hurt
    fn reposition(&self, view: &BattleView<'_>, unit: &Unit) -> Option<HexCoord> {
        let foe = view
            .units
            .iter()
            .filter(|u| u.is_alive() && unit.team.is_hostile_to(u.team))
            .min_by_key(|u| (unit.position.distance(&u.position), u.id))?;

        let retreating = unit.hp_fraction() < self.personality.weights.retreat_threshold;
        let cells = view.reachable.sorted();

        if retreating {
            return cells
                .into_iter()
                .max_by_key(|c| (c.distance(&foe.position), std::cmp::Reverse((c.r, c.q))));
        }

        let preferred = match self.personality.preferences.preferred_range {
            RangePreference::Close => 1,
            RangePreference::Ranged => unit.skills.iter().map(|s| s.reach()).max().unwrap_or(1).max(1),
        };

        // Follow the real path when there is one, so walls are walked around
        if preferred == 1 {
            let path = view.grid.find_path(unit.position, foe.position, AI_APPROACH_MAX_COST, |hex| {
                view.is_blocked(unit.id, hex)
            });
            if let Some(path) = path {
                if let Some(step) = path.iter().rev().skip(1).find(|c| view.reachable.contains(**c)) {
                    return Some(*step);
                }
            }
        }

        cells.into_iter().min_by_key(|c| {
            let gap = c.distance(&foe.position) as i64 - preferred as i64;
            (gap.abs(), view.reachable.cost_to(*c).unwrap_or(0), c.r, c.q)
        })
    }
}

impl AiStrategy for AiCommander {
    fn decide(&mut self, view: &BattleView<'_>, actor: UnitId) -> AiDecision {
        let Some(unit) = view.unit(actor) else {
            return AiDecision::hold();
        };

        let ranked = self.rank_actions(view, unit);
        if !ranked.is_empty() {
            let pick = if ranked.len() > 1 && self.makes_mistake() {
                self.rng.gen_range(0..ranked.len().min(MISTAKE_POOL))
            } else {
                0
            };
            return ranked[pick].1;
        }

        AiDecision {
            destination: self.reposition(view, unit).filter(|c| *c != unit.position),
            action: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::formulas::StandardFormulas;
    use crate::battle::skills::{EffectKind, Element, Skill};
    use crate::battle::units::StatBlock;
    use crate::core::types::TeamId;
    use crate::grid::hex_grid::HexGrid;
    use crate::grid::terrain::TerrainType;

    fn unit(id: u32, team: TeamId, q: i32, r: i32) -> Unit {
        let strike = Skill::line("strike", 1, EffectKind::Damage { power: 5, element: Element::Physical });
        let mut u = Unit::new("u", "U", StatBlock::default()).on_team(team).with_skills(vec![strike]);
        u.id = UnitId(id);
        u.position = HexCoord::new(q, r);
        u.refresh_resources(&StandardFormulas);
        u
    }

    fn decide(commander: &mut AiCommander, grid: &HexGrid, units: &[Unit], actor: usize) -> AiDecision {
        let mover = &units[actor];
        let reachable = grid.reachable_set(mover.position, 3, |hex| {
            units.iter().any(|u| u.id != mover.id && u.is_alive() && u.position == hex)
        });
        let view = BattleView {
            grid,
            units,
            formulas: &StandardFormulas,
            reachable: &reachable,
            round: 1,
            confine_to_map: false,
        };
        commander.decide(&view, mover.id)
    }

    fn perfect() -> AiPersonality {
        let mut p = AiPersonality::default();
        p.difficulty.mistake_chance = 0.0;
        p
    }

    #[test]
    fn test_attacks_adjacent_foe_without_moving() {
        let grid = HexGrid::filled(HexCoord::default(), 5, TerrainType::Plain);
        let units = vec![unit(0, TeamId::ENEMY, 0, 0), unit(1, TeamId::PLAYER, 1, 0)];
        let decision = decide(&mut AiCommander::new(perfect()), &grid, &units, 0);
        assert_eq!(decision.destination, Some(HexCoord::new(0, 0)));
        assert_eq!(
            decision.action,
            Some(AiAction {
                skill: 0,
                target: HexCoord::new(1, 0)
            })
        );
    }

    #[test]
    fn test_closes_distance_to_attack() {
        let grid = HexGrid::filled(HexCoord::default(), 6, TerrainType::Plain);
        let units = vec![unit(0, TeamId::ENEMY, 0, 0), unit(1, TeamId::PLAYER, 4, 0)];
        let decision = decide(&mut AiCommander::new(perfect()), &grid, &units, 0);
        let dest = decision.destination.unwrap();
        assert_eq!(dest.distance(&HexCoord::new(4, 0)), 1);
        assert!(decision.action.is_some());
    }

    #[test]
    fn test_approaches_when_out_of_reach() {
        let grid = HexGrid::filled(HexCoord::default(), 10, TerrainType::Plain);
        let units = vec![unit(0, TeamId::ENEMY, 0, 0), unit(1, TeamId::PLAYER, 9, 0)];
        let decision = decide(&mut AiCommander::new(perfect()), &grid, &units, 0);
        assert!(decision.action.is_none());
        let dest = decision.destination.unwrap();
        assert_eq!(dest.distance(&HexCoord::new(9, 0)), 6);
    }

    #[test]
    fn test_same_seed_same_choice() {
        let grid = HexGrid::filled(HexCoord::default(), 6, TerrainType::Plain);
        let units = vec![
            unit(0, TeamId::ENEMY, 0, 0),
            unit(1, TeamId::PLAYER, 2, 0),
            unit(2, TeamId::PLAYER, -2, 1),
        ];
        let mut sloppy = AiPersonality::default();
        sloppy.difficulty.mistake_chance = 0.5;

        let mut a = AiCommander::with_seed(sloppy.clone(), 7);
        let mut b = AiCommander::with_seed(sloppy, 7);
        for _ in 0..10 {
            assert_eq!(decide(&mut a, &grid, &units, 0), decide(&mut b, &grid, &units, 0));
        }
    }

    #[test]
    fn test_no_foes_holds() {
        let grid = HexGrid::filled(HexCoord::default(), 3, TerrainType::Plain);
        let units = vec![unit(0, TeamId::ENEMY, 0, 0)];
        let decision = decide(&mut AiCommander::new(perfect()), &grid, &units, 0);
        assert_eq!(decision, AiDecision::hold());
    }
}
