//! Skill targeting rules
//!
//! Shared by highlighting, player confirmation, and AI evaluation, so all
//! three agree on exactly which cells and units a skill touches. The caster
//! is always considered at `origin`, which lets the AI score a skill from a
//! cell it has not moved to yet.

use crate::battle::skills::{Affinity, Skill, TargetMode};
use crate::battle::units::Unit;
use crate::core::types::{TeamId, UnitId};
use crate::grid::hex::HexCoord;
use crate::grid::hex_grid::HexGrid;

pub fn affinity_matches(caster: TeamId, target: TeamId, affects: Affinity) -> bool {
    match affects {
        Affinity::Foes => caster.is_hostile_to(target),
        Affinity::Allies => !caster.is_hostile_to(target),
        Affinity::Everyone => true,
    }
}

/// Living units with their effective positions, caster moved to `origin`
fn positioned<'a>(
    units: &'a [Unit],
    caster: &'a Unit,
    origin: HexCoord,
) -> impl Iterator<Item = (&'a Unit, HexCoord)> + 'a {
    units.iter().filter(|u| u.is_alive()).map(move |u| {
        if u.id == caster.id {
            (u, origin)
        } else {
            (u, u.position)
        }
    })
}

/// Is `target` a legal confirmation cell for `skill` cast from `origin`?
pub fn target_in_range(grid: &HexGrid, origin: HexCoord, skill: &Skill, target: HexCoord) -> bool {
    let d = grid.distance(origin, target);
    match skill.effect.mode {
        TargetMode::SelfOnly => true,
        TargetMode::Line => d >= 1 && d <= skill.range,
        TargetMode::Area => d <= skill.range,
    }
}

/// Cells the skill would touch, for highlighting
pub fn affected_cells(grid: &HexGrid, origin: HexCoord, skill: &Skill, target: HexCoord) -> Vec<HexCoord> {
    match skill.effect.mode {
        TargetMode::SelfOnly => vec![origin],
        TargetMode::Line => grid.line(origin, target, skill.range).into_iter().skip(1).collect(),
        TargetMode::Area => target.hexes_in_range(skill.effect.area_radius),
    }
}

/// Units the skill would affect. Every living unit inside the shape is hit
/// whatever its team; affinity only steers target choice. Line results follow
/// the traced line; area results follow roster order.
pub fn affected_units(
    grid: &HexGrid,
    units: &[Unit],
    caster: &Unit,
    origin: HexCoord,
    skill: &Skill,
    target: HexCoord,
) -> Vec<UnitId> {
    match skill.effect.mode {
        TargetMode::SelfOnly => vec![caster.id],
        TargetMode::Line => {
            let mut hit = Vec::new();
            for cell in grid.line(origin, target, skill.range).into_iter().skip(1) {
                hit.extend(
                    positioned(units, caster, origin)
                        .filter(|(u, pos)| *pos == cell && u.id != caster.id)
                        .map(|(u, _)| u.id),
                );
            }
            hit
        }
        TargetMode::Area => positioned(units, caster, origin)
            .filter(|(_, pos)| grid.distance(target, *pos) <= skill.effect.area_radius)
            .map(|(u, _)| u.id)
            .collect(),
    }
}

/// Can the skill reach at least one living unit of its affinity from `origin`?
pub fn has_valid_target(grid: &HexGrid, units: &[Unit], caster: &Unit, origin: HexCoord, skill: &Skill) -> bool {
    let affects = skill.effect.affects;
    match skill.effect.mode {
        TargetMode::SelfOnly => true,
        TargetMode::Line => positioned(units, caster, origin).any(|(u, pos)| {
            let d = grid.distance(origin, pos);
            u.id != caster.id && d >= 1 && d <= skill.range && affinity_matches(caster.team, u.team, affects)
        }),
        TargetMode::Area => positioned(units, caster, origin).any(|(u, pos)| {
            grid.distance(origin, pos) <= skill.reach() && affinity_matches(caster.team, u.team, affects)
        }),
    }
}

/// Confirmation cells worth evaluating: every legal cell whose shape would
/// catch at least one unit of the skill's affinity. Sorted by (r, q).
pub fn candidate_targets(
    grid: &HexGrid,
    units: &[Unit],
    caster: &Unit,
    origin: HexCoord,
    skill: &Skill,
) -> Vec<HexCoord> {
    let affects = skill.effect.affects;
    let mut cells: Vec<HexCoord> = match skill.effect.mode {
        TargetMode::SelfOnly => vec![origin],
        TargetMode::Line => positioned(units, caster, origin)
            .filter(|(u, _)| u.id != caster.id && affinity_matches(caster.team, u.team, affects))
            .map(|(_, pos)| pos)
            .filter(|pos| target_in_range(grid, origin, skill, *pos))
            .collect(),
        TargetMode::Area => positioned(units, caster, origin)
            .filter(|(u, _)| affinity_matches(caster.team, u.team, affects))
            .flat_map(|(_, pos)| pos.hexes_in_range(skill.effect.area_radius))
            .filter(|cell| target_in_range(grid, origin, skill, *cell))
            .collect(),
    };
    cells.sort_by_key(|h| (h.r, h.q));
    cells.dedup();
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::skills::{EffectKind, Element};
    use crate::battle::units::StatBlock;

    fn unit(id: u32, team: TeamId, q: i32, r: i32) -> Unit {
        let mut u = Unit::new("u", "U", StatBlock::default()).on_team(team);
        u.id = UnitId(id);
        u.position = HexCoord::new(q, r);
        u.hp = 10;
        u.max_hp = 10;
        u
    }

    fn bolt(range: u32) -> Skill {
        Skill::line("bolt", range, EffectKind::Damage { power: 5, element: Element::Magical })
    }

    #[test]
    fn test_affinity() {
        assert!(affinity_matches(TeamId::PLAYER, TeamId::ENEMY, Affinity::Foes));
        assert!(!affinity_matches(TeamId::PLAYER, TeamId::PLAYER, Affinity::Foes));
        assert!(affinity_matches(TeamId::ENEMY, TeamId(2), Affinity::Allies));
        assert!(affinity_matches(TeamId::PLAYER, TeamId::ENEMY, Affinity::Everyone));
    }

    #[test]
    fn test_line_pierces_in_order() {
        let grid = HexGrid::new();
        let units = vec![
            unit(0, TeamId::PLAYER, 0, 0),
            unit(2, TeamId::ENEMY, 2, 0),
            unit(1, TeamId::ENEMY, 1, 0),
            unit(3, TeamId::PLAYER, 3, 0),
            unit(4, TeamId::ENEMY, 5, 0),
        ];
        let hit = affected_units(&grid, &units, &units[0], units[0].position, &bolt(4), HexCoord::new(4, 0));
        assert_eq!(hit, vec![UnitId(1), UnitId(2), UnitId(3)]);
    }

    #[test]
    fn test_area_ignores_affinity() {
        let grid = HexGrid::new();
        let units = vec![
            unit(0, TeamId::PLAYER, 0, 0),
            unit(1, TeamId::PLAYER, 2, 0),
            unit(2, TeamId::ENEMY, 3, 0),
        ];
        let blast = Skill::area("blast", 3, 1, EffectKind::Damage { power: 5, element: Element::Physical });
        let hit = affected_units(&grid, &units, &units[0], units[0].position, &blast, HexCoord::new(3, 0));
        assert_eq!(hit, vec![UnitId(1), UnitId(2)]);
        assert_eq!(candidate_targets(&grid, &units, &units[0], units[0].position, &blast).len(), 4);
    }

    #[test]
    fn test_dead_units_ignored() {
        let grid = HexGrid::new();
        let mut units = vec![unit(0, TeamId::PLAYER, 0, 0), unit(1, TeamId::ENEMY, 1, 0)];
        units[1].hp = 0;
        assert!(!has_valid_target(&grid, &units, &units[0], units[0].position, &bolt(3)));
        let hit = affected_units(&grid, &units, &units[0], units[0].position, &bolt(3), HexCoord::new(1, 0));
        assert!(hit.is_empty());
    }

    #[test]
    fn test_area_radius_zero_hits_one_cell() {
        let grid = HexGrid::new();
        let units = vec![
            unit(0, TeamId::PLAYER, 0, 0),
            unit(1, TeamId::ENEMY, 2, 0),
            unit(2, TeamId::ENEMY, 2, 1),
        ];
        let blast = Skill::area("blast", 3, 0, EffectKind::Damage { power: 5, element: Element::Physical });
        let hit = affected_units(&grid, &units, &units[0], units[0].position, &blast, HexCoord::new(2, 0));
        assert_eq!(hit, vec![UnitId(1)]);
    }

    #[test]
    fn test_range_rules() {
        let grid = HexGrid::new();
        let origin = HexCoord::new(0, 0);
        assert!(!target_in_range(&grid, origin, &bolt(2), origin));
        assert!(target_in_range(&grid, origin, &bolt(2), HexCoord::new(2, 0)));
        assert!(!target_in_range(&grid, origin, &bolt(2), HexCoord::new(3, 0)));

        let blast = Skill::area("blast", 2, 1, EffectKind::Damage { power: 5, element: Element::Physical });
        assert!(target_in_range(&grid, origin, &blast, origin));
    }

    #[test]
    fn test_area_reach_includes_radius() {
        let grid = HexGrid::new();
        let units = vec![unit(0, TeamId::PLAYER, 0, 0), unit(1, TeamId::ENEMY, 4, 0)];
        let blast = Skill::area("blast", 3, 1, EffectKind::Damage { power: 5, element: Element::Physical });
        assert!(has_valid_target(&grid, &units, &units[0], units[0].position, &blast));
        let cells = candidate_targets(&grid, &units, &units[0], units[0].position, &blast);
        assert!(cells.contains(&HexCoord::new(3, 0)));
        assert!(cells.iter().all(|c| grid.distance(HexCoord::new(0, 0), *c) <= 3));
    }

    #[test]
    fn test_hypothetical_origin() {
        let grid = HexGrid::new();
        let units = vec![unit(0, TeamId::PLAYER, 0, 0), unit(1, TeamId::ENEMY, 4, 0)];
        assert!(!has_valid_target(&grid, &units, &units[0], units[0].position, &bolt(1)));
        assert!(has_valid_target(&grid, &units, &units[0], HexCoord::new(3, 0), &bolt(1)));
    }
}
