//! Round turn order

use ordered_float::OrderedFloat;
use std::cmp::Reverse;

use crate::battle::formulas::{CombatStat, Formulas};
use crate::battle::units::Unit;
use crate::core::types::UnitId;

/// Living units by derived Speed (desc), then team, then id
pub fn compute_turn_order(units: &[Unit], formulas: &dyn Formulas) -> Vec<UnitId> {
    let mut keyed: Vec<_> = units
        .iter()
        .filter(|u| u.is_alive())
        .map(|u| {
            let speed = formulas.derived_stat(u, CombatStat::Speed, true);
            ((Reverse(OrderedFloat(speed)), u.team, u.id), u.id)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, id)| id).collect()
}
