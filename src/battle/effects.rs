//! Effect amounts
//!
//! Pure arithmetic over derived stats. Applying the result to HP is the
//! battle system's job.

use crate::battle::constants::{HEAL_MAGIC_DIVISOR, MIN_DAMAGE, MITIGATION_DIVISOR};
use crate::battle::formulas::{CombatStat, Formulas};
use crate::battle::skills::Element;
use crate::battle::units::Unit;

/// Scaling and mitigation stats for an element
pub fn element_stats(element: Element) -> (CombatStat, CombatStat) {
    match element {
        Element::Physical => (CombatStat::Attack, CombatStat::Defense),
        Element::Magical => (CombatStat::Magic, CombatStat::Resistance),
    }
}

/// Damage before clamping to the target's remaining HP
pub fn damage_amount(
    formulas: &dyn Formulas,
    caster: &Unit,
    target: &Unit,
    power: i32,
    element: Element,
) -> i32 {
    let (scaling, mitigation) = element_stats(element);
    let offense = formulas.derived_stat(caster, scaling, true);
    let defense = formulas.derived_stat(target, mitigation, true);
    let raw = power as f32 + offense - defense / MITIGATION_DIVISOR;
    (raw.round() as i32).max(MIN_DAMAGE)
}

/// Healing before clamping to the target's missing HP
pub fn heal_amount(formulas: &dyn Formulas, caster: &Unit, power: i32) -> i32 {
    let magic = formulas.derived_stat(caster, CombatStat::Magic, true);
    ((power as f32 + magic / HEAL_MAGIC_DIVISOR).round() as i32).max(0)
}
