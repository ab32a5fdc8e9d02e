//! Battle system constants - all tunable values in one place
//!
//! Stat adjustments are flat additions. Status ticks scale with max HP as an
//! integer divisor.

// Status effects (per turn start)
pub const POISON_FRACTION_OF_MAX_HP: i32 = 10; // max_hp / 10 per tick
pub const REGEN_FRACTION_OF_MAX_HP: i32 = 10;
pub const MIN_STATUS_TICK: i32 = 1;

// Status stat adjustments
pub const HASTE_SPEED_BONUS: f32 = 10.0;
pub const SLOW_SPEED_PENALTY: f32 = 5.0;
pub const SLOW_MOVEMENT_PENALTY: f32 = 1.0;
pub const GUARD_DEFENSE_BONUS: f32 = 5.0;
pub const GUARD_RESISTANCE_BONUS: f32 = 5.0;

// Damage
pub const MIN_DAMAGE: i32 = 1;
/// Mitigation stats are halved before subtraction
pub const MITIGATION_DIVISOR: f32 = 2.0;
/// Heals add half the caster's Magic
pub const HEAL_MAGIC_DIVISOR: f32 = 2.0;

// Projectiles spawn only past melee reach
pub const MELEE_REACH: u32 = 1;

// AI search caps
pub const AI_APPROACH_MAX_COST: u32 = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ticks_nonzero() {
        assert!(MIN_STATUS_TICK > 0);
        assert!(POISON_FRACTION_OF_MAX_HP > 0);
        assert!(REGEN_FRACTION_OF_MAX_HP > 0);
    }

    #[test]
    fn test_min_damage_positive() {
        assert!(MIN_DAMAGE >= 1);
    }
}
