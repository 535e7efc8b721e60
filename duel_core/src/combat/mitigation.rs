//! Mitigation - resistance by damage type and final rounding

use crate::types::DamageType;

/// Damage left after the defender's resistance
///
/// Physical damage is reduced by the Armor chance, magical damage by the
/// Shield chance. True damage is never reduced.
///
/// # Arguments
/// * `amount` - Incoming damage
/// * `armor` - Defender's `hyperbolic(Armor)`, in `[0, 1)`
/// * `shield` - Defender's `hyperbolic(Shield)`, in `[0, 1)`
pub fn mitigate(amount: f64, damage_type: DamageType, armor: f64, shield: f64) -> f64 {
    let reduction = match damage_type {
        DamageType::Physical => armor,
        DamageType::Magical => shield,
        DamageType::True => 0.0,
    };
    amount * (1.0 - reduction)
}

/// Multiplier of a critical hit: `1 + precision bonus`
pub fn critical_multiplier(precision_bonus: f64) -> f64 {
    1.0 + precision_bonus.max(0.0)
}

/// Truncate toward zero. Only the final step of a resolution rounds.
pub fn final_amount(amount: f64) -> i64 {
    if amount.is_finite() && amount > 0.0 {
        amount.trunc() as i64
    } else {
        0
    }
}
