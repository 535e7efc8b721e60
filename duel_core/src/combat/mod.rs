//! Damage and healing resolution
//!
//! Item sources roll accuracy, dodge and critical against their owner's
//! stats. Effect sources have no attacker: they skip every roll and the
//! attack scaling, and multiply by their stack count instead.

mod mitigation;
mod resolution;
mod result;

pub use mitigation::{critical_multiplier, final_amount, mitigate};
pub use result::Resolution;
