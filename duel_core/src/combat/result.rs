//! Resolution - outcome of one damage or healing application

/// What happened to one application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Failed the accuracy roll
    Missed,
    /// Defender won the dodge roll
    Dodged,
    /// Applied to the target's health
    Landed {
        /// Final integer amount, after truncation
        amount: i64,
        critical: bool,
    },
    /// The target left the world before the amount was applied
    TargetGone,
}

impl Resolution {
    /// Final amount, zero unless the application landed
    pub fn amount(&self) -> i64 {
        match self {
            Resolution::Landed { amount, .. } => *amount,
            _ => 0,
        }
    }

    pub fn landed(&self) -> bool {
        matches!(self, Resolution::Landed { .. })
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Resolution::Landed { critical: true, .. })
    }
}
