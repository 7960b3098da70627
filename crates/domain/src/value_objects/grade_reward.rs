//! Judge grades and the fixed reward/penalty table keyed by grade.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Qualitative adjudication grade, A (best) to E (worst)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JudgeGrade {
    A,
    B,
    C,
    D,
    E,
}

impl JudgeGrade {
    pub fn all() -> &'static [JudgeGrade] {
        &[
            JudgeGrade::A,
            JudgeGrade::B,
            JudgeGrade::C,
            JudgeGrade::D,
            JudgeGrade::E,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeGrade::A => "A",
            JudgeGrade::B => "B",
            JudgeGrade::C => "C",
            JudgeGrade::D => "D",
            JudgeGrade::E => "E",
        }
    }

    /// The fixed consequences of this grade.
    pub fn reward(&self) -> GradeReward {
        match self {
            JudgeGrade::A => GradeReward::new(5, -10, 10, 50),
            JudgeGrade::B => GradeReward::new(2, -5, 5, 25),
            JudgeGrade::C => GradeReward::new(0, 0, 0, 10),
            JudgeGrade::D => GradeReward::new(-2, 10, -5, 0),
            JudgeGrade::E => GradeReward::new(-5, 20, -10, -25),
        }
    }
}

impl fmt::Display for JudgeGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JudgeGrade {
    type Err = DomainError;

    /// Exact, upper-case match only; anything else is an invalid grade.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(JudgeGrade::A),
            "B" => Ok(JudgeGrade::B),
            "C" => Ok(JudgeGrade::C),
            "D" => Ok(JudgeGrade::D),
            "E" => Ok(JudgeGrade::E),
            other => Err(DomainError::parse(format!("Invalid judge grade: {:?}", other))),
        }
    }
}

/// Deltas applied for one grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeReward {
    pub trust: i32,
    pub stress: i32,
    /// Percentage of the decision amount added to (or taken from) the wallet
    pub wallet_pct: i32,
    pub xp: i32,
}

impl GradeReward {
    const fn new(trust: i32, stress: i32, wallet_pct: i32, xp: i32) -> Self {
        Self {
            trust,
            stress,
            wallet_pct,
            xp,
        }
    }

    /// `floor(amount * wallet_pct / 100)`, rounding toward negative infinity.
    pub fn wallet_bonus(&self, amount: i64) -> i64 {
        (amount * i64::from(self.wallet_pct)).div_euclid(100)
    }

    /// The reward as typed descriptors, in table order.
    pub fn descriptors(&self) -> [RewardDescriptor; 4] {
        [
            RewardDescriptor::Trust { delta: self.trust },
            RewardDescriptor::Stress { delta: self.stress },
            RewardDescriptor::WalletPercent {
                percent: self.wallet_pct,
            },
            RewardDescriptor::Experience { delta: self.xp },
        ]
    }

    /// One line describing the consequences for a decision of `amount`.
    pub fn describe(&self, amount: i64) -> String {
        self.descriptors()
            .iter()
            .map(|d| d.describe(amount))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A single consequence of a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RewardDescriptor {
    Trust { delta: i32 },
    Stress { delta: i32 },
    WalletPercent { percent: i32 },
    Experience { delta: i32 },
}

impl RewardDescriptor {
    pub fn describe(&self, amount: i64) -> String {
        match self {
            RewardDescriptor::Trust { delta } => format!("{:+} coach trust", delta),
            RewardDescriptor::Stress { delta } => format!("{:+} financial stress", delta),
            RewardDescriptor::WalletPercent { percent } => {
                let bonus = (amount * i64::from(*percent)).div_euclid(100);
                format!("{:+} wallet ({:+}% of ${})", bonus, percent, amount)
            }
            RewardDescriptor::Experience { delta } => format!("{:+} XP", delta),
        }
    }
}
