//! Data models for the CGPA calculator.
//!
//! This module contains the semester record and the performance remarks
//! attached to computed results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Editable field of a semester record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Sum of (credit x grade point) for the semester.
    Score,
    /// Total credits for the semester.
    Credit,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Score => write!(f, "score"),
            Field::Credit => write!(f, "credit"),
        }
    }
}

/// A single semester entry.
///
/// Both numeric fields are kept as the text the user entered. An empty
/// string means the field has not been filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterRecord {
    /// Stable identity within the session (1-indexed).
    pub id: u32,
    /// C*G score text.
    pub score: String,
    /// Credit text.
    pub credit: String,
}

impl SemesterRecord {
    /// Creates a record with empty numeric fields.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            score: String::new(),
            credit: String::new(),
        }
    }

    /// Returns the text stored in `field`.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Score => &self.score,
            Field::Credit => &self.credit,
        }
    }

    /// Mutable access to the text stored in `field`.
    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Score => &mut self.score,
            Field::Credit => &mut self.credit,
        }
    }

    /// True when neither field has been filled in.
    pub fn is_blank(&self) -> bool {
        self.score.is_empty() && self.credit.is_empty()
    }
}

/// Performance tier for a computed CGPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CgpaRemark {
    Outstanding,
    Excellent,
    Good,
    KeepImproving,
    CanDoBetter,
}

impl CgpaRemark {
    pub fn for_cgpa(cgpa: f64) -> Self {
        if cgpa >= 8.0 {
            CgpaRemark::Outstanding
        } else if cgpa >= 7.0 {
            CgpaRemark::Excellent
        } else if cgpa >= 6.0 {
            CgpaRemark::Good
        } else if cgpa >= 5.0 {
            CgpaRemark::KeepImproving
        } else {
            CgpaRemark::CanDoBetter
        }
    }

    /// Returns an emoji representation of the tier.
    pub fn emoji(&self) -> &'static str {
        match self {
            CgpaRemark::Outstanding => "🏆",
            CgpaRemark::Excellent => "🎉",
            CgpaRemark::Good => "👍",
            CgpaRemark::KeepImproving => "📈",
            CgpaRemark::CanDoBetter => "💪",
        }
    }
}

impl fmt::Display for CgpaRemark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CgpaRemark::Outstanding => write!(f, "Outstanding Performance!"),
            CgpaRemark::Excellent => write!(f, "Excellent Performance!"),
            CgpaRemark::Good => write!(f, "Good Performance!"),
            CgpaRemark::KeepImproving => write!(f, "Keep Improving!"),
            CgpaRemark::CanDoBetter => write!(f, "You Can Do Better!"),
        }
    }
}

/// Performance tier for a computed percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageRemark {
    Exceptional,
    Outstanding,
    VeryGood,
    Good,
    KeepWorkingHard,
}

impl PercentageRemark {
    pub fn for_percentage(percentage: f64) -> Self {
        if percentage >= 85.0 {
            PercentageRemark::Exceptional
        } else if percentage >= 75.0 {
            PercentageRemark::Outstanding
        } else if percentage >= 65.0 {
            PercentageRemark::VeryGood
        } else if percentage >= 55.0 {
            PercentageRemark::Good
        } else {
            PercentageRemark::KeepWorkingHard
        }
    }

    /// Returns an emoji representation of the tier.
    pub fn emoji(&self) -> &'static str {
        match self {
            PercentageRemark::Exceptional => "🌟",
            PercentageRemark::Outstanding => "✨",
            PercentageRemark::VeryGood => "👍",
            PercentageRemark::Good => "📚",
            PercentageRemark::KeepWorkingHard => "🔥",
        }
    }
}

impl fmt::Display for PercentageRemark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentageRemark::Exceptional => write!(f, "Exceptional!"),
            PercentageRemark::Outstanding => write!(f, "Outstanding!"),
            PercentageRemark::VeryGood => write!(f, "Very Good!"),
            PercentageRemark::Good => write!(f, "Good!"),
            PercentageRemark::KeepWorkingHard => write!(f, "Keep Working Hard!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_blank() {
        let record = SemesterRecord::new(3);
        assert_eq!(record.id, 3);
        assert!(record.is_blank());
        assert_eq!(record.get(Field::Score), "");
        assert_eq!(record.get(Field::Credit), "");
    }

    #[test]
    fn test_field_access() {
        let mut record = SemesterRecord::new(1);
        record.get_mut(Field::Credit).push_str("18");
        assert_eq!(record.credit, "18");
        assert_eq!(record.get(Field::Credit), "18");
        assert!(!record.is_blank());
    }

    #[test]
    fn test_cgpa_remark_tiers() {
        assert_eq!(CgpaRemark::for_cgpa(9.1), CgpaRemark::Outstanding);
        assert_eq!(CgpaRemark::for_cgpa(8.0), CgpaRemark::Outstanding);
        assert_eq!(CgpaRemark::for_cgpa(7.0), CgpaRemark::Excellent);
        assert_eq!(CgpaRemark::for_cgpa(6.5), CgpaRemark::Good);
        assert_eq!(CgpaRemark::for_cgpa(5.0), CgpaRemark::KeepImproving);
        assert_eq!(CgpaRemark::for_cgpa(4.99), CgpaRemark::CanDoBetter);
    }

    #[test]
    fn test_percentage_remark_tiers() {
        assert_eq!(
            PercentageRemark::for_percentage(85.0),
            PercentageRemark::Exceptional
        );
        assert_eq!(
            PercentageRemark::for_percentage(80.0),
            PercentageRemark::Outstanding
        );
        assert_eq!(
            PercentageRemark::for_percentage(65.0),
            PercentageRemark::VeryGood
        );
        assert_eq!(PercentageRemark::for_percentage(55.5), PercentageRemark::Good);
        assert_eq!(
            PercentageRemark::for_percentage(40.0),
            PercentageRemark::KeepWorkingHard
        );
    }

    #[test]
    fn test_remark_display() {
        assert_eq!(CgpaRemark::Excellent.to_string(), "Excellent Performance!");
        assert_eq!(PercentageRemark::VeryGood.to_string(), "Very Good!");
        assert_eq!(Field::Score.to_string(), "score");
    }
}
