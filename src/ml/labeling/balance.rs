use crate::types::Direction;
use serde::{Deserialize, Serialize};

/// Majority/minority ratio above which a label set counts as imbalanced
pub const IMBALANCE_THRESHOLD: f64 = 1.5;

/// Up/down label distribution
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassBalance {
    pub total_count: usize,
    pub up_count: usize,
    pub down_count: usize,
    pub up_pct: f64,
    pub down_pct: f64,
}

impl ClassBalance {
    pub fn from_labels(labels: &[Direction]) -> Self {
        let up_count = labels.iter().filter(|&&l| l == Direction::Up).count();
        let total_count = labels.len();
        let down_count = total_count - up_count;

        let pct = |count: usize| {
            if total_count == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total_count as f64
            }
        };

        Self {
            total_count,
            up_count,
            down_count,
            up_pct: pct(up_count),
            down_pct: pct(down_count),
        }
    }

    pub fn has_both_classes(&self) -> bool {
        self.up_count > 0 && self.down_count > 0
    }

    /// The only class present, if the set is single-class
    pub fn sole_class(&self) -> Option<Direction> {
        match (self.up_count, self.down_count) {
            (0, d) if d > 0 => Some(Direction::Down),
            (u, 0) if u > 0 => Some(Direction::Up),
            _ => None,
        }
    }

    /// Majority count over minority count; `None` when a class is absent
    pub fn imbalance_ratio(&self) -> Option<f64> {
        if !self.has_both_classes() {
            return None;
        }
        let (hi, lo) = if self.up_count >= self.down_count {
            (self.up_count, self.down_count)
        } else {
            (self.down_count, self.up_count)
        };
        Some(hi as f64 / lo as f64)
    }

    pub fn is_imbalanced(&self) -> bool {
        self.imbalance_ratio()
            .map_or(true, |ratio| ratio > IMBALANCE_THRESHOLD)
    }
}

/// Negative-to-positive count ratio used to up-weight the positive class.
///
/// Computed from one fold's training labels only; 1.0 when either class is
/// absent.
pub fn class_balance_weight(labels: &[Direction]) -> f64 {
    let balance = ClassBalance::from_labels(labels);
    if balance.has_both_classes() {
        balance.down_count as f64 / balance.up_count as f64
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{Down, Up};

    #[test]
    fn test_weight_is_negative_over_positive() {
        assert_eq!(class_balance_weight(&[Up, Down, Down, Down]), 3.0);
        assert_eq!(class_balance_weight(&[Up, Up, Up, Down]), 1.0 / 3.0);
    }

    #[test]
    fn test_weight_defaults_to_one_for_single_class() {
        assert_eq!(class_balance_weight(&[Down, Down]), 1.0);
        assert_eq!(class_balance_weight(&[Up]), 1.0);
        assert_eq!(class_balance_weight(&[]), 1.0);
    }

    #[test]
    fn test_single_positive_gives_extreme_weight() {
        let mut labels = vec![Down; 40];
        labels.push(Up);
        assert_eq!(class_balance_weight(&labels), 40.0);
    }

    #[test]
    fn test_imbalance_flag() {
        let balanced = ClassBalance::from_labels(&[Up, Down, Up, Down, Up]);
        assert_eq!(balanced.imbalance_ratio(), Some(1.5));
        assert!(!balanced.is_imbalanced());

        let skewed = ClassBalance::from_labels(&[Up, Up, Up, Up, Down]);
        assert!(skewed.is_imbalanced());
        assert_eq!(skewed.up_pct, 80.0);
        assert_eq!(ClassBalance::from_labels(&[Down]).sole_class(), Some(Down));
    }
}
