use super::fold::FoldOutcome;
use super::walk_forward::WalkForwardReport;
use crate::engines::metrics::{ClassificationMetrics, MetricSummary, Robustness};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One metric in the comparison: a single score, or a fold mean with its spread
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricCell {
    pub value: f64,
    pub std: Option<f64>,
}

impl MetricCell {
    pub fn single(value: f64) -> Self {
        Self { value, std: None }
    }

    pub fn summary(summary: &MetricSummary) -> Self {
        Self {
            value: summary.mean,
            std: Some(summary.std),
        }
    }
}

impl fmt::Display for MetricCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.std {
            Some(std) => write!(f, "{:.4} ± {:.4}", self.value, std),
            None => write!(f, "{:.4}", self.value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonScores {
    pub accuracy: MetricCell,
    pub precision: MetricCell,
    pub recall: MetricCell,
    pub f1: MetricCell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validation {
    StaticSplit,
    WalkForward { folds: usize, scored: usize },
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticSplit => write!(f, "static split"),
            Self::WalkForward { folds, scored } => {
                write!(f, "walk-forward ({} of {} folds)", scored, folds)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub label: String,
    pub model: String,
    pub validation: Validation,
    /// `None` when the evaluation produced no metrics
    pub scores: Option<ComparisonScores>,
    pub robustness: Option<Robustness>,
    pub note: Option<String>,
}

/// Side-by-side metrics of every evaluated model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub rows: Vec<ComparisonRow>,
}

impl ModelComparison {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_holdout(&mut self, label: &str, model: &str, outcome: &FoldOutcome) -> &mut Self {
        let (scores, note) = match outcome {
            FoldOutcome::Scored { metrics } => (Some(single_scores(metrics)), None),
            FoldOutcome::Failed { stage, reason } => {
                (None, Some(format!("failed at {:?}: {}", stage, reason)))
            }
        };
        self.rows.push(ComparisonRow {
            label: label.to_string(),
            model: model.to_string(),
            validation: Validation::StaticSplit,
            scores,
            robustness: None,
            note,
        });
        self
    }

    pub fn add_walk_forward(&mut self, label: &str, model: &str, report: &WalkForwardReport) -> &mut Self {
        let scores = report.aggregate.as_ref().map(|agg| ComparisonScores {
            accuracy: MetricCell::summary(&agg.accuracy),
            precision: MetricCell::summary(&agg.precision),
            recall: MetricCell::summary(&agg.recall),
            f1: MetricCell::summary(&agg.f1),
        });
        let note = if scores.is_none() {
            Some("no fold was scored".to_string())
        } else {
            None
        };
        self.rows.push(ComparisonRow {
            label: label.to_string(),
            model: model.to_string(),
            validation: Validation::WalkForward {
                folds: report.total_folds,
                scored: report.succeeded_folds,
            },
            scores,
            robustness: report.aggregate.as_ref().and_then(|agg| agg.robustness()),
            note,
        });
        self
    }

    pub fn row(&self, label: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Fixed-width text table, one line per row
    pub fn render(&self) -> String {
        let mut out = format!(
            "{:<12} {:<20} {:<28} {:<17} {:<17} {:<17} {:<17}\n",
            "label", "model", "validation", "accuracy", "precision", "recall", "f1"
        );
        for row in &self.rows {
            let cells: [String; 4] = match &row.scores {
                Some(s) => [
                    s.accuracy.to_string(),
                    s.precision.to_string(),
                    s.recall.to_string(),
                    s.f1.to_string(),
                ],
                None => Default::default(),
            };
            out.push_str(&format!(
                "{:<12} {:<20} {:<28} {:<17} {:<17} {:<17} {:<17}",
                row.label,
                row.model,
                row.validation.to_string(),
                cells[0],
                cells[1],
                cells[2],
                cells[3]
            ));
            if let Some(grade) = row.robustness {
                out.push_str(&format!(" robustness {}", grade));
            }
            if let Some(note) = &row.note {
                out.push_str(&format!(" ({})", note));
            }
            out.push('\n');
        }
        out
    }
}

fn single_scores(metrics: &ClassificationMetrics) -> ComparisonScores {
    ComparisonScores {
        accuracy: MetricCell::single(metrics.accuracy),
        precision: MetricCell::single(metrics.precision),
        recall: MetricCell::single(metrics.recall),
        f1: MetricCell::single(metrics.f1),
    }
}
