// ============================================================
// Layer 6 — Evaluation Metrics
// ============================================================
// Scores the forest on the held-out split and records the result.
//
// Metrics per role (over the union of true and predicted roles,
// sorted by role name):
//   - precision: of the nodes predicted as this role, how many were
//   - recall:    of the nodes that are this role, how many were found
//   - f1:        harmonic mean of the two
//   - support:   number of true nodes of this role
// A ratio with a zero denominator is reported as 0.
//
// Plus accuracy, the macro average (plain mean over roles) and
// the weighted average (mean weighted by support).
//
// Output file: models/evaluation.csv
//
//   label,precision,recall,f1,support
//   Image_URL,1.000000,0.900000,0.947368,10
//   ...
//   accuracy,,,0.981000,300

use anyhow::Result;
use std::{
    fmt,
    fs,
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

use crate::domain::role::Role;

pub const EVALUATION_FILE: &str = "evaluation.csv";

/// Scores for one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub role:      Role,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub support:   usize,
}

/// Precision / recall / F1 averaged over roles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Averages {
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes:      Vec<ClassMetrics>,
    pub accuracy:     f64,
    pub macro_avg:    Averages,
    pub weighted_avg: Averages,
    pub total:        usize,
}

impl ClassificationReport {
    /// Compare true and predicted roles, position by position.
    pub fn compute(truth: &[Role], predicted: &[Role]) -> Self {
        let mut labels: Vec<Role> = truth.iter().chain(predicted).copied().collect();
        labels.sort_by_key(|r| r.as_str());
        labels.dedup();

        let pairs = || truth.iter().zip(predicted);

        let classes: Vec<ClassMetrics> = labels
            .iter()
            .map(|&role| {
                let tp      = pairs().filter(|(t, p)| **t == role && **p == role).count();
                let pred    = pairs().filter(|(_, p)| **p == role).count();
                let support = pairs().filter(|(t, _)| **t == role).count();

                let precision = ratio(tp, pred);
                let recall    = ratio(tp, support);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics { role, precision, recall, f1, support }
            })
            .collect();

        let total   = truth.len().min(predicted.len());
        let correct = pairs().filter(|(t, p)| t == p).count();

        let n = classes.len().max(1) as f64;
        let macro_avg = Averages {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
            recall:    classes.iter().map(|c| c.recall).sum::<f64>() / n,
            f1:        classes.iter().map(|c| c.f1).sum::<f64>() / n,
        };

        let w = classes.iter().map(|c| c.support).sum::<usize>().max(1) as f64;
        let weighted_avg = Averages {
            precision: classes.iter().map(|c| c.precision * c.support as f64).sum::<f64>() / w,
            recall:    classes.iter().map(|c| c.recall * c.support as f64).sum::<f64>() / w,
            f1:        classes.iter().map(|c| c.f1 * c.support as f64).sum::<f64>() / w,
        };

        Self { classes, accuracy: ratio(correct, total), macro_avg, weighted_avg, total }
    }

    pub fn class(&self, role: Role) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.role == role)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.role.as_str(), c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>12} {:>9} {:>9} {:>9.2} {:>9}", "accuracy", "", "", self.accuracy, self.total)?;
        for (name, avg) in [("macro avg", self.macro_avg), ("weighted avg", self.weighted_avg)] {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, self.total
            )?;
        }
        Ok(())
    }
}

/// Writes evaluation reports to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the directory if needed. Each run overwrites the previous file.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { csv_path: dir.join(EVALUATION_FILE) })
    }

    pub fn log(&self, report: &ClassificationReport) -> Result<()> {
        let mut f = fs::File::create(&self.csv_path)?;

        writeln!(f, "label,precision,recall,f1,support")?;
        for c in &report.classes {
            writeln!(f, "{},{:.6},{:.6},{:.6},{}", c.role, c.precision, c.recall, c.f1, c.support)?;
        }
        writeln!(f, "accuracy,,,{:.6},{}", report.accuracy, report.total)?;
        for (name, avg) in [("macro avg", report.macro_avg), ("weighted avg", report.weighted_avg)] {
            writeln!(f, "{},{:.6},{:.6},{:.6},{}", name, avg.precision, avg.recall, avg.f1, report.total)?;
        }

        tracing::debug!("Wrote evaluation to '{}'", self.csv_path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
