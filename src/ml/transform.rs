// ============================================================
// Layer 5 — Column Transform
// ============================================================
// Turns a FeatureVector into the dense numeric row the forest
// consumes. Fitted once on the training rows, then frozen inside
// the classifier artifact.
//
//   numeric     → (x - mean) / std     population std; 0 → 1
//   categorical → one-hot over the categories seen in training,
//                 sorted; an unseen value encodes as all zeros
//   binary      → 0 / 1 passed through
//
// Output column order: numeric, then categorical blocks, then
// binary. Schema fields not named in any group are dropped.

use serde::{Deserialize, Serialize};

use crate::domain::error::ScrapeError;
use crate::domain::features::{
    FeatureValue, FeatureVector, BINARY_FEATURES, CATEGORICAL_FEATURES, NUMERIC_FEATURES,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScaledColumn {
    name:  String,
    mean:  f64,
    scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct OneHotColumn {
    name:       String,
    categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransform {
    numeric:     Vec<ScaledColumn>,
    categorical: Vec<OneHotColumn>,
    binary:      Vec<String>,
}

impl ColumnTransform {
    /// Fit on the standard column groups.
    pub fn fit(rows: &[FeatureVector]) -> Result<Self, ScrapeError> {
        Self::fit_columns(rows, &NUMERIC_FEATURES, &CATEGORICAL_FEATURES, &BINARY_FEATURES)
    }

    pub fn fit_columns(
        rows:        &[FeatureVector],
        numeric:     &[&str],
        categorical: &[&str],
        binary:      &[&str],
    ) -> Result<Self, ScrapeError> {

        // ── Step 1: Mean and population std per numeric column ───────────────
        let mut scaled = Vec::with_capacity(numeric.len());
        for name in numeric {
            let values = rows
                .iter()
                .map(|r| number(r, name))
                .collect::<Result<Vec<f64>, _>>()?;

            let n     = values.len().max(1) as f64;
            let mean  = values.iter().sum::<f64>() / n;
            let var   = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std   = var.sqrt();
            let scale = if std > f64::EPSILON { std } else { 1.0 };

            scaled.push(ScaledColumn { name: name.to_string(), mean, scale });
        }

        // ── Step 2: Sorted distinct categories ───────────────────────────────
        let mut one_hot = Vec::with_capacity(categorical.len());
        for name in categorical {
            let mut categories = rows
                .iter()
                .map(|r| category(r, name).map(str::to_string))
                .collect::<Result<Vec<String>, _>>()?;
            categories.sort();
            categories.dedup();

            one_hot.push(OneHotColumn { name: name.to_string(), categories });
        }

        // ── Step 3: Binary columns must exist and be numeric ─────────────────
        if let Some(first) = rows.first() {
            for name in binary {
                number(first, name)?;
            }
        }

        Ok(Self {
            numeric:     scaled,
            categorical: one_hot,
            binary:      binary.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Encode one row. Fails with SchemaMismatch if the row lacks a
    /// fitted column or carries the wrong kind of value in it.
    pub fn transform(&self, row: &FeatureVector) -> Result<Vec<f64>, ScrapeError> {
        let mut out = Vec::with_capacity(self.output_width());

        for col in &self.numeric {
            out.push((number(row, &col.name)? - col.mean) / col.scale);
        }
        for col in &self.categorical {
            let value = category(row, &col.name)?;
            out.extend(col.categories.iter().map(|c| if c == value { 1.0 } else { 0.0 }));
        }
        for name in &self.binary {
            out.push(number(row, name)?);
        }
        Ok(out)
    }

    pub fn transform_all(&self, rows: &[FeatureVector]) -> Result<Vec<Vec<f64>>, ScrapeError> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    pub fn output_width(&self) -> usize {
        self.numeric.len()
            + self.categorical.iter().map(|c| c.categories.len()).sum::<usize>()
            + self.binary.len()
    }

    /// Names of the encoded columns, e.g. "num__depth", "cat__tag_name_h2".
    pub fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.numeric.iter().map(|c| format!("num__{}", c.name)).collect();
        for col in &self.categorical {
            names.extend(col.categories.iter().map(|c| format!("cat__{}_{}", col.name, c)));
        }
        names.extend(self.binary.iter().map(|b| format!("binary__{b}")));
        names
    }
}

fn number(row: &FeatureVector, name: &str) -> Result<f64, ScrapeError> {
    match row.value(name) {
        Some(FeatureValue::Number(v)) => Ok(v),
        other => Err(mismatch(name, "a number", other)),
    }
}

fn category<'a>(row: &'a FeatureVector, name: &str) -> Result<&'a str, ScrapeError> {
    match row.value(name) {
        Some(FeatureValue::Category(c)) => Ok(c),
        other => Err(mismatch(name, "a category", other)),
    }
}

fn mismatch(name: &str, wanted: &str, got: Option<FeatureValue<'_>>) -> ScrapeError {
    ScrapeError::SchemaMismatch {
        expected: format!("column '{name}' holding {wanted}"),
        found:    match got {
            None    => "no such column".to_string(),
            Some(v) => format!("{v:?}"),
        },
    }
}
