use crate::error::{Result, SkmError};
use crate::types::{Grade, IndexScore, ItemScore, Table, ITEM_KEYS, ITEM_LABELS};
use crate::util::{coerce_score, short_code};
use log::warn;

/// Multiplier from the 1..4 answer scale to the 25..100 index scale.
pub const CONVERSION_FACTOR: f64 = 25.0;

// Lower bounds of the A, B and C bands. Each bound is exclusive.
const GRADE_A_ABOVE: f64 = 88.31;
const GRADE_B_ABOVE: f64 = 76.61;
const GRADE_C_ABOVE: f64 = 65.00;

impl Grade {
    /// Band for a converted (25..100) score.
    pub fn from_score(score: f64) -> Self {
        if score > GRADE_A_ABOVE {
            Grade::A
        } else if score > GRADE_B_ABOVE {
            Grade::B
        } else if score > GRADE_C_ABOVE {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::A => "Sangat Baik",
            Grade::B => "Baik",
            Grade::C => "Kurang Baik",
            Grade::D => "Tidak Baik",
        }
    }
}

/// Display label for an item column, falling back to the column name.
pub fn item_label(key: &str) -> &str {
    ITEM_KEYS
        .iter()
        .position(|k| *k == key)
        .map(|i| ITEM_LABELS[i])
        .unwrap_or(key)
}

/// Per-item and composite satisfaction index over the response sheet.
///
/// The schema is checked before any row is read: every key in `item_keys`
/// must be a column of `table`. Non-numeric or missing cells count as 0.
/// Every item carries the same weight, so the composite is the mean of the
/// converted item scores.
pub fn score(table: &Table, item_keys: &[&str]) -> Result<IndexScore> {
    for key in item_keys {
        if !table.has_column(key) {
            return Err(SkmError::missing_column(&table.name, key));
        }
    }
    let n = table.len();
    if n == 0 {
        return Err(SkmError::EmptyDataset {
            sheet: table.name.clone(),
        });
    }

    let weight = 1.0 / item_keys.len() as f64;
    let mut weighted = 0.0;
    let mut items = Vec::with_capacity(item_keys.len());
    for key in item_keys {
        let mut sum = 0.0;
        let mut coerced = 0usize;
        for r in table.responses() {
            let (v, ok) = coerce_score(r.get(key));
            if !ok {
                coerced += 1;
            }
            sum += v;
        }
        if coerced > 0 {
            warn!(
                "{}: {} cell(s) missing, non-numeric or off-scale, counted as 0",
                short_code(key),
                coerced
            );
        }
        let average = sum / n as f64;
        let converted = average * CONVERSION_FACTOR;
        weighted += average * weight;
        items.push(ItemScore {
            key: key.to_string(),
            label: item_label(key).to_string(),
            average,
            converted,
            grade: Grade::from_score(converted),
        });
    }

    let composite = weighted * CONVERSION_FACTOR;
    Ok(IndexScore {
        items,
        composite,
        grade: Grade::from_score(composite),
    })
}
