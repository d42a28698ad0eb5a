use crate::types::{CategoryCount, DemographicBreakdown, RawResponse, UNKNOWN_CATEGORY};
use crate::util::round_half_up;
use std::collections::HashMap;

/// Normalized category label: trimmed and upper-cased, with blanks mapped
/// to [`UNKNOWN_CATEGORY`].
pub fn normalize_label(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_uppercase(),
        _ => UNKNOWN_CATEGORY.to_string(),
    }
}

/// Count and percentage of each value of `column`.
///
/// Every observed category is kept, in first-observed order. Display
/// ordering is left to [`DemographicBreakdown::ordered`].
pub fn aggregate<'a, I>(responses: I, column: &str) -> DemographicBreakdown
where
    I: IntoIterator<Item = RawResponse<'a>>,
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;
    for r in responses {
        total += 1;
        let label = normalize_label(r.get(column));
        let e = counts.entry(label.clone()).or_insert_with(|| {
            order.push(label);
            0
        });
        *e += 1;
    }

    let categories = order
        .into_iter()
        .map(|label| {
            let count = counts.get(&label).copied().unwrap_or(0);
            let percentage = if total == 0 {
                0.0
            } else {
                round_half_up(count as f64 / total as f64 * 100.0, 1)
            };
            CategoryCount {
                label,
                count,
                percentage,
            }
        })
        .collect();

    DemographicBreakdown { total, categories }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Table, COL_EDUCATION, COL_GENDER, SHEET_RESPONSES};

    fn table(values: &[&str]) -> Table {
        Table::new(
            SHEET_RESPONSES,
            vec![COL_GENDER.to_string()],
            values.iter().map(|v| vec![v.to_string()]).collect(),
        )
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let t = table(&["p", " P ", "L"]);
        let b = aggregate(t.responses(), COL_GENDER);
        assert_eq!(b.categories.len(), 2);
        assert_eq!(b.get("P").map(|c| c.count), Some(2));
        assert_eq!(b.get("P").map(|c| c.percentage), Some(66.7));
        assert_eq!(b.get("L").map(|c| c.percentage), Some(33.3));
    }

    #[test]
    fn blanks_and_missing_columns_become_unknown() {
        let t = table(&["", "  ", "L"]);
        let b = aggregate(t.responses(), COL_GENDER);
        assert_eq!(b.get(UNKNOWN_CATEGORY).map(|c| c.count), Some(2));

        let b = aggregate(t.responses(), COL_EDUCATION);
        assert_eq!(b.categories.len(), 1);
        assert_eq!(b.categories[0].label, UNKNOWN_CATEGORY);
        assert_eq!(b.categories[0].percentage, 100.0);
    }

    #[test]
    fn counts_always_sum_to_total() {
        let t = table(&["L", "P", "P", "", "x", "L", "p"]);
        let b = aggregate(t.responses(), COL_GENDER);
        assert_eq!(b.total, 7);
        assert_eq!(b.counted(), 7);
    }

    #[test]
    fn keeps_first_observed_order() {
        let t = table(&["P", "L", "P"]);
        let b = aggregate(t.responses(), COL_GENDER);
        let labels: Vec<_> = b.categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["P", "L"]);
    }

    #[test]
    fn empty_input_has_no_categories() {
        let t = table(&[]);
        let b = aggregate(t.responses(), COL_GENDER);
        assert_eq!(b.total, 0);
        assert!(b.categories.is_empty());
    }
}
