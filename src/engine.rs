// Survey aggregation: one workbook in, one ReportDataset out.
//
// The whole transformation either succeeds or returns an error; no partial
// dataset ever leaves this module.
use crate::aggregate::aggregate;
use crate::error::{Result, SkmError};
use crate::sample::minimum_sample;
use crate::scoring::score;
use crate::types::{
    Demographics, InstitutionInfo, Narrative, ReportDataset, Table, Timeline, TrendSeries,
    Workbook, COL_EDUCATION, COL_FEEDBACK, COL_GENDER, COL_OCCUPATION, COL_SERVICE, ITEM_KEYS,
    SHEET_INFO, SHEET_RESPONSES, TREND_PREFIX,
};
use crate::util::parse_f64_strict;
use log::{info, warn};

/// Split the `Info_Umum` key/value rows into institution entries and the
/// historical trend series.
pub fn parse_info(table: &Table) -> (InstitutionInfo, TrendSeries) {
    let mut info = InstitutionInfo::default();
    let mut trends = TrendSeries::default();
    for row in &table.rows {
        let key = row.first().map(|k| k.trim()).unwrap_or("");
        let value = row.get(1).map(|v| v.trim()).unwrap_or("");
        if let Some(year) = key.strip_prefix(TREND_PREFIX) {
            let year = year.trim();
            match parse_f64_strict(Some(value)) {
                Some(v) => {
                    if trends.0.insert(year.to_string(), v).is_some() {
                        warn!("Duplicate trend year {}; keeping the later value", year);
                    }
                }
                None => warn!("Trend value for {} is not a number: {:?}", year, value),
            }
        } else if !key.is_empty() {
            info.entries.insert(key.to_string(), value.to_string());
        }
    }
    (info, trends)
}

/// Timeline rows are passed through; fully blank rows are dropped.
pub fn parse_timeline(table: Option<&Table>) -> Timeline {
    match table {
        Some(t) => Timeline {
            headers: t.headers.clone(),
            rows: t
                .rows
                .iter()
                .filter(|r| r.iter().any(|c| !c.trim().is_empty()))
                .cloned()
                .collect(),
        },
        None => Timeline::default(),
    }
}

/// Comments joined with `"; "` in row order, blanks skipped.
pub fn collect_feedback(table: &Table) -> String {
    table
        .responses()
        .filter_map(|r| r.get(COL_FEEDBACK))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Build the report dataset from one upload.
///
/// Fails with [`SkmError::Schema`] when `Info_Umum` or `Data_Survei_Mentah`
/// is missing, [`SkmError::EmptyDataset`] when there are no responses and
/// [`SkmError::MissingColumn`] when an item column is absent.
pub fn process(workbook: &Workbook) -> Result<ReportDataset> {
    let info_sheet = workbook
        .info
        .as_ref()
        .ok_or_else(|| SkmError::missing_sheet(SHEET_INFO))?;
    let (info, trends) = parse_info(info_sheet);

    let timeline = parse_timeline(workbook.timeline.as_ref());

    let responses = workbook
        .responses
        .as_ref()
        .ok_or_else(|| SkmError::missing_sheet(SHEET_RESPONSES))?;
    if responses.is_empty() {
        return Err(SkmError::EmptyDataset {
            sheet: responses.name.clone(),
        });
    }
    for key in ITEM_KEYS {
        if !responses.has_column(key) {
            return Err(SkmError::missing_column(&responses.name, key));
        }
    }

    let demographics = Demographics {
        total: responses.len(),
        gender: aggregate(responses.responses(), COL_GENDER),
        education: aggregate(responses.responses(), COL_EDUCATION),
        occupation: aggregate(responses.responses(), COL_OCCUPATION),
        service: aggregate(responses.responses(), COL_SERVICE),
    };

    let index = score(responses, &ITEM_KEYS)?;
    let feedback = collect_feedback(responses);
    let minimum_sample = minimum_sample(info.population());

    info!(
        "Processed {} respondents: IKM {:.2} ({}), minimum sample {}",
        demographics.total,
        index.composite,
        index.grade.letter(),
        minimum_sample
    );

    Ok(ReportDataset {
        info,
        trends,
        timeline,
        demographics,
        index,
        feedback,
        minimum_sample,
        narrative: Narrative::default(),
    })
}
