// Spreadsheet ingestion: each sheet of the survey workbook is a CSV file
// named after the sheet (`Info_Umum.csv`, ...) inside one directory.
use crate::error::Result;
use crate::types::{Table, Workbook, SHEET_INFO, SHEET_RESPONSES, SHEET_TIMELINE};
use csv::ReaderBuilder;
use log::{debug, info};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub info_rows: usize,
    pub timeline_rows: usize,
    pub response_rows: usize,
    pub blank_rows: usize,
}

pub fn sheet_path(dir: &Path, sheet: &str) -> PathBuf {
    dir.join(format!("{sheet}.csv"))
}

/// Read one sheet. A missing file is `Ok(None)` so the engine can report
/// which sheet is absent; blank rows are skipped and counted.
pub fn read_sheet(dir: &Path, sheet: &str, blank_rows: &mut usize) -> Result<Option<Table>> {
    let path = sheet_path(dir, sheet);
    let mut rdr = match ReaderBuilder::new().flexible(true).from_path(&path) {
        Ok(r) => r,
        Err(e) => {
            if let csv::ErrorKind::Io(io_err) = e.kind() {
                if io_err.kind() == io::ErrorKind::NotFound {
                    debug!("{} not present", path.display());
                    return Ok(None);
                }
            }
            return Err(e.into());
        }
    };

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|c| c.trim().is_empty()) {
            *blank_rows += 1;
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Some(Table::new(sheet, headers, rows)))
}

pub fn load_workbook(dir: &Path) -> Result<(Workbook, LoadReport)> {
    let mut blank_rows = 0usize;
    let info_sheet = read_sheet(dir, SHEET_INFO, &mut blank_rows)?;
    let timeline = read_sheet(dir, SHEET_TIMELINE, &mut blank_rows)?;
    let responses = read_sheet(dir, SHEET_RESPONSES, &mut blank_rows)?;

    let report = LoadReport {
        info_rows: info_sheet.as_ref().map_or(0, Table::len),
        timeline_rows: timeline.as_ref().map_or(0, Table::len),
        response_rows: responses.as_ref().map_or(0, Table::len),
        blank_rows,
    };
    info!(
        "Loaded workbook from {}: {} responses, {} metadata rows",
        dir.display(),
        report.response_rows,
        report.info_rows
    );
    Ok((
        Workbook {
            info: info_sheet,
            timeline,
            responses,
        },
        report,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;

    #[test]
    fn missing_files_are_none() {
        let dir = tempfile::tempdir().unwrap();
        let (wb, report) = load_workbook(dir.path()).unwrap();
        assert_eq!(wb, Workbook::default());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn reads_headers_rows_and_skips_blanks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            sheet_path(dir.path(), SHEET_TIMELINE),
            indoc! {"
                No.,Kegiatan,Waktu Pelaksanaan,Jumlah Hari Kerja
                1,Persiapan,Januari 2025,8
                ,,,
                2,\"Pengolahan Data, Analisis\",Mei 2025,10
            "},
        )
        .unwrap();
        let mut blank = 0;
        let t = read_sheet(dir.path(), SHEET_TIMELINE, &mut blank)
            .unwrap()
            .unwrap();
        assert_eq!(t.name, SHEET_TIMELINE);
        assert_eq!(t.headers[3], "Jumlah Hari Kerja");
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[1][1], "Pengolahan Data, Analisis");
        assert_eq!(blank, 1);
    }
}
