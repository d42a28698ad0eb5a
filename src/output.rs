use crate::document::{to_markdown, Section};
use crate::error::Result;
use crate::types::{ItemScoreRow, ReportDataset};
use crate::util::fixed;
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn item_rows(dataset: &ReportDataset) -> Vec<ItemScoreRow> {
    dataset
        .index
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| ItemScoreRow {
            no: i + 1,
            label: item.label.clone(),
            average: fixed(item.average, 2),
            converted: fixed(item.converted, 2),
            grade: item.grade.letter().to_string(),
        })
        .collect()
}

/// Filename-safe version of the institution name.
fn file_stem(dataset: &ReportDataset) -> String {
    let name = dataset.info.institution_name().unwrap_or("Instansi");
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("Laporan_SKM_{}", stem.trim_matches('_'))
}

/// Write the rendered report (Markdown), the dataset (JSON) and the item
/// scores (CSV) into `dir`.
pub fn export_report(
    dir: &Path,
    dataset: &ReportDataset,
    sections: &[Section],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let stem = file_stem(dataset);

    let report = dir.join(format!("{stem}.md"));
    std::fs::write(&report, to_markdown(sections))?;
    let data = dir.join(format!("{stem}_data.json"));
    write_json(&data, dataset)?;
    let items = dir.join(format!("{stem}_unsur.csv"));
    write_csv(&items, &item_rows(dataset))?;

    for p in [&report, &data, &items] {
        info!("Wrote {}", p.display());
    }
    Ok(vec![report, data, items])
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{render, RenderOptions};
    use crate::engine::process;
    use crate::testutil::sample_workbook;
    use chrono::NaiveDate;

    #[test]
    fn exports_three_files() {
        let ds = process(&sample_workbook()).unwrap();
        let sections = render(
            &ds,
            &RenderOptions {
                generated_on: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                city: "Kuningan".to_string(),
            },
        );
        let dir = tempfile::tempdir().unwrap();
        let paths = export_report(dir.path(), &ds, &sections).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "Laporan_SKM_Dinas_Kependudukan_dan_Pencatatan_Sipil.md",
                "Laporan_SKM_Dinas_Kependudukan_dan_Pencatatan_Sipil_data.json",
                "Laporan_SKM_Dinas_Kependudukan_dan_Pencatatan_Sipil_unsur.csv",
            ]
        );

        let csv_text = std::fs::read_to_string(&paths[2]).unwrap();
        let mut lines = csv_text.lines();
        assert_eq!(lines.next(), Some("No,Unsur,RataRata,NilaiKonversi,Mutu"));
        assert_eq!(lines.next(), Some("1,U1. Persyaratan,3.33,83.33,B"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths[1]).unwrap()).unwrap();
        assert_eq!(json["minimum_sample"], 331);
        assert_eq!(json["index"]["grade"], "B");
    }

    #[test]
    fn item_rows_use_two_decimals() {
        let ds = process(&sample_workbook()).unwrap();
        let rows = item_rows(&ds);
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[3].converted, "91.67");
        assert_eq!(rows[3].grade, "A");
    }
}
