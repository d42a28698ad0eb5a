// Blank input template: the three sheets with example content, written as
// CSV files the loader reads back.
use crate::error::Result;
use crate::loader::sheet_path;
use crate::types::{
    COL_EDUCATION, COL_FEEDBACK, COL_GENDER, COL_OCCUPATION, COL_SERVICE, INFO_FKP_DATE,
    INFO_INSTITUTION, INFO_OFFICER, INFO_OFFICER_NIP, INFO_PERIOD, INFO_POPULATION,
    INFO_SERVICES, INFO_UNIT, INFO_YEAR, ITEM_KEYS, SHEET_INFO, SHEET_RESPONSES,
    SHEET_TIMELINE, TREND_PREFIX,
};
use log::info;
use std::path::{Path, PathBuf};

fn write_rows(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    for r in rows {
        wtr.write_record(r)?;
    }
    wtr.flush()?;
    Ok(())
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

pub fn info_rows(year: i32) -> Vec<Vec<String>> {
    let year = year.to_string();
    vec![
        row(&["Parameter", "Isi Data"]),
        row(&[INFO_INSTITUTION, "Contoh: Dinas Kependudukan dan Pencatatan Sipil"]),
        row(&[INFO_UNIT, ""]),
        row(&[INFO_PERIOD, "I"]),
        row(&[INFO_YEAR, year.as_str()]),
        row(&[INFO_SERVICES, "Layanan KTP, Layanan KK, Layanan Akta"]),
        row(&[INFO_POPULATION, "2400"]),
        row(&[INFO_OFFICER, "Nama Kepala Dinas"]),
        row(&[INFO_OFFICER_NIP, "19..."]),
        row(&[INFO_FKP_DATE, "2025-07-04"]),
        row(&[format!("{TREND_PREFIX}2023").as_str(), "78.20"]),
        row(&[format!("{TREND_PREFIX}2024").as_str(), "80.10"]),
    ]
}

pub fn timeline_rows() -> Vec<Vec<String>> {
    vec![
        row(&["No.", "Kegiatan", "Waktu Pelaksanaan", "Jumlah Hari Kerja"]),
        row(&["1", "Persiapan", "Januari 2025", "8"]),
        row(&["2", "Pengumpulan Data", "Februari-April 2025", "60"]),
        row(&["3", "Pengolahan Data dan Analisis Hasil", "Mei 2025", "10"]),
        row(&["4", "Penyusunan dan Pelaporan Hasil", "Mei-Juni 2025", "15"]),
    ]
}

pub fn response_rows() -> Vec<Vec<String>> {
    let mut header = row(&["No", COL_GENDER, COL_EDUCATION, COL_OCCUPATION, COL_SERVICE]);
    header.extend(ITEM_KEYS.iter().map(|k| k.to_string()));
    header.push(COL_FEEDBACK.to_string());
    vec![
        header,
        row(&[
            "1", "P", "S-1", "SWASTA", "Layanan KTP",
            "3", "2", "2", "4", "4", "3", "2", "3", "4",
            "Waktu pelayanan terlalu lama, harus bolak-balik.",
        ]),
        row(&[
            "2", "L", "SLTA", "WIRAUSAHA", "Layanan KK",
            "4", "3", "3", "4", "4", "4", "3", "4", "4",
            "Petugas sudah ramah dan membantu, tapi loket perlu ditambah.",
        ]),
        row(&[
            "3", "P", "S-2", "PNS", "Layanan Akta",
            "3", "2", "2", "3", "3", "3", "2", "3", "3",
            "Prosedur online masih agak membingungkan, perlu sosialisasi.",
        ]),
    ]
}

/// Write the three template sheets into `dir` and return their paths.
pub fn write_template(dir: &Path, year: i32) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let sheets = [
        (SHEET_INFO, info_rows(year)),
        (SHEET_TIMELINE, timeline_rows()),
        (SHEET_RESPONSES, response_rows()),
    ];
    let mut written = Vec::with_capacity(sheets.len());
    for (sheet, rows) in sheets {
        let path = sheet_path(dir, sheet);
        write_rows(&path, &rows)?;
        info!("Template sheet written to {}", path.display());
        written.push(path);
    }
    Ok(written)
}
