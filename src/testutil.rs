// Fixtures shared by the unit tests.
use crate::types::{
    Table, Workbook, COL_EDUCATION, COL_FEEDBACK, COL_GENDER, COL_OCCUPATION, COL_SERVICE,
    INFO_FKP_DATE, INFO_INSTITUTION, INFO_OFFICER, INFO_PERIOD, INFO_POPULATION, INFO_YEAR,
    ITEM_KEYS, SHEET_INFO, SHEET_RESPONSES, SHEET_TIMELINE,
};

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|x| x.to_string()).collect()
}

/// The three respondents of the blank input template.
pub fn sample_workbook() -> Workbook {
    let info = Table::new(
        SHEET_INFO,
        strings(&["Parameter", "Isi Data"]),
        vec![
            strings(&[INFO_INSTITUTION, "Dinas Kependudukan dan Pencatatan Sipil"]),
            strings(&[INFO_PERIOD, "I"]),
            strings(&[INFO_YEAR, "2025"]),
            strings(&[INFO_POPULATION, "2400"]),
            strings(&[INFO_OFFICER, "Budi Santoso"]),
            strings(&[INFO_FKP_DATE, "2025-07-04"]),
            strings(&["Tren SKM Tahun 2023", "78.20"]),
            strings(&["Tren SKM Tahun 2024", "80.10"]),
        ],
    );
    let timeline = Table::new(
        SHEET_TIMELINE,
        strings(&["No.", "Kegiatan", "Waktu Pelaksanaan", "Jumlah Hari Kerja"]),
        vec![
            strings(&["1", "Persiapan", "Januari 2025", "8"]),
            strings(&["2", "Pengumpulan Data", "Februari-April 2025", "60"]),
        ],
    );

    let mut headers = strings(&[COL_GENDER, COL_EDUCATION, COL_OCCUPATION, COL_SERVICE]);
    headers.extend(ITEM_KEYS.iter().map(|k| k.to_string()));
    headers.push(COL_FEEDBACK.to_string());
    let rows = vec![
        strings(&[
            "P", "S-1", "SWASTA", "Layanan KTP", "3", "2", "2", "4", "4", "3", "2", "3", "4",
            "Waktu pelayanan terlalu lama, harus bolak-balik.",
        ]),
        strings(&[
            "L", "SLTA", "WIRAUSAHA", "Layanan KK", "4", "3", "3", "4", "4", "4", "3", "4", "4",
            "Petugas sudah ramah dan membantu, tapi loket perlu ditambah.",
        ]),
        strings(&[
            "P", "S-2", "PNS", "Layanan Akta", "3", "2", "2", "3", "3", "3", "2", "3", "3",
            "Prosedur online masih agak membingungkan, perlu sosialisasi.",
        ]),
    ];

    Workbook {
        info: Some(info),
        timeline: Some(timeline),
        responses: Some(Table::new(SHEET_RESPONSES, headers, rows)),
    }
}
