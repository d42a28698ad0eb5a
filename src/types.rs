use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tabled::Tabled;

use crate::util::{parse_count, parse_date_safe};
use chrono::NaiveDate;

pub const SHEET_INFO: &str = "Info_Umum";
pub const SHEET_TIMELINE: &str = "Waktu_Pelaksanaan";
pub const SHEET_RESPONSES: &str = "Data_Survei_Mentah";

pub const COL_GENDER: &str = "Jenis Kelamin (L/P)";
pub const COL_EDUCATION: &str = "Pendidikan Terakhir";
pub const COL_OCCUPATION: &str = "Pekerjaan";
pub const COL_SERVICE: &str = "Jenis Layanan";
pub const COL_FEEDBACK: &str = "Saran / Masukan (Teks)";

pub const ITEM_KEYS: [&str; 9] = [
    "U1 (Persyaratan)",
    "U2 (Prosedur)",
    "U3 (Waktu)",
    "U4 (Biaya)",
    "U5 (Produk)",
    "U6 (Kompetensi)",
    "U7 (Perilaku)",
    "U8 (Sarana & Prasarana)",
    "U9 (Pengaduan)",
];

pub const ITEM_LABELS: [&str; 9] = [
    "U1. Persyaratan",
    "U2. Sistem, Mekanisme, dan Prosedur",
    "U3. Waktu Penyelesaian",
    "U4. Biaya/Tarif",
    "U5. Produk Spesifikasi Jenis Pelayanan",
    "U6. Kompetensi Pelaksana",
    "U7. Perilaku Pelaksana",
    "U8. Sarana dan Prasarana",
    "U9. Penanganan Pengaduan, Saran, dan Masukan",
];

pub const INFO_INSTITUTION: &str = "Nama Dinas/Badan";
pub const INFO_UNIT: &str = "Nama UPTD/Kelurahan";
pub const INFO_PERIOD: &str = "Periode Survei";
pub const INFO_YEAR: &str = "Tahun Survei";
pub const INFO_SERVICES: &str = "Jenis-jenis Layanan yang Ada (pisahkan dengan koma)";
pub const INFO_POPULATION: &str = "Jumlah Populasi Penerima Layanan (N)";
pub const INFO_OFFICER: &str = "Penanggung Jawab";
pub const INFO_OFFICER_NIP: &str = "NIP Penanggung Jawab";
pub const INFO_FKP_DATE: &str = "Tanggal FKP";
pub const TREND_PREFIX: &str = "Tren SKM Tahun ";

/// Category used when a respondent left a demographic field empty.
pub const UNKNOWN_CATEGORY: &str = "TIDAK DIKETAHUI";

pub const EDUCATION_ORDER: [&str; 7] =
    ["SD KE BAWAH", "SLTP", "SLTA", "D-III", "S-1", "S-2", "S-3"];
pub const OCCUPATION_ORDER: [&str; 5] = ["PNS", "TNI", "SWASTA", "WIRAUSAHA", "LAINNYA"];

/// A named sheet as handed over by the ingestion adapter: a header row and
/// the data rows below it, all as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn responses(&self) -> impl Iterator<Item = RawResponse<'_>> + '_ {
        self.rows.iter().map(move |cells| RawResponse {
            table: self,
            cells,
        })
    }
}

/// One respondent's row, read through the response sheet's header.
#[derive(Debug, Clone, Copy)]
pub struct RawResponse<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> RawResponse<'a> {
    /// Cell text for `column`; `None` when the column or cell is absent.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column_index(column)?;
        self.cells.get(idx).map(String::as_str)
    }
}

/// The three sheets of one upload. `None` means the sheet was not found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub info: Option<Table>,
    pub timeline: Option<Table>,
    pub responses: Option<Table>,
}

/// Key/value metadata from the `Info_Umum` sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstitutionInfo {
    pub entries: BTreeMap<String, String>,
}

impl InstitutionInfo {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn institution_name(&self) -> Option<&str> {
        self.get(INFO_INSTITUTION)
    }

    pub fn unit_name(&self) -> Option<&str> {
        self.get(INFO_UNIT)
    }

    pub fn period(&self) -> Option<&str> {
        self.get(INFO_PERIOD)
    }

    pub fn year(&self) -> Option<&str> {
        self.get(INFO_YEAR)
    }

    pub fn services(&self) -> Option<&str> {
        self.get(INFO_SERVICES)
    }

    pub fn officer(&self) -> Option<&str> {
        self.get(INFO_OFFICER)
    }

    pub fn officer_nip(&self) -> Option<&str> {
        self.get(INFO_OFFICER_NIP)
    }

    pub fn fkp_date_raw(&self) -> Option<&str> {
        self.get(INFO_FKP_DATE)
    }

    pub fn fkp_date(&self) -> Option<NaiveDate> {
        parse_date_safe(self.fkp_date_raw())
    }

    /// Population figure; 0 when absent or not a number.
    pub fn population(&self) -> u64 {
        parse_count(self.get(INFO_POPULATION)).unwrap_or(0)
    }
}

/// Historical composite index by year. Keys are year strings, iterated in
/// ascending string order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries(pub BTreeMap<String, f64>);

impl TrendSeries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Activity rows from `Waktu_Pelaksanaan`, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
    /// Share of all respondents, rounded half-up to one decimal.
    pub percentage: f64,
}

/// Counts for one categorical dimension, in first-observed order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DemographicBreakdown {
    pub total: usize,
    pub categories: Vec<CategoryCount>,
}

impl DemographicBreakdown {
    pub fn get(&self, label: &str) -> Option<&CategoryCount> {
        self.categories.iter().find(|c| c.label == label)
    }

    pub fn counted(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }

    /// Display order. With a canonical order only the listed labels that were
    /// observed are returned; the stored counts are never touched.
    pub fn ordered(&self, order: Option<&[&str]>) -> Vec<&CategoryCount> {
        match order {
            Some(order) => order.iter().filter_map(|label| self.get(label)).collect(),
            None => self.categories.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Demographics {
    pub total: usize,
    pub gender: DemographicBreakdown,
    pub education: DemographicBreakdown,
    pub occupation: DemographicBreakdown,
    pub service: DemographicBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemScore {
    pub key: String,
    pub label: String,
    /// Mean raw answer, 1.0..=4.0 for clean input.
    pub average: f64,
    /// `average * 25`.
    pub converted: f64,
    pub grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexScore {
    pub items: Vec<ItemScore>,
    pub composite: f64,
    pub grade: Grade,
}

impl IndexScore {
    pub fn item(&self, key: &str) -> Option<&ItemScore> {
        self.items.iter().find(|i| i.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpAction {
    #[serde(rename = "prioritas_unsur")]
    pub priority_item: String,
    #[serde(rename = "program_kegiatan")]
    pub action: String,
    #[serde(rename = "waktu")]
    pub target_quarter: String,
    #[serde(rename = "penanggung_jawab")]
    pub responsible_unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conclusion {
    #[serde(rename = "utama")]
    pub main: String,
    #[serde(rename = "saran")]
    pub suggestions: String,
    #[serde(rename = "penutup")]
    pub closing: String,
}

/// Text authored outside the engine. Every field may be absent until the
/// narrative service has answered or the user has typed something.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Narrative {
    pub main_analysis: Option<String>,
    pub trend_analysis: Option<String>,
    pub follow_up: Vec<FollowUpAction>,
    pub conclusion: Option<Conclusion>,
}

/// Everything one upload produces. Only `narrative` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDataset {
    pub info: InstitutionInfo,
    pub trends: TrendSeries,
    pub timeline: Timeline,
    pub demographics: Demographics,
    pub index: IndexScore,
    /// Non-empty comments joined with `"; "` in row order.
    pub feedback: String,
    pub minimum_sample: u64,
    pub narrative: Narrative,
}

impl ReportDataset {
    pub fn respondents(&self) -> usize {
        self.demographics.total
    }

    pub fn is_sample_adequate(&self) -> bool {
        self.respondents() as u64 >= self.minimum_sample
    }

    pub fn sample_status(&self) -> &'static str {
        if self.is_sample_adequate() {
            "Sesuai"
        } else {
            "Belum Sesuai"
        }
    }
}

/// Console and CSV view of one item score.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ItemScoreRow {
    #[serde(rename = "No")]
    #[tabled(rename = "No")]
    pub no: usize,
    #[serde(rename = "Unsur")]
    #[tabled(rename = "Unsur")]
    pub label: String,
    #[serde(rename = "RataRata")]
    #[tabled(rename = "RataRata")]
    pub average: String,
    #[serde(rename = "NilaiKonversi")]
    #[tabled(rename = "NilaiKonversi")]
    pub converted: String,
    #[serde(rename = "Mutu")]
    #[tabled(rename = "Mutu")]
    pub grade: String,
}
