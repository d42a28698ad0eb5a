//! Report document model.
//!
//! [`render`] turns a [`ReportDataset`] into the ordered sections of the SKM
//! report: cover, table of contents and chapters I to V. The output depends
//! only on the dataset and [`RenderOptions`]; the signature date is passed in
//! rather than read from the clock. [`to_markdown`] is the text adapter used
//! for previews and export.
//!
//! Index values are always printed with two decimals and percentages with
//! one. Narrative text that has not been generated yet is replaced by the
//! `PLACEHOLDER_*` strings below.

use crate::sample::KREJCIE_MORGAN;
use crate::types::{
    Conclusion, DemographicBreakdown, ReportDataset, EDUCATION_ORDER, INFO_POPULATION,
    OCCUPATION_ORDER,
};
use crate::util::{capitalize_first, fixed, format_date_id, short_code};
use chrono::NaiveDate;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

pub const PLACEHOLDER_ANALYSIS: &str = "Analisis akan muncul di sini setelah dihasilkan oleh AI.";
pub const PLACEHOLDER_TREND_ANALYSIS: &str =
    "Analisis tren akan muncul di sini setelah dihasilkan oleh AI.";
pub const PLACEHOLDER_FOLLOW_UP: &str =
    "Rencana Tindak Lanjut akan muncul di sini setelah dihasilkan oleh AI.";
pub const PLACEHOLDER_CONCLUSION: &str =
    "Kesimpulan akan muncul di sini setelah dihasilkan oleh AI.";
pub const PLACEHOLDER_TIMELINE: &str =
    "Data rincian waktu pelaksanaan tidak ditemukan dalam file Excel.";
pub const PLACEHOLDER_TREND: &str = "Data tren tidak tersedia.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionId {
    Cover,
    Contents,
    Chapter1,
    Chapter2,
    Chapter3,
    Chapter4,
    Chapter5,
}

impl SectionId {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Cover => "cover",
            SectionId::Contents => "toc",
            SectionId::Chapter1 => "chapter-1",
            SectionId::Chapter2 => "chapter-2",
            SectionId::Chapter3 => "chapter-3",
            SectionId::Chapter4 => "chapter-4",
            SectionId::Chapter5 => "chapter-5",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListStyle {
    Numbered,
    Lettered,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBlock {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Bar,
    Line,
}

/// Data for a chart rasterizer; nothing is drawn here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub series: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentsEntry {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub place_date: String,
    pub position: String,
    pub name: String,
    pub nip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Block {
    Title(String),
    Heading { level: u8, text: String },
    Paragraph(String),
    Placeholder(String),
    List { style: ListStyle, items: Vec<String> },
    Table(TableBlock),
    Chart(ChartSpec),
    Contents(Vec<ContentsEntry>),
    Signature(Signature),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Date printed above the signature.
    pub generated_on: NaiveDate,
    /// Place printed above the signature.
    pub city: String,
}

fn heading(text: &str) -> Block {
    Block::Heading {
        level: 2,
        text: text.to_string(),
    }
}

fn paragraph(text: impl Into<String>) -> Block {
    Block::Paragraph(text.into())
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// One paragraph per non-empty line, or the placeholder.
fn narrative_blocks(text: Option<&str>, placeholder: &str) -> Vec<Block> {
    let paragraphs: Vec<Block> = text
        .unwrap_or("")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(paragraph)
        .collect();
    if paragraphs.is_empty() {
        vec![Block::Placeholder(placeholder.to_string())]
    } else {
        paragraphs
    }
}

/// Shared lookups with the report's fallbacks applied.
struct Fields<'a> {
    institution: &'a str,
    year: &'a str,
}

impl<'a> Fields<'a> {
    fn new(ds: &'a ReportDataset) -> Self {
        Self {
            institution: ds.info.institution_name().unwrap_or("[Nama Dinas]"),
            year: ds.info.year().unwrap_or("[Tahun]"),
        }
    }
}

pub fn render(dataset: &ReportDataset, options: &RenderOptions) -> Vec<Section> {
    let f = Fields::new(dataset);
    vec![
        cover(dataset, &f),
        contents(),
        chapter1(&f),
        chapter2(dataset, &f),
        chapter3(dataset),
        chapter4(dataset, &f),
        chapter5(dataset, &f, options),
    ]
}

fn cover(ds: &ReportDataset, f: &Fields) -> Section {
    let mut blocks: Vec<Block> = ["LAPORAN", "PELAKSANAAN", "SURVEI KEPUASAN MASYARAKAT", "(SKM)"]
        .iter()
        .map(|t| Block::Title(t.to_string()))
        .collect();
    blocks.push(Block::Title(f.institution.to_uppercase()));
    if let Some(unit) = ds.info.unit_name() {
        blocks.push(Block::Title(unit.to_uppercase()));
    }
    blocks.push(Block::Title(format!(
        "PERIODE {} TAHUN {}",
        ds.info.period().unwrap_or("[Periode]"),
        f.year
    )));
    Section {
        id: SectionId::Cover,
        title: "SAMPUL".to_string(),
        blocks,
    }
}

fn contents() -> Section {
    let entries: [(u8, &str); 19] = [
        (0, "DAFTAR ISI"),
        (0, "BAB I PENDAHULUAN"),
        (1, "1.1 Latar Belakang"),
        (1, "1.2 Dasar Pelaksanaan Survei Kepuasan Masyarakat"),
        (1, "1.3 Maksud dan Tujuan"),
        (0, "BAB II PENGUMPULAN DATA SKM"),
        (1, "2.1 Pelaksana SKM"),
        (1, "2.2 Metode Pengumpulan Data"),
        (1, "2.3 Lokasi Pengumpulan Data"),
        (1, "2.4 Waktu Pelaksanaan SKM"),
        (1, "2.5 Penentuan Jumlah Responden"),
        (0, "BAB III HASIL PENGOLAHAN DATA SKM"),
        (1, "3.1 Jumlah Responden SKM"),
        (1, "3.2 Indeks Kepuasan Masyarakat"),
        (0, "BAB IV ANALISIS HASIL SKM"),
        (1, "4.1 Analisis Permasalahan/Kelemahan dan Kelebihan"),
        (1, "4.2 Rencana Tindak Lanjut"),
        (1, "4.3 Tren Nilai SKM"),
        (0, "BAB V PENUTUP"),
    ];
    Section {
        id: SectionId::Contents,
        title: "DAFTAR ISI".to_string(),
        blocks: vec![Block::Contents(
            entries
                .iter()
                .map(|(level, text)| ContentsEntry {
                    level: *level,
                    text: text.to_string(),
                })
                .collect(),
        )],
    }
}

fn chapter1(f: &Fields) -> Section {
    let name = f.institution;
    let blocks = vec![
        heading("1.1 Latar Belakang"),
        paragraph(
            "Undang-undang Nomor 25 Tahun 2009 tentang Pelayanan Publik dan Peraturan Pemerintah Nomor 96 Tahun 2012 tentang Pelaksanaan Undang-undang Nomor 25 Tahun 2009 tentang Pelayanan Publik, mengamanatkan penyelenggara wajib mengikutsertakan masyarakat dalam penyelenggaraan Pelayanan Publik sebagai upaya membangun sistem penyelenggaraan Pelayanan Publik yang adil, transparan, dan akuntabel. Pelibatan masyarakat ini menjadi penting seiring dengan adanya konsep pembangunan berkelanjutan. Serta adanya pelibatan masyarakat juga dapat mendorong kebijakan penyelenggaraan pelayanan publik lebih tepat sasaran.",
        ),
        paragraph(
            "Dalam mengamanatkan UU No. 25 tahun 2009 maupun PP No. 96 Tahun 2012 maka disusun Peraturan Menteri PANRB No. 14 Tahun 2017 tentang Pedoman Penyusunan Survei Kepuasan Masyarakat (SKM) Unit Penyelenggara Pelayanan Publik. Pedoman ini memberikan gambaran bagi penyelenggara pelayanan untuk melibatkan masyarakat dalam penilaian kinerja pelayanan publik guna meningkatkan kualitas pelayanan yang diberikan. Penilaian masyarakat atas penyelenggaraan pelayanan publik akan diukur berdasarkan 9 (sembilan) unsur yang berkaitan dengan standar pelayanan, sarana prasarana, serta konsultasi pengaduan.",
        ),
        paragraph(format!(
            "Untuk mengetahui sejauh mana kualitas pelayanan {name} sebagai salah satu penyedia layanan publik, maka perlu diselenggarakan survei atau jajak pendapat tentang penilaian pengguna layanan publik terhadap pelayanan yang diterima. Dengan berpedoman pada Peraturan Menteri PANRB No. 14 Tahun 2017, maka telah dilakukan pengukuran atas kepuasan masyarakat. Hasil SKM yang didapat merangkum data dan informasi tentang tingkat kepuasan masyarakat. Dengan elaborasi metode pengukuran secara kuantitatif dan kualitatif atas pendapat masyarakat, maka akan didapatkan kualitas data yang akurat dan komprehensif."
        )),
        paragraph(
            "Hasil survei ini akan digunakan sebagai bahan evaluasi dan bahan masukan bagi penyelenggara layanan publik untuk terus-menerus melakukan perbaikan sehingga kualitas pelayanan prima dapat segera dicapai. Dengan tercapainya pelayanan prima maka harapan dan tuntutan masyarakat atas hak-hak mereka sebagai warga negara dapat terpenuhi.",
        ),
        heading("1.2 Dasar Pelaksanaan Survei Kepuasan Masyarakat"),
        Block::List {
            style: ListStyle::Numbered,
            items: strings(&[
                "Undang-undang Nomor 25 Tahun 2009 tentang Pelayanan Publik.",
                "Peraturan Pemerintah Nomor 96 Tahun 2012 tentang Pelaksanaan Undang-Undang Nomor 25 Tahun 2009 tentang Pelayanan Publik.",
                "Peraturan Menteri PANRB Nomor 14 Tahun 2017 tentang Pedoman Penyusunan Survei Kepuasan Masyarakat Unit Penyelenggara Pelayanan Publik.",
            ]),
        },
        heading("1.3 Maksud dan Tujuan"),
        paragraph(format!(
            "Tujuan pelaksanaan SKM adalah untuk mengetahui gambaran kepuasan masyarakat yang diperoleh dari hasil pengukuran atas pendapat masyarakat, terhadap mutu dan kualitas pelayanan administrasi yang telah diberikan oleh {name}."
        )),
        paragraph("Adapun sasaran dilakukannya SKM adalah:"),
        Block::List {
            style: ListStyle::Lettered,
            items: strings(&[
                "Mendorong partisipasi masyarakat sebagai pengguna layanan dalam menilai kinerja penyelenggara pelayanan;",
                "Mendorong penyelenggara pelayanan publik untuk meningkatkan kualitas pelayanan publik;",
                "Mendorong penyelenggara pelayanan publik untuk menjadi lebih inovatif dalam menyelenggarakan pelayanan publik;",
                "Mengukur kecenderungan tingkat kepuasan masyarakat terhadap pelayanan publik yang diberikan.",
            ]),
        },
        paragraph("Dengan dilakukan SKM dapat diperoleh manfaat, antara lain:"),
        Block::List {
            style: ListStyle::Lettered,
            items: strings(&[
                "Diketahui kelemahan atau kekurangan dari masing-masing unsur dalam penyelenggara pelayanan publik;",
                "Diketahui kinerja penyelenggara pelayanan yang telah dilaksanakan oleh unit pelayanan publik secara periodik;",
                "Sebagai bahan penetapan kebijakan yang perlu diambil dan upaya tindak lanjut yang perlu dilakukan atas hasil Survei Kepuasan Masyarakat;",
                "Diketahui indeks kepuasan masyarakat secara menyeluruh terhadap hasil pelaksanaan pelayanan publik pada lingkup Pemerintah Pusat dan Daerah;",
                "Memacu persaingan positif, antar unit penyelenggara pelayanan pada lingkup Pemerintah Pusat dan Daerah dalam upaya peningkatan kinerja pelayanan;",
                "Bagi masyarakat dapat diketahui gambaran tentang kinerja unit pelayanan.",
            ]),
        },
    ];
    Section {
        id: SectionId::Chapter1,
        title: "BAB I PENDAHULUAN".to_string(),
        blocks,
    }
}

/// The reference table laid out in three column pairs, as printed.
fn morgan_table() -> TableBlock {
    let per_column = KREJCIE_MORGAN.len() / 3;
    let rows = (0..per_column)
        .map(|i| {
            (0..3)
                .flat_map(|c| {
                    let (p, s) = KREJCIE_MORGAN[i + c * per_column];
                    [p.to_string(), s.to_string()]
                })
                .collect()
        })
        .collect();
    TableBlock {
        headers: strings(&[
            "Populasi (N)",
            "Sampel (n)",
            "Populasi (N)",
            "Sampel (n)",
            "Populasi (N)",
            "Sampel (n)",
        ]),
        rows,
    }
}

fn chapter2(ds: &ReportDataset, f: &Fields) -> Section {
    let name = f.institution;
    let services = ds
        .info
        .services()
        .unwrap_or("[Jenis Layanan Belum Ditentukan]");
    let population = ds.info.get(INFO_POPULATION).unwrap_or("[Populasi]");
    let minimum = if ds.minimum_sample > 0 {
        ds.minimum_sample.to_string()
    } else {
        "[Sampel]".to_string()
    };

    let mut blocks = vec![
        heading("2.1 Pelaksana SKM"),
        paragraph(format!(
            "Survei Kepuasan Masyarakat dilakukan secara mandiri pada {name} dengan membentuk tim pelaksana kegiatan Survei Kepuasan Masyarakat."
        )),
        heading("2.2 Metode Pengumpulan Data"),
        paragraph(
            "Pelaksanaan SKM menggunakan kuesioner yang disebarkan kepada pengguna layanan. Kuesioner terdiri atas 9 pertanyaan sesuai dengan jumlah unsur pengukuran kepuasan masyarakat terhadap pelayanan yang diterima berdasarkan Peraturan Menteri PAN dan RB Nomor 14 Tahun 2017, yaitu: Persyaratan; Sistem, mekanisme dan prosedur; Waktu penyelesaian; Biaya/tarif; Produk spesifikasi jenis pelayanan; Kompetensi pelaksana; Perilaku pelaksana; Penanganan pengaduan, saran dan masukan; serta Sarana dan prasarana.",
        ),
        heading("2.3 Lokasi Pengumpulan Data"),
        paragraph(
            "Lokasi dan waktu pengumpulan data dilakukan di lokasi unit pelayanan pada waktu jam layanan sedang sibuk. Sedangkan pengisian kuesioner dilakukan sendiri oleh responden sebagai penerima layanan dan hasilnya dikumpulkan di tempat yang telah disediakan.",
        ),
        heading("2.4 Waktu Pelaksanaan SKM"),
        paragraph(
            "Survei dilakukan secara periodik dengan jangka waktu (periode) tertentu yaitu 1 (satu) semester. Penyusunan indeks kepuasan masyarakat memerlukan waktu dengan rincian sebagai berikut:",
        ),
    ];
    if ds.timeline.is_empty() {
        blocks.push(Block::Placeholder(PLACEHOLDER_TIMELINE.to_string()));
    } else {
        blocks.push(Block::Table(TableBlock {
            headers: ds.timeline.headers.clone(),
            rows: ds.timeline.rows.clone(),
        }));
    }
    blocks.push(heading("2.5 Penentuan Jumlah Responden"));
    blocks.push(paragraph(format!(
        "Dalam penentuan responden, terlebih dahulu ditentukan jumlah populasi penerima layanan dari seluruh jenis pelayanan pada {name} ({services}). Jika dilihat dari perkiraan jumlah penerima layanan, maka populasi penerima layanan pada {name} dalam kurun waktu satu tahun adalah sebanyak {population} orang. Berdasarkan Tabel Krejcie and Morgan, jumlah minimum sampel responden yang harus dikumpulkan dalam satu periode SKM adalah {minimum} orang. Adapun jumlah responden yang berhasil dikumpulkan dalam periode survei ini adalah sebanyak {actual} orang. Dengan demikian, jumlah sampel yang diperoleh dinilai {status}.",
        actual = ds.respondents(),
        status = ds.sample_status(),
    )));
    blocks.push(paragraph("Tabel Krejcie dan Morgan"));
    blocks.push(Block::Table(morgan_table()));

    Section {
        id: SectionId::Chapter2,
        title: "BAB II PENGUMPULAN DATA SKM".to_string(),
        blocks,
    }
}

fn characteristic_rows(
    rows: &mut Vec<Vec<String>>,
    number: usize,
    title: &str,
    breakdown: &DemographicBreakdown,
    order: Option<&[&str]>,
) {
    for (i, c) in breakdown.ordered(order).into_iter().enumerate() {
        let (no, name) = if i == 0 {
            (number.to_string(), title.to_string())
        } else {
            (String::new(), String::new())
        };
        rows.push(vec![
            no,
            name,
            capitalize_first(&c.label),
            c.count.to_string(),
            format!("{}%", fixed(c.percentage, 1)),
        ]);
    }
}

fn demographic_table(ds: &ReportDataset) -> TableBlock {
    let d = &ds.demographics;
    let mut rows = Vec::new();
    characteristic_rows(&mut rows, 1, "JENIS KELAMIN", &d.gender, None);
    characteristic_rows(&mut rows, 2, "PENDIDIKAN", &d.education, Some(&EDUCATION_ORDER[..]));
    characteristic_rows(&mut rows, 3, "PEKERJAAN", &d.occupation, Some(&OCCUPATION_ORDER[..]));
    characteristic_rows(&mut rows, 4, "JENIS LAYANAN", &d.service, None);
    TableBlock {
        headers: strings(&["No.", "KARAKTERISTIK", "INDIKATOR", "JUMLAH", "PERSENTASE"]),
        rows,
    }
}

fn index_table(ds: &ReportDataset) -> TableBlock {
    let mut rows: Vec<Vec<String>> = ds
        .index
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            vec![
                (i + 1).to_string(),
                item.label.clone(),
                fixed(item.converted, 2),
                item.grade.letter().to_string(),
            ]
        })
        .collect();
    rows.push(vec![
        String::new(),
        "NILAI IKM UNIT PELAYANAN".to_string(),
        fixed(ds.index.composite, 2),
        ds.index.grade.letter().to_string(),
    ]);
    TableBlock {
        headers: strings(&["No.", "UNSUR PELAYANAN", "NILAI IKM KONVERSI", "MUTU PELAYANAN"]),
        rows,
    }
}

fn chapter3(ds: &ReportDataset) -> Section {
    let chart = ChartSpec {
        kind: ChartKind::Bar,
        title: "Grafik Capaian per Unsur Pelayanan".to_string(),
        series: "Nilai Konversi per Unsur".to_string(),
        labels: ds
            .index
            .items
            .iter()
            .map(|i| short_code(&i.key).to_string())
            .collect(),
        values: ds.index.items.iter().map(|i| i.converted).collect(),
    };
    Section {
        id: SectionId::Chapter3,
        title: "BAB III HASIL PENGOLAHAN DATA SKM".to_string(),
        blocks: vec![
            heading("3.1 Jumlah Responden SKM"),
            paragraph(format!(
                "Berdasarkan hasil pengumpulan data, jumlah responden penerima layanan yang diperoleh yaitu {} orang responden, dengan rincian sebagai berikut:",
                ds.respondents()
            )),
            Block::Table(demographic_table(ds)),
            heading("3.2 Indeks Kepuasan Masyarakat (Unit Layanan dan Per Unsur Layanan)"),
            paragraph(
                "Pengolahan data SKM menggunakan metode yang ditetapkan dan diperoleh hasil sebagai berikut:",
            ),
            Block::Table(index_table(ds)),
            Block::Chart(chart),
        ],
    }
}

fn chapter4(ds: &ReportDataset, f: &Fields) -> Section {
    let n = &ds.narrative;
    let fkp = match (ds.info.fkp_date(), ds.info.fkp_date_raw()) {
        (Some(d), _) => format_date_id(d),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "[Tanggal FKP]".to_string(),
    };

    let mut blocks = vec![heading(
        "4.1 Analisis Permasalahan/Kelemahan dan Kelebihan Unsur Layanan",
    )];
    blocks.extend(narrative_blocks(n.main_analysis.as_deref(), PLACEHOLDER_ANALYSIS));
    blocks.push(heading("4.2 Rencana Tindak Lanjut"));
    blocks.push(paragraph(format!(
        "Pembahasan rencana tindak lanjut hasil SKM dilakukan melalui Forum Konsultasi Publik (FKP) bersama perwakilan pengguna layanan pada tanggal {fkp}. Rencana tindak lanjut perbaikan hasil SKM dituangkan dalam tabel berikut:"
    )));
    if n.follow_up.is_empty() {
        blocks.push(Block::Placeholder(PLACEHOLDER_FOLLOW_UP.to_string()));
    } else {
        blocks.push(Block::Table(TableBlock {
            headers: strings(&[
                "No.",
                "Prioritas Unsur",
                "Program / Kegiatan",
                "Waktu",
                "Penanggung Jawab",
            ]),
            rows: n
                .follow_up
                .iter()
                .enumerate()
                .map(|(i, a)| {
                    vec![
                        (i + 1).to_string(),
                        a.priority_item.clone(),
                        a.action.clone(),
                        a.target_quarter.clone(),
                        a.responsible_unit.clone(),
                    ]
                })
                .collect(),
        }));
    }

    blocks.push(heading("4.3 Tren Nilai SKM"));
    if ds.trends.is_empty() {
        blocks.push(Block::Placeholder(PLACEHOLDER_TREND.to_string()));
    } else {
        blocks.extend(narrative_blocks(
            n.trend_analysis.as_deref(),
            PLACEHOLDER_TREND_ANALYSIS,
        ));
        let mut labels: Vec<String> = Vec::new();
        let mut values: Vec<f64> = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for (year, v) in ds.trends.iter() {
            labels.push(year.to_string());
            values.push(v);
            rows.push(vec![year.to_string(), fixed(v, 2)]);
        }
        labels.push(f.year.to_string());
        values.push(ds.index.composite);
        rows.push(vec![f.year.to_string(), fixed(ds.index.composite, 2)]);
        blocks.push(Block::Table(TableBlock {
            headers: strings(&["Tahun", "Nilai IKM"]),
            rows,
        }));
        blocks.push(Block::Chart(ChartSpec {
            kind: ChartKind::Line,
            title: format!("Grafik Tren Nilai SKM {}", f.institution),
            series: "Nilai IKM".to_string(),
            labels,
            values,
        }));
    }

    Section {
        id: SectionId::Chapter4,
        title: "BAB IV ANALISIS HASIL SKM".to_string(),
        blocks,
    }
}

fn conclusion_blocks(conclusion: Option<&Conclusion>) -> Vec<Block> {
    let Some(c) = conclusion else {
        return vec![Block::Placeholder(PLACEHOLDER_CONCLUSION.to_string())];
    };
    let mut blocks = Vec::new();
    for (title, text) in [
        ("A. Kesimpulan", &c.main),
        ("B. Saran dan Rekomendasi", &c.suggestions),
        ("C. Penutup", &c.closing),
    ] {
        blocks.push(Block::Heading {
            level: 3,
            text: title.to_string(),
        });
        blocks.extend(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(paragraph),
        );
    }
    blocks
}

fn chapter5(ds: &ReportDataset, f: &Fields, options: &RenderOptions) -> Section {
    let mut blocks = conclusion_blocks(ds.narrative.conclusion.as_ref());
    blocks.push(Block::Signature(Signature {
        place_date: format!("{}, {}", options.city, format_date_id(options.generated_on)),
        position: format!("Kepala {},", f.institution),
        name: ds
            .info
            .officer()
            .unwrap_or("(NAMA LENGKAP)")
            .to_uppercase(),
        nip: format!(
            "NIP. {}",
            ds.info
                .officer_nip()
                .unwrap_or("..................................")
        ),
    }));
    Section {
        id: SectionId::Chapter5,
        title: "BAB V PENUTUP".to_string(),
        blocks,
    }
}

/// Keep a cell on one table line: newlines become `<br>`, pipes are escaped.
fn markdown_cell(text: &str) -> String {
    text.trim()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("<br>")
        .replace('|', "\\|")
}

fn markdown_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| markdown_cell(h)));
    for r in rows {
        builder.push_record(r.iter().map(|c| markdown_cell(c)));
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    table.to_string()
}

fn list_marker(style: ListStyle, i: usize) -> String {
    match style {
        ListStyle::Numbered => format!("{}.", i + 1),
        ListStyle::Lettered => {
            let letter = (b'a' + (i % 26) as u8) as char;
            format!("{letter}.")
        }
    }
}

/// Render sections as one Markdown document, sections separated by rules.
pub fn to_markdown(sections: &[Section]) -> String {
    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push_str("---\n\n");
        }
        if section.id != SectionId::Cover {
            out.push_str(&format!("# {}\n\n", section.title));
        }
        for block in &section.blocks {
            match block {
                Block::Title(t) => out.push_str(&format!("# {}\n\n", t)),
                Block::Heading { level, text } => {
                    out.push_str(&format!("{} {}\n\n", "#".repeat(*level as usize), text))
                }
                Block::Paragraph(p) => out.push_str(&format!("{}\n\n", p)),
                Block::Placeholder(p) => out.push_str(&format!("_{}_\n\n", p)),
                Block::List { style, items } => {
                    for (i, item) in items.iter().enumerate() {
                        out.push_str(&format!("{} {}\n", list_marker(*style, i), item));
                    }
                    out.push('\n');
                }
                Block::Table(t) => {
                    out.push_str(&markdown_table(&t.headers, &t.rows));
                    out.push_str("\n\n");
                }
                Block::Chart(c) => {
                    out.push_str(&format!("**{}**\n\n", c.title));
                    let rows: Vec<Vec<String>> = c
                        .labels
                        .iter()
                        .zip(&c.values)
                        .map(|(l, v)| vec![l.clone(), fixed(*v, 2)])
                        .collect();
                    out.push_str(&markdown_table(&[String::new(), c.series.clone()], &rows));
                    out.push_str("\n\n");
                }
                Block::Contents(entries) => {
                    for e in entries {
                        out.push_str(&format!("{}- {}\n", "  ".repeat(e.level as usize), e.text));
                    }
                    out.push('\n');
                }
                Block::Signature(s) => {
                    out.push_str(&format!(
                        "{}\n{}\n\n\n**{}**\n{}\n\n",
                        s.place_date, s.position, s.name, s.nip
                    ));
                }
            }
        }
    }
    out
}
