//! Narrative text: the prompt sent to the text-generation service, the
//! validation of what comes back, and user edits of the generated text.
//!
//! Nothing here talks to the network; see [`crate::gemini`] for the client.

use crate::error::{Result, SkmError};
use crate::types::{Conclusion, FollowUpAction, ItemScore, Narrative, ReportDataset};
use crate::util::{fixed, short_code};
use serde::Deserialize;

/// The JSON object the service is asked to return. Every key is required;
/// extra keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NarrativePayload {
    pub analisis_utama: String,
    pub analisis_tren: String,
    pub rtl: Vec<FollowUpAction>,
    pub kesimpulan: Conclusion,
}

impl From<NarrativePayload> for Narrative {
    fn from(p: NarrativePayload) -> Self {
        Narrative {
            main_analysis: Some(p.analisis_utama),
            trend_analysis: Some(p.analisis_tren),
            follow_up: p.rtl,
            conclusion: Some(p.kesimpulan),
        }
    }
}

/// Strip Markdown code fences the model likes to wrap JSON in.
fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse and shape-check a service response.
pub fn parse_payload(text: &str) -> Result<NarrativePayload> {
    let cleaned = strip_fences(text);
    if cleaned.is_empty() {
        return Err(SkmError::NarrativeFormat("empty response".to_string()));
    }
    serde_json::from_str(&cleaned).map_err(|e| SkmError::NarrativeFormat(e.to_string()))
}

/// Replace all narrative fields of `dataset` with the payload's values.
///
/// On a malformed payload the error is returned and `dataset` is left as it
/// was; the caller keeps using it.
pub fn merge_narrative(dataset: &ReportDataset, payload: &str) -> Result<ReportDataset> {
    let parsed = parse_payload(payload)?;
    let mut merged = dataset.clone();
    merged.narrative = parsed.into();
    Ok(merged)
}

/// A user edit of the conclusion block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConclusionEdit {
    /// All three sub-fields given explicitly (the text was a JSON object).
    Structured(Conclusion),
    /// Plain text for the main conclusion; suggestions and closing are kept.
    Freeform(String),
}

impl ConclusionEdit {
    /// JSON with `utama`, `saran` and `penutup` is a structured edit; any
    /// other text is a freeform edit of the main conclusion.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Conclusion>(text) {
            Ok(c) => ConclusionEdit::Structured(c),
            Err(_) => ConclusionEdit::Freeform(text.to_string()),
        }
    }

    pub fn apply(self, prior: Option<&Conclusion>) -> Conclusion {
        match self {
            ConclusionEdit::Structured(c) => c,
            ConclusionEdit::Freeform(main) => Conclusion {
                main,
                suggestions: prior.map(|c| c.suggestions.clone()).unwrap_or_default(),
                closing: prior.map(|c| c.closing.clone()).unwrap_or_default(),
            },
        }
    }
}

pub fn edit_conclusion(dataset: &ReportDataset, edit: ConclusionEdit) -> ReportDataset {
    let mut edited = dataset.clone();
    edited.narrative.conclusion = Some(edit.apply(dataset.narrative.conclusion.as_ref()));
    edited
}

pub fn edit_analysis(dataset: &ReportDataset, text: &str) -> ReportDataset {
    let mut edited = dataset.clone();
    edited.narrative.main_analysis = Some(text.to_string());
    edited
}

fn describe(items: &[&ItemScore]) -> String {
    items
        .iter()
        .map(|i| format!("{} (nilai: {})", short_code(&i.key), fixed(i.converted, 2)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Three lowest and three highest items by average, lowest/highest first.
/// Ties keep column order.
pub fn extremes(dataset: &ReportDataset) -> (Vec<&ItemScore>, Vec<&ItemScore>) {
    let mut sorted: Vec<&ItemScore> = dataset.index.items.iter().collect();
    sorted.sort_by(|a, b| a.average.total_cmp(&b.average));
    let lowest = sorted.iter().take(3).copied().collect();
    let highest = sorted.iter().rev().take(3).copied().collect();
    (lowest, highest)
}

pub fn build_prompt(dataset: &ReportDataset) -> String {
    let info = &dataset.info;
    let (lowest, highest) = extremes(dataset);
    let trend = dataset
        .trends
        .iter()
        .map(|(year, v)| format!("Tahun {}: {}", year, fixed(v, 2)))
        .collect::<Vec<_>>()
        .join("; ");
    let trend = if trend.is_empty() {
        "Tidak ada data tren.".to_string()
    } else {
        trend
    };
    let feedback = if dataset.feedback.is_empty() {
        "Tidak ada saran spesifik yang diberikan."
    } else {
        dataset.feedback.as_str()
    };
    let ikm = fixed(dataset.index.composite, 2);

    format!(
        r#"Anda adalah seorang analis kebijakan publik ahli yang bertugas membuat draf laporan Survei Kepuasan Masyarakat (SKM) untuk sebuah instansi, sesuai templat resmi.
Tugas Anda adalah membuat draf untuk beberapa bagian laporan berdasarkan data berikut:

DATA SKM:
- Nama Instansi: {institution}
- Nilai IKM Unit Layanan Saat Ini ({year}): {ikm} (Kategori: {grade})
- 3 Unsur Nilai Terendah: {lowest}
- 3 Unsur Nilai Tertinggi: {highest}
- Data Tren SKM Sebelumnya: {trend}
- Rekapitulasi Kritik & Saran dari Masyarakat: "{feedback}"

INSTRUKSI:
1. **Buat Analisis Utama (Untuk Sub-bab 4.1):** Tulis paragraf untuk "Analisis Permasalahan/Kelemahan dan Kelebihan Unsur Layanan". Analisis ini harus fokus pada: a. Sorotan unsur terendah sebagai area prioritas perbaikan dan unsur tertinggi sebagai kekuatan yang harus dipertahankan. b. Kaitan antara analisis unsur dengan kritik dan saran spesifik yang diberikan masyarakat.
2. **Buat Analisis Tren (Untuk Sub-bab 4.3):** Tulis paragraf terpisah khusus untuk "Analisis Tren Nilai SKM". Bandingkan nilai IKM tahun ini ({ikm}) dengan data tren sebelumnya. Jelaskan secara eksplisit apakah ada peningkatan, penurunan, atau stagnasi kinerja, dan berikan interpretasi mendalam mengenai kemungkinan penyebabnya.
3. **Buat Rencana Tindak Lanjut (RTL) (BAB IV):** Buat rencana tindak lanjut dalam format array JSON. Fokus pada 3 unsur dengan nilai terendah. Untuk setiap unsur, berikan satu program/kegiatan perbaikan yang konkret dan realistis. Untuk kolom "waktu", gunakan format "TW I/II/III/IV".
4. **Buat Kesimpulan (BAB V):** Buat draf untuk BAB V yang terstruktur. Format output untuk kesimpulan HARUS berupa OBJEK JSON dengan tiga kunci: "utama", "saran", dan "penutup".
   - **utama**: Berisi kesimpulan utama (nilai akhir SKM, kategori, 3 unsur terendah dan tertinggi).
   - **saran**: Berisi saran dan rekomendasi berdasarkan rangkuman kritik/saran masyarakat.
   - **penutup**: Berisi kalimat penutup formal yang menyatakan laporan ini akan menjadi acuan perbaikan.

Format output HARUS berupa JSON yang valid seperti ini, tanpa teks tambahan sebelum atau sesudah JSON:
{{
  "analisis_utama": "Teks analisis utama di sini...",
  "analisis_tren": "Teks analisis tren di sini...",
  "rtl": [
    {{
      "prioritas_unsur": "Nama Unsur Terendah 1",
      "program_kegiatan": "Deskripsi program/kegiatan perbaikan.",
      "waktu": "TW III",
      "penanggung_jawab": "Bagian Terkait"
    }}
  ],
  "kesimpulan": {{
    "utama": "Teks kesimpulan utama di sini...",
    "saran": "Teks saran dan rekomendasi di sini...",
    "penutup": "Teks paragraf penutup di sini..."
  }}
}}"#,
        institution = info.institution_name().unwrap_or("[Nama Dinas]"),
        year = info.year().unwrap_or("[Tahun]"),
        ikm = ikm,
        grade = dataset.index.grade.label(),
        lowest = describe(&lowest),
        highest = describe(&highest),
        trend = trend,
        feedback = feedback,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::process;
    use crate::testutil::sample_workbook;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const PAYLOAD: &str = indoc! {r#"
        ```json
        {
          "analisis_utama": "Unsur U2 paling rendah.\nPerlu perbaikan.",
          "analisis_tren": "Nilai menurun dibanding 2024.",
          "rtl": [
            {
              "prioritas_unsur": "U2",
              "program_kegiatan": "Penyederhanaan alur",
              "waktu": "TW III",
              "penanggung_jawab": "Bidang Pelayanan"
            }
          ],
          "kesimpulan": {
            "utama": "IKM 77,78 (Baik).",
            "saran": "Tambah loket.",
            "penutup": "Laporan ini menjadi acuan perbaikan."
          }
        }
        ```
    "#};

    #[test]
    fn well_formed_payload_replaces_every_field() {
        let ds = process(&sample_workbook()).unwrap();
        let merged = merge_narrative(&ds, PAYLOAD).unwrap();
        let n = &merged.narrative;
        assert_eq!(
            n.main_analysis.as_deref(),
            Some("Unsur U2 paling rendah.\nPerlu perbaikan.")
        );
        assert_eq!(n.trend_analysis.as_deref(), Some("Nilai menurun dibanding 2024."));
        assert_eq!(n.follow_up.len(), 1);
        assert_eq!(n.follow_up[0].target_quarter, "TW III");
        assert_eq!(
            n.conclusion.as_ref().map(|c| c.closing.as_str()),
            Some("Laporan ini menjadi acuan perbaikan.")
        );
        assert_eq!(merged.index, ds.index);
    }

    #[test]
    fn malformed_payload_leaves_dataset_untouched() {
        let ds = process(&sample_workbook()).unwrap();
        let ds = edit_analysis(&ds, "teks lama");
        for bad in [
            "bukan json",
            "",
            r#"{"analisis_utama": "a", "analisis_tren": "b", "rtl": []}"#,
            r#"{"analisis_utama": "a", "analisis_tren": "b", "rtl": [{"waktu": "TW I"}], "kesimpulan": {"utama": "", "saran": "", "penutup": ""}}"#,
        ] {
            let err = merge_narrative(&ds, bad).unwrap_err();
            assert!(matches!(err, SkmError::NarrativeFormat(_)), "{bad}");
        }
        assert_eq!(ds.narrative.main_analysis.as_deref(), Some("teks lama"));
    }

    #[test]
    fn freeform_conclusion_edit_keeps_other_fields() {
        let ds = merge_narrative(&process(&sample_workbook()).unwrap(), PAYLOAD).unwrap();
        let edit = ConclusionEdit::parse("Kesimpulan baru");
        assert_eq!(edit, ConclusionEdit::Freeform("Kesimpulan baru".to_string()));
        let edited = edit_conclusion(&ds, edit);
        let c = edited.narrative.conclusion.unwrap();
        assert_eq!(c.main, "Kesimpulan baru");
        assert_eq!(c.suggestions, "Tambah loket.");
        assert_eq!(c.closing, "Laporan ini menjadi acuan perbaikan.");
    }

    #[test]
    fn structured_conclusion_edit_replaces_all_fields() {
        let edit = ConclusionEdit::parse(r#"{"utama": "a", "saran": "b", "penutup": "c"}"#);
        let prior = Conclusion {
            main: "x".into(),
            suggestions: "y".into(),
            closing: "z".into(),
        };
        let c = edit.apply(Some(&prior));
        assert_eq!(
            c,
            Conclusion {
                main: "a".into(),
                suggestions: "b".into(),
                closing: "c".into()
            }
        );
    }

    #[test]
    fn prompt_lists_extremes_and_trend() {
        let ds = process(&sample_workbook()).unwrap();
        let prompt = build_prompt(&ds);
        assert!(prompt.contains(
            "3 Unsur Nilai Terendah: U2 (nilai: 58.33), U3 (nilai: 58.33), U7 (nilai: 58.33)"
        ));
        assert!(prompt.contains(
            "3 Unsur Nilai Tertinggi: U9 (nilai: 91.67), U5 (nilai: 91.67), U4 (nilai: 91.67)"
        ));
        assert!(prompt.contains("Tahun 2023: 78.20; Tahun 2024: 80.10"));
        assert!(prompt.contains("77.78 (Kategori: Baik)"));
    }

    #[test]
    fn prompt_guides_each_conclusion_key() {
        let prompt = build_prompt(&process(&sample_workbook()).unwrap());
        assert!(prompt.contains("a. Sorotan unsur terendah sebagai area prioritas perbaikan"));
        assert!(prompt.contains("b. Kaitan antara analisis unsur dengan kritik dan saran"));
        assert!(prompt.contains("- **utama**: Berisi kesimpulan utama"));
        assert!(prompt.contains("- **saran**: Berisi saran dan rekomendasi"));
        assert!(prompt.contains("- **penutup**: Berisi kalimat penutup formal"));
        assert!(prompt.contains("Bandingkan nilai IKM tahun ini (77.78)"));
    }
}
