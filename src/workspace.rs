// Single-document workspace owned by the caller.
//
// At most one dataset is active. Every load bumps the generation, so a
// narrative request started before a reload can be recognised and dropped
// when its answer finally arrives.
use crate::engine::process;
use crate::error::{Result, SkmError};
use crate::narrative::{edit_analysis, edit_conclusion, merge_narrative, ConclusionEdit};
use crate::types::{ReportDataset, Workbook};
use log::{info, warn};

/// Identifies the dataset a narrative request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrativeTicket {
    generation: u64,
}

#[derive(Debug, Default)]
pub struct Workspace {
    dataset: Option<ReportDataset>,
    generation: u64,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<&ReportDataset> {
        self.dataset.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Drop the active dataset and invalidate outstanding narrative tickets.
    pub fn reset(&mut self) {
        self.dataset = None;
        self.generation += 1;
    }

    /// Process a new upload. The previous dataset is discarded first, so a
    /// failed load leaves the workspace empty rather than stale.
    pub fn load(&mut self, workbook: &Workbook) -> Result<&ReportDataset> {
        self.reset();
        let dataset = process(workbook)?;
        Ok(self.dataset.insert(dataset))
    }

    fn active(&self) -> Result<&ReportDataset> {
        self.dataset.as_ref().ok_or(SkmError::NoDataset)
    }

    /// Start a narrative request for the active dataset.
    pub fn begin_narrative(&self) -> Result<NarrativeTicket> {
        self.active()?;
        Ok(NarrativeTicket {
            generation: self.generation,
        })
    }

    /// Merge a narrative response. Results for an earlier upload are
    /// rejected with [`SkmError::StaleNarrative`]; malformed payloads leave
    /// the current narrative as it was.
    pub fn complete_narrative(&mut self, ticket: NarrativeTicket, payload: &str) -> Result<()> {
        if ticket.generation != self.generation {
            warn!("Discarding narrative for generation {}", ticket.generation);
            return Err(SkmError::StaleNarrative);
        }
        let merged = merge_narrative(self.active()?, payload)?;
        info!(
            "Narrative merged: {} follow-up action(s)",
            merged.narrative.follow_up.len()
        );
        self.dataset = Some(merged);
        Ok(())
    }

    pub fn edit_analysis(&mut self, text: &str) -> Result<()> {
        let edited = edit_analysis(self.active()?, text);
        self.dataset = Some(edited);
        Ok(())
    }

    pub fn edit_conclusion(&mut self, edit: ConclusionEdit) -> Result<()> {
        let edited = edit_conclusion(self.active()?, edit);
        self.dataset = Some(edited);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::sample_workbook;

    const PAYLOAD: &str = r#"{
        "analisis_utama": "Analisis.",
        "analisis_tren": "Tren.",
        "rtl": [],
        "kesimpulan": {"utama": "Utama.", "saran": "Saran.", "penutup": "Penutup."}
    }"#;

    #[test]
    fn failed_load_leaves_workspace_empty() {
        let mut ws = Workspace::new();
        ws.load(&sample_workbook()).unwrap();
        assert!(ws.is_loaded());

        let mut broken = sample_workbook();
        broken.responses = None;
        assert!(ws.load(&broken).is_err());
        assert!(ws.dataset().is_none());
    }

    #[test]
    fn narrative_requires_a_dataset() {
        let ws = Workspace::new();
        assert!(matches!(ws.begin_narrative(), Err(SkmError::NoDataset)));
    }

    #[test]
    fn narrative_from_previous_upload_is_discarded() {
        let mut ws = Workspace::new();
        ws.load(&sample_workbook()).unwrap();
        let ticket = ws.begin_narrative().unwrap();
        ws.load(&sample_workbook()).unwrap();
        assert!(matches!(
            ws.complete_narrative(ticket, PAYLOAD),
            Err(SkmError::StaleNarrative)
        ));
        assert_eq!(ws.dataset().unwrap().narrative.main_analysis, None);
    }

    #[test]
    fn narrative_after_reset_is_discarded() {
        let mut ws = Workspace::new();
        ws.load(&sample_workbook()).unwrap();
        let ticket = ws.begin_narrative().unwrap();
        ws.reset();
        assert!(ws.complete_narrative(ticket, PAYLOAD).is_err());
        assert!(!ws.is_loaded());
    }

    #[test]
    fn merge_then_edit() {
        let mut ws = Workspace::new();
        ws.load(&sample_workbook()).unwrap();
        let ticket = ws.begin_narrative().unwrap();
        ws.complete_narrative(ticket, PAYLOAD).unwrap();

        ws.edit_analysis("Analisis revisi.").unwrap();
        ws.edit_conclusion(ConclusionEdit::parse("Utama revisi.")).unwrap();
        let n = &ws.dataset().unwrap().narrative;
        assert_eq!(n.main_analysis.as_deref(), Some("Analisis revisi."));
        assert_eq!(n.trend_analysis.as_deref(), Some("Tren."));
        let c = n.conclusion.as_ref().unwrap();
        assert_eq!(c.main, "Utama revisi.");
        assert_eq!(c.suggestions, "Saran.");
    }

    #[test]
    fn malformed_narrative_keeps_previous_text() {
        let mut ws = Workspace::new();
        ws.load(&sample_workbook()).unwrap();
        ws.edit_analysis("Tulisan sendiri.").unwrap();
        let ticket = ws.begin_narrative().unwrap();
        let err = ws.complete_narrative(ticket, "{not json").unwrap_err();
        assert!(matches!(err, SkmError::NarrativeFormat(_)));
        assert_eq!(
            ws.dataset().unwrap().narrative.main_analysis.as_deref(),
            Some("Tulisan sendiri.")
        );
    }
}
