//! Error type shared by the engine, the narrative integration and the
//! file adapters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkmError {
    /// A required sheet is absent from the workbook.
    #[error("sheet '{sheet}' not found")]
    Schema { sheet: String },

    #[error("sheet '{sheet}' contains no responses")]
    EmptyDataset { sheet: String },

    #[error("column '{column}' not found in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    /// The narrative service answered, but not with the expected JSON shape.
    #[error("narrative response is not valid: {0}")]
    NarrativeFormat(String),

    /// Transport or authentication failure talking to the narrative service.
    #[error("narrative service error: {0}")]
    ExternalService(String),

    #[error("no survey data loaded; process a workbook first")]
    NoDataset,

    /// A narrative result arrived for a dataset that has since been replaced.
    #[error("narrative result belongs to a previous upload and was discarded")]
    StaleNarrative,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SkmError {
    pub fn missing_sheet(sheet: &str) -> Self {
        Self::Schema {
            sheet: sheet.to_string(),
        }
    }

    pub fn missing_column(sheet: &str, column: &str) -> Self {
        Self::MissingColumn {
            sheet: sheet.to_string(),
            column: column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SkmError>;
