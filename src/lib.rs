//! Citizen satisfaction survey (SKM) aggregation and report builder.
//!
//! The core turns a survey workbook into a [`types::ReportDataset`]
//! ([`engine::process`]), merges an AI-written narrative into it
//! ([`narrative::merge_narrative`]) and renders a structured report
//! ([`document::render`]). Spreadsheet, template, network and file output
//! concerns live in the adapter modules.

pub mod aggregate;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod gemini;
pub mod loader;
pub mod narrative;
pub mod output;
pub mod sample;
pub mod scoring;
pub mod template;
pub mod types;
pub mod util;
pub mod workspace;

#[cfg(test)]
mod testutil;

pub use error::{Result, SkmError};
