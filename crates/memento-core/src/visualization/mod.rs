//! Graph renderers
//!
//! Each output form is a pure function over a [`GraphStore`](crate::graph::GraphStore):
//! - [`render_report`]: layered console report
//! - [`render_export`]: structured JSON, restorable with [`parse_export`]
//! - [`render_mermaid`]: Mermaid flowchart source
//! - [`render_cypher`]: Cypher load script

pub mod cypher;
pub mod export;
pub mod mermaid;
pub mod report;
pub mod stats;

pub use cypher::render_cypher;
pub use export::{ExportStatistics, GraphExport, parse_export, render_export};
pub use mermaid::render_mermaid;
pub use report::{ReportOptions, render_report, strength_bar};
pub use stats::{EntityConnections, GraphStatistics, average_relationships_per_entity, density_bar};

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::graph::GraphStore;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Report,
    Json,
    Mermaid,
    Cypher,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Json => "json",
            Self::Mermaid => "mermaid",
            Self::Cypher => "cypher",
        }
    }

    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Report => "txt",
            Self::Json => "json",
            Self::Mermaid => "mmd",
            Self::Cypher => "cypher",
        }
    }

    pub fn all() -> &'static [OutputFormat] {
        &[Self::Report, Self::Json, Self::Mermaid, Self::Cypher]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "report" | "text" => Ok(Self::Report),
            "json" => Ok(Self::Json),
            "mermaid" | "mmd" => Ok(Self::Mermaid),
            "cypher" | "neo4j" => Ok(Self::Cypher),
            other => Err(Error::InvalidInput(format!(
                "unknown output format '{}' (expected report, json, mermaid or cypher)",
                other
            ))),
        }
    }
}

/// Render `store` in the requested format
pub fn render(store: &GraphStore, format: OutputFormat, options: &ReportOptions) -> Result<String> {
    match format {
        OutputFormat::Report => render_report(store, options),
        OutputFormat::Json => render_export(store),
        OutputFormat::Mermaid => Ok(render_mermaid(store)),
        OutputFormat::Cypher => Ok(render_cypher(store)),
    }
}
