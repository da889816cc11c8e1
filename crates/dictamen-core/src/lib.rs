pub mod render;
pub mod report;

pub use render::{render, CitationListing, ReportCard, StatusChip, Tone};
pub use report::{AnalysisReport, AnalyzeRequest, Jurisdiction};
