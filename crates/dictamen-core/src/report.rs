//! Wire types for the clause-analysis service.
//!
//! The service may omit almost anything, so missing containers decode to
//! their empty values here and scalar absence stays visible as `Option` or
//! an empty string. Semantic defaults (`NO_EVIDENCE`, zeroed metrics,
//! placeholders) are applied in one place, the card renderer in
//! [`crate::render`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Target jurisdiction for an analysis request, sent verbatim on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Jurisdiction {
    ES,
    EU,
    US,
    INT,
}

impl Jurisdiction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ES => "ES",
            Self::EU => "EU",
            Self::US => "US",
            Self::INT => "INT",
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown jurisdiction {0:?}: expected ES, EU, US or INT")]
pub struct UnknownJurisdiction(String);

impl FromStr for Jurisdiction {
    type Err = UnknownJurisdiction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ES" => Ok(Self::ES),
            "EU" => Ok(Self::EU),
            "US" => Ok(Self::US),
            "INT" => Ok(Self::INT),
            _ => Err(UnknownJurisdiction(s.to_string())),
        }
    }
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub clause: String,
    pub jurisdiction: Jurisdiction,
}

/// Source metadata attached to a citation. Nothing is guaranteed present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitationMeta {
    pub title: Option<String>,
    pub source: Option<String>,
    pub jurisdiction: Option<String>,
    /// Provision reference like `art. 14`.
    pub ref_label: Option<String>,
    pub ref_url: Option<String>,
    /// True when the excerpt is tied to an exact line range in the source.
    pub pinpoint: Option<bool>,
    pub line_start: Option<i64>,
    pub line_end: Option<i64>,
}

/// One evidentiary excerpt retrieved for a node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub meta: CitationMeta,
}

/// Retrieval outcome for one node: a status string (`OK` / `NO_EVIDENCE`)
/// and the citations backing it, in retrieval order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Retrieval {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// One analyzed sub-clause of the submitted text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeItem {
    /// Engine-shaped decomposition payload, echoed without interpretation.
    #[serde(default)]
    pub node: Value,
    #[serde(default)]
    pub retrieval: Retrieval,
    /// Query string the retriever actually executed, when reported.
    pub used_query: Option<String>,
}

/// Evidence-gate verdict for the whole clause.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gate {
    #[serde(default)]
    pub status: String,
}

/// Narrative opinion with its argument lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Opinion {
    pub analysis_md: Option<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    /// Counter-reading payload, engine-shaped.
    pub devils_advocate: Option<Value>,
}

/// Aggregate quality scores reported by the engine. Semantics are owned by
/// the engine; this client only defaults and displays them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EeeScores {
    #[serde(rename = "T")]
    pub t: Option<f64>,
    #[serde(rename = "J")]
    pub j: Option<f64>,
    #[serde(rename = "P")]
    pub p: Option<f64>,
}

/// Full service response to one analyze call.
///
/// Immutable once received; the next successful call replaces it wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub gate: Gate,
    /// Analysis order; rendered as `Nodo 1..N` in this order.
    #[serde(default)]
    pub per_node: Vec<NodeItem>,
    /// Rule-derived warning labels, in detection order.
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub opinion: Opinion,
    pub alternative_clause: Option<String>,
    #[serde(rename = "EEE", default)]
    pub eee: EeeScores,
    pub latency_ms: Option<f64>,
    /// Doctrinal scoring payload, engine-shaped.
    pub reasoning: Option<Value>,
}
