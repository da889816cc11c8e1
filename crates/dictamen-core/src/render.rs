//! Deterministic card rendering for analysis reports.
//!
//! A single pass converts a raw [`AnalysisReport`] into a fully-defaulted
//! [`ReportCard`]: every "default when absent" rule lives here, so display
//! layers only print card fields and never look at the wire model.
//!
//! # Card conventions
//!
//! - Statuses: `"OK"` is the only affirmative status; everything else,
//!   including the defaulted `NO_EVIDENCE`, gets the cautionary tone.
//! - Nodes keep analysis order and are labeled `Nodo 1..N`.
//! - Citation excerpts are cut at 300 characters with a `…` marker.
//! - Missing numerics default to 0; missing narrative text to `—`.
//! - Opaque payloads (`node`, `reasoning`, `devils_advocate`) are
//!   pretty-printed JSON with no shape assumptions.
//!
//! The pass is pure: no I/O, no logging, never panics.

use serde_json::Value;

use crate::report::{AnalysisReport, Citation, CitationMeta, NodeItem};

/// Maximum excerpt length before truncation, in characters.
const EXCERPT_MAX_CHARS: usize = 300;
/// Marker appended to truncated excerpts.
const ELLIPSIS: char = '…';

/// Status substituted when the engine sent none.
pub const NO_EVIDENCE: &str = "NO_EVIDENCE";
/// Stand-in for a node whose retrieval produced no citations.
pub const NO_CITATIONS: &str = "Sin citas";
/// Stand-in for a missing narrative opinion.
pub const NO_OPINION: &str = "—";

/// Visual tone of a status chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Affirmative,
    Caution,
}

/// Map a status string to its tone. Total: `"OK"` is affirmative, any other
/// string is cautionary.
pub fn status_tone(status: &str) -> Tone {
    if status == "OK" {
        Tone::Affirmative
    } else {
        Tone::Caution
    }
}

/// A status label with its tone, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChip {
    pub label: String,
    pub tone: Tone,
}

/// Headline values shown above the evidence blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub engine: String,
    pub gate: StatusChip,
    /// Rounded to the nearest millisecond, like `843 ms`.
    pub latency: String,
}

/// One formatted citation inside a node block.
#[derive(Debug, Clone, PartialEq)]
pub struct CitationEntry {
    /// `title · source · jurisdiction`, with blanks for missing parts.
    pub heading: String,
    /// `ref_label (line_start–line_end)`, only when a label exists.
    pub reference: Option<String>,
    pub reference_url: Option<String>,
    pub pinpoint: bool,
    pub excerpt: String,
}

/// Citation listing for a node: formatted entries in retrieval order, or an
/// explicit placeholder when retrieval produced none.
#[derive(Debug, Clone, PartialEq)]
pub enum CitationListing {
    Entries(Vec<CitationEntry>),
    Placeholder(&'static str),
}

/// One analyzed sub-clause, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBlock {
    /// `Nodo N`, 1-based in analysis order.
    pub label: String,
    pub status: StatusChip,
    /// Pretty-printed engine payload.
    pub payload: String,
    pub used_query: Option<String>,
    pub citations: CitationListing,
}

/// Narrative opinion section.
#[derive(Debug, Clone, PartialEq)]
pub struct OpinionBlock {
    /// Narrative text, or [`NO_OPINION`] when the engine sent none.
    pub analysis: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    /// Pretty-printed counter-reading payload, when present.
    pub devils_advocate: Option<String>,
}

/// EEE quality scores with absences zeroed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EeeBlock {
    pub t: f64,
    pub j: f64,
    pub p: f64,
}

/// The fully-defaulted display card for one report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCard {
    pub summary: Summary,
    pub nodes: Vec<NodeBlock>,
    pub flags: Vec<String>,
    pub opinion: OpinionBlock,
    /// Pretty-printed doctrinal payload; `{}` when the engine sent none.
    pub reasoning: String,
    pub metrics: EeeBlock,
    pub alternative_clause: Option<String>,
}

/// Render a report into its display card.
///
/// Total over its input: `None` (nothing received yet) is the empty
/// rendering and yields `None`; any report renders, with every absent
/// optional field degraded to its documented default.
pub fn render(report: Option<&AnalysisReport>) -> Option<ReportCard> {
    report.map(report_card)
}

fn report_card(report: &AnalysisReport) -> ReportCard {
    ReportCard {
        summary: Summary {
            engine: report.engine.clone(),
            gate: chip(defaulted_status(&report.gate.status)),
            latency: format_latency(report.latency_ms),
        },
        nodes: report
            .per_node
            .iter()
            .enumerate()
            .map(|(i, item)| node_block(i, item))
            .collect(),
        flags: report.flags.clone(),
        opinion: OpinionBlock {
            analysis: report
                .opinion
                .analysis_md
                .clone()
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| NO_OPINION.to_string()),
            pros: report.opinion.pros.clone(),
            cons: report.opinion.cons.clone(),
            devils_advocate: report.opinion.devils_advocate.as_ref().map(pretty),
        },
        reasoning: report
            .reasoning
            .as_ref()
            .map(pretty)
            .unwrap_or_else(|| "{}".to_string()),
        metrics: EeeBlock {
            t: report.eee.t.unwrap_or(0.0),
            j: report.eee.j.unwrap_or(0.0),
            p: report.eee.p.unwrap_or(0.0),
        },
        alternative_clause: report
            .alternative_clause
            .clone()
            .filter(|clause| !clause.is_empty()),
    }
}

fn node_block(index: usize, item: &NodeItem) -> NodeBlock {
    let citations = if item.retrieval.citations.is_empty() {
        CitationListing::Placeholder(NO_CITATIONS)
    } else {
        CitationListing::Entries(
            item.retrieval.citations.iter().map(citation_entry).collect(),
        )
    };
    NodeBlock {
        label: format!("Nodo {}", index + 1),
        status: chip(defaulted_status(&item.retrieval.status)),
        payload: pretty(&item.node),
        used_query: item.used_query.clone().filter(|query| !query.is_empty()),
        citations,
    }
}

fn citation_entry(citation: &Citation) -> CitationEntry {
    CitationEntry {
        heading: citation_heading(&citation.meta),
        reference: citation_reference(&citation.meta),
        reference_url: citation.meta.ref_url.clone().filter(|url| !url.is_empty()),
        pinpoint: citation.meta.pinpoint.unwrap_or(false),
        excerpt: truncate_excerpt(&citation.text),
    }
}

fn citation_heading(meta: &CitationMeta) -> String {
    format!(
        "{} · {} · {}",
        meta.title.as_deref().unwrap_or_default(),
        meta.source.as_deref().unwrap_or_default(),
        meta.jurisdiction.as_deref().unwrap_or_default(),
    )
}

/// Reference line: present only with a `ref_label`; missing line numbers
/// render as 0 rather than blanks.
fn citation_reference(meta: &CitationMeta) -> Option<String> {
    let label = meta.ref_label.as_deref().filter(|label| !label.is_empty())?;
    Some(format!(
        "{} ({}–{})",
        label,
        meta.line_start.unwrap_or(0),
        meta.line_end.unwrap_or(0),
    ))
}

/// Truncate an excerpt to its first 300 characters, appending `…` when the
/// original is longer. Counts characters, not bytes; legal text is rarely
/// plain ASCII.
pub fn truncate_excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let mut excerpt: String = chars.by_ref().take(EXCERPT_MAX_CHARS).collect();
    if chars.next().is_some() {
        excerpt.push(ELLIPSIS);
    }
    excerpt
}

fn chip(status: &str) -> StatusChip {
    StatusChip {
        label: status.to_string(),
        tone: status_tone(status),
    }
}

fn defaulted_status(status: &str) -> &str {
    if status.is_empty() { NO_EVIDENCE } else { status }
}

fn format_latency(latency_ms: Option<f64>) -> String {
    format!("{} ms", latency_ms.unwrap_or(0.0).round() as i64)
}

/// Pretty-print an engine-shaped payload. Serializing a `Value` to a string
/// cannot fail, so this stays total.
fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Citation, CitationMeta, Gate, NodeItem, Retrieval};

    fn report_from(json: &str) -> AnalysisReport {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn absent_report_renders_nothing() {
        assert!(render(None).is_none());
    }

    #[test]
    fn demo_response_renders_summary_defaults() {
        let report = report_from(
            r#"{"engine":"demo","gate":{"status":"OK"},"per_node":[],"latency_ms":842.7}"#,
        );
        let card = render(Some(&report)).unwrap();
        assert_eq!(card.summary.engine, "demo");
        assert_eq!(card.summary.gate.label, "OK");
        assert_eq!(card.summary.gate.tone, Tone::Affirmative);
        assert_eq!(card.summary.latency, "843 ms");
        assert!(card.nodes.is_empty());
        assert_eq!(card.metrics, EeeBlock { t: 0.0, j: 0.0, p: 0.0 });
    }

    #[test]
    fn missing_gate_defaults_to_no_evidence() {
        let card = render(Some(&report_from(r#"{"engine":"demo"}"#))).unwrap();
        assert_eq!(card.summary.gate.label, NO_EVIDENCE);
        assert_eq!(card.summary.gate.tone, Tone::Caution);
        assert_eq!(card.summary.latency, "0 ms");
    }

    #[test]
    fn status_tone_is_total_and_exact() {
        assert_eq!(status_tone("OK"), Tone::Affirmative);
        assert_eq!(status_tone("NO_EVIDENCE"), Tone::Caution);
        assert_eq!(status_tone("ok"), Tone::Caution);
        assert_eq!(status_tone(""), Tone::Caution);
        assert_eq!(status_tone("PARTIAL"), Tone::Caution);
    }

    #[test]
    fn truncation_is_identity_up_to_limit() {
        let short = "a".repeat(299);
        let exact = "b".repeat(300);
        assert_eq!(truncate_excerpt(&short), short);
        assert_eq!(truncate_excerpt(&exact), exact);
        assert_eq!(truncate_excerpt(""), "");
    }

    #[test]
    fn truncation_appends_single_marker() {
        let long = "c".repeat(301);
        let cut = truncate_excerpt(&long);
        assert_eq!(cut.chars().count(), 301);
        assert!(cut.ends_with('…'));
        assert_eq!(&cut[..300], &long[..300]);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let long = "ñ".repeat(350);
        let cut = truncate_excerpt(&long);
        assert_eq!(cut.chars().count(), 301);
        assert!(cut.starts_with("ñ"));
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn node_without_citations_gets_placeholder() {
        let report = AnalysisReport {
            per_node: vec![NodeItem {
                retrieval: Retrieval {
                    status: "NO_EVIDENCE".into(),
                    citations: vec![],
                },
                ..NodeItem::default()
            }],
            ..AnalysisReport::default()
        };
        let card = render(Some(&report)).unwrap();
        let node = &card.nodes[0];
        assert_eq!(node.status.tone, Tone::Caution);
        assert_eq!(node.citations, CitationListing::Placeholder("Sin citas"));
    }

    #[test]
    fn missing_retrieval_status_defaults_like_gate() {
        let report = AnalysisReport {
            per_node: vec![NodeItem::default()],
            ..AnalysisReport::default()
        };
        let card = render(Some(&report)).unwrap();
        assert_eq!(card.nodes[0].status.label, NO_EVIDENCE);
    }

    #[test]
    fn nodes_keep_analysis_order_and_labels() {
        let report = report_from(
            r#"{"per_node":[{"node":1},{"node":2},{"node":3}]}"#,
        );
        let card = render(Some(&report)).unwrap();
        let labels: Vec<&str> = card.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, ["Nodo 1", "Nodo 2", "Nodo 3"]);
        assert_eq!(card.nodes[2].payload, "3");
    }

    #[test]
    fn citation_reference_requires_label() {
        let with_label = citation_entry(&Citation {
            text: "excerpt".into(),
            meta: CitationMeta {
                title: Some("Ley de Propiedad Intelectual".into()),
                source: Some("BOE".into()),
                jurisdiction: Some("ES".into()),
                ref_label: Some("art. 14".into()),
                line_start: Some(120),
                line_end: Some(134),
                ..CitationMeta::default()
            },
        });
        assert_eq!(
            with_label.heading,
            "Ley de Propiedad Intelectual · BOE · ES"
        );
        assert_eq!(with_label.reference.as_deref(), Some("art. 14 (120–134)"));

        let without_label = citation_entry(&Citation::default());
        assert!(without_label.reference.is_none());
        assert_eq!(without_label.heading, " ·  · ");
        assert_eq!(without_label.excerpt, "");
    }

    #[test]
    fn citation_reference_zeroes_missing_lines() {
        let entry = citation_entry(&Citation {
            text: String::new(),
            meta: CitationMeta {
                ref_label: Some("art. 6bis".into()),
                ..CitationMeta::default()
            },
        });
        assert_eq!(entry.reference.as_deref(), Some("art. 6bis (0–0)"));
    }

    #[test]
    fn citation_excerpt_is_truncated_in_card() {
        let report = AnalysisReport {
            per_node: vec![NodeItem {
                retrieval: Retrieval {
                    status: "OK".into(),
                    citations: vec![Citation {
                        text: "d".repeat(400),
                        meta: CitationMeta::default(),
                    }],
                },
                ..NodeItem::default()
            }],
            ..AnalysisReport::default()
        };
        let card = render(Some(&report)).unwrap();
        match &card.nodes[0].citations {
            CitationListing::Entries(entries) => {
                assert_eq!(entries[0].excerpt.chars().count(), 301);
                assert!(!entries[0].pinpoint);
            }
            CitationListing::Placeholder(_) => panic!("expected entries"),
        }
    }

    #[test]
    fn opinion_defaults_to_dash_and_empty_lists() {
        let card = render(Some(&report_from("{}"))).unwrap();
        assert_eq!(card.opinion.analysis, NO_OPINION);
        assert!(card.opinion.pros.is_empty());
        assert!(card.opinion.cons.is_empty());
        assert!(card.opinion.devils_advocate.is_none());
    }

    #[test]
    fn pros_and_cons_keep_list_order() {
        let report = report_from(
            r#"{"opinion":{"pros":["b","a","b"],"cons":["z","y"]}}"#,
        );
        let card = render(Some(&report)).unwrap();
        assert_eq!(card.opinion.pros, ["b", "a", "b"]);
        assert_eq!(card.opinion.cons, ["z", "y"]);
    }

    #[test]
    fn blank_used_query_is_hidden() {
        let report = report_from(
            r#"{"per_node":[{"used_query":""},{"used_query":"derechos morales ES"}]}"#,
        );
        let card = render(Some(&report)).unwrap();
        assert!(card.nodes[0].used_query.is_none());
        assert_eq!(card.nodes[1].used_query.as_deref(), Some("derechos morales ES"));
    }

    #[test]
    fn opaque_payloads_render_as_indented_json() {
        let report = report_from(
            r#"{"per_node":[{"node":{"pregunta":"x"}}],"reasoning":{"modelo":"doctrinal"}}"#,
        );
        let card = render(Some(&report)).unwrap();
        assert!(card.nodes[0].payload.contains("\"pregunta\": \"x\""));
        assert!(card.reasoning.contains("\"modelo\": \"doctrinal\""));
    }

    #[test]
    fn missing_reasoning_renders_empty_object() {
        let card = render(Some(&report_from("{}"))).unwrap();
        assert_eq!(card.reasoning, "{}");
    }

    #[test]
    fn partial_eee_zeroes_the_rest() {
        let card = render(Some(&report_from(r#"{"EEE":{"T":4.5}}"#))).unwrap();
        assert_eq!(card.metrics, EeeBlock { t: 4.5, j: 0.0, p: 0.0 });
    }

    #[test]
    fn latency_rounds_to_nearest_millisecond() {
        let card = render(Some(&report_from(r#"{"latency_ms":99.4}"#))).unwrap();
        assert_eq!(card.summary.latency, "99 ms");
        let card = render(Some(&report_from(r#"{"latency_ms":842.7}"#))).unwrap();
        assert_eq!(card.summary.latency, "843 ms");
    }

    #[test]
    fn flags_pass_through_in_order() {
        let report = report_from(r#"{"flags":["renuncia moral general","cesion universal"]}"#);
        let card = render(Some(&report)).unwrap();
        assert_eq!(card.flags, ["renuncia moral general", "cesion universal"]);
    }

    #[test]
    fn blank_alternative_clause_is_hidden() {
        let card = render(Some(&report_from(r#"{"alternative_clause":""}"#))).unwrap();
        assert!(card.alternative_clause.is_none());
        let card = render(Some(&report_from(r#"{"alternative_clause":"El Titular cede..."}"#)))
            .unwrap();
        assert_eq!(card.alternative_clause.as_deref(), Some("El Titular cede..."));
    }

    #[test]
    fn gate_status_set_by_report_is_kept() {
        let report = AnalysisReport {
            gate: Gate { status: "PARTIAL".into() },
            ..AnalysisReport::default()
        };
        let card = render(Some(&report)).unwrap();
        assert_eq!(card.summary.gate.label, "PARTIAL");
        assert_eq!(card.summary.gate.tone, Tone::Caution);
    }
}
