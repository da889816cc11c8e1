//! Vertical card display for analysis reports.
//!
//! Prints a fully-defaulted [`ReportCard`] as a grouped, human-readable card.
//! All defaulting already happened in `dictamen_core::render`; this module
//! only formats and prints card fields.

use dictamen_client::HealthReport;
use dictamen_core::render::{
    CitationEntry, CitationListing, EeeBlock, NodeBlock, OpinionBlock, ReportCard, StatusChip,
    Summary, Tone,
};

// ── Public API ──

/// Print an analysis card grouped by section.
pub fn print_report_card(card: &ReportCard) {
    print_summary(&card.summary);
    print_flags(&card.flags);
    print_nodes(&card.nodes);
    print_opinion(&card.opinion);
    print_reasoning(&card.reasoning, card.metrics);
    print_alternative(card.alternative_clause.as_deref());
}

/// Print a service health report.
pub fn print_health(report: &HealthReport) {
    println!("  {:<12} {}", "Estado", report.status);
    for (key, value) in &report.detail {
        println!("  {:<12} {}", key, value);
    }
}

// ── Section rendering ──

fn print_summary(summary: &Summary) {
    println!("=== Dictamen ===");
    println!();
    println!("  {:<12} {}", "Motor", summary.engine);
    println!("  {:<12} {}", "Gate", chip_text(&summary.gate));
    println!("  {:<12} {}", "Latencia", summary.latency);
    println!();
}

fn print_flags(flags: &[String]) {
    println!("Avisos");
    if flags.is_empty() {
        println!("  —");
    } else {
        for flag in flags {
            println!("  - {}", flag);
        }
    }
    println!();
}

fn print_nodes(nodes: &[NodeBlock]) {
    if nodes.is_empty() {
        return;
    }
    println!("Evidencia");
    for node in nodes {
        println!("  {}  {}", node.label, chip_text(&node.status));
        print_indented(4, &node.payload);
        if let Some(query) = &node.used_query {
            println!("    Consulta usada: {}", query);
        }
        match &node.citations {
            CitationListing::Placeholder(text) => println!("    {}", text),
            CitationListing::Entries(entries) => {
                for entry in entries {
                    print_citation(entry);
                }
            }
        }
        println!();
    }
}

fn print_citation(entry: &CitationEntry) {
    println!("    {}", entry.heading);
    if let Some(reference) = &entry.reference {
        let pinpoint = if entry.pinpoint { " (pinpoint)" } else { "" };
        println!("      {}{}", reference, pinpoint);
    }
    if let Some(url) = &entry.reference_url {
        println!("      {}", url);
    }
    if !entry.excerpt.is_empty() {
        print_indented(6, &entry.excerpt);
    }
}

fn print_opinion(opinion: &OpinionBlock) {
    println!("Dictamen");
    print_indented(2, &opinion.analysis);
    println!();
    if !opinion.pros.is_empty() {
        println!("Pros");
        for item in &opinion.pros {
            println!("  + {}", item);
        }
        println!();
    }
    if !opinion.cons.is_empty() {
        println!("Contras");
        for item in &opinion.cons {
            println!("  - {}", item);
        }
        println!();
    }
    if let Some(devils) = &opinion.devils_advocate {
        println!("Devil's advocate");
        print_indented(2, devils);
        println!();
    }
}

fn print_reasoning(reasoning: &str, metrics: EeeBlock) {
    println!("Modelo doctrinal");
    print_indented(2, reasoning);
    println!();
    println!("EEE");
    println!("  {:<4} {}", "T", metrics.t);
    println!("  {:<4} {}", "J", metrics.j);
    println!("  {:<4} {}", "P", metrics.p);
    println!();
}

fn print_alternative(clause: Option<&str>) {
    if let Some(clause) = clause {
        println!("Cláusula alternativa");
        print_indented(2, clause);
        println!();
    }
}

// ── Helpers ──

fn chip_text(chip: &StatusChip) -> String {
    let marker = match chip.tone {
        Tone::Affirmative => "✔",
        Tone::Caution => "⚠",
    };
    format!("{} {}", marker, chip.label)
}

/// Print every line of a block under a fixed indent, keeping the block's own
/// line structure.
fn print_indented(indent: usize, block: &str) {
    for line in block.lines() {
        println!("{:indent$}{}", "", line);
    }
}
