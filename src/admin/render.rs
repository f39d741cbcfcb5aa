//! Plain-text rendering of listings, details and batch results.

use crate::admin::BatchOutcome;
use crate::qdrant::{CollectionInfo, CollectionStatus, CollectionSummary, VectorsConfig};

pub const EMPTY_LISTING: &str = "No collections found (the service is empty)";

const RULE_WIDTH: usize = 60;

pub fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub fn header(title: &str) -> Vec<String> {
    let bar = "=".repeat(RULE_WIDTH);
    vec![bar.clone(), format!("{:^width$}", title, width = RULE_WIDTH), bar]
}

pub fn status_label(status: Option<CollectionStatus>) -> String {
    match status {
        Some(status) => format!("● {}", status.label()),
        None => "● unknown".to_string(),
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn count(value: Option<u64>) -> String {
    value.map(group_thousands).unwrap_or_else(|| "N/A".to_string())
}

pub fn listing(collections: &[CollectionSummary]) -> Vec<String> {
    if collections.is_empty() {
        return vec![EMPTY_LISTING.to_string()];
    }

    let mut lines = vec![
        "Available collections:".to_string(),
        rule(),
        format!("{:>3}  {:<25} {:<12} {}", "#", "Name", "Vectors", "Status"),
        rule(),
    ];
    for (i, collection) in collections.iter().enumerate() {
        lines.push(format!(
            "{:>3}. {:<25} {:<12} {}",
            i + 1,
            collection.name,
            count(collection.vectors_count),
            status_label(collection.status)
        ));
    }
    lines.push(rule());
    lines.push(format!("Total: {} collection(s)", collections.len()));
    lines
}

pub fn details(name: &str, info: &CollectionInfo) -> Vec<String> {
    let mut lines = vec![
        format!("Details of '{name}'"),
        rule(),
        format!("• Status: {}", status_label(Some(info.status))),
        format!("• Total vectors: {}", count(info.vectors_count)),
        format!("• Indexed vectors: {}", count(info.indexed_vectors_count)),
    ];
    if let Some(points) = info.points_count {
        lines.push(format!("• Points: {}", group_thousands(points)));
    }
    if let Some(segments) = info.segments_count {
        lines.push(format!("• Segments: {segments}"));
    }

    match info.vectors() {
        Some(VectorsConfig::Single(params)) => {
            lines.push(format!("• Dimensions: {}", params.size));
            lines.push(format!("• Distance: {}", params.distance));
        }
        Some(VectorsConfig::Named(named)) => {
            for (vector, params) in named {
                lines.push(format!(
                    "• Vector '{vector}': {} dimensions, {}",
                    params.size, params.distance
                ));
            }
        }
        None => {}
    }

    if let Some(config) = &info.config {
        if let Some(hnsw) = config.hnsw_config.as_ref().filter(|v| !v.is_null()) {
            lines.push(format!("• HNSW config: {}", pretty_json(hnsw)));
        }
        if let Some(optimizer) = config.optimizer_config.as_ref().filter(|v| !v.is_null()) {
            lines.push(format!("• Optimizer config: {}", pretty_json(optimizer)));
        }
    }
    lines
}

fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn deletion_warning(names: &[String]) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "!! DELETION CONFIRMATION !!".to_string(),
        rule(),
        "The following collections will be deleted:".to_string(),
    ];
    lines.extend(names.iter().map(|name| format!("  • {name}")));
    lines.push(String::new());
    lines.push("!! THIS ACTION CANNOT BE UNDONE !!".to_string());
    lines.push(rule());
    lines
}

pub fn batch_results(outcome: &BatchOutcome) -> Vec<String> {
    let mut lines = vec![String::new(), "DELETION RESULTS".to_string(), rule()];
    if !outcome.succeeded.is_empty() {
        lines.push(format!("Deleted ({}):", outcome.succeeded.len()));
        lines.extend(outcome.succeeded.iter().map(|n| format!("  • {n}")));
    }
    if !outcome.failed.is_empty() {
        lines.push(format!("Failed ({}):", outcome.failed.len()));
        lines.extend(outcome.failed.iter().map(|n| format!("  • {n}")));
    }
    if !outcome.skipped.is_empty() {
        lines.push(format!("Skipped after interrupt ({}):", outcome.skipped.len()));
        lines.extend(outcome.skipped.iter().map(|n| format!("  • {n}")));
    }
    lines.push(rule());
    lines.push(format!("Total processed: {}", outcome.processed()));
    lines
}
