//! Markdown report generation
//!
//! This module renders a crawl report as human-readable markdown: run
//! information, detected applications with their categories, and the pages
//! that were visited.

use crate::output::types::CrawlReport;

/// Formats a crawl report as markdown
///
/// # Arguments
///
/// * `report` - The finished crawl report
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Techcrawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", report.seed));
    md.push_str(&format!("- **Started**: {}\n", report.started_at));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        report.duration_seconds()
    ));
    md.push_str(&format!("- **Pages Visited**: {}\n", report.visited.len()));
    md.push_str(&format!(
        "- **Applications Detected**: {}\n\n",
        report.result.applications.len()
    ));

    md.push_str("## Detected Applications\n\n");
    if report.result.applications.is_empty() {
        md.push_str("No applications detected.\n\n");
    } else {
        md.push_str("| Application | Version | Confidence | Categories | Website |\n");
        md.push_str("|-------------|---------|------------|------------|---------|\n");
        for app in &report.result.applications {
            let categories = app
                .categories
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            md.push_str(&format!(
                "| {} | {} | {}% | {} | {} |\n",
                escape_cell(&app.name),
                app.version.as_deref().map(escape_cell).unwrap_or_default(),
                app.confidence,
                escape_cell(&categories),
                app.website.as_deref().map(escape_cell).unwrap_or_default(),
            ));
        }
        md.push('\n');
    }

    md.push_str("## Visited Pages\n\n");
    for (i, url) in report.visited.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, url));
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
