//! Human-readable run report.

use std::fmt::Write;

use super::types::RunReport;
use crate::stats::RecordIssue;

impl RunReport {
    /// Renders the report as plain text: counts first, then one section per
    /// non-empty detail list, then the finish timestamp.
    pub fn render_text(&self) -> String {
        let stats = &self.statistics;
        let mut out = String::new();

        let _ = writeln!(out, "Run report");
        let _ = writeln!(out, "==========");
        let _ = writeln!(out, "Run id:                {}", self.run_id);
        let _ = writeln!(out, "Source:                {}", self.source);
        let _ = writeln!(out, "State:                 {}", self.state);
        let _ = writeln!(out, "Started:               {}", self.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out);

        let counts = [
            ("Total records", stats.total_records),
            ("Processed", stats.processed),
            ("Template groups", stats.groups),
            ("Generated", stats.success),
            ("Templates not found", stats.template_missing),
            ("No attributes found", stats.no_attributes),
            ("Validation errors", stats.validation_errors),
            ("Document errors", stats.document_errors),
            ("Duplicates renamed", stats.duplicates),
            ("Renders generated", stats.renders_generated),
            ("Renders failed", stats.renders_failed),
        ];
        for (label, value) in counts {
            let _ = writeln!(out, "{:<22} {}", format!("{}:", label), value);
        }

        section(&mut out, "Templates not found", stats.missing_templates.iter().cloned());
        section(
            &mut out,
            "Templates without attributes",
            stats.templates_without_attributes.iter().cloned(),
        );
        section(
            &mut out,
            "Duplicate identifiers renamed",
            stats
                .renames
                .iter()
                .map(|r| format!("row {}: {} -> {}", r.row, r.original, r.renamed)),
        );
        section(&mut out, "Invalid records", stats.invalid_records.iter().map(issue_line));
        section(&mut out, "Document errors", stats.document_failures.iter().map(issue_line));
        section(&mut out, "Failed renders", stats.render_failures.iter().map(issue_line));

        if let Some(error) = &self.fatal_error {
            let _ = writeln!(out);
            let _ = writeln!(out, "Fatal error: {}", error);
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Finished: {}",
            self.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        out
    }
}

fn issue_line(issue: &RecordIssue) -> String {
    let identifier = if issue.identifier.is_empty() {
        "?"
    } else {
        issue.identifier.as_str()
    };
    format!("row {} ({}): {}", issue.row, identifier, issue.reason)
}

fn section(out: &mut String, title: &str, lines: impl Iterator<Item = String>) {
    let mut lines = lines.peekable();
    if lines.peek().is_none() {
        return;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}:", title);
    for line in lines {
        let _ = writeln!(out, "  - {}", line);
    }
}
