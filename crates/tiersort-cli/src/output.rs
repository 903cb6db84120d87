//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tiersort_domain::Tier;
use tiersort_janitor::RunReport;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the summary of a run.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_report_json(report),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(self.format_report_quiet(report)),
        }
    }

    fn format_report_json(&self, report: &RunReport) -> Result<String> {
        let count = |counter: &std::collections::HashMap<Tier, usize>, tier: &Tier| {
            counter.get(tier).copied().unwrap_or(0)
        };
        let tiers: serde_json::Map<String, serde_json::Value> = Tier::ALL
            .iter()
            .map(|tier| {
                (
                    tier.folder_name().to_string(),
                    serde_json::json!({
                        "placed": report.placed_in(*tier),
                        "moved": count(&report.moved, tier),
                        "replaced": count(&report.replaced, tier),
                        "duplicates": count(&report.duplicates, tier),
                        "discarded": count(&report.discarded, tier),
                    }),
                )
            })
            .collect();

        let actions: Vec<serde_json::Value> = report
            .actions
            .iter()
            .map(|a| {
                serde_json::json!({
                    "path": a.path.display().to_string(),
                    "action": a.action.as_str(),
                    "target": a.target.as_ref().map(|t| t.display().to_string()),
                    "tier": a.tier.map(|t| t.folder_name()),
                })
            })
            .collect();

        let failures: Vec<serde_json::Value> = report
            .failures
            .iter()
            .map(|f| {
                serde_json::json!({
                    "path": f.path.display().to_string(),
                    "kind": f.kind.as_str(),
                    "message": f.message,
                })
            })
            .collect();

        let json = serde_json::json!({
            "reference_time": report.reference_time.to_rfc3339(),
            "dry_run": report.dry_run,
            "runtime_ms": report.runtime_ms,
            "tiers": tiers,
            "placed": report.total_placed(),
            "expired": report.expired,
            "pruned": report.pruned,
            "unchanged": report.unchanged,
            "deleted": report.total_deleted(),
            "actions": actions,
            "failures": failures,
        });

        Ok(serde_json::to_string_pretty(&json)?)
    }

    fn format_report_table(&self, report: &RunReport) -> String {
        let mut out = Vec::new();
        if report.dry_run {
            out.push(self.warning("Dry run: nothing was changed"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Tier", "Moved", "Replaced", "Duplicates", "Discarded"]);
        for tier in Tier::ALL {
            let cell = |counter: &std::collections::HashMap<Tier, usize>| {
                counter.get(&tier).copied().unwrap_or(0).to_string()
            };
            builder.push_record([
                tier.folder_name().to_string(),
                cell(&report.moved),
                cell(&report.replaced),
                cell(&report.duplicates),
                cell(&report.discarded),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        out.push(table.to_string());

        out.push(format!(
            "Expired: {}  Pruned: {}  Unchanged: {}  ({}ms)",
            report.expired, report.pruned, report.unchanged, report.runtime_ms
        ));

        if !report.failures.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["File", "Kind", "Error"]);
            for failure in &report.failures {
                builder.push_record([
                    failure.path.display().to_string(),
                    failure.kind.to_string(),
                    failure.message.clone(),
                ]);
            }
            let mut table = builder.build();
            table.with(Style::rounded());
            out.push(table.to_string());
        }

        out.push(self.status(report));
        out.join("\n")
    }

    fn format_report_quiet(&self, report: &RunReport) -> String {
        format!(
            "placed={} deleted={} unchanged={} failed={}",
            report.total_placed(),
            report.total_deleted(),
            report.unchanged,
            report.failures.len()
        )
    }

    /// One-line verdict for the run.
    pub fn status(&self, report: &RunReport) -> String {
        if report.is_clean() {
            self.success(&format!(
                "Run completed: {} file(s) placed, {} deleted",
                report.total_placed(),
                report.total_deleted()
            ))
        } else {
            self.warning(&format!(
                "Run completed with {} file(s) left unprocessed",
                report.failures.len()
            ))
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
