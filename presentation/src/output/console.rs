//! Console output for the operator

use colored::Colorize;
use eunomia_application::{BotParams, ChamberStatus, Identity};
use eunomia_domain::{ConfigIssue, LegislationRules, ProposalRecord, Severity};
use std::path::Path;

/// Connection details shown at startup
pub struct StartupSummary<'a> {
    pub server: &'a str,
    pub port: u16,
    pub params: &'a BotParams,
    pub rules: &'a LegislationRules,
    pub log_dir: &'a Path,
}

/// Formats bot state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Startup banner with the effective configuration
    pub fn banner(summary: &StartupSummary<'_>) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("eunomia"));
        output.push('\n');

        output.push_str(&Self::field(
            "Server:",
            &format!("{}:{}", summary.server, summary.port),
        ));
        output.push_str(&Self::field("Channel:", &summary.params.channel));
        output.push_str(&Self::field("Nick:", &summary.params.nick));
        let identity = match &summary.params.identity {
            Identity::None => "none".to_string(),
            Identity::NickServ { username, .. } => format!("NickServ as {}", username),
            Identity::Unsupported(method) => format!("{} (unsupported)", method),
        };
        output.push_str(&Self::field("Identify:", &identity));
        output.push_str(&Self::field("Rules:", &summary.rules.to_string()));
        output.push_str(&Self::field(
            "Announce:",
            if summary.params.announce { "yes" } else { "no" },
        ));
        output.push_str(&Self::field(
            "Logs:",
            &summary.log_dir.display().to_string(),
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Configuration issues, one per line
    pub fn issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One-line chamber summary
    pub fn status(status: &ChamberStatus) -> String {
        format!("{} {}", "Chamber:".cyan().bold(), status)
    }

    /// A legislation record as it appears in the proposal log
    pub fn record(record: &ProposalRecord) -> String {
        let mut output = format!("{}\n", record.proposal.green().bold());
        let context = record
            .context
            .iter()
            .map(|line| line.render())
            .collect::<Vec<_>>()
            .join("\n");
        output.push_str(&Self::indent(&context, "  "));
        output.push('\n');
        output
    }

    fn field(label: &str, value: &str) -> String {
        format!("{:<10} {}\n", label.cyan().bold(), value)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
