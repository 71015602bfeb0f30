use colored::{ColoredString, Colorize};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use filedash_core::{
    ConfirmDialog, DashboardStats, DashboardView, FileRow, PendingAction, RenderSink, RiskTier,
    StatusTier,
};
use std::io::{self, BufRead, Write};

fn risk_cell(text: &str, tier: RiskTier) -> Cell {
    let cell = Cell::new(text);
    match tier {
        RiskTier::Critical => cell.fg(Color::White).bg(Color::Red).add_attribute(Attribute::Bold),
        RiskTier::High => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        RiskTier::Medium => cell.fg(Color::Yellow),
        RiskTier::Low => cell.fg(Color::Green),
        RiskTier::Unknown => cell.add_attribute(Attribute::Dim),
    }
}

fn status_cell(text: &str, tier: StatusTier) -> Cell {
    let cell = Cell::new(text);
    match tier {
        StatusTier::Complete => cell.fg(Color::Green),
        StatusTier::Partial => cell.fg(Color::Yellow),
        StatusTier::Pending => cell.add_attribute(Attribute::Dim),
    }
}

fn paint_risk(text: &str, tier: RiskTier) -> ColoredString {
    match tier {
        RiskTier::Critical => text.white().on_red().bold(),
        RiskTier::High => text.red().bold(),
        RiskTier::Medium => text.yellow(),
        RiskTier::Low => text.green(),
        RiskTier::Unknown => text.dimmed(),
    }
}

fn stats_line(stats: &DashboardStats) -> String {
    let risk = match &stats.average_risk {
        Some(average) => paint_risk(&average.label(), average.classification.tier).to_string(),
        None => paint_risk(&stats.risk_label(), RiskTier::Unknown).to_string(),
    };
    format!(
        "{} files | {} stored | {} | {}",
        stats.total_count,
        stats.total_size_label,
        risk,
        stats.risk_score_label()
    )
}

fn file_table(rows: &[FileRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["File", "Risk", "Size", "Uploaded", "Status", "ID", "Details"]);

    for row in rows {
        let risk = if row.risk.detail.is_empty() {
            row.risk.label.clone()
        } else {
            format!("{}\n{}", row.risk.label, row.risk.detail)
        };
        table.add_row(vec![
            Cell::new(&row.name),
            risk_cell(&risk, row.risk.tier),
            Cell::new(&row.size_label),
            Cell::new(&row.upload_time),
            status_cell(row.status.label, row.status.tier),
            Cell::new(&row.id).add_attribute(Attribute::Dim),
            Cell::new(&row.view_path).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

/// Writes the dashboard as a table, or as JSON when `json` is set.
pub struct TerminalSink {
    json: bool,
}

impl TerminalSink {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl RenderSink for TerminalSink {
    fn render(&mut self, view: &DashboardView) {
        if self.json {
            match serde_json::to_string_pretty(view) {
                Ok(text) => println!("{text}"),
                Err(error) => tracing::error!(%error, "unable to encode view"),
            }
            return;
        }

        println!("{}", stats_line(&view.stats).bold());
        if view.is_empty {
            println!("{}", "No files match the current filters.".dimmed());
            return;
        }
        println!("{}", file_table(&view.rows));
    }
}

/// Stats-only sink for the `stats` command.
pub struct StatsSink;

impl RenderSink for StatsSink {
    fn render(&mut self, view: &DashboardView) {
        println!("{}", stats_line(&view.stats));
    }
}

/// Confirmation prompt on stderr. Showing prints the question; the answer is
/// collected separately by `read_answer`.
#[derive(Default)]
pub struct PromptDialog {
    visible: bool,
}

impl PromptDialog {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn read_answer(&self, assume_yes: bool) -> io::Result<bool> {
        if assume_yes {
            eprintln!("y");
            return Ok(true);
        }
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

impl ConfirmDialog for PromptDialog {
    fn show(&mut self, action: &PendingAction) {
        let question = match action {
            PendingAction::Delete { id } => {
                format!("Delete file {id}? This cannot be undone. [y/N] ")
            }
            PendingAction::Cleanup => {
                "Remove ALL uploaded files and analysis results? [y/N] ".to_string()
            }
        };
        eprint!("{}", question.yellow().bold());
        let _ = io::stderr().flush();
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}
