use crate::feedback::Feedback;
use crate::storage::DbStats;
use crate::ui::Icons;
use tabled::{settings::Style, Table, Tabled};

/// Longest content shown in a listing cell before it is cut off
const MAX_CONTENT_CHARS: usize = 60;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
struct FeedbackRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "")]
    star: &'static str,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Feedback")]
    content: String,
}

impl From<&Feedback> for FeedbackRow {
    fn from(feedback: &Feedback) -> Self {
        Self {
            id: feedback.id,
            star: if feedback.starred { Icons::STAR } else { Icons::EMPTY_STAR },
            created_at: feedback.created_at.clone(),
            content: truncate(&feedback.content, MAX_CONTENT_CHARS),
        }
    }
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Feedback", &stats.total.to_string());
    builder.add_row("Starred", &stats.starred.to_string());
    builder.build()
}

/// Render feedback entries, one line each; empty input gives an empty string
pub fn feedback_table(feedback: &[Feedback]) -> String {
    if feedback.is_empty() {
        return String::new();
    }

    let rows: Vec<FeedbackRow> = feedback.iter().map(FeedbackRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Cut `text` to at most `max` characters, flattening newlines
fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace(['\r', '\n'], " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
