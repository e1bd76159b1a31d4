//! Plain-text rendering of reports.
//!
//! Columns are sized by display width so names and message bodies that
//! contain CJK characters or emoji stay aligned.

use std::fmt::Write;

use chatstat_core::formatting::{format_count, format_number, format_seconds, percentage};
use chatstat_data::analysis::AnalysisMetadata;
use chatstat_data::report::{AuthorSummary, ChatReport, MoodTally};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Longest message body shown in a table cell, in display columns.
const MESSAGE_PREVIEW_WIDTH: usize = 60;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ── Table ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A titled table with aligned columns.
#[derive(Debug, Clone)]
pub struct Table {
    title: String,
    columns: Vec<(String, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: &str, columns: &[(&str, Align)]) -> Self {
        Self {
            title: title.to_string(),
            columns: columns
                .iter()
                .map(|(name, align)| (name.to_string(), *align))
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing trailing cells render empty.
    pub fn push(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.width())
                    .chain(std::iter::once(header.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "{}", "=".repeat(self.title.width()));

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|((name, align), w)| pad(name, *w, *align))
            .collect();
        let _ = writeln!(out, "{}", header.join("  ").trim_end());

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(out, "{}", rule.join("  "));

        if self.rows.is_empty() {
            let _ = writeln!(out, "(none)");
        }
        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, ((_, align), w))| {
                    pad(row.get(i).map(String::as_str).unwrap_or(""), *w, *align)
                })
                .collect();
            let _ = writeln!(out, "{}", cells.join("  ").trim_end());
        }
        out
    }
}

/// Pad `text` with spaces to `width` display columns.
pub fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left => format!("{}{}", text, fill),
        Align::Right => format!("{}{}", fill, text),
    }
}

/// Cut `text` to at most `max_width` display columns, marking the cut with `...`.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

fn month_name(month0: u32) -> &'static str {
    MONTH_NAMES.get(month0 as usize).copied().unwrap_or("?")
}

fn optional_seconds(value: Option<f64>) -> String {
    value.map(format_seconds).unwrap_or_else(|| "-".to_string())
}

// ── Report rendering ──────────────────────────────────────────────────────────

/// One-paragraph summary of the parse.
pub fn render_overview(meta: &AnalysisMetadata) -> String {
    let mut out = format!(
        "{} messages from {} authors ({} lines, {} system notices)",
        format_count(meta.messages_parsed),
        format_count(meta.authors),
        format_count(meta.lines_read),
        format_count(meta.system_entries),
    );
    if meta.malformed_entries > 0 {
        let _ = write!(
            out,
            "\n{} malformed entries skipped",
            format_count(meta.malformed_entries)
        );
    }
    out.push('\n');
    out
}

/// Render every section of `report`.
pub fn render_report(report: &ChatReport) -> String {
    let total = report.total_posts as f64;
    let mut sections: Vec<String> = Vec::new();

    let mut posts = Table::new(
        "Posts",
        &[
            ("Author", Align::Left),
            ("Messages", Align::Right),
            ("Share %", Align::Right),
        ],
    );
    for row in &report.post_counts {
        posts.push(vec![
            row.author.clone(),
            format_count(row.count),
            format_number(percentage(row.count as f64, total, 1), 1),
        ]);
    }
    sections.push(posts.render());

    let mut responses = Table::new(
        "Response times",
        &[
            ("Author", Align::Left),
            ("Average", Align::Right),
            ("Fastest", Align::Right),
            ("Slowest", Align::Right),
        ],
    );
    for author in report.authors.iter().filter(|a| a.avg_response_time.is_some()) {
        responses.push(vec![
            author.name.clone(),
            optional_seconds(author.avg_response_time),
            optional_seconds(author.min_response_time),
            optional_seconds(author.max_response_time),
        ]);
    }
    sections.push(responses.render());

    let mut killers = Table::new(
        "Conversation killers",
        &[
            ("#", Align::Right),
            ("Author", Align::Left),
            ("Average wait", Align::Right),
        ],
    );
    for (rank, row) in report.conversation_killers.iter().rev().enumerate() {
        killers.push(vec![
            (rank + 1).to_string(),
            row.author.clone(),
            format_seconds(row.avg_response_time),
        ]);
    }
    sections.push(killers.render());

    let mut turns = Table::new(
        "Turns",
        &[("Author", Align::Left), ("Turns", Align::Right)],
    );
    for row in &report.turn_ranking {
        turns.push(vec![row.author.clone(), format_count(row.turns as usize)]);
    }
    sections.push(turns.render());

    let mut departures = Table::new(
        "Departures",
        &[("Author", Align::Left), ("Left", Align::Right)],
    );
    for row in &report.departures {
        departures.push(vec![row.author.clone(), format_count(row.departures as usize)]);
    }
    sections.push(departures.render());

    for (title, rows) in [
        ("Longest messages", &report.longest_messages),
        ("Shortest messages", &report.shortest_messages),
    ] {
        let mut table = Table::new(
            title,
            &[
                ("Author", Align::Left),
                ("Length", Align::Right),
                ("Message", Align::Left),
            ],
        );
        for row in rows {
            table.push(vec![
                row.author.clone(),
                format_count(row.length),
                truncate(&row.text, MESSAGE_PREVIEW_WIDTH),
            ]);
        }
        sections.push(table.render());
    }

    let mut spread = Table::new(
        "Message length",
        &[
            ("Author", Align::Left),
            ("Messages", Align::Right),
            ("Std dev", Align::Right),
        ],
    );
    for author in report.authors.iter().filter(|a| a.length_stdev.is_some()) {
        spread.push(vec![
            author.name.clone(),
            format_count(author.message_count),
            author
                .length_stdev
                .map(|s| format_number(s, 1))
                .unwrap_or_default(),
        ]);
    }
    sections.push(spread.render());

    let mut months = Table::new(
        "Messages by month",
        &[("Month", Align::Left), ("Messages", Align::Right)],
    );
    for (month, count) in &report.messages_by_month {
        months.push(vec![month_name(*month).to_string(), format_count(*count)]);
    }
    sections.push(months.render());

    let mut days = Table::new(
        "Messages by day",
        &[("Day", Align::Left), ("Messages", Align::Right)],
    );
    for row in &report.messages_by_day {
        days.push(vec![row.day.clone(), format_count(row.count)]);
    }
    sections.push(days.render());

    let mut hours = Table::new(
        "Messages by hour",
        &[("Hour", Align::Left), ("Messages", Align::Right)],
    );
    for (hour, count) in &report.messages_by_hour {
        hours.push(vec![format!("{:02}:00", hour), format_count(*count)]);
    }
    sections.push(hours.render());

    let mut mentions = Table::new(
        "Mentions",
        &[
            ("Author", Align::Left),
            ("Mentioned", Align::Left),
            ("Times", Align::Right),
        ],
    );
    for author in &report.authors {
        for m in &author.mentions {
            mentions.push(vec![
                author.name.clone(),
                m.author.clone(),
                format_count(m.count as usize),
            ]);
        }
    }
    sections.push(mentions.render());

    if report.mood.unclassified == report.total_posts {
        sections.push("Mood\n====\nnot classified (use --classify)\n".to_string());
    } else {
        let mut mood = mood_table("Mood");
        for tally in &report.mood.tallies {
            mood.push(mood_row(tally));
        }
        let mut rendered = mood.render();
        if report.mood.unclassified > 0 {
            let _ = writeln!(
                rendered,
                "{} messages unclassified",
                format_count(report.mood.unclassified)
            );
        }
        sections.push(rendered);
    }

    sections.join("\n")
}

fn mood_table(title: &str) -> Table {
    Table::new(
        title,
        &[
            ("Author", Align::Left),
            ("Positive", Align::Right),
            ("Negative", Align::Right),
            ("Neutral", Align::Right),
            ("Neg/Pos", Align::Right),
        ],
    )
}

fn mood_row(tally: &MoodTally) -> Vec<String> {
    vec![
        tally.author.clone(),
        format_count(tally.positive),
        format_count(tally.negative),
        format_count(tally.neutral),
        format_number(tally.negativity_ratio, 2),
    ]
}

/// Render the detail view for a single author.
pub fn render_author(summary: &AuthorSummary, mood: Option<&MoodTally>) -> String {
    let mut details = Table::new(
        &summary.name,
        &[("Statistic", Align::Left), ("Value", Align::Right)],
    );
    details.push(vec!["Messages".into(), format_count(summary.message_count)]);
    details.push(vec!["Turns".into(), format_count(summary.turns as usize)]);
    details.push(vec!["Departures".into(), format_count(summary.departures as usize)]);
    details.push(vec![
        "Length std dev".into(),
        summary
            .length_stdev
            .map(|s| format_number(s, 1))
            .unwrap_or_else(|| "-".to_string()),
    ]);
    details.push(vec!["Avg response".into(), optional_seconds(summary.avg_response_time)]);
    details.push(vec!["Fastest response".into(), optional_seconds(summary.min_response_time)]);
    details.push(vec!["Slowest response".into(), optional_seconds(summary.max_response_time)]);

    let mut out = details.render();

    if !summary.mentions.is_empty() {
        let mut mentions = Table::new(
            "Mentions",
            &[("Author", Align::Left), ("Times", Align::Right)],
        );
        for m in &summary.mentions {
            mentions.push(vec![m.author.clone(), format_count(m.count as usize)]);
        }
        out.push('\n');
        out.push_str(&mentions.render());
    }

    if let Some(tally) = mood.filter(|t| t.positive + t.negative + t.neutral > 0) {
        let mut table = mood_table("Mood");
        table.push(mood_row(tally));
        out.push('\n');
        out.push_str(&table.render());
    }
    out
}
