use chrono::{Local, TimeZone};
use gitsearch_core::{HistoryRowView, ProfileView, ResultView};

const MISSING: &str = "-";

pub fn render_result(view: &ResultView) -> Vec<String> {
    match view {
        ResultView::Hidden => Vec::new(),
        ResultView::Feedback(text) => vec![(*text).to_string()],
        ResultView::Profile(profile) => render_profile(profile),
    }
}

fn render_profile(view: &ProfileView) -> Vec<String> {
    let mut lines = vec![
        format!("User: {}", view.identifier),
        format!("Avatar: {}", or_missing(Some(view.avatar_url.as_str()))),
        format!("Name: {}", or_missing(view.name.as_deref())),
        format!("Email: {}", or_missing(view.email.as_deref())),
        format!("Bio: {}", or_missing(view.bio.as_deref())),
        format!("Public Repos: {}", view.total_count),
    ];

    if !view.records.is_empty() {
        lines.push(String::new());
        lines.push("List of public repos:".to_string());
        for (index, record) in view.records.iter().enumerate() {
            lines.push(format!("{:>4}. {} <{}>", index + 1, record.name, record.html_url));
            if let Some(description) = record.description.as_deref() {
                lines.push(format!("      {description}"));
            }
        }
    }

    if view.show_more {
        lines.push(format!(
            "More Repos: showing {} of {}",
            view.records.len(),
            view.total_count
        ));
    }
    lines
}

pub fn render_history(rows: &[HistoryRowView]) -> Vec<String> {
    let width = rows
        .iter()
        .map(|row| row.text.chars().count())
        .max()
        .unwrap_or(0)
        .max("Search keyword".len());

    let mut lines = vec![format!("    {:<width$}  Time", "Search keyword")];
    for (index, row) in rows.iter().enumerate() {
        lines.push(format!(
            "{:>2}. {:<width$}  {}",
            index + 1,
            row.text,
            format_timestamp(row.timestamp_millis)
        ));
    }
    lines
}

fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => MISSING.to_string(),
    }
}

fn or_missing(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => MISSING,
    }
}
