use crate::{FetchState, Record, SearchEntry};

pub const LOADING_TEXT: &str = "Loading...";
pub const NOT_FOUND_TEXT: &str = "No such user on GitHub!";
pub const ERROR_TEXT: &str = "An error occurred";

/// What the result area should show for the current fetch state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Hidden,
    Feedback(&'static str),
    Profile(ProfileView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub identifier: String,
    pub avatar_url: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub total_count: u32,
    pub records: Vec<Record>,
    pub show_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub text: String,
    pub timestamp_millis: i64,
}

pub fn result_view(state: &FetchState) -> ResultView {
    match state {
        FetchState::Idle => ResultView::Hidden,
        FetchState::Loading => ResultView::Feedback(LOADING_TEXT),
        FetchState::NotFound => ResultView::Feedback(NOT_FOUND_TEXT),
        FetchState::Failed => ResultView::Feedback(ERROR_TEXT),
        FetchState::Loaded(data) => ResultView::Profile(ProfileView {
            identifier: data.identifier.clone(),
            avatar_url: data.avatar_url.clone(),
            name: data.name.clone(),
            email: data.email.clone(),
            bio: data.bio.clone(),
            total_count: data.total_count,
            records: data.records.clone(),
            show_more: data.has_more(),
        }),
    }
}

pub fn history_rows(entries: &[SearchEntry]) -> Vec<HistoryRowView> {
    entries
        .iter()
        .map(|entry| HistoryRowView {
            text: entry.text().to_string(),
            timestamp_millis: entry.inserted_at_millis(),
        })
        .collect()
}
