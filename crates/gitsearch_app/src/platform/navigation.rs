use gitsearch_core::Msg;

/// Holds the search term currently navigated to and emits a search only when it changes.
#[derive(Debug, Default)]
pub struct Navigator {
    current: Option<String>,
}

impl Navigator {
    pub fn navigate(&mut self, term: &str) -> Option<Msg> {
        if self.current.as_deref() == Some(term) {
            return None;
        }
        self.current = Some(term.to_string());
        Some(Msg::SearchSubmitted(term.to_string()))
    }
}
