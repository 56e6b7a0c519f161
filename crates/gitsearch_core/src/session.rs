use crate::{DurableStore, Effect, FetchController, FetchState, HistoryStore, Msg};

/// Routes search and navigation events to the history and the fetch controller.
///
/// The session borrows both components for the duration of one event; the caller
/// keeps ownership so it can render from them between events.
pub struct SearchSession<'a, S: DurableStore> {
    history: &'a mut HistoryStore<S>,
    fetch: &'a mut FetchController,
}

impl<'a, S: DurableStore> SearchSession<'a, S> {
    pub fn new(history: &'a mut HistoryStore<S>, fetch: &'a mut FetchController) -> Self {
        Self { history, fetch }
    }

    /// Applies a message and returns the requests the engine should run.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::SearchSubmitted(text) => self.on_search(&text),
            Msg::LoadMoreRequested => self.on_load_more(),
            Msg::ProfileFetched { generation, result } => self
                .fetch
                .apply_profile(generation, result)
                .into_iter()
                .collect(),
            Msg::PageFetched {
                generation,
                page,
                result,
            } => {
                self.fetch.apply_page(generation, page, result);
                Vec::new()
            }
        }
    }

    /// Empty text resets the fetch state; anything else is recorded in the history
    /// before the lookup starts, so failed lookups are remembered too.
    pub fn on_search(&mut self, text: &str) -> Vec<Effect> {
        if text.is_empty() {
            self.fetch.reset();
            return Vec::new();
        }
        self.history.insert(text);
        vec![self.fetch.search(text)]
    }

    pub fn on_load_more(&mut self) -> Vec<Effect> {
        // `has_more` is only true in the `Loaded` state.
        if !self.fetch.has_more() {
            return Vec::new();
        }
        self.fetch.load_next_page().into_iter().collect()
    }

    pub fn state(&self) -> &FetchState {
        self.fetch.state()
    }
}
