//! GitSearch core: search history, fetch state machine and view-model helpers.
mod controller;
mod effect;
mod error;
mod history;
mod msg;
mod session;
mod state;
mod store;
mod view_model;

pub use controller::{FetchController, DEFAULT_PAGE_SIZE};
pub use effect::Effect;
pub use error::{FetchFailure, HistoryError, StorageError};
pub use history::{
    system_clock, Clock, HistorySnapshot, HistoryStore, SearchEntry, DEFAULT_CAPACITY,
    HISTORY_KEY,
};
pub use msg::Msg;
pub use session::SearchSession;
pub use state::{FetchState, Generation, Profile, ProfileData, Record};
pub use store::{DurableStore, MemoryStore};
pub use view_model::{
    history_rows, result_view, HistoryRowView, ProfileView, ResultView, ERROR_TEXT,
    LOADING_TEXT, NOT_FOUND_TEXT,
};
