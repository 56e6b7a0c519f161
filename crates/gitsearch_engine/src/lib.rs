//! GitSearch engine: GitHub API client, background request execution and
//! atomic file persistence.
mod engine;
mod fetch;
mod persist;
mod types;

pub use engine::EngineHandle;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, GITHUB_ACCEPT, GITHUB_API_ROOT};
pub use persist::{ensure_data_dir, AtomicFileWriter, PersistError};
pub use types::{
    EngineEvent, FailureKind, FetchError, Generation, ProfilePayload, RecordPayload,
};
