use crate::{FetchFailure, Generation, Profile, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a search term (possibly empty).
    SearchSubmitted(String),
    /// Something asked for the next page of records.
    LoadMoreRequested,
    /// Engine completion for a profile lookup.
    ProfileFetched {
        generation: Generation,
        result: Result<Profile, FetchFailure>,
    },
    /// Engine completion for one page of records.
    PageFetched {
        generation: Generation,
        page: u32,
        result: Result<Vec<Record>, FetchFailure>,
    },
}
