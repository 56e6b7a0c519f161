use crate::Generation;

/// Network work requested by the core; executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchProfile {
        generation: Generation,
        identifier: String,
    },
    FetchPage {
        generation: Generation,
        identifier: String,
        page: u32,
        per_page: u32,
    },
}
