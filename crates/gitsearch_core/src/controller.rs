//! Profile + paginated records fetch lifecycle.
//!
//! The controller never performs IO. Each operation returns the request the engine
//! should run, and results are fed back through [`FetchController::apply_profile`] and
//! [`FetchController::apply_page`]. Every search bumps a generation token; results
//! tagged with an older generation are discarded.

use gitsearch_logging::{gs_debug, gs_warn};

use crate::{Effect, FetchFailure, FetchState, Generation, Profile, ProfileData, Record};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchController {
    state: FetchState,
    page_size: u32,
    generation: Generation,
    identifier: String,
    /// Profile that arrived while page 1 is still outstanding.
    pending_profile: Option<Profile>,
    page_in_flight: Option<u32>,
}

impl Default for FetchController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl FetchController {
    pub fn new(page_size: u32) -> Self {
        Self {
            state: FetchState::Idle,
            page_size: page_size.max(1),
            generation: 0,
            identifier: String::new(),
            pending_profile: None,
            page_in_flight: None,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// True while a request issued for the current generation has not completed.
    pub fn is_busy(&self) -> bool {
        self.state == FetchState::Loading || self.page_in_flight.is_some()
    }

    pub fn has_more(&self) -> bool {
        self.state.loaded().is_some_and(ProfileData::has_more)
    }

    /// Starts a new search, discarding whatever the previous one produced.
    pub fn search(&mut self, identifier: &str) -> Effect {
        self.begin_generation();
        self.identifier = identifier.to_string();
        self.state = FetchState::Loading;
        Effect::FetchProfile {
            generation: self.generation,
            identifier: self.identifier.clone(),
        }
    }

    pub fn reset(&mut self) {
        self.begin_generation();
        self.identifier.clear();
        self.state = FetchState::Idle;
    }

    /// Requests the page after `cursor` when more records remain and no page is
    /// already outstanding.
    pub fn load_next_page(&mut self) -> Option<Effect> {
        let FetchState::Loaded(data) = &self.state else {
            gs_debug!("load_next_page ignored in state {:?}", self.state);
            return None;
        };
        if !data.has_more() {
            gs_debug!("load_next_page ignored: all {} records loaded", data.total_count);
            return None;
        }
        if let Some(page) = self.page_in_flight {
            gs_debug!("load_next_page ignored: page {} still in flight", page);
            return None;
        }

        let page = data.cursor + 1;
        Some(self.request_page(page))
    }

    pub fn apply_profile(
        &mut self,
        generation: Generation,
        result: Result<Profile, FetchFailure>,
    ) -> Option<Effect> {
        if generation != self.generation || self.state != FetchState::Loading {
            gs_debug!(
                "Discarding stale profile result (generation {}, current {})",
                generation,
                self.generation
            );
            return None;
        }

        match result {
            Err(failure) => {
                gs_warn!("Profile lookup for {:?} failed: {}", self.identifier, failure);
                self.state = failed_state(&failure);
                None
            }
            Ok(profile) if profile.total_count == 0 => {
                self.state =
                    FetchState::Loaded(ProfileData::new(self.identifier.clone(), profile));
                None
            }
            Ok(profile) => {
                self.pending_profile = Some(profile);
                Some(self.request_page(1))
            }
        }
    }

    pub fn apply_page(
        &mut self,
        generation: Generation,
        page: u32,
        result: Result<Vec<Record>, FetchFailure>,
    ) {
        if generation != self.generation || self.page_in_flight != Some(page) {
            gs_debug!(
                "Discarding stale page {} (generation {}, current {})",
                page,
                generation,
                self.generation
            );
            return;
        }
        self.page_in_flight = None;

        if let Some(profile) = self.pending_profile.take() {
            match result {
                Ok(records) => {
                    let mut data = ProfileData::new(self.identifier.clone(), profile);
                    data.merge_page(records);
                    self.state = FetchState::Loaded(data);
                }
                Err(failure) => {
                    gs_warn!(
                        "First page of records for {:?} failed: {}",
                        self.identifier,
                        failure
                    );
                    self.state = FetchState::Failed;
                }
            }
            return;
        }

        match (&mut self.state, result) {
            (FetchState::Loaded(data), Ok(records)) => data.merge_page(records),
            (FetchState::Loaded(_), Err(failure)) => {
                gs_warn!(
                    "Page {} of records for {:?} failed: {}",
                    page,
                    self.identifier,
                    failure
                );
            }
            (state, _) => gs_debug!("Ignoring page {} in state {:?}", page, state),
        }
    }

    fn begin_generation(&mut self) {
        self.generation += 1;
        self.pending_profile = None;
        self.page_in_flight = None;
    }

    fn request_page(&mut self, page: u32) -> Effect {
        self.page_in_flight = Some(page);
        Effect::FetchPage {
            generation: self.generation,
            identifier: self.identifier.clone(),
            page,
            per_page: self.page_size,
        }
    }
}

fn failed_state(failure: &FetchFailure) -> FetchState {
    if failure.is_not_found() {
        FetchState::NotFound
    } else {
        FetchState::Failed
    }
}
