use std::time::Duration;

use gitsearch_core::{Effect, FetchFailure, Msg, Profile, Record};
use gitsearch_engine::{EngineEvent, EngineHandle, FetchError, ProfilePayload, RecordPayload};
use gitsearch_logging::{gs_debug, gs_info};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchProfile {
                    generation,
                    identifier,
                } => {
                    gs_info!("FetchProfile generation={} identifier={}", generation, identifier);
                    self.engine.fetch_profile(generation, identifier);
                }
                Effect::FetchPage {
                    generation,
                    identifier,
                    page,
                    per_page,
                } => {
                    gs_info!(
                        "FetchPage generation={} identifier={} page={} per_page={}",
                        generation,
                        identifier,
                        page,
                        per_page
                    );
                    self.engine.fetch_page(generation, identifier, page, per_page);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine completion.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProfileFetched {
            generation,
            identifier,
            result,
        } => {
            gs_debug!("Profile for {} completed (generation {})", identifier, generation);
            Msg::ProfileFetched {
                generation,
                result: result.map(map_profile).map_err(map_failure),
            }
        }
        EngineEvent::PageFetched {
            generation,
            page,
            result,
        } => Msg::PageFetched {
            generation,
            page,
            result: result
                .map(|records| records.into_iter().map(map_record).collect())
                .map_err(map_failure),
        },
    }
}

fn map_failure(err: FetchError) -> FetchFailure {
    if err.is_not_found() {
        FetchFailure::NotFound
    } else {
        FetchFailure::Transient(err.to_string())
    }
}

fn map_profile(payload: ProfilePayload) -> Profile {
    Profile {
        avatar_url: payload.avatar_url,
        name: payload.name,
        email: payload.email,
        bio: payload.bio,
        total_count: payload.public_repos,
    }
}

fn map_record(payload: RecordPayload) -> Record {
    Record {
        name: payload.name,
        html_url: payload.html_url,
        description: payload.description,
    }
}
