//! Facility search workflow shared by the emergency lookup and the specialist
//! finder: locate the device, query the facility service, and fall back to
//! demo data when the service cannot answer.

use crate::demo_facilities;
use crate::facility_client::{FacilitySearchClient, SearchOutcome};
use crate::geolocation::GeoLocator;
use crate::invocation::{Invocation, InvocationSlot};
use crate::models::{Coordinate, DataSource, FacilityResults, Notice, SearchParameters};
use chrono::{DateTime, Utc};

pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "Map services temporarily unavailable. Showing demo hospitals instead.";
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Cannot connect to backend. Showing demo hospitals instead.";
pub const EMPTY_RESULT_MESSAGE: &str =
    "No hospitals found in this area. Try increasing the search radius.";

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Locating,
    Querying {
        coordinate: Coordinate,
    },
    /// Real results from the facility service, possibly zero of them.
    Displaying(FacilityResults),
    /// Demo facilities shown because the service could not answer.
    DisplayingFallback(FacilityResults),
    Failed {
        notice: Notice,
        completed_at: DateTime<Utc>,
    },
}

impl SearchState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SearchState::Displaying(_)
                | SearchState::DisplayingFallback(_)
                | SearchState::Failed { .. }
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Locating | SearchState::Querying { .. })
    }

    pub fn results(&self) -> Option<&FacilityResults> {
        match self {
            SearchState::Displaying(results) | SearchState::DisplayingFallback(results) => {
                Some(results)
            }
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            SearchState::Displaying(results) | SearchState::DisplayingFallback(results) => {
                results.notice.as_ref()
            }
            SearchState::Failed { notice, .. } => Some(notice),
            _ => None,
        }
    }
}

/// Maps a facility-search outcome onto the next display state.
pub fn resolve(coordinate: Coordinate, outcome: SearchOutcome) -> SearchState {
    let completed_at = Utc::now();
    match outcome {
        SearchOutcome::Success { facilities, source } => SearchState::Displaying(FacilityResults {
            coordinate,
            facilities,
            source,
            notice: None,
            completed_at,
        }),
        SearchOutcome::EmptyResult => SearchState::Displaying(FacilityResults {
            coordinate,
            facilities: Vec::new(),
            source: DataSource::remote(None),
            notice: Some(Notice::warning(EMPTY_RESULT_MESSAGE)),
            completed_at,
        }),
        SearchOutcome::ServiceUnavailable { detail } => {
            tracing::warn!("Falling back to demo facilities: {}", detail);
            fallback(coordinate, Notice::warning(SERVICE_UNAVAILABLE_MESSAGE), completed_at)
        }
        SearchOutcome::NetworkFailure { detail } => {
            tracing::warn!("Falling back to demo facilities: {}", detail);
            fallback(coordinate, Notice::error(NETWORK_FAILURE_MESSAGE), completed_at)
        }
        SearchOutcome::Rejected { error, details } => {
            let message = match details {
                Some(details) => format!("{}: {}", error, details),
                None => error,
            };
            SearchState::Failed {
                notice: Notice::error(message),
                completed_at,
            }
        }
    }
}

fn fallback(coordinate: Coordinate, notice: Notice, completed_at: DateTime<Utc>) -> SearchState {
    SearchState::DisplayingFallback(FacilityResults {
        coordinate,
        facilities: demo_facilities::generate(coordinate),
        source: DataSource::Demo,
        notice: Some(notice),
        completed_at,
    })
}

/// Owns the state of one facility finder.
///
/// Share it behind an `Arc`. Dropping a `search` future before it completes
/// frees the finder for the next trigger.
pub struct SearchOrchestrator {
    locator: GeoLocator,
    client: FacilitySearchClient,
    slot: InvocationSlot<SearchState>,
}

impl SearchOrchestrator {
    pub fn new(locator: GeoLocator, client: FacilitySearchClient) -> Self {
        Self {
            locator,
            client,
            slot: InvocationSlot::new(SearchState::Idle),
        }
    }

    pub fn state(&self) -> SearchState {
        self.slot.state()
    }

    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    /// Returns to `Idle`. A search still in flight keeps running, but its
    /// result is discarded when it arrives.
    pub fn reset(&self) {
        self.slot.reset();
    }

    /// Runs one search from scratch.
    ///
    /// Returns the terminal state, or `None` when the trigger was ignored
    /// because a search is already running, or when this invocation was
    /// superseded by a `reset` before it finished.
    pub async fn search(&self, params: SearchParameters) -> Option<SearchState> {
        // Previous results are cleared now, not when the new ones arrive.
        let Some(invocation) = self.slot.begin(SearchState::Locating) else {
            tracing::debug!("Search already in progress, ignoring trigger");
            return None;
        };
        let id = invocation.id();

        tracing::info!(
            "Search #{} started: {} within {}m",
            id,
            params.category,
            params.radius_meters()
        );

        let coordinate = match self.locator.acquire().await {
            Ok(coordinate) => coordinate,
            Err(e) => {
                tracing::warn!("Search #{} could not locate the device: {}", id, e);
                let state = SearchState::Failed {
                    notice: e.notice(),
                    completed_at: Utc::now(),
                };
                return finish(invocation, state);
            }
        };

        let querying = SearchState::Querying { coordinate };
        tracing::debug!("Search #{} -> {:?}", id, querying);
        if !invocation.advance(querying) {
            tracing::warn!("Search #{} superseded, stopping", id);
            return None;
        }

        let outcome = self.client.search(coordinate, params).await;
        finish(invocation, resolve(coordinate, outcome))
    }
}

fn finish(invocation: Invocation<'_, SearchState>, state: SearchState) -> Option<SearchState> {
    let id = invocation.id();
    let Some(state) = invocation.finish(state) else {
        tracing::warn!("Discarding stale result of search #{}", id);
        return None;
    };

    match &state {
        SearchState::Displaying(results) => tracing::info!(
            "Search #{} complete: {} facilities from {}",
            id,
            results.count(),
            results.source.label()
        ),
        SearchState::DisplayingFallback(results) => tracing::warn!(
            "Search #{} complete with {} demo facilities",
            id,
            results.count()
        ),
        other => tracing::info!("Search #{} ended: {:?}", id, other),
    }

    Some(state)
}
