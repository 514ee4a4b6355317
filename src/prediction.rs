//! Risk assessment workflow shared by the three disease forms:
//! validate the form, request a risk score, then fetch guidance for it.

use crate::errors::{AppError, ResultExt};
use crate::invocation::{Invocation, InvocationSlot};
use crate::metrics;
use crate::models::{DiseaseCategory, Notice, RecommendationSet, RiskResult};
use crate::prediction_client::RiskPredictionClient;
use crate::recommendation_client::RecommendationClient;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub const RECOMMENDATIONS_UNAVAILABLE_MESSAGE: &str =
    "Recommendations are unavailable right now. Your risk result is still shown.";

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionState {
    Idle,
    Validating,
    PredictingRisk,
    /// The risk result is already displayable while guidance loads.
    FetchingRecommendations { risk: RiskResult },
    /// `recommendations` is `None` when the guidance fetch failed; `notice`
    /// then explains why.
    Complete {
        risk: RiskResult,
        recommendations: Option<RecommendationSet>,
        notice: Option<Notice>,
        completed_at: DateTime<Utc>,
    },
    Failed {
        notice: Notice,
        completed_at: DateTime<Utc>,
    },
}

impl PredictionState {
    pub fn risk(&self) -> Option<&RiskResult> {
        match self {
            PredictionState::FetchingRecommendations { risk }
            | PredictionState::Complete { risk, .. } => Some(risk),
            _ => None,
        }
    }

    pub fn recommendations(&self) -> Option<&RecommendationSet> {
        match self {
            PredictionState::Complete {
                recommendations, ..
            } => recommendations.as_ref(),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            PredictionState::Complete { notice, .. } => notice.as_ref(),
            PredictionState::Failed { notice, .. } => Some(notice),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            PredictionState::Validating
                | PredictionState::PredictingRisk
                | PredictionState::FetchingRecommendations { .. }
        )
    }
}

/// Owns the state of one disease form.
///
/// Dropping a `submit` future before it completes frees the form for the
/// next submission.
pub struct PredictionOrchestrator {
    category: DiseaseCategory,
    predictor: RiskPredictionClient,
    recommender: RecommendationClient,
    slot: InvocationSlot<PredictionState>,
}

impl PredictionOrchestrator {
    pub fn new(
        category: DiseaseCategory,
        predictor: RiskPredictionClient,
        recommender: RecommendationClient,
    ) -> Self {
        Self {
            category,
            predictor,
            recommender,
            slot: InvocationSlot::new(PredictionState::Idle),
        }
    }

    pub fn category(&self) -> DiseaseCategory {
        self.category
    }

    pub fn state(&self) -> PredictionState {
        self.slot.state()
    }

    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    /// Returns to `Idle`, discarding the result of any submission in flight.
    pub fn reset(&self) {
        self.slot.reset();
    }

    /// Submits the raw form values.
    ///
    /// Returns the terminal state, or `None` when ignored because a submission
    /// is in flight or when superseded by a `reset`.
    pub async fn submit(&self, form: &HashMap<String, String>) -> Option<PredictionState> {
        let Some(invocation) = self.slot.begin(PredictionState::Validating) else {
            tracing::debug!("{} submission in flight, ignoring", self.category);
            return None;
        };

        let record = match metrics::validate(self.category, form) {
            Ok(record) => record,
            Err(e) => {
                tracing::info!("{} form rejected before submission: {}", self.category, e);
                return self.finish(invocation, failed(&e));
            }
        };

        if !self.advance(&invocation, PredictionState::PredictingRisk) {
            return None;
        }

        let risk = match self
            .predictor
            .predict(self.category, &record)
            .await
            .with_context(|| format!("{} prediction", self.category))
        {
            Ok(risk) => risk,
            Err(e) => {
                tracing::error!("{}", e);
                return self.finish(invocation, failed(&e));
            }
        };

        if !self.advance(&invocation, PredictionState::FetchingRecommendations { risk }) {
            return None;
        }

        let state = match self
            .recommender
            .get_recommendations(self.category, risk.score)
            .await
        {
            Ok(recommendations) => PredictionState::Complete {
                risk,
                recommendations: Some(recommendations),
                notice: None,
                completed_at: Utc::now(),
            },
            Err(e) => {
                tracing::warn!("Keeping risk result without recommendations: {}", e);
                PredictionState::Complete {
                    risk,
                    recommendations: None,
                    notice: Some(Notice::warning(RECOMMENDATIONS_UNAVAILABLE_MESSAGE)),
                    completed_at: Utc::now(),
                }
            }
        };

        self.finish(invocation, state)
    }

    fn advance(
        &self,
        invocation: &Invocation<'_, PredictionState>,
        state: PredictionState,
    ) -> bool {
        let accepted = invocation.advance(state);
        if !accepted {
            tracing::warn!(
                "{} submission #{} superseded",
                self.category,
                invocation.id()
            );
        }
        accepted
    }

    fn finish(
        &self,
        invocation: Invocation<'_, PredictionState>,
        state: PredictionState,
    ) -> Option<PredictionState> {
        let id = invocation.id();
        let finished = invocation.finish(state);
        if finished.is_none() {
            tracing::warn!("Discarding stale {} result #{}", self.category, id);
        }
        finished
    }
}

fn failed(error: &AppError) -> PredictionState {
    PredictionState::Failed {
        notice: error.notice(),
        completed_at: Utc::now(),
    }
}
