use crate::core::{eligibility, grader};
use crate::error::EngineError;
use crate::models::MatchRecord;
use crate::services::access::{AccessControl, Action, Resource};
use crate::services::geodistance::GeoDistanceCache;
use crate::services::store::TutorStore;
use std::sync::Arc;

/// Result of a full recompute pass
pub struct RecomputeSummary {
    pub total_candidates: usize,
    pub wizard: Vec<MatchRecord>,
}

/// Runs the candidate pipeline: refresh ages, fetch eligible pairs,
/// resolve distances, grade, then swap the stored board in one shot.
pub struct MatchPipeline {
    store: Arc<TutorStore>,
    geodistance: Arc<GeoDistanceCache>,
    access: Arc<AccessControl>,
}

impl MatchPipeline {
    pub fn new(
        store: Arc<TutorStore>,
        geodistance: Arc<GeoDistanceCache>,
        access: Arc<AccessControl>,
    ) -> Self {
        Self { store, geodistance, access }
    }

    /// Rebuild the candidate board from current tutor and child data
    ///
    /// The stored board is replaced wholesale; candidate ids are not stable
    /// across recomputes. Geocoding failures degrade to distance zero
    /// instead of aborting the pass.
    pub async fn recompute(&self, actor_staff_id: i64) -> Result<RecomputeSummary, EngineError> {
        self.access
            .require(actor_staff_id, Resource::MatchCandidates, Action::Recompute)
            .await?;

        let refreshed = self.store.refresh_ages().await?;
        if refreshed > 0 {
            tracing::debug!("Refreshed {} stored age(s) from birth dates", refreshed);
        }

        let mut candidates = self.store.fetch_candidates().await?;
        tracing::info!("Grading {} eligible candidate pair(s)", candidates.len());

        for pair in candidates.iter_mut() {
            let resolved = self.geodistance.resolve(&pair.tutor_city, &pair.child_city).await?;
            pair.distance_km = resolved.distance_km;
            pair.tutor_coord = resolved.coord_a;
            pair.child_coord = resolved.coord_b;
        }

        grader::grade_in_place(&mut candidates);

        self.store.replace_candidates(&candidates).await?;

        let wizard = self.collect_wizard_rows().await?;

        Ok(RecomputeSummary { total_candidates: candidates.len(), wizard })
    }

    /// Stored candidates for children still waiting on a live tutorship
    pub async fn wizard_view(&self, actor_staff_id: i64) -> Result<Vec<MatchRecord>, EngineError> {
        self.access
            .require(actor_staff_id, Resource::MatchCandidates, Action::Read)
            .await?;
        self.collect_wizard_rows().await
    }

    /// Every stored candidate, including used and covered pairs
    pub async fn report_view(&self, actor_staff_id: i64) -> Result<Vec<MatchRecord>, EngineError> {
        self.access
            .require(actor_staff_id, Resource::MatchCandidates, Action::Read)
            .await?;
        Ok(self.store.all_candidates().await?)
    }

    async fn collect_wizard_rows(&self) -> Result<Vec<MatchRecord>, EngineError> {
        let all = self.store.all_candidates().await?;
        let covered = self.store.children_with_live_tutorships().await?;
        Ok(eligibility::wizard_rows(all, &covered))
    }
}
