//! Shot recording
//!
//! Persists a shot, memorizes its grinder setting on the owning bean, and
//! evaluates whether it followed the previously cached recommendation.
//! The first two writes are deliberately separate statements: a crash in
//! between leaves the bean's memorized setting stale, which is harmless
//! because the shot row remains the source of truth and the setting is
//! re-derivable from the most recent shot.

use crate::repo::{
    BasketConfigRepository, BeanRepository, RecommendationCache, ShotRecommendationRepository,
    ShotRepository,
};
use shotlog_common::brew::{self, BrewTuning};
use shotlog_common::models::{Shot, TastePrimary, TasteSecondary};
use shotlog_common::{Clock, Result};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Form values for a new shot.
#[derive(Debug, Clone)]
pub struct NewShot {
    pub bean_id: Uuid,
    pub weight_in_g: f64,
    pub weight_out_g: f64,
    /// Typically the timer's elapsed value.
    pub extraction_time_seconds: f64,
    pub grinder_setting: String,
    pub notes: String,
    pub taste_primary: Option<TastePrimary>,
    pub taste_secondary: Option<TasteSecondary>,
}

/// Quality read-out for a just-recorded shot.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotAssessment {
    pub brew_ratio: Option<f64>,
    pub formatted_ratio: Option<String>,
    /// None when the ratio itself is undefined.
    pub is_typical_ratio: Option<bool>,
    pub is_optimal_time: bool,
    pub formatted_time: String,
    /// Timing-derived taste preselect for the feedback form.
    pub taste_preselect: Option<TastePrimary>,
}

impl ShotAssessment {
    pub fn evaluate(shot: &Shot, tuning: &BrewTuning) -> Self {
        let ratio = shot.brew_ratio();
        Self {
            brew_ratio: ratio,
            formatted_ratio: ratio.map(brew::format_brew_ratio),
            is_typical_ratio: ratio.map(|r| tuning.ratio_band.is_typical(r)),
            is_optimal_time: tuning.extraction_window.is_optimal(shot.extraction_time_seconds),
            formatted_time: brew::format_extraction_time(shot.extraction_time_seconds),
            taste_preselect: brew::preselect_taste(
                shot.extraction_time_seconds,
                &tuning.extraction_window,
            ),
        }
    }
}

/// A recorded shot with its assessment.
#[derive(Debug, Clone)]
pub struct RecordedShot {
    pub shot: Shot,
    pub assessment: ShotAssessment,
}

pub struct ShotRecorder {
    beans: BeanRepository,
    shots: ShotRepository,
    baskets: BasketConfigRepository,
    cache: RecommendationCache,
    recommendations: ShotRecommendationRepository,
    clock: Arc<dyn Clock>,
}

impl ShotRecorder {
    pub fn new(
        beans: BeanRepository,
        shots: ShotRepository,
        baskets: BasketConfigRepository,
        cache: RecommendationCache,
        recommendations: ShotRecommendationRepository,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            beans,
            shots,
            baskets,
            cache,
            recommendations,
            clock,
        }
    }

    /// Validate and persist a shot, then run the follow-up writes.
    ///
    /// On any validation or referential failure nothing is written. After
    /// the shot row lands, the bean's `last_grinder_setting` is updated
    /// and the previously cached recommendation (if any) is scored
    /// against the setting actually used.
    pub async fn record(&self, new_shot: NewShot) -> Result<RecordedShot> {
        let mut shot = Shot::new(
            new_shot.bean_id,
            new_shot.weight_in_g,
            new_shot.weight_out_g,
            new_shot.extraction_time_seconds,
            new_shot.grinder_setting,
            self.clock.now(),
        );
        shot.notes = new_shot.notes;
        shot.taste_primary = new_shot.taste_primary;
        shot.taste_secondary = new_shot.taste_secondary;

        let shot = self.shots.add(shot).await?;

        self.beans
            .remember_grinder_setting(shot.bean_id, &shot.grinder_setting)
            .await?;

        self.score_cached_recommendation(&shot).await?;

        let basket = self.baskets.active().await?;
        let tuning = BrewTuning::for_basket(basket.as_ref());
        let assessment = ShotAssessment::evaluate(&shot, &tuning);

        Ok(RecordedShot { shot, assessment })
    }

    /// Compare the shot's grinder setting against the recommendation that
    /// preceded it, marking both the cache entry and the source shot's
    /// analytics row.
    async fn score_cached_recommendation(&self, shot: &Shot) -> Result<()> {
        let Some(cached) = self.cache.get(shot.bean_id).await? else {
            return Ok(());
        };

        let followed =
            cached.suggested_setting.as_deref() == Some(shot.grinder_setting.as_str());
        debug!(bean_id = %shot.bean_id, followed, "Scoring cached recommendation against new shot");

        if let Some(source_shot_id) = cached.source_shot_id {
            if source_shot_id != shot.id {
                if let Some(rec) = self.recommendations.get(source_shot_id).await? {
                    if rec.followed.is_none() {
                        self.recommendations.mark_followed(source_shot_id, followed).await?;
                    }
                }
            }
        }

        if followed && !cached.followed {
            self.cache.mark_followed(shot.bean_id).await?;
        }

        Ok(())
    }
}
