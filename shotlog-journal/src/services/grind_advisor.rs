//! Grind advice
//!
//! Suggests grinder settings for a bean and computes grind adjustments
//! from taste feedback or extraction timing, persisting each computed
//! recommendation to the per-bean cache and the source shot's analytics
//! row.

use crate::repo::{
    BasketConfigRepository, BeanRepository, RecommendationCache, ShotRecommendationRepository,
    ShotRepository,
};
use shotlog_common::brew::{self, BrewTuning};
use shotlog_common::models::{
    Bean, Confidence, GrindAdjustment, GrindRecommendation, Shot, ShotRecommendation,
    TastePrimary, TasteSecondary,
};
use shotlog_common::{Clock, Error, Result};
use std::sync::Arc;
use uuid::Uuid;

/// Explicit taste feedback from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TasteFeedback {
    pub primary: TastePrimary,
    pub secondary: Option<TasteSecondary>,
}

pub struct GrindAdvisor {
    beans: BeanRepository,
    shots: ShotRepository,
    baskets: BasketConfigRepository,
    cache: RecommendationCache,
    recommendations: ShotRecommendationRepository,
    clock: Arc<dyn Clock>,
}

impl GrindAdvisor {
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

    /// Starting grinder setting for a bean: its memorized setting, else
    /// the setting of its most recent shot, else nothing.
    pub async fn suggest_setting(&self, bean_id: Uuid) -> Result<Option<String>> {
        let bean = self.require_bean(bean_id).await?;

        if let Some(setting) = bean.last_grinder_setting {
            return Ok(Some(setting));
        }

        Ok(self
            .shots
            .latest_for_bean(bean_id)
            .await?
            .map(|shot| shot.grinder_setting))
    }

    /// Timing-derived taste preselect for the bean's most recent shot.
    pub async fn preselect_taste(&self, bean_id: Uuid) -> Result<Option<TastePrimary>> {
        self.require_bean(bean_id).await?;

        let Some(shot) = self.shots.latest_for_bean(bean_id).await? else {
            return Ok(None);
        };

        let tuning = self.tuning().await?;
        Ok(brew::preselect_taste(
            shot.extraction_time_seconds,
            &tuning.extraction_window,
        ))
    }

    /// Compute and persist a grind recommendation for the bean.
    ///
    /// With explicit feedback the adjustment follows the taste mapping at
    /// high confidence; without it the most recent shot's timing drives a
    /// low-confidence suggestion. The result overwrites the bean's cached
    /// recommendation and, when a source shot exists, its analytics row.
    pub async fn advise(
        &self,
        bean_id: Uuid,
        feedback: Option<TasteFeedback>,
    ) -> Result<GrindRecommendation> {
        let bean = self.require_bean(bean_id).await?;
        let tuning = self.tuning().await?;
        let latest = self.shots.latest_for_bean(bean_id).await?;

        let current_setting = bean
            .last_grinder_setting
            .clone()
            .or_else(|| latest.as_ref().map(|s| s.grinder_setting.clone()));

        let (primary, secondary, taste_based, confidence) = match feedback {
            Some(f) => (Some(f.primary), f.secondary, true, Confidence::High),
            None => (
                latest.as_ref().and_then(|s| {
                    brew::preselect_taste(s.extraction_time_seconds, &tuning.extraction_window)
                }),
                None,
                false,
                Confidence::Low,
            ),
        };

        let adjustment = primary.map(brew::adjustment_for).unwrap_or(GrindAdjustment::Hold);
        let suggested_setting = current_setting
            .as_deref()
            .and_then(|s| brew::apply_adjustment(s, adjustment, tuning.grind_step));
        let recommended_dose_g = secondary.and_then(|s| {
            latest
                .as_ref()
                .map(|shot| shot.weight_in_g + brew::dose_delta_for(s, tuning.dose_step_g))
        });
        let reason = reason_for(adjustment, taste_based, latest.as_ref(), &tuning);

        let rec = GrindRecommendation {
            bean_id,
            suggested_setting: suggested_setting.clone(),
            adjustment,
            reason: reason.clone(),
            recommended_dose_g,
            target_window: tuning.extraction_window,
            created_at: self.clock.now(),
            followed: false,
            confidence,
            taste_based,
            source_shot_id: latest.as_ref().map(|s| s.id),
            taste_primary: primary,
            taste_secondary: secondary,
        };

        self.cache.save(&rec).await?;

        if let Some(shot) = &latest {
            self.recommendations
                .save(ShotRecommendation {
                    shot_id: shot.id,
                    bean_id,
                    adjustment,
                    suggested_setting,
                    reason,
                    taste_based,
                    followed: None,
                    created_at: self.clock.now(),
                })
                .await?;
        }

        Ok(rec)
    }

    async fn tuning(&self) -> Result<BrewTuning> {
        let basket = self.baskets.active().await?;
        Ok(BrewTuning::for_basket(basket.as_ref()))
    }

    async fn require_bean(&self, bean_id: Uuid) -> Result<Bean> {
        self.beans
            .get(bean_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("bean {}", bean_id)))
    }
}

fn reason_for(
    adjustment: GrindAdjustment,
    taste_based: bool,
    latest: Option<&Shot>,
    tuning: &BrewTuning,
) -> String {
    let window = &tuning.extraction_window;

    match (adjustment, taste_based) {
        (GrindAdjustment::Finer, true) => {
            "shot tasted sour; grind finer to slow the extraction".to_string()
        }
        (GrindAdjustment::Coarser, true) => {
            "shot tasted bitter; grind coarser to speed up the extraction".to_string()
        }
        (GrindAdjustment::Hold, true) => "shot tasted right; hold the current setting".to_string(),
        (adjustment, false) => match latest {
            Some(shot) => {
                let time = brew::format_extraction_time(shot.extraction_time_seconds);
                match adjustment {
                    GrindAdjustment::Finer => format!(
                        "extraction finished in {} (target {:.0}-{:.0} s); grind finer",
                        time, window.min_seconds, window.max_seconds
                    ),
                    GrindAdjustment::Coarser => format!(
                        "extraction ran {} (target {:.0}-{:.0} s); grind coarser",
                        time, window.min_seconds, window.max_seconds
                    ),
                    GrindAdjustment::Hold => {
                        format!("extraction time {} is in the target window", time)
                    }
                }
            }
            None => "no shots recorded yet; hold the current setting".to_string(),
        },
    }
}
