//! Repositories
//!
//! One per entity, sharing a contract: validate first, check uniqueness
//! and existence, run the storage call through the retry wrapper, emit a
//! change event on success. No operation throws across the public
//! boundary; every one returns a `Result` from the error taxonomy.

mod basket_config_repository;
mod bean_repository;
mod grinder_config_repository;
mod recommendation_cache;
mod shot_recommendation_repository;
mod shot_repository;

pub use basket_config_repository::BasketConfigRepository;
pub use bean_repository::BeanRepository;
pub use grinder_config_repository::GrinderConfigRepository;
pub use recommendation_cache::RecommendationCache;
pub use shot_recommendation_repository::ShotRecommendationRepository;
pub use shot_repository::ShotRepository;
