//! Slug Assignment
//!
//! Derives the base slug from a store name, counts the existing suffix
//! family and hands successive candidates to a write closure. The unique
//! index on `store.slug` is the final arbiter: a write rejected as a
//! duplicate is retried with the next candidate, and a write that lost a
//! commit race is retried after recounting the family.

use std::future::Future;

use shared::slug::{SlugCandidates, count_family, slugify, suffix_pattern};
use surrealdb::RecordId;

use crate::db::repository::{RepoError, RepoResult, StoreRepository};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct SlugAssigner {
    stores: StoreRepository,
    max_attempts: usize,
}

impl SlugAssigner {
    pub fn new(stores: StoreRepository, max_attempts: usize) -> Self {
        Self {
            stores,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Normalized base for `name`, rejecting names without any letter or digit
    pub fn base_for(name: &str) -> AppResult<String> {
        let base = slugify(name);
        if base.is_empty() {
            return Err(AppError::new(ErrorCode::SlugEmpty).with_detail("name", name));
        }
        Ok(base)
    }

    /// Candidates for `name`, starting from the current family size.
    ///
    /// `exclude` is the store being renamed; its own slug does not count.
    pub async fn candidates(&self, name: &str, exclude: Option<&RecordId>) -> AppResult<SlugCandidates> {
        let base = Self::base_for(name)?;
        let existing = self.stores.slugs_like(&base, exclude).await?;
        let pattern = suffix_pattern(&base)
            .map_err(|e| AppError::internal(format!("Invalid slug pattern: {}", e)))?;
        let matches = count_family(&pattern, existing.iter().map(String::as_str));

        Ok(SlugCandidates::new(base, matches))
    }

    /// Run `write` with successive slug candidates until one is accepted.
    ///
    /// [`RepoError::Duplicate`] moves on to the next candidate and
    /// [`RepoError::Conflict`] recounts the family first; any other failure
    /// is returned as is. Gives up with `SlugExhausted` after `max_attempts`.
    pub async fn assign<T, F, Fut>(
        &self,
        name: &str,
        exclude: Option<&RecordId>,
        mut write: F,
    ) -> AppResult<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = RepoResult<T>>,
    {
        let mut candidates = self.candidates(name, exclude).await?;
        let base = candidates.base().to_string();

        for attempt in 1..=self.max_attempts {
            let Some(slug) = candidates.next() else { break };
            match write(slug.clone()).await {
                Ok(value) => {
                    tracing::debug!(slug = %slug, attempt, "Slug assigned");
                    return Ok(value);
                }
                Err(RepoError::Duplicate(reason)) => {
                    tracing::warn!(slug = %slug, attempt, %reason, "Slug taken, retrying");
                }
                Err(RepoError::Conflict(reason)) => {
                    tracing::warn!(slug = %slug, attempt, %reason, "Concurrent store write, recounting");
                    candidates = self.candidates(name, exclude).await?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::new(ErrorCode::SlugExhausted)
            .with_detail("base", base)
            .with_detail("attempts", self.max_attempts))
    }
}
