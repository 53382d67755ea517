//! Plan cache
//!
//! Resolved plans keyed by (record type, version). Read-mostly: lookups
//! take the read lock, a miss resolves outside any lock and then inserts.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;

use super::resolver::{resolve, ResolvedFieldPlan};
use super::Record;

type PlanKey = (TypeId, u32);

/// Shared cache of resolved field plans
///
/// ## Concurrency:
/// - `plans`: Protected by RwLock (many concurrent readers, exclusive writer)
/// - Failed resolutions are never cached
#[derive(Default)]
pub struct PlanCache {
    plans: RwLock<HashMap<PlanKey, Arc<dyn Any + Send + Sync>>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached plan of `R` for `version`, resolving it on first use
    pub fn get_or_resolve<R: Record>(&self, version: u32) -> Result<Arc<ResolvedFieldPlan<R>>> {
        let key = (TypeId::of::<R>(), version);

        if let Some(plan) = self.plans.read().get(&key) {
            if let Ok(plan) = Arc::clone(plan).downcast::<ResolvedFieldPlan<R>>() {
                return Ok(plan);
            }
        }

        tracing::debug!(record = R::schema().name(), version, "plan cache miss");
        let plan = Arc::new(resolve::<R>(version)?);

        // A racing resolver may have inserted first; both plans are identical
        self.plans
            .write()
            .insert(key, Arc::clone(&plan) as Arc<dyn Any + Send + Sync>);
        Ok(plan)
    }

    /// Number of cached plans
    pub fn len(&self) -> usize {
        self.plans.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.read().is_empty()
    }

    pub fn contains<R: Record>(&self, version: u32) -> bool {
        self.plans
            .read()
            .contains_key(&(TypeId::of::<R>(), version))
    }

    /// Drop every cached plan
    pub fn clear(&self) {
        self.plans.write().clear();
    }
}

impl std::fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanCache").field("plans", &self.len()).finish()
    }
}
