//! Catalog entity operations.

use std::sync::Arc;
use blankwars_domain::{CatalogSubject, PriceWindow, SubjectKind};

use crate::infrastructure::ports::{CatalogRepo, RepoError};

/// Catalog entity operations.
pub struct Catalog {
    repo: Arc<dyn CatalogRepo>,
}

impl Catalog {
    pub fn new(repo: Arc<dyn CatalogRepo>) -> Self {
        Self { repo }
    }

    /// Equipment in the window, then an item in the window, then the cheapest
    /// subject of either kind.
    pub async fn find_subject(
        &self,
        window: PriceWindow,
    ) -> Result<Option<CatalogSubject>, RepoError> {
        for kind in [SubjectKind::Equipment, SubjectKind::Item] {
            if let Some(subject) = self.repo.random_in_price_range(kind, window).await? {
                return Ok(Some(subject));
            }
        }

        tracing::debug!(
            min = window.min,
            max = window.max,
            "No catalog subject in price window, falling back to cheapest"
        );
        self.repo.cheapest().await
    }
}
