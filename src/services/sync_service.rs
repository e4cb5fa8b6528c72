use std::collections::HashSet;

use crate::domain::Strip;
use crate::errors::{StripError, StripResult};
use crate::services::Aggregator;
use crate::sources::SourceRegistry;
use crate::storage::StripRepository;

/// What a single source refresh produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub source_name: String,
    pub new_strips: usize,
}

/// Pulls fresh strips for registered sources and persists the ones the
/// repository has not seen yet.
pub struct SyncService<R: StripRepository> {
    aggregator: Aggregator,
    repository: R,
    registry: SourceRegistry,
}

impl<R: StripRepository> SyncService<R> {
    pub fn new(aggregator: Aggregator, repository: R, registry: SourceRegistry) -> Self {
        Self {
            aggregator,
            repository,
            registry,
        }
    }

    /// Refresh one source. The stored watermark and known guids keep
    /// already-persisted strips out of the fetch result. With `dry_run`
    /// nothing is written.
    pub fn sync_source(&self, source_name: &str, dry_run: bool) -> StripResult<SyncOutcome> {
        let source = self
            .registry
            .get(source_name)
            .ok_or_else(|| StripError::UnknownSource(source_name.to_string()))?;

        let since = self.repository.latest_publish_date(source_name)?;
        let known = self.repository.known_guids(source_name)?;

        let strips = self.aggregator.fetch(source, since, &known)?;
        let new_strips = strips.len();

        if !dry_run {
            for strip in &strips {
                self.repository.insert(source_name, strip)?;
            }
        }

        Ok(SyncOutcome {
            source_name: source_name.to_string(),
            new_strips,
        })
    }

    /// Refresh every registered source. A failing source is reported and
    /// skipped so the rest still get their refresh.
    pub fn sync_all(&self, dry_run: bool) -> StripResult<Vec<SyncOutcome>> {
        let mut outcomes = Vec::new();
        for name in self.registry.names() {
            match self.sync_source(name, dry_run) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => eprintln!("[{}] sync failed: {}", name, e),
            }
        }
        Ok(outcomes)
    }

    /// Strips already persisted for a source, oldest first.
    pub fn stored_strips(
        &self,
        source_name: &str,
        limit: Option<usize>,
    ) -> StripResult<Vec<Strip>> {
        if self.registry.get(source_name).is_none() {
            return Err(StripError::UnknownSource(source_name.to_string()));
        }
        self.repository.strips_for_source(source_name, limit)
    }

    pub fn known_guids(&self, source_name: &str) -> StripResult<HashSet<String>> {
        self.repository.known_guids(source_name)
    }
}
