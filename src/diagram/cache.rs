//! Diagram Cache Gate
//!
//! The image directory is the cache: a diagram is cached when
//! `<identity>.png` exists there. The directory is listed once when the gate
//! is opened and never re-read during the run. Identities the gate fetches
//! itself are added to that set, so a later request for the same identity
//! is a hit.
//!
//! ## Batches
//!
//! [`CacheGate::ensure_all`] deduplicates identities, drops hits before
//! dispatch, and fetches the remaining misses with bounded concurrency.

use dashmap::DashSet;
use futures::StreamExt;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{DiagramDescription, DiagramIdentity, SharedRenderer};
use crate::config::RenderFailurePolicy;
use crate::constants::render::IMAGE_EXTENSION;
use crate::types::Result;

/// Result of a single cache check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Image already present, nothing fetched
    Hit,
    /// Image fetched from the renderer
    Fetched,
}

/// Result of a batch
#[derive(Debug, Clone, Default)]
pub struct FetchSummary {
    pub hits: usize,
    pub fetched: usize,
    /// Identities that failed under the placeholder policy
    pub unavailable: HashSet<DiagramIdentity>,
}

impl FetchSummary {
    pub fn total(&self) -> usize {
        self.hits + self.fetched + self.unavailable.len()
    }
}

/// Gate in front of the renderer, keyed by file name
pub struct CacheGate {
    cache_dir: PathBuf,
    /// Listing taken at open plus everything fetched since
    existing: DashSet<String>,
    renderer: SharedRenderer,
}

impl CacheGate {
    /// List the cache directory once, creating it if missing
    pub async fn open(cache_dir: impl Into<PathBuf>, renderer: SharedRenderer) -> Result<Self> {
        let cache_dir = cache_dir.into();
        tokio::fs::create_dir_all(&cache_dir).await?;
        let existing = list_images(&cache_dir).await?;

        debug!(
            "Opened diagram cache {} ({} images)",
            cache_dir.display(),
            existing.len()
        );

        Ok(Self::with_existing(cache_dir, existing, renderer))
    }

    /// Build a gate from an already known listing
    pub fn with_existing(
        cache_dir: impl Into<PathBuf>,
        existing: HashSet<String>,
        renderer: SharedRenderer,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            existing: existing.into_iter().collect(),
            renderer,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Whether the image was listed at open time or fetched by this gate
    pub fn is_cached(&self, identity: &DiagramIdentity) -> bool {
        self.existing.contains(&identity.file_name())
    }

    /// Path the image for `identity` lives at
    pub fn image_path(&self, identity: &DiagramIdentity) -> PathBuf {
        self.cache_dir.join(identity.file_name())
    }

    /// Fetch the diagram unless its image was present when the gate opened
    pub async fn ensure_rendered(&self, description: &DiagramDescription) -> Result<CacheOutcome> {
        let identity = description.identity();

        if self.is_cached(&identity) {
            debug!("Cache hit for {}", identity);
            return Ok(CacheOutcome::Hit);
        }

        let output = self.image_path(&identity);
        info!("Fetching yUML diagram to {}", output.display());
        self.renderer.render(description, &output).await?;
        self.existing.insert(identity.file_name());
        Ok(CacheOutcome::Fetched)
    }

    /// Ensure every description in the batch is rendered
    ///
    /// Identical identities are fetched once. Under
    /// [`RenderFailurePolicy::Fail`] the first failure aborts the batch and
    /// in-flight fetches are dropped.
    pub async fn ensure_all<'a, I>(
        &self,
        descriptions: I,
        concurrency: usize,
        policy: RenderFailurePolicy,
    ) -> Result<FetchSummary>
    where
        I: IntoIterator<Item = &'a DiagramDescription>,
    {
        let mut summary = FetchSummary::default();
        let mut seen = HashSet::new();
        let mut misses = Vec::new();

        for description in descriptions {
            let identity = description.identity();
            if !seen.insert(identity.clone()) {
                continue;
            }
            if self.is_cached(&identity) {
                summary.hits += 1;
            } else {
                misses.push(description);
            }
        }

        debug!(
            "Diagram batch: {} unique, {} cached, {} to fetch",
            seen.len(),
            summary.hits,
            misses.len()
        );

        let mut stream = futures::stream::iter(misses)
            .map(|description| async move {
                let result = self.ensure_rendered(description).await;
                (description.identity(), result)
            })
            .buffer_unordered(concurrency.max(1));

        while let Some((identity, result)) = stream.next().await {
            match result {
                Ok(CacheOutcome::Fetched) => summary.fetched += 1,
                Ok(CacheOutcome::Hit) => summary.hits += 1,
                Err(e) => match policy {
                    RenderFailurePolicy::Fail => return Err(e),
                    RenderFailurePolicy::Placeholder => {
                        warn!("Diagram {} unavailable: {}", identity, e);
                        summary.unavailable.insert(identity);
                    }
                },
            }
        }

        Ok(summary)
    }
}

/// File names of the images directly inside `dir`
async fn list_images(dir: &Path) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == IMAGE_EXTENSION)
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
        {
            names.insert(name.to_string());
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{DiagramKind, DiagramRenderer};
    use crate::types::GherkifyError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Writes a fake PNG and records each call
    #[derive(Default)]
    struct MockRenderer {
        calls: AtomicUsize,
        rendered: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl DiagramRenderer for MockRenderer {
        async fn render(&self, description: &DiagramDescription, output: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.as_deref() == Some(description.text()) {
                return Err(GherkifyError::render(
                    description.identity().as_str(),
                    "503 Service Unavailable",
                ));
            }
            self.rendered
                .lock()
                .unwrap()
                .push(description.text().to_string());
            tokio::fs::write(output, b"\x89PNG").await?;
            Ok(())
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn desc(text: &str) -> DiagramDescription {
        DiagramDescription::new(DiagramKind::Activity, text)
    }

    #[tokio::test]
    async fn test_hit_performs_no_fetch() {
        let renderer = Arc::new(MockRenderer::default());
        let d = desc("(start)->(end)");
        let existing = HashSet::from([d.identity().file_name()]);
        let gate = CacheGate::with_existing("img", existing, renderer.clone());

        for _ in 0..3 {
            assert_eq!(gate.ensure_rendered(&d).await.unwrap(), CacheOutcome::Hit);
        }
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_renders_to_identity_path() {
        let temp_dir = TempDir::new().unwrap();
        let renderer = Arc::new(MockRenderer::default());
        let gate = CacheGate::open(temp_dir.path(), renderer.clone())
            .await
            .unwrap();

        let d = desc("(start)->(Given x)->(end)");
        assert_eq!(gate.ensure_rendered(&d).await.unwrap(), CacheOutcome::Fetched);
        assert!(temp_dir.path().join(d.identity().file_name()).exists());
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetched_identity_counts_as_cached() {
        let temp_dir = TempDir::new().unwrap();
        let renderer = Arc::new(MockRenderer::default());
        let gate = CacheGate::open(temp_dir.path(), renderer.clone())
            .await
            .unwrap();

        let d = desc("(start)->(end)");
        assert_eq!(gate.ensure_rendered(&d).await.unwrap(), CacheOutcome::Fetched);
        assert_eq!(gate.ensure_rendered(&d).await.unwrap(), CacheOutcome::Hit);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_files_added_after_open_are_not_seen() {
        let temp_dir = TempDir::new().unwrap();
        let renderer = Arc::new(MockRenderer::default());
        let gate = CacheGate::open(temp_dir.path(), renderer.clone())
            .await
            .unwrap();

        let d = desc("(start)->(late)->(end)");
        std::fs::write(temp_dir.path().join(d.identity().file_name()), b"png").unwrap();
        assert_eq!(gate.ensure_rendered(&d).await.unwrap(), CacheOutcome::Fetched);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_open_lists_only_png_files() {
        let temp_dir = TempDir::new().unwrap();
        let d = desc("(start)->(end)");
        std::fs::write(temp_dir.path().join(d.identity().file_name()), b"png").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"txt").unwrap();

        let gate = CacheGate::open(temp_dir.path(), Arc::new(MockRenderer::default()))
            .await
            .unwrap();
        assert!(gate.is_cached(&d.identity()));
        assert_eq!(gate.existing.len(), 1);
    }

    #[tokio::test]
    async fn test_open_creates_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("doc/images");
        CacheGate::open(&dir, Arc::new(MockRenderer::default()))
            .await
            .unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_ensure_all_dedups_and_skips_hits() {
        let temp_dir = TempDir::new().unwrap();
        let cached = desc("(start)->(cached)->(end)");
        std::fs::write(temp_dir.path().join(cached.identity().file_name()), b"png").unwrap();

        let renderer = Arc::new(MockRenderer::default());
        let gate = CacheGate::open(temp_dir.path(), renderer.clone())
            .await
            .unwrap();

        let a = desc("(start)->(a)->(end)");
        let a_again = desc("(start)->(a)->(end)");
        let b = desc("(start)->(b)->(end)");
        let summary = gate
            .ensure_all([&cached, &a, &a_again, &b], 2, RenderFailurePolicy::Fail)
            .await
            .unwrap();

        assert_eq!(summary.hits, 1);
        assert_eq!(summary.fetched, 2);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ensure_all_fail_policy_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let renderer = Arc::new(MockRenderer {
            fail_on: Some("(start)->(bad)->(end)".to_string()),
            ..Default::default()
        });
        let gate = CacheGate::open(temp_dir.path(), renderer).await.unwrap();

        let bad = desc("(start)->(bad)->(end)");
        let err = gate
            .ensure_all([&bad], 1, RenderFailurePolicy::Fail)
            .await
            .unwrap_err();
        assert!(matches!(err, GherkifyError::Render { .. }));
    }

    #[tokio::test]
    async fn test_ensure_all_placeholder_policy_records_failure() {
        let temp_dir = TempDir::new().unwrap();
        let renderer = Arc::new(MockRenderer {
            fail_on: Some("(start)->(bad)->(end)".to_string()),
            ..Default::default()
        });
        let gate = CacheGate::open(temp_dir.path(), renderer.clone())
            .await
            .unwrap();

        let bad = desc("(start)->(bad)->(end)");
        let good = desc("(start)->(good)->(end)");
        let summary = gate
            .ensure_all([&bad, &good], 1, RenderFailurePolicy::Placeholder)
            .await
            .unwrap();

        assert_eq!(summary.fetched, 1);
        assert!(summary.unavailable.contains(&bad.identity()));
        assert_eq!(summary.total(), 2);
        assert_eq!(
            renderer.rendered.lock().unwrap().as_slice(),
            ["(start)->(good)->(end)"]
        );
    }
}
