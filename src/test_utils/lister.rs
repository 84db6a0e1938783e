//! In-memory reference listers.

use crate::resolver::{RefLister, RemoteRef};
use anyhow::{Result, anyhow};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A [`RefLister`] that serves a fixed listing for every URI and counts calls.
///
/// # Example
///
/// ```rust,no_run
/// use vcs_resolver::resolver::Resolver;
/// use vcs_resolver::test_utils::StaticLister;
/// use vcs_resolver::version::Criteria;
///
/// # async fn example() -> anyhow::Result<()> {
/// let resolver = Resolver::with_lister(StaticLister::new([
///     ("abc123", "refs/tags/v1.0.0"),
///     ("def456", "refs/heads/main"),
/// ]));
/// resolver.resolve("any", &[Criteria::constraint("*")]).await?;
/// assert_eq!(resolver.lister().calls(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct StaticLister {
    refs: Vec<RemoteRef>,
    error: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticLister {
    /// Serves `(commit, name)` pairs in the given order.
    pub fn new<'a>(refs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            refs: refs.into_iter().map(|(commit, name)| RemoteRef::new(commit, name)).collect(),
            ..Self::default()
        }
    }

    /// Fails every listing with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Sleeps before answering, to widen race windows in concurrency tests.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of listings requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RefLister for StaticLister {
    fn list_refs<'a>(
        &'a self,
        _uri: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RemoteRef>>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.error {
                Some(message) => Err(anyhow!("{message}")),
                None => Ok(self.refs.clone()),
            }
        })
    }
}
