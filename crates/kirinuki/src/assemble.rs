use std::{num::NonZeroUsize, sync::Arc, time::Duration};

use tokio::sync::{mpsc, Semaphore};

use crate::{
    error::{KirinukiError, KirinukiResult, SegmentFailure, SegmentFailures},
    fetch::SegmentFetcher,
    segment::{AssembledStream, FetchedSegment, SegmentDescriptor},
};

struct Outcome {
    index: usize,
    result: KirinukiResult<FetchedSegment>,
}

/// Fetches every segment of a live window concurrently and joins them into
/// one [AssembledStream].
///
/// The result is all-or-nothing: when any fetch fails, every fetched byte is
/// dropped and the failures are reported together.
pub struct SegmentAssembler<F> {
    fetcher: Arc<F>,
    permits: Option<Arc<Semaphore>>,
    timeout: Option<Duration>,
}

impl<F> SegmentAssembler<F>
where
    F: SegmentFetcher + Send + Sync + 'static,
{
    /// Unbounded fan-out without any per-fetch deadline.
    pub fn new(fetcher: F) -> Self {
        SegmentAssemblerBuilder::new().build(fetcher)
    }

    pub async fn assemble(
        &self,
        segments: Vec<SegmentDescriptor>,
    ) -> KirinukiResult<AssembledStream> {
        let total = segments.len();
        if total == 0 {
            return Ok(AssembledStream::default());
        }
        tracing::info!("Start fetching {total} segment(s).");

        // one slot per segment, senders never wait
        let (sender, mut receiver) = mpsc::channel(total);
        for (index, segment) in segments.iter().cloned().enumerate() {
            let sender = sender.clone();
            let fetcher = self.fetcher.clone();
            let permits = self.permits.clone();
            let timeout = self.timeout;

            tokio::spawn(async move {
                let _permit = match permits {
                    Some(permits) => permits.acquire_owned().await.ok(),
                    None => None,
                };
                // Workaround for `higher-ranked lifetime error`
                let result = assert_send(fetch_one(fetcher.as_ref(), &segment, timeout)).await;
                _ = sender.send(Outcome { index, result }).await;
            });
        }
        drop(sender);

        let mut reported = vec![false; total];
        let mut fetched = Vec::with_capacity(total);
        let mut failures = Vec::new();
        while let Some(Outcome { index, result }) = receiver.recv().await {
            reported[index] = true;
            let segment = &segments[index];
            match result {
                Ok(data) => {
                    fetched.push(data);
                    tracing::debug!(
                        "Segment #{} fetched. ({} / {total})",
                        segment.sequence,
                        fetched.len() + failures.len()
                    );
                }
                Err(error) => {
                    tracing::error!("Segment #{} failed: {error}", segment.sequence);
                    failures.push(SegmentFailure {
                        sequence: segment.sequence,
                        uri: segment.url.to_string(),
                        error,
                    });
                }
            }
        }

        // a task that panicked never reports
        for (index, _) in reported.iter().enumerate().filter(|(_, done)| !**done) {
            let segment = &segments[index];
            tracing::error!("Segment #{} fetch task aborted.", segment.sequence);
            failures.push(SegmentFailure {
                sequence: segment.sequence,
                uri: segment.url.to_string(),
                error: KirinukiError::FetchAborted,
            });
        }

        if !failures.is_empty() {
            tracing::error!("Failed to fetch {} of {total} segment(s).", failures.len());
            drop(fetched);
            failures.sort_by_key(|failure| failure.sequence);
            return Err(KirinukiError::PartialFetchFailure(SegmentFailures(failures)));
        }

        let stream = AssembledStream::from_segments(fetched);
        tracing::info!(
            "Assembled {} segment(s), {} bytes.",
            stream.segments(),
            stream.len()
        );
        Ok(stream)
    }
}

async fn fetch_one<F>(
    fetcher: &F,
    segment: &SegmentDescriptor,
    timeout: Option<Duration>,
) -> KirinukiResult<FetchedSegment>
where
    F: SegmentFetcher,
{
    match timeout {
        Some(timeout) => tokio::time::timeout(timeout, fetcher.fetch(segment))
            .await
            .unwrap_or_else(|_| {
                Err(KirinukiError::FetchTimeout {
                    uri: segment.url.to_string(),
                    timeout,
                })
            }),
        None => fetcher.fetch(segment).await,
    }
}

// https://github.com/rust-lang/rust/issues/102211#issuecomment-1371414544
// TODO: remove this when this issue is fixed
fn assert_send<'a, T>(
    fut: impl std::future::Future<Output = T> + Send + 'a,
) -> impl std::future::Future<Output = T> + Send + 'a {
    fut
}

#[derive(Debug, Clone, Default)]
pub struct SegmentAssemblerBuilder {
    concurrency: Option<NonZeroUsize>,
    timeout: Option<Duration>,
}

impl SegmentAssemblerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of fetches in flight. Unbounded when unset.
    pub fn concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Fails a single fetch that does not finish within `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build<F>(self, fetcher: F) -> SegmentAssembler<F>
    where
        F: SegmentFetcher + Send + Sync + 'static,
    {
        SegmentAssembler {
            fetcher: Arc::new(fetcher),
            permits: self
                .concurrency
                .map(|concurrency| Arc::new(Semaphore::new(concurrency.get()))),
            timeout: self.timeout,
        }
    }
}
