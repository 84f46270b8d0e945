use std::{num::NonZeroUsize, path::Path, time::Duration};

use crate::{
    allowlist::PlaybackAllowList,
    assemble::{SegmentAssembler, SegmentAssemblerBuilder},
    error::{KirinukiError, KirinukiResult},
    fetch::{HttpSegmentFetcher, SegmentFetcher},
    hls::M3u8Resolver,
    remux::Remuxer,
    segment::AssembledStream,
    util::http::HttpClient,
};

/// Turns a live playback url into a clip of its current live window.
pub struct Clipper<F, R> {
    allow_list: PlaybackAllowList,
    resolver: M3u8Resolver,
    assembler: SegmentAssembler<F>,
    remuxer: R,
}

impl<F, R> Clipper<F, R>
where
    F: SegmentFetcher + Send + Sync + 'static,
    R: Remuxer,
{
    /// Resolves the best rendition of `playback_url` and joins its segments.
    pub async fn assemble(&self, playback_url: &str) -> KirinukiResult<AssembledStream> {
        self.allow_list.check(playback_url)?;

        let segments = self.resolver.resolve(playback_url).await?;
        if segments.is_empty() {
            return Err(KirinukiError::EmptyWindow);
        }

        self.assembler.assemble(segments).await
    }

    /// Writes a clip of the current live window of `playback_url` to `output`.
    ///
    /// Nothing is left at `output` when remuxing fails.
    pub async fn clip(&self, playback_url: &str, output: &Path) -> KirinukiResult<()> {
        let stream = self.assemble(playback_url).await?;

        tracing::info!("Remuxing clip into {}", output.display());
        if let Err(e) = self.remuxer.remux(stream, output).await {
            _ = tokio::fs::remove_file(output).await;
            return Err(e);
        }
        tracing::info!("Clip saved to {}", output.display());

        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct ClipperBuilder {
    client: HttpClient,
    allow_list: PlaybackAllowList,
    assembler: SegmentAssemblerBuilder,
}

impl ClipperBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client: HttpClient) -> Self {
        self.client = client;
        self
    }

    pub fn allow_list(mut self, allow_list: PlaybackAllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    pub fn concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.assembler = self.assembler.concurrency(concurrency);
        self
    }

    pub fn segment_timeout(mut self, timeout: Duration) -> Self {
        self.assembler = self.assembler.timeout(timeout);
        self
    }

    /// Fetches segments over HTTP with the configured client.
    pub fn build<R>(self, remuxer: R) -> Clipper<HttpSegmentFetcher, R>
    where
        R: Remuxer,
    {
        let fetcher = HttpSegmentFetcher::new(self.client.clone());
        self.build_with_fetcher(fetcher, remuxer)
    }

    pub fn build_with_fetcher<F, R>(self, fetcher: F, remuxer: R) -> Clipper<F, R>
    where
        F: SegmentFetcher + Send + Sync + 'static,
        R: Remuxer,
    {
        Clipper {
            allow_list: self.allow_list,
            resolver: M3u8Resolver::new(self.client),
            assembler: self.assembler.build(fetcher),
            remuxer,
        }
    }
}
