use std::future::Future;

use reqwest::StatusCode;

use crate::{
    error::{KirinukiError, KirinukiResult},
    segment::{FetchedSegment, SegmentDescriptor},
    util::http::HttpClient,
};

/// Retrieves the bytes of a single segment.
///
/// Implementations are invoked concurrently for every segment of a live
/// window and must not share mutable state between calls.
pub trait SegmentFetcher {
    fn fetch(
        &self,
        segment: &SegmentDescriptor,
    ) -> impl Future<Output = KirinukiResult<FetchedSegment>> + Send;
}

/// Fetches segments with a plain GET. Anything but `200 OK` is a failure.
#[derive(Clone, Default)]
pub struct HttpSegmentFetcher {
    client: HttpClient,
}

impl HttpSegmentFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

impl SegmentFetcher for HttpSegmentFetcher {
    async fn fetch(&self, segment: &SegmentDescriptor) -> KirinukiResult<FetchedSegment> {
        let response = self.client.get(segment.url.clone()).send().await?;
        if response.status() != StatusCode::OK {
            let status = response.status();
            if let Ok(body) = response.text().await {
                tracing::debug!("Error body: {body}");
            }
            return Err(KirinukiError::HttpError(status));
        }

        let bytes = response.bytes().await?;
        Ok(FetchedSegment {
            sequence: segment.sequence,
            data: bytes.to_vec(),
        })
    }
}
