use m3u8_rs::{MediaPlaylist, MediaSegment};
use reqwest::Url;

use crate::{
    error::{KirinukiError, KirinukiResult},
    hls::{
        rendition::select_rendition,
        utils::{load_master_playlist, load_media_playlist},
    },
    segment::{Rendition, SegmentDescriptor},
    util::http::HttpClient,
};

/// Resolves a live playback url into the segments of its best rendition.
pub struct M3u8Resolver {
    client: HttpClient,
}

impl M3u8Resolver {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Loads the master playlist at `playback_url`, follows its highest
    /// bandwidth rendition and lists the segments of that media playlist.
    pub async fn resolve(&self, playback_url: &str) -> KirinukiResult<Vec<SegmentDescriptor>> {
        let master_url = Url::parse(playback_url)?;
        let master = load_master_playlist(&self.client, master_url.clone()).await?;

        let renditions: Vec<Rendition> = master
            .variants
            .into_iter()
            .map(|variant| Rendition {
                bandwidth: variant.bandwidth,
                uri: variant.uri,
            })
            .collect();
        let rendition = select_rendition(&renditions).ok_or(KirinukiError::NoRendition)?;
        let media_url = master_url.join(&rendition.uri)?;
        tracing::info!(
            "Best stream: {media_url}; Bandwidth: {bandwidth}",
            bandwidth = rendition.bandwidth
        );

        let playlist = load_media_playlist(&self.client, media_url.clone()).await?;
        let segments = segments_from_playlist(&media_url, &playlist)?;
        tracing::info!(
            "{} segment(s) in live window, {} absent.",
            segments.len(),
            playlist.segments.len() - segments.len()
        );

        Ok(segments)
    }
}

/// Lists the segments of `playlist` in playlist order.
///
/// Each entry takes the sequence `media_sequence + index`. Entries that have
/// dropped out of the live window still consume their sequence number but
/// produce no descriptor. A playlist whose sequences would exceed `u64::MAX`
/// is rejected as malformed.
pub fn segments_from_playlist(
    playlist_url: &Url,
    playlist: &MediaPlaylist,
) -> KirinukiResult<Vec<SegmentDescriptor>> {
    let mut segments = Vec::with_capacity(playlist.segments.len());
    for (i, segment) in playlist.segments.iter().enumerate() {
        let sequence = playlist
            .media_sequence
            .checked_add(i as u64)
            .ok_or_else(|| KirinukiError::M3u8ParseError(playlist_url.to_string()))?;
        if is_absent(segment) {
            tracing::debug!("Skipping absent segment #{sequence}");
            continue;
        }

        let url = playlist_url.join(&segment.uri)?;
        segments.push(SegmentDescriptor::new(sequence, url));
    }
    Ok(segments)
}

fn is_absent(segment: &MediaSegment) -> bool {
    segment.uri.trim().is_empty()
        || segment
            .unknown_tags
            .iter()
            .any(|tag| tag.tag.trim_start_matches("#EXT-") == "X-GAP")
}
