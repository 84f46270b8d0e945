use m3u8_rs::{MasterPlaylist, MediaPlaylist, Playlist};
use reqwest::{StatusCode, Url};

use crate::{
    error::{KirinukiError, KirinukiResult, PlaylistKind},
    util::http::HttpClient,
};

/// Fetches and parses one playlist document without looking at its type.
pub async fn load_m3u8(client: &HttpClient, url: Url) -> KirinukiResult<Playlist> {
    tracing::debug!("Fetching M3U8 file {url}");

    let response = client.get(url.clone()).send().await?;
    if response.status() != StatusCode::OK {
        return Err(KirinukiError::HttpError(response.status()));
    }
    let m3u8_bytes = response.bytes().await?;

    parse_m3u8(&url, &m3u8_bytes)
}

pub fn parse_m3u8(url: &Url, m3u8_bytes: &[u8]) -> KirinukiResult<Playlist> {
    m3u8_rs::parse_playlist_res(m3u8_bytes).map_err(|error| {
        tracing::warn!("Failed to parse M3U8 file: {error:?}");
        KirinukiError::M3u8ParseError(url.to_string())
    })
}

pub async fn load_master_playlist(client: &HttpClient, url: Url) -> KirinukiResult<MasterPlaylist> {
    match load_m3u8(client, url).await? {
        Playlist::MasterPlaylist(pl) => Ok(pl),
        Playlist::MediaPlaylist(_) => Err(KirinukiError::UnexpectedPlaylist {
            expected: PlaylistKind::Master,
        }),
    }
}

pub async fn load_media_playlist(client: &HttpClient, url: Url) -> KirinukiResult<MediaPlaylist> {
    match load_m3u8(client, url).await? {
        Playlist::MediaPlaylist(pl) => Ok(pl),
        Playlist::MasterPlaylist(_) => Err(KirinukiError::UnexpectedPlaylist {
            expected: PlaylistKind::Media,
        }),
    }
}
