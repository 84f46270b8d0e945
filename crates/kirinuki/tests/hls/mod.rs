use kirinuki::{hls::M3u8Resolver, ErrorKind, HttpClient, KirinukiError, PlaylistKind};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::AssertWrapper;

pub(crate) trait HlsMock {
    async fn mock<S>(&self, mock_path: &str, body: S) -> &Self
    where
        S: AsRef<str>;

    async fn mock_untouched(&self, mock_path: &str) -> &Self;

    async fn mock_status(&self, mock_path: &str, status: u16) -> &Self;
}

impl HlsMock for MockServer {
    async fn mock<S>(&self, mock_path: &str, body: S) -> &Self
    where
        S: AsRef<str>,
    {
        Mock::given(method("GET"))
            .and(path(mock_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.as_ref()))
            .mount(self)
            .await;
        self
    }

    async fn mock_untouched(&self, mock_path: &str) -> &Self {
        Mock::given(method("GET"))
            .and(path(mock_path))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(self)
            .await;
        self
    }

    async fn mock_status(&self, mock_path: &str, status: u16) -> &Self {
        Mock::given(method("GET"))
            .and(path(mock_path))
            .respond_with(ResponseTemplate::new(status))
            .mount(self)
            .await;
        self
    }
}

pub fn master_playlist(variants: &[(u64, &str)]) -> String {
    let mut playlist = "#EXTM3U\n#EXT-X-INDEPENDENT-SEGMENTS\n".to_string();
    for (bandwidth, uri) in variants {
        playlist.push_str(&format!(
            "#EXT-X-STREAM-INF:BANDWIDTH={bandwidth},CODECS=\"avc1.64002A,mp4a.40.2\"\n{uri}\n"
        ));
    }
    playlist
}

pub fn media_playlist(media_sequence: u64, uris: &[&str]) -> String {
    let mut playlist = format!(
        "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:2\n#EXT-X-MEDIA-SEQUENCE:{media_sequence}\n"
    );
    for uri in uris {
        playlist.push_str(&format!("#EXTINF:2.000,\n{uri}\n"));
    }
    playlist
}

fn resolver() -> M3u8Resolver {
    M3u8Resolver::new(HttpClient::default())
}

#[tokio::test]
async fn test_resolve_highest_bandwidth() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let high = format!("{}/high/index.m3u8", server.uri());
    server
        .mock(
            "/live.m3u8",
            master_playlist(&[
                (1000, "low/index.m3u8"),
                (5000, high.as_str()),
                (3000, "mid/index.m3u8"),
            ]),
        )
        .await
        .mock("/high/index.m3u8", media_playlist(40, &["40.ts", "41.ts", "/seg/42.ts"]))
        .await
        .mock_untouched("/low/index.m3u8")
        .await
        .mock_untouched("/mid/index.m3u8")
        .await;

    let segments = resolver()
        .resolve(&format!("{}/live.m3u8", server.uri()))
        .await?;

    let found: Vec<(u64, String)> = segments
        .iter()
        .map(|s| (s.sequence, s.url.to_string()))
        .collect();
    assert_eq!(
        found,
        vec![
            (40, format!("{}/high/40.ts", server.uri())),
            (41, format!("{}/high/41.ts", server.uri())),
            (42, format!("{}/seg/42.ts", server.uri())),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_resolve_first_of_equal_bandwidth() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    server
        .mock("/live.m3u8", master_playlist(&[(3000, "a.m3u8"), (3000, "b.m3u8")]))
        .await
        .mock("/a.m3u8", media_playlist(0, &["a0.ts"]))
        .await
        .mock_untouched("/b.m3u8")
        .await;

    let segments = resolver()
        .resolve(&format!("{}/live.m3u8", server.uri()))
        .await?;
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].url.path(), "/a0.ts");
    Ok(())
}

#[tokio::test]
async fn test_media_playlist_as_master_is_rejected() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    server
        .mock("/live.m3u8", media_playlist(0, &["0.ts"]))
        .await
        .mock_untouched("/0.ts")
        .await;

    let error = resolver()
        .resolve(&format!("{}/live.m3u8", server.uri()))
        .await
        .err()
        .assert_success();
    assert!(matches!(
        error,
        KirinukiError::UnexpectedPlaylist {
            expected: PlaylistKind::Master
        }
    ));
    assert_eq!(error.kind(), ErrorKind::Decode);
    Ok(())
}

#[tokio::test]
async fn test_master_playlist_as_media_is_rejected() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    server
        .mock("/live.m3u8", master_playlist(&[(1000, "nested.m3u8")]))
        .await
        .mock("/nested.m3u8", master_playlist(&[(1000, "deeper.m3u8")]))
        .await
        .mock_untouched("/deeper.m3u8")
        .await;

    let error = resolver()
        .resolve(&format!("{}/live.m3u8", server.uri()))
        .await
        .err()
        .assert_success();
    assert!(matches!(
        error,
        KirinukiError::UnexpectedPlaylist {
            expected: PlaylistKind::Media
        }
    ));
    Ok(())
}

#[tokio::test]
async fn test_master_without_rendition() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    server
        .mock(
            "/live.m3u8",
            "#EXTM3U\n#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID=\"aud\",NAME=\"en\",URI=\"en.m3u8\"\n",
        )
        .await;

    let result = resolver()
        .resolve(&format!("{}/live.m3u8", server.uri()))
        .await;
    assert!(matches!(result, Err(KirinukiError::NoRendition)));
    Ok(())
}

#[tokio::test]
async fn test_invalid_manifest() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    server.mock("/live.m3u8", "<html>offline</html>").await;

    let result = resolver()
        .resolve(&format!("{}/live.m3u8", server.uri()))
        .await;
    assert!(matches!(result, Err(KirinukiError::M3u8ParseError(_))));
    Ok(())
}

#[tokio::test]
async fn test_manifest_status() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    server.mock_status("/live.m3u8", 404).await;

    let error = resolver()
        .resolve(&format!("{}/live.m3u8", server.uri()))
        .await
        .err()
        .assert_success();
    assert_eq!(error.kind(), ErrorKind::Status);
    assert!(error.to_string().contains("404"));
    Ok(())
}

#[tokio::test]
async fn test_manifest_unreachable() {
    let error = resolver()
        .resolve("http://127.0.0.1:1/live.m3u8")
        .await
        .err()
        .assert_success();
    assert_eq!(error.kind(), ErrorKind::Transport);
}
