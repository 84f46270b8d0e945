use std::{num::NonZeroUsize, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use clap::{Args, Parser};
use fake_user_agent::get_chrome_rua;
use kirinuki::{
    ClipperBuilder, CommandRemuxer, DefaultClipper, HttpClient, PlaybackAllowList,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use uuid::Uuid;

#[derive(Parser, Clone, Debug)]
#[clap(name = "kiri", version, about)]
pub struct KiriArgs {
    #[clap(flatten)]
    pub http: HttpOptions,

    #[clap(flatten)]
    pub fetch: FetchOptions,

    #[clap(flatten)]
    pub allow: AllowOptions,

    #[clap(flatten)]
    pub output: OutputOptions,

    /// Playback url of the live stream
    pub url: String,
}

impl KiriArgs {
    pub fn into_clipper(self) -> anyhow::Result<(DefaultClipper, String, PathBuf)> {
        let client = self.http.into_client(&self.url)?;
        let remuxer = match self.output.ffmpeg {
            Some(ffmpeg) => CommandRemuxer::ffmpeg_at(ffmpeg),
            None => CommandRemuxer::ffmpeg()?,
        };

        let mut builder = ClipperBuilder::new()
            .client(client)
            .allow_list(self.allow.into_allow_list()?);
        if let Some(concurrency) = self.fetch.concurrency {
            builder = builder.concurrency(concurrency);
        }
        if let Some(timeout) = self.fetch.segment_timeout {
            builder = builder.segment_timeout(Duration::from_secs(timeout));
        }

        let output = self.output.output.unwrap_or_else(|| {
            self.output
                .output_dir
                .unwrap_or_else(std::env::temp_dir)
                .join(format!("{}.mp4", Uuid::new_v4()))
        });

        Ok((builder.build(remuxer), self.url, output))
    }
}

#[derive(Args, Clone, Debug)]
pub struct HttpOptions {
    /// Additional HTTP headers
    #[clap(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Cookies sent along with the playback url, eg. "name=value"
    #[clap(long = "cookie")]
    pub cookies: Vec<String>,

    /// HTTP timeout, in seconds
    #[clap(short, long, default_value = "10")]
    pub timeout: u64,
}

impl HttpOptions {
    pub fn into_client(self, url: &str) -> anyhow::Result<HttpClient> {
        let mut headers = HeaderMap::new();

        for header in &self.headers {
            let (key, value) = header
                .split_once(':')
                .with_context(|| format!("Invalid header: {header}"))?;
            headers.insert(
                HeaderName::from_str(key.trim())?,
                HeaderValue::from_str(value.trim())?,
            );
        }

        let builder = Client::builder()
            .default_headers(headers)
            .user_agent(get_chrome_rua())
            .timeout(Duration::from_secs(self.timeout));
        let client = HttpClient::new(builder)?;
        if !self.cookies.is_empty() {
            client.add_cookies(self.cookies, url)?;
        }

        Ok(client)
    }
}

#[derive(Args, Clone, Debug)]
pub struct FetchOptions {
    /// Maximum segments fetched at once. Every segment is fetched at once when omitted.
    #[clap(long, alias = "threads")]
    pub concurrency: Option<NonZeroUsize>,

    /// Give up on a single segment after this many seconds
    #[clap(long)]
    pub segment_timeout: Option<u64>,
}

/// Which playback urls may be clipped
#[derive(Args, Clone, Debug)]
pub struct AllowOptions {
    /// Only accept urls matching this regular expression
    #[clap(long, env = "KIRI_ALLOW_PATTERN")]
    pub allow_pattern: Option<String>,

    /// Only accept hosted live-video channel urls
    #[clap(long)]
    pub live_video: bool,

    /// Only accept live-video channels owned by this account. Implies --live-video.
    #[clap(long, env = "KIRI_ACCOUNT_ID")]
    pub account_id: Option<String>,
}

impl AllowOptions {
    pub fn into_allow_list(self) -> anyhow::Result<PlaybackAllowList> {
        let allow_list = match self.allow_pattern {
            Some(pattern) => PlaybackAllowList::new(&pattern)?,
            None if self.live_video || self.account_id.is_some() => {
                PlaybackAllowList::live_video()
            }
            None => PlaybackAllowList::permissive(),
        };

        Ok(match self.account_id {
            Some(account_id) => allow_list.with_account_id(account_id),
            None => allow_list,
        })
    }
}

#[derive(Args, Clone, Debug)]
pub struct OutputOptions {
    /// Write the clip to this file
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for clips named after a random uuid. Defaults to the system temp directory.
    #[clap(long, env = "KIRI_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to ffmpeg. Looked up in PATH when omitted.
    #[clap(long, env = "KIRI_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,
}
