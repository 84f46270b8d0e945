use regex::Regex;

use crate::error::{KirinukiError, KirinukiResult};

/// Playback urls of hosted live-video channels.
///
/// Captures: 1 and 2 = region, 3 = account id, 4 = channel id.
pub const LIVE_VIDEO_CHANNEL_PATTERN: &str = r"^https://[a-z0-9]+\.([a-z0-9-]+)\.playback\.live-video\.net/api/video/v[0-9]/([a-z0-9-]+)\.([0-9]+)\.channel\.([a-zA-Z0-9]+)\.m3u8$";

const ACCOUNT_GROUP: usize = 3;

/// Decides which playback urls may be clipped.
#[derive(Debug, Clone)]
pub struct PlaybackAllowList {
    pattern: Option<Regex>,
    account_id: Option<String>,
}

impl PlaybackAllowList {
    /// Accepts every url.
    pub fn permissive() -> Self {
        Self {
            pattern: None,
            account_id: None,
        }
    }

    pub fn live_video() -> Self {
        Self::new(LIVE_VIDEO_CHANNEL_PATTERN).expect("channel pattern is valid")
    }

    pub fn new(pattern: &str) -> KirinukiResult<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| KirinukiError::NotAllowed(format!("Invalid allow-list pattern: {e}")))?;
        Ok(Self {
            pattern: Some(pattern),
            account_id: None,
        })
    }

    /// Additionally requires the account captured by the pattern to be `account_id`.
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn check(&self, playback_url: &str) -> KirinukiResult<()> {
        let Some(pattern) = &self.pattern else {
            return Ok(());
        };

        let Some(captures) = pattern.captures(playback_url) else {
            return Err(KirinukiError::NotAllowed(
                "Please provide an accepted playback url".to_string(),
            ));
        };

        if let Some(account_id) = &self.account_id {
            let captured = captures.get(ACCOUNT_GROUP).map(|m| m.as_str());
            if captured != Some(account_id.as_str()) {
                return Err(KirinukiError::NotAllowed(
                    "Please provide an allowlisted playback url".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for PlaybackAllowList {
    fn default() -> Self {
        Self::permissive()
    }
}
