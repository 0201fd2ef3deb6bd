use crate::api::TWITTER_API_BASE;
use crate::error::{GiveawayError, Result};
use crate::fetcher::DEFAULT_PAGE_DELAY;
use crate::model::{Handle, Hashtag, PostId, TimeWindow};
use crate::resolver::{resolve_post_id, DEFAULT_POST_ID_LEN};
use crate::selector::DEFAULT_SHUFFLE_ITERATIONS;
use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use reqwest::Url;
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "giveaway.toml";
pub const BEARER_TOKEN_ENV: &str = "TWITTER_BEARER_TOKEN";

/// On-disk layout of `giveaway.toml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub debug: bool,
    pub auth: AuthConfig,
    pub giveaway: GiveawayDetails,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub username: String,
    #[serde(default)]
    pub bearer_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GiveawayDetails {
    pub tweet_url: String,
    pub hashtag: String,
    pub timezone: String,
    pub start: LocalTime,
    pub end: LocalTime,
}

/// Wall-clock time in the giveaway's timezone.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
}

impl LocalTime {
    fn to_naive(self, which: &str) -> Result<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, self.minute, 0))
            .ok_or_else(|| GiveawayError::Config(format!("giveaway {} is not a valid date", which)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub csv: bool,
    pub csv_filename: PathBuf,
    pub winner_filename: PathBuf,
    pub open_winner: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv: false,
            csv_filename: PathBuf::from("qualified.csv"),
            winner_filename: PathBuf::from("winner.json"),
            open_winner: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: String,
    pub page_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub min_post_id_len: usize,
    pub max_post_id_len: usize,
    pub shuffle_iterations: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: TWITTER_API_BASE.to_string(),
            page_delay_ms: DEFAULT_PAGE_DELAY.as_millis() as u64,
            request_timeout_secs: 30,
            min_post_id_len: *DEFAULT_POST_ID_LEN.start(),
            max_post_id_len: *DEFAULT_POST_ID_LEN.end(),
            shuffle_iterations: DEFAULT_SHUFFLE_ITERATIONS,
        }
    }
}

/// Validated settings for one giveaway run.
#[derive(Debug, Clone)]
pub struct GiveawayConfig {
    pub host: Handle,
    pub bearer_token: String,
    pub post_url: String,
    pub post_id: PostId,
    pub hashtag: Hashtag,
    pub window: TimeWindow,
    pub output: OutputConfig,
    pub api: ApiSettings,
    pub debug: bool,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub page_delay: Duration,
    pub request_timeout: Duration,
    pub post_id_len: RangeInclusive<usize>,
    pub shuffle_iterations: u32,
}

impl GiveawayConfig {
    /// Validate a parsed file. `token_override` wins over the file's bearer token.
    pub fn from_raw(raw: RawConfig, token_override: Option<String>) -> Result<Self> {
        let api = ApiSettings::from_raw(&raw.api)?;
        let host = Handle::parse(&raw.auth.username)?;
        let hashtag = Hashtag::parse(&raw.giveaway.hashtag)?;
        let post_id = resolve_post_id(&raw.giveaway.tweet_url, &api.post_id_len)?;

        let timezone: Tz = raw.giveaway.timezone.parse().map_err(|_| {
            GiveawayError::Config(format!("unknown timezone '{}'", raw.giveaway.timezone))
        })?;
        let window = TimeWindow::from_local(
            raw.giveaway.start.to_naive("start")?,
            raw.giveaway.end.to_naive("end")?,
            timezone,
        )?;

        let bearer_token = token_override
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(raw.auth.bearer_token)
            .trim()
            .to_string();
        if bearer_token.is_empty() {
            tracing::warn!(
                "No bearer token found. Please check the configuration file. Errors will probably follow this message."
            );
        }

        Ok(Self {
            host,
            bearer_token,
            post_url: raw.giveaway.tweet_url,
            post_id,
            hashtag,
            window,
            output: raw.output,
            api,
            debug: raw.debug,
        })
    }
}

impl ApiSettings {
    fn from_raw(raw: &ApiConfig) -> Result<Self> {
        let mut base_url = Url::parse(&raw.base_url).map_err(|e| {
            GiveawayError::Config(format!("invalid api.base_url '{}': {}", raw.base_url, e))
        })?;
        // Relative joins drop the last segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        if raw.min_post_id_len == 0 || raw.min_post_id_len > raw.max_post_id_len {
            return Err(GiveawayError::Config(format!(
                "invalid post id length bounds {}..={}",
                raw.min_post_id_len, raw.max_post_id_len
            )));
        }
        if raw.shuffle_iterations == 0 {
            return Err(GiveawayError::Config(
                "api.shuffle_iterations must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            page_delay: Duration::from_millis(raw.page_delay_ms),
            request_timeout: Duration::from_secs(raw.request_timeout_secs),
            post_id_len: raw.min_post_id_len..=raw.max_post_id_len,
            shuffle_iterations: raw.shuffle_iterations,
        })
    }
}

/// `--config` if given, else `giveaway.toml` in the working directory, else the user config dir.
pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(local);
    }

    if let Some(dir) = dirs::config_dir() {
        let user = dir.join("giveaway").join("config.toml");
        if user.is_file() {
            return Ok(user);
        }
    }

    Err(GiveawayError::Config(format!(
        "Please ensure file: {} is located in the current directory or pass --config",
        CONFIG_FILE_NAME
    )))
}

pub fn parse(contents: &str) -> Result<RawConfig> {
    toml::from_str(contents).map_err(|e| GiveawayError::Config(e.to_string()))
}

pub fn read(path: &Path) -> Result<RawConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        GiveawayError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse(&contents)
}

/// Read and validate `path`, letting `TWITTER_BEARER_TOKEN` override the stored token.
pub fn load(path: &Path) -> Result<GiveawayConfig> {
    GiveawayConfig::from_raw(read(path)?, std::env::var(BEARER_TOKEN_ENV).ok())
}
