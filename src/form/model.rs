// FormModel — mutable form state owned by a single prediction session.
//
// Updates never fail: every `FieldUpdate` already carries an in-domain value.
// The only fallible step is turning raw strings (CLI flags, query params)
// into a `FieldUpdate`, which is where unknown fields and options are caught.

use std::str::FromStr;
use std::sync::OnceLock;

use regex_lite::Regex;

use super::fields::{Location, MediaType, Platform, UnknownOption};
use crate::prediction::payload::PredictionPayload;

/// Default follower count shown when the form first mounts.
pub const DEFAULT_FOLLOWERS: &str = "1000";
/// Default account age (days) shown when the form first mounts.
pub const DEFAULT_ACCOUNT_AGE_DAYS: &str = "365";

/// Wire names of every form field, in display order.
pub const FIELD_NAMES: &[&str] = &[
    "platform",
    "caption",
    "followers",
    "account_age_days",
    "location",
    "media_type",
    "verified",
    "cross_platform_spread",
];

/// Typed input for one prediction request.
///
/// `followers` and `account_age_days` hold the raw text as typed, so a
/// half-edited value like `""` or `"12k"` can live here until submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormModel {
    pub platform: Platform,
    pub caption: String,
    pub followers: String,
    pub account_age_days: String,
    pub location: Location,
    pub media_type: MediaType,
    pub verified: bool,
    pub cross_platform_spread: bool,
}

impl Default for FormModel {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            caption: String::new(),
            followers: DEFAULT_FOLLOWERS.to_string(),
            account_age_days: DEFAULT_ACCOUNT_AGE_DAYS.to_string(),
            location: Location::default(),
            media_type: MediaType::default(),
            verified: false,
            cross_platform_spread: false,
        }
    }
}

/// A single field edit. Checkbox fields carry booleans; numeric fields carry
/// the raw input string unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Platform(Platform),
    Caption(String),
    Followers(String),
    AccountAgeDays(String),
    Location(Location),
    MediaType(MediaType),
    Verified(bool),
    CrossPlatformSpread(bool),
}

/// Why a raw `(name, value)` pair couldn't become a `FieldUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("unknown form field '{0}'")]
    UnknownField(String),
    #[error(transparent)]
    UnknownOption(#[from] UnknownOption),
    #[error("'{value}' is not a checkbox value for {field} (use true/false)")]
    NotABoolean { field: &'static str, value: String },
}

impl FieldUpdate {
    /// Build an update from a wire field name and its raw value.
    pub fn parse(name: &str, raw: &str) -> Result<Self, FieldError> {
        let update = match name {
            "platform" => FieldUpdate::Platform(raw.parse()?),
            "caption" => FieldUpdate::Caption(raw.to_string()),
            "followers" => FieldUpdate::Followers(raw.to_string()),
            "account_age_days" => FieldUpdate::AccountAgeDays(raw.to_string()),
            "location" => FieldUpdate::Location(raw.parse()?),
            "media_type" => FieldUpdate::MediaType(raw.parse()?),
            "verified" => FieldUpdate::Verified(parse_checkbox("verified", raw)?),
            "cross_platform_spread" => {
                FieldUpdate::CrossPlatformSpread(parse_checkbox("cross_platform_spread", raw)?)
            }
            other => return Err(FieldError::UnknownField(other.to_string())),
        };
        Ok(update)
    }

    /// The wire name of the field this update touches.
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldUpdate::Platform(_) => "platform",
            FieldUpdate::Caption(_) => "caption",
            FieldUpdate::Followers(_) => "followers",
            FieldUpdate::AccountAgeDays(_) => "account_age_days",
            FieldUpdate::Location(_) => "location",
            FieldUpdate::MediaType(_) => "media_type",
            FieldUpdate::Verified(_) => "verified",
            FieldUpdate::CrossPlatformSpread(_) => "cross_platform_spread",
        }
    }
}

fn parse_checkbox(field: &'static str, raw: &str) -> Result<bool, FieldError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        _ => Err(FieldError::NotABoolean {
            field,
            value: raw.to_string(),
        }),
    }
}

impl FormModel {
    /// Apply one field edit in place.
    pub fn update(&mut self, change: FieldUpdate) {
        match change {
            FieldUpdate::Platform(v) => self.platform = v,
            FieldUpdate::Caption(v) => self.caption = v,
            FieldUpdate::Followers(v) => self.followers = v,
            FieldUpdate::AccountAgeDays(v) => self.account_age_days = v,
            FieldUpdate::Location(v) => self.location = v,
            FieldUpdate::MediaType(v) => self.media_type = v,
            FieldUpdate::Verified(v) => self.verified = v,
            FieldUpdate::CrossPlatformSpread(v) => self.cross_platform_spread = v,
        }
    }

    /// Builder-style variant of [`update`](Self::update).
    pub fn with(mut self, change: FieldUpdate) -> Self {
        self.update(change);
        self
    }

    /// Hashtags in the caption, in order of appearance, without the `#`.
    pub fn hashtags(&self) -> Vec<&str> {
        static HASHTAG: OnceLock<Regex> = OnceLock::new();
        let re = HASHTAG.get_or_init(|| Regex::new(r"#(\w+)").expect("valid regex"));
        re.captures_iter(&self.caption)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }
}

impl FromStr for FieldUpdate {
    type Err = FieldError;

    /// Parse `name=value` (the CLI's `--set` syntax).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, raw)) => FieldUpdate::parse(name.trim(), raw),
            None => Err(FieldError::UnknownField(s.to_string())),
        }
    }
}

/// Re-display a payload (e.g. one echoed back by the server) as form state.
/// Integer flags come back as checkbox booleans.
impl From<&PredictionPayload> for FormModel {
    fn from(payload: &PredictionPayload) -> Self {
        Self {
            platform: payload.platform,
            caption: payload.caption.clone(),
            followers: payload.followers.to_string(),
            account_age_days: payload.account_age_days.to_string(),
            location: payload.location,
            media_type: payload.media_type,
            verified: payload.verified.is_set(),
            cross_platform_spread: payload.cross_platform_spread.is_set(),
        }
    }
}
