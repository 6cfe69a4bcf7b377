// PayloadNormalizer — FormModel to the exact JSON body the backend expects.
//
// Pure function, no I/O. Checkbox booleans become 0/1 integers, the two
// numeric fields are parsed as base-10 integers, and everything else passes
// through. A numeric field that doesn't parse is a ValidationError; it is
// never forwarded as a garbage number.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::ValidationError;
use crate::form::fields::{Location, MediaType, Platform};
use crate::form::model::FormModel;

/// A boolean that travels over the wire as the integer 0 or 1.
///
/// Deserialization also accepts JSON booleans, so a server that echoes the
/// flag back in either shape is read consistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinaryFlag(bool);

impl BinaryFlag {
    pub fn is_set(self) -> bool {
        self.0
    }

    pub fn as_int(self) -> u8 {
        u8::from(self.0)
    }
}

impl From<bool> for BinaryFlag {
    fn from(value: bool) -> Self {
        BinaryFlag(value)
    }
}

impl Serialize for BinaryFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_int())
    }
}

impl<'de> Deserialize<'de> for BinaryFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Int(u64),
            Bool(bool),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Int(0) => Ok(BinaryFlag(false)),
            Wire::Int(1) => Ok(BinaryFlag(true)),
            Wire::Int(n) => Err(serde::de::Error::custom(format!(
                "flag must be 0 or 1, got {n}"
            ))),
            Wire::Bool(b) => Ok(BinaryFlag(b)),
        }
    }
}

/// Request body for `POST /api/predict`. Built fresh for every submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionPayload {
    pub platform: Platform,
    pub caption: String,
    pub followers: u64,
    pub account_age_days: u64,
    pub location: Location,
    pub media_type: MediaType,
    pub verified: BinaryFlag,
    pub cross_platform_spread: BinaryFlag,
}

/// Convert form state into a wire payload.
///
/// Fails if the caption is blank, or if `followers` / `account_age_days`
/// is not a non-negative base-10 integer (surrounding whitespace allowed).
pub fn normalize(form: &FormModel) -> Result<PredictionPayload, ValidationError> {
    if form.caption.trim().is_empty() {
        return Err(ValidationError::EmptyCaption);
    }

    Ok(PredictionPayload {
        platform: form.platform,
        caption: form.caption.clone(),
        followers: parse_count("followers", &form.followers)?,
        account_age_days: parse_count("account_age_days", &form.account_age_days)?,
        location: form.location,
        media_type: form.media_type,
        verified: form.verified.into(),
        cross_platform_spread: form.cross_platform_spread.into(),
    })
}

fn parse_count(field: &'static str, raw: &str) -> Result<u64, ValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field,
            value: raw.to_string(),
        })?;

    u64::try_from(value).map_err(|_| ValidationError::Negative { field, value })
}
