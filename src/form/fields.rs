// Selection-constrained field domains: platform, audience location, media type.
//
// Each domain serializes to the exact label the backend was trained on
// ("North America", "TikTok", ...), so the payload can carry them unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when a raw string isn't one of a domain's options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {domain} (expected one of: {expected})")]
pub struct UnknownOption {
    pub domain: &'static str,
    pub value: String,
    pub expected: String,
}

/// Generates the label table, `as_str`, `Display` and `FromStr` for a domain.
/// Parsing is case-insensitive so CLI input like `tiktok` works.
macro_rules! field_domain {
    ($name:ident, $domain:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| UnknownOption {
                        domain: $domain,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|o| o.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

/// Social network the post is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Platform {
    #[default]
    Twitter,
    Instagram,
    Facebook,
    Reddit,
    TikTok,
    YouTube,
}

field_domain!(Platform, "platform", {
    Twitter => "Twitter",
    Instagram => "Instagram",
    Facebook => "Facebook",
    Reddit => "Reddit",
    TikTok => "TikTok",
    YouTube => "YouTube",
});

/// Where the target audience mostly lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Location {
    #[default]
    #[serde(rename = "North America")]
    NorthAmerica,
    Europe,
    Asia,
    #[serde(rename = "South America")]
    SouthAmerica,
    Africa,
    Oceania,
    Unknown,
}

field_domain!(Location, "location", {
    NorthAmerica => "North America",
    Europe => "Europe",
    Asia => "Asia",
    SouthAmerica => "South America",
    Africa => "Africa",
    Oceania => "Oceania",
    Unknown => "Unknown",
});

/// Kind of content attached to the post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MediaType {
    #[default]
    Text,
    Image,
    Video,
    Link,
    Poll,
}

field_domain!(MediaType, "media type", {
    Text => "Text",
    Image => "Image",
    Video => "Video",
    Link => "Link",
    Poll => "Poll",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_serde_names() {
        for location in Location::ALL {
            let json = serde_json::to_string(location).unwrap();
            assert_eq!(json, format!("\"{}\"", location.as_str()));
        }
        for platform in Platform::ALL {
            let json = serde_json::to_string(platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform.as_str()));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("tiktok".parse::<Platform>().unwrap(), Platform::TikTok);
        assert_eq!(
            " south america ".parse::<Location>().unwrap(),
            Location::SouthAmerica
        );
        assert_eq!("POLL".parse::<MediaType>().unwrap(), MediaType::Poll);
    }

    #[test]
    fn unknown_option_lists_choices() {
        let err = "Mastodon".parse::<Platform>().unwrap_err();
        assert_eq!(err.domain, "platform");
        assert!(err.to_string().contains("Twitter, Instagram"));
    }
}
