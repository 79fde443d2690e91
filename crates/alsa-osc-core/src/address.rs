//! OSC address construction
//!
//! Every mixer control is published under a fixed root:
//! ```text
//! <root>/<card>/<control>              volume, all channels, percent
//! <root>/<card>/<control>/CH<n>        volume, channel n, percent
//! <root>/<card>/<control>/dB           volume, all channels, dB
//! <root>/<card>/<control>/dB/CH<n>     volume, channel n, dB
//! <root>/<card>/<control>/mute         mute switch
//! <root>/<card>/<control>/rec          record-arm switch
//! ```
//!
//! Card and control names are inserted verbatim. A name containing `/`
//! produces extra path segments; nothing is escaped.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ChannelSelector, Units};
use crate::{Error, Result, DEFAULT_ROOT};

/// Validated address prefix all routes hang off
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Root(String);

impl Root {
    /// Parse a root prefix. It must start with `/`, must not end with `/`
    /// and must not contain empty segments.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidRoot("empty root".to_string()));
        }

        if !s.starts_with('/') {
            return Err(Error::InvalidRoot(format!("root must start with '/': {}", s)));
        }

        if s.len() > 1 && s.ends_with('/') {
            return Err(Error::InvalidRoot(format!("root must not end with '/': {}", s)));
        }

        if s.len() > 1 && s[1..].split('/').any(|seg| seg.is_empty()) {
            return Err(Error::InvalidRoot(format!("empty segment in root: {}", s)));
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the address of one route
    pub fn address(&self, card: &str, control: &str, kind: RouteKind) -> String {
        // A bare "/" root would otherwise yield "//card/..."
        let root = if self.0 == "/" { "" } else { self.0.as_str() };
        format!("{}/{}/{}{}", root, card, control, kind.suffix())
    }
}

impl Default for Root {
    fn default() -> Self {
        Self(DEFAULT_ROOT.to_string())
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Root {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Root::parse(s)
    }
}

impl TryFrom<String> for Root {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Root::parse(&s)
    }
}

impl From<Root> for String {
    fn from(root: Root) -> Self {
        root.0
    }
}

/// The shape of a route, which determines its address suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    Volume {
        units: Units,
        channel: ChannelSelector,
    },
    Mute,
    Record,
}

impl RouteKind {
    pub fn volume(units: Units, channel: ChannelSelector) -> Self {
        RouteKind::Volume { units, channel }
    }

    /// Suffix appended after `<root>/<card>/<control>`
    pub fn suffix(&self) -> String {
        match self {
            RouteKind::Volume { units, channel } => {
                let mut suffix = String::new();
                if *units == Units::Decibel {
                    suffix.push_str("/dB");
                }
                if let ChannelSelector::Channel(n) = channel {
                    suffix.push_str(&format!("/CH{}", n));
                }
                suffix
            }
            RouteKind::Mute => "/mute".to_string(),
            RouteKind::Record => "/rec".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes() {
        use ChannelSelector::*;
        use Units::*;

        assert_eq!(RouteKind::volume(Percent, All).suffix(), "");
        assert_eq!(RouteKind::volume(Percent, Channel(1)).suffix(), "/CH1");
        assert_eq!(RouteKind::volume(Decibel, All).suffix(), "/dB");
        assert_eq!(RouteKind::volume(Decibel, Channel(0)).suffix(), "/dB/CH0");
        assert_eq!(RouteKind::Mute.suffix(), "/mute");
        assert_eq!(RouteKind::Record.suffix(), "/rec");
    }

    #[test]
    fn test_address_keeps_spaces() {
        let root = Root::default();
        assert_eq!(
            root.address("USB Audio CODEC", "PCM", RouteKind::Mute),
            "/alsa/interface/USB Audio CODEC/PCM/mute"
        );
    }

    #[test]
    fn test_slash_root() {
        let root = Root::parse("/").unwrap();
        assert_eq!(
            root.address("PCH", "Master", RouteKind::volume(Units::Percent, ChannelSelector::All)),
            "/PCH/Master"
        );
    }

    #[test]
    fn test_invalid_roots() {
        assert!(Root::parse("").is_err());
        assert!(Root::parse("alsa").is_err());
        assert!(Root::parse("/alsa/").is_err());
        assert!(Root::parse("/alsa//interface").is_err());
        assert!(Root::parse("/mixer").is_ok());
    }
}
