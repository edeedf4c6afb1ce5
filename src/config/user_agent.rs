use serde::{Deserialize, Serialize};
use std::fmt;

/// Browser identities the crawler can present itself as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Brave,
    Safari,
    Edge,
}

impl Browser {
    /// All supported browsers, in table order
    pub const ALL: [Browser; 5] = [
        Browser::Chromium,
        Browser::Firefox,
        Browser::Brave,
        Browser::Safari,
        Browser::Edge,
    ];

    /// The `User-Agent` header value for this browser
    pub fn user_agent(&self) -> &'static str {
        match self {
            Self::Chromium => {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
            }
            Self::Firefox => {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:134.0) Gecko/20100101 Firefox/134.0"
            }
            Self::Brave => {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Brave/131"
            }
            Self::Safari => {
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_7_2) AppleWebKit/605.1.15 \
                 (KHTML, like Gecko) Version/18.2 Safari/605.1.15"
            }
            Self::Edge => {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0"
            }
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chromium => "chromium",
            Self::Firefox => "firefox",
            Self::Brave => "brave",
            Self::Safari => "safari",
            Self::Edge => "edge",
        };
        f.write_str(name)
    }
}
