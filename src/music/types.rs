/// Wire types for the music provider API
///
/// Field names mirror the provider's snake_case JSON. Deserialization at
/// this boundary is the schema validation step: payloads that do not fit
/// these shapes surface as schema errors instead of flowing onward.
use serde::{Deserialize, Serialize};

/// A playable track with the metadata the agents talk about
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<Artist>,
    pub album: Album,
    pub duration_ms: u64,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
}

impl Track {
    /// "Artist, Artist" joined for display and prompts
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Duration as m:ss for table display
    pub fn duration_display(&self) -> String {
        let total_seconds = self.duration_ms / 1000;
        format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// One entry of the listening history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayHistoryItem {
    pub track: Track,
    pub played_at: String,
}

/// Response shape of /me/player/recently-played
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentlyPlayed {
    pub items: Vec<PlayHistoryItem>,
}

/// Generic offset-paged collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

/// Response shape of /search with type=track
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    pub tracks: TrackSearchPage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackSearchPage {
    pub items: Vec<Track>,
    #[serde(default)]
    pub total: u32,
}

/// Response shape of /me
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

/// Time window for the top-tracks endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    /// Wire value the provider expects
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
