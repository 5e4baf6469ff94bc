/// Music provider API surface
///
/// Typed wrappers over the authenticated API client for the provider
/// endpoints the application consumes: recently played, top tracks,
/// track lookup, search, profile, and the saved-tracks mutations that
/// drive cache invalidation.
pub mod client;
pub mod types;

pub use client::MusicClient;
pub use types::{
    Album, Artist, Image, Paging, PlayHistoryItem, RecentlyPlayed, SearchResults, TimeRange,
    Track, TrackSearchPage, UserProfile,
};
