/// Typed music provider client
///
/// Endpoints implemented:
/// 1. /me/player/recently-played - listening history (primary surface)
/// 2. /me/top/tracks             - top tracks for a time range
/// 3. /tracks/{id}               - single track lookup
/// 4. /search?type=track         - track search
/// 5. /me                        - user profile
/// 6. /me/tracks (PUT/DELETE)    - save/remove saved track
///
/// Reads go through the client's cache-or-fetch helper with per-endpoint
/// TTLs from the config table; mutations bypass the cache and invalidate
/// every cached key touching tracks afterwards.
use super::types::{Paging, RecentlyPlayed, SearchResults, TimeRange, Track, UserProfile};
use crate::api::{ApiClient, ApiError, HttpMethod, RequestOptions};
use crate::config::get_config_clone;
use crate::logger::{self, LogTag};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const ENDPOINT_RECENTLY_PLAYED: &str = "/me/player/recently-played";
const ENDPOINT_TOP_TRACKS: &str = "/me/top/tracks";
const ENDPOINT_SEARCH: &str = "/search";
const ENDPOINT_PROFILE: &str = "/me";
const ENDPOINT_SAVED_TRACKS: &str = "/me/tracks";

/// Default page size when callers pass 0
const DEFAULT_LIMIT: u32 = 20;

pub struct MusicClient {
    api: Arc<ApiClient>,
}

impl MusicClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Listening history, most recent first
    pub async fn get_recently_played(&self, limit: u32) -> Result<RecentlyPlayed, ApiError> {
        let limit = effective_limit(limit);
        let ttl = ttl_from_config(|c| c.recently_played_ms);

        logger::debug(
            LogTag::Music,
            &format!("Fetching recently played: limit={}", limit),
        );

        self.api
            .cached_request(
                ENDPOINT_RECENTLY_PLAYED,
                vec![("limit".to_string(), json!(limit))],
                ttl,
            )
            .await
    }

    /// The user's top tracks over a time window
    pub async fn get_top_tracks(
        &self,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Paging<Track>, ApiError> {
        let limit = effective_limit(limit);
        let ttl = ttl_from_config(|c| c.top_tracks_ms);

        logger::debug(
            LogTag::Music,
            &format!("Fetching top tracks: range={}, limit={}", time_range, limit),
        );

        self.api
            .cached_request(
                ENDPOINT_TOP_TRACKS,
                vec![
                    ("time_range".to_string(), json!(time_range.as_str())),
                    ("limit".to_string(), json!(limit)),
                ],
                ttl,
            )
            .await
    }

    /// Single track lookup by provider id
    pub async fn get_track(&self, track_id: &str) -> Result<Track, ApiError> {
        let endpoint = format!("/tracks/{}", track_id);
        let ttl = ttl_from_config(|c| c.track_ms);

        logger::debug(LogTag::Music, &format!("Fetching track: {}", track_id));

        self.api.cached_request(&endpoint, vec![], ttl).await
    }

    /// Track search (short TTL, queries repeat while the user types)
    pub async fn search_tracks(&self, query: &str, limit: u32) -> Result<SearchResults, ApiError> {
        let limit = effective_limit(limit);
        let ttl = ttl_from_config(|c| c.search_ms);

        logger::debug(LogTag::Music, &format!("Searching tracks: q={}", query));

        self.api
            .cached_request(
                ENDPOINT_SEARCH,
                vec![
                    ("q".to_string(), json!(query)),
                    ("type".to_string(), json!("track")),
                    ("limit".to_string(), json!(limit)),
                ],
                ttl,
            )
            .await
    }

    /// Profile of the signed-in user
    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        let ttl = ttl_from_config(|c| c.profile_ms);
        self.api.cached_request(ENDPOINT_PROFILE, vec![], ttl).await
    }

    /// Add a track to the user's saved tracks
    ///
    /// Invalidate every cached key touching tracks afterwards so stale
    /// listings cannot survive the mutation.
    pub async fn save_track(&self, track_id: &str) -> Result<(), ApiError> {
        logger::debug(LogTag::Music, &format!("Saving track: {}", track_id));

        let options = RequestOptions::new()
            .with_method(HttpMethod::Put)
            .with_param("ids", track_id);
        let _: Value = self.api.request(ENDPOINT_SAVED_TRACKS, options).await?;

        self.api.invalidate("tracks");
        Ok(())
    }

    /// Remove a track from the user's saved tracks
    pub async fn remove_saved_track(&self, track_id: &str) -> Result<(), ApiError> {
        logger::debug(LogTag::Music, &format!("Removing saved track: {}", track_id));

        let options = RequestOptions::new()
            .with_method(HttpMethod::Delete)
            .with_param("ids", track_id);
        let _: Value = self.api.request(ENDPOINT_SAVED_TRACKS, options).await?;

        self.api.invalidate("tracks");
        Ok(())
    }
}

fn effective_limit(limit: u32) -> u32 {
    if limit == 0 {
        DEFAULT_LIMIT
    } else {
        limit
    }
}

fn ttl_from_config(pick: impl FnOnce(&crate::config::CacheTtlConfig) -> u64) -> Duration {
    let cfg = get_config_clone();
    Duration::from_millis(pick(&cfg.cache))
}
