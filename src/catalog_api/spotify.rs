//! Spotify Web API client.
//!
//! Authenticates once with the client-credentials flow and keeps a minimum
//! spacing between requests.

use super::models::{
    ArtistDetail, NewReleasesResponse, Page, ReleaseEntry, TokenResponse, TrackEntry,
};
use super::{CatalogApi, CatalogApiError};
use crate::config::SpotifySettings;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

const SPOTIFY_ACCOUNTS_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
const MAX_PAGE_SIZE: usize = 50;

pub struct SpotifyClient {
    client: Client,
    access_token: String,
    country: Option<String>,
    request_interval: Duration,
    last_request: Mutex<Instant>,
}

fn build_http_client(timeout_sec: u64) -> Result<Client, CatalogApiError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_sec))
        .build()
        .map_err(|e| CatalogApiError::ClientSetup(e.to_string()))
}

impl SpotifyClient {
    /// Build the HTTP client and exchange the configured credentials for an access token.
    pub fn connect(settings: &SpotifySettings) -> Result<Self, CatalogApiError> {
        let client = build_http_client(settings.timeout_sec)?;
        let access_token = request_access_token(&client, settings)?;

        Ok(Self {
            client,
            access_token,
            country: settings.country.clone(),
            request_interval: settings.request_interval,
            last_request: Mutex::new(
                Instant::now()
                    .checked_sub(settings.request_interval)
                    .unwrap_or_else(Instant::now),
            ),
        })
    }

    fn rate_limit(&self) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let elapsed = last.elapsed();
        if elapsed < self.request_interval {
            std::thread::sleep(self.request_interval - elapsed);
        }
        *last = Instant::now();
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, endpoint: &str) -> Result<T, CatalogApiError> {
        self.rate_limit();
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|source| CatalogApiError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CatalogApiError::Status {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.json().map_err(|e| CatalogApiError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    /// Collect items across pages by following `next` links.
    fn get_all_pages<T, F>(
        &self,
        first_url: String,
        endpoint: &str,
        limit: Option<usize>,
        unwrap_page: F,
    ) -> Result<Vec<T>, CatalogApiError>
    where
        F: Fn(serde_json::Value) -> Result<Page<T>, serde_json::Error>,
    {
        let mut items = Vec::new();
        let mut next_url = Some(first_url);

        while let Some(url) = next_url.take() {
            let body: serde_json::Value = self.get_json(&url, endpoint)?;
            let page = unwrap_page(body).map_err(|e| CatalogApiError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;
            items.extend(page.items);

            if limit.is_some_and(|limit| items.len() >= limit) {
                break;
            }
            next_url = page.next;
        }

        if let Some(limit) = limit {
            items.truncate(limit);
        }
        Ok(items)
    }
}

fn request_access_token(
    client: &Client,
    settings: &SpotifySettings,
) -> Result<String, CatalogApiError> {
    let response = client
        .post(SPOTIFY_ACCOUNTS_TOKEN_URL)
        .basic_auth(&settings.client_id, Some(&settings.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .map_err(|e| CatalogApiError::Authentication(e.to_string()))?;

    if !response.status().is_success() {
        return Err(CatalogApiError::Authentication(format!(
            "token endpoint returned status {}",
            response.status()
        )));
    }

    let token: TokenResponse = response
        .json()
        .map_err(|e| CatalogApiError::Authentication(e.to_string()))?;
    Ok(token.access_token)
}

fn new_releases_url(limit: usize, country: Option<&str>) -> String {
    let mut url = format!(
        "{}/browse/new-releases?limit={}",
        SPOTIFY_API_BASE,
        limit.clamp(1, MAX_PAGE_SIZE)
    );
    if let Some(country) = country {
        url.push_str(&format!("&country={}", urlencoding::encode(country)));
    }
    url
}

fn album_tracks_url(album_id: &str) -> String {
    format!(
        "{}/albums/{}/tracks?limit={}",
        SPOTIFY_API_BASE,
        urlencoding::encode(album_id),
        MAX_PAGE_SIZE
    )
}

fn artist_url(artist_id: &str) -> String {
    format!("{}/artists/{}", SPOTIFY_API_BASE, urlencoding::encode(artist_id))
}

impl CatalogApi for SpotifyClient {
    fn list_new_releases(&self, limit: usize) -> Result<Vec<ReleaseEntry>, CatalogApiError> {
        self.get_all_pages(
            new_releases_url(limit, self.country.as_deref()),
            "browse/new-releases",
            Some(limit),
            |body| serde_json::from_value::<NewReleasesResponse>(body).map(|r| r.albums),
        )
    }

    fn fetch_album_tracks(&self, album_id: &str) -> Result<Vec<TrackEntry>, CatalogApiError> {
        self.get_all_pages(album_tracks_url(album_id), "albums/tracks", None, |body| {
            serde_json::from_value::<Page<TrackEntry>>(body)
        })
    }

    fn fetch_artist_detail(&self, artist_id: &str) -> Result<ArtistDetail, CatalogApiError> {
        self.get_json(&artist_url(artist_id), "artists")
    }
}
