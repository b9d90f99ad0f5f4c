//! Track-source boundary: the search trait the player depends on, its error
//! taxonomy, and a REST client for a Lavalink-style `/v4/loadtracks`
//! endpoint.

use crate::track::Track;
use async_trait::async_trait;
use serde::Deserialize;

/// Node error messages that mean a mix/radio lookup is unsupported for the
/// given identifier, as opposed to a generic load failure.
const MIX_UNAVAILABLE_MARKERS: [&str; 2] =
    ["Could not find tracks from mix", "Could not read mix page"];

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Mix/radio lookup unsupported for this identifier. Recoverable: the
    /// caller retries with an author-name query.
    #[error("mix unavailable: {0}")]
    MixUnavailable(String),

    /// The node failed to load tracks for the query
    #[error("track load failed: {message} (caused by {cause})")]
    Load { message: String, cause: String },

    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected search response: {0}")]
    Unexpected(String),
}

/// External search provider. Implemented by [`RestSearchClient`] for real
/// nodes and by mocks in tests.
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Track>, SearchError>;
}

/// REST client for a Lavalink v4 node's track loading endpoint.
pub struct RestSearchClient {
    http: reqwest::Client,
    base_url: String,
    password: String,
}

impl RestSearchClient {
    pub fn new(base_url: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl SearchSource for RestSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<Track>, SearchError> {
        let url = format!("{}/v4/loadtracks", self.base_url);

        let response = self
            .http
            .get(url)
            .query(&[("identifier", query)])
            .header("Authorization", &self.password)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Unexpected(format!("HTTP {status}: {body}")));
        }

        let result: LoadResult = response.json().await?;
        result.into_tracks()
    }
}

/// Load-type envelope returned by `/v4/loadtracks`
#[derive(Debug, Deserialize)]
struct LoadResult {
    #[serde(rename = "loadType")]
    load_type: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    info: ApiTrackInfo,
}

#[derive(Debug, Deserialize)]
struct ApiTrackInfo {
    identifier: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    length: u64,
    #[serde(rename = "isStream", default)]
    is_stream: bool,
    #[serde(rename = "sourceName", default)]
    source_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiPlaylist {
    #[serde(default)]
    tracks: Vec<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    cause: String,
}

impl From<ApiTrack> for Track {
    fn from(track: ApiTrack) -> Self {
        let info = track.info;
        Track {
            identifier: info.identifier,
            author: info.author,
            title: info.title,
            uri: info.uri.unwrap_or_default(),
            length_ms: info.length,
            is_stream: info.is_stream,
            source: info.source_name,
        }
    }
}

impl LoadResult {
    fn into_tracks(self) -> Result<Vec<Track>, SearchError> {
        match self.load_type.as_str() {
            "track" => {
                let track: ApiTrack = serde_json::from_value(self.data)
                    .map_err(|e| SearchError::Unexpected(e.to_string()))?;
                Ok(vec![track.into()])
            }
            "search" => {
                let tracks: Vec<ApiTrack> = serde_json::from_value(self.data)
                    .map_err(|e| SearchError::Unexpected(e.to_string()))?;
                Ok(tracks.into_iter().map(Track::from).collect())
            }
            "playlist" => {
                let playlist: ApiPlaylist = serde_json::from_value(self.data)
                    .map_err(|e| SearchError::Unexpected(e.to_string()))?;
                Ok(playlist.tracks.into_iter().map(Track::from).collect())
            }
            "empty" => Ok(vec![]),
            "error" => {
                let error: ApiError = serde_json::from_value(self.data)
                    .map_err(|e| SearchError::Unexpected(e.to_string()))?;

                if MIX_UNAVAILABLE_MARKERS
                    .iter()
                    .any(|marker| error.message.contains(marker) || error.cause.contains(marker))
                {
                    Err(SearchError::MixUnavailable(error.message))
                } else {
                    Err(SearchError::Load {
                        message: error.message,
                        cause: error.cause,
                    })
                }
            }
            other => Err(SearchError::Unexpected(format!(
                "unknown loadType {other:?}"
            ))),
        }
    }
}
