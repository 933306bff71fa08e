use crate::models::Coordinates;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the geocoding provider
#[derive(Debug, Error)]
pub enum GeocoderError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Client for a Nominatim-style geocoding API
///
/// Resolves free-text city names to coordinates. Lookups are retried a bounded
/// number of times with a fixed backoff; callers decide what an exhausted
/// retry budget means.
pub struct GeocodingClient {
    base_url: String,
    client: Client,
    attempts: u32,
    backoff: Duration,
}

impl GeocodingClient {
    /// Create a new geocoding client
    pub fn new(base_url: String, timeout_secs: u64, attempts: u32, backoff_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("tutormatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            client,
            attempts: attempts.max(1),
            backoff: Duration::from_millis(backoff_ms),
        }
    }

    /// Resolve a city name to coordinates
    ///
    /// Returns `Ok(None)` when the provider does not know the city. Transport
    /// and provider errors are retried before surfacing.
    pub async fn geocode(&self, city: &str) -> Result<Option<Coordinates>, GeocoderError> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(city)
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch_first_hit(&url).await {
                Ok(found) => return Ok(found),
                Err(e) => {
                    if attempt >= self.attempts {
                        return Err(e);
                    }
                    tracing::warn!(
                        "Geocoding attempt {}/{} for '{}' failed: {}",
                        attempt,
                        self.attempts,
                        city,
                        e
                    );
                    tokio::time::sleep(self.backoff).await;
                }
            }
        }
    }

    async fn fetch_first_hit(&self, url: &str) -> Result<Option<Coordinates>, GeocoderError> {
        tracing::debug!("Geocoding via: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(GeocoderError::ApiError(format!(
                "Geocoding request failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let hits = json
            .as_array()
            .ok_or_else(|| GeocoderError::InvalidResponse("Expected a result array".into()))?;

        let Some(hit) = hits.first() else {
            return Ok(None);
        };

        let latitude = parse_coordinate(hit, "lat")?;
        let longitude = parse_coordinate(hit, "lon")?;

        Ok(Some(Coordinates { latitude, longitude }))
    }
}

// Nominatim encodes coordinates as JSON strings
fn parse_coordinate(hit: &Value, field: &str) -> Result<f64, GeocoderError> {
    let raw = hit
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| GeocoderError::InvalidResponse(format!("Missing {} field", field)))?;

    raw.parse::<f64>()
        .map_err(|e| GeocoderError::InvalidResponse(format!("Bad {} value '{}': {}", field, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> GeocodingClient {
        // Zero backoff keeps retry tests fast
        GeocodingClient::new(server.url(), 5, 3, 0)
    }

    #[tokio::test]
    async fn test_geocode_parses_first_hit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Regex("^/search".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"lat":"51.5074","lon":"-0.1278","display_name":"London"}]"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let coords = client.geocode("London").await.unwrap().unwrap();

        assert!((coords.latitude - 51.5074).abs() < 1e-9);
        assert!((coords.longitude - (-0.1278)).abs() < 1e-9);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_geocode_unknown_city_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex("^/search".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.geocode("Nowheresville").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_geocode_retries_until_exhausted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Regex("^/search".to_string()))
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.geocode("Haifa").await;

        assert!(matches!(result, Err(GeocoderError::ApiError(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_geocode_rejects_malformed_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Regex("^/search".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"lat":"not-a-number","lon":"34.9896"}]"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.geocode("Haifa").await;
        assert!(matches!(result, Err(GeocoderError::InvalidResponse(_))));
    }
}
