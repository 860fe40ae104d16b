//! HTTP client pair used for two-hop resolution.
//!
//! The probe client never follows redirects, so a 301/302 from the resolver
//! is observed directly. The follow client keeps reqwest's default redirect
//! policy and is only used for the `Location` of that first response.

use std::time::Duration;

use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::ProbeError;
use super::result::ProbeResult;
use super::{REDIRECT_SENTINEL_STATUS, is_followed_redirect};
use crate::user_agent;

/// Resolver client performing the initial probe and one manual redirect hop.
///
/// Cloning is cheap; both inner clients share their connection pools.
#[derive(Debug, Clone)]
pub struct ResolverClient {
    probe: Client,
    follow: Client,
}

impl ResolverClient {
    /// Creates a client pair with the given timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::ClientBuild`] if reqwest rejects the configuration.
    #[instrument(level = "debug")]
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Result<Self, ProbeError> {
        let probe = build_client(Policy::none(), connect_timeout, request_timeout)?;
        let follow = build_client(Policy::default(), connect_timeout, request_timeout)?;
        Ok(Self { probe, follow })
    }

    /// Probes a target URL.
    ///
    /// A 301 or 302 response has its `Location` requested once more with the
    /// follow client, and that response's status becomes the final status. A
    /// missing `Location` or a failed follow-up yields
    /// [`REDIRECT_SENTINEL_STATUS`]. Any other status is both initial and final.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] only if the first request cannot be made.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn probe(&self, url: &str) -> Result<ProbeResult, ProbeError> {
        Url::parse(url).map_err(|_| ProbeError::invalid_url(url))?;

        let response = self
            .probe
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeError::from_request(url, e))?;

        let initial_status = response.status().as_u16();
        let redirected = is_followed_redirect(initial_status);
        let redirect_url = if redirected {
            response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string()
        } else {
            String::new()
        };
        drop(response);

        let final_status = if !redirected {
            initial_status
        } else if redirect_url.is_empty() {
            warn!(status = initial_status, "redirect without usable Location header");
            REDIRECT_SENTINEL_STATUS
        } else {
            debug!(redirect_url = %redirect_url, "following redirect");
            self.follow_redirect(&redirect_url).await
        };

        Ok(ProbeResult {
            url: url.to_string(),
            initial_status,
            redirect_url,
            final_status,
        })
    }

    async fn follow_redirect(&self, location: &str) -> u16 {
        match self.follow.get(location).send().await {
            Ok(response) => response.status().as_u16(),
            Err(e) => {
                warn!(redirect_url = %location, error = %e, "failed to follow redirect");
                REDIRECT_SENTINEL_STATUS
            }
        }
    }
}

fn build_client(
    redirect: Policy,
    connect_timeout: Duration,
    request_timeout: Duration,
) -> Result<Client, ProbeError> {
    Client::builder()
        .redirect(redirect)
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .user_agent(user_agent::default_checker_user_agent())
        .gzip(true)
        .build()
        .map_err(ProbeError::client_build)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn test_client() -> ResolverClient {
        ResolverClient::new(Duration::from_secs(5), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_probe_ok_status_is_final() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/10.1000/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let url = format!("{}/10.1000/ok", mock_server.uri());
        let result = test_client().probe(&url).await.unwrap();

        assert_eq!(result.url, url);
        assert_eq!(result.initial_status, 200);
        assert_eq!(result.redirect_url, "");
        assert_eq!(result.final_status, 200);
        assert!(!result.was_redirected());
    }

    #[tokio::test]
    async fn test_probe_301_follows_location_once() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let landing = format!("{}/landing", mock_server.uri());
        Mock::given(method("GET"))
            .and(path("/10.1000/moved"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", landing.as_str()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/landing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/10.1000/moved", mock_server.uri());
        let result = test_client().probe(&url).await.unwrap();

        assert_eq!(result.initial_status, 301);
        assert_eq!(result.redirect_url, landing);
        assert_eq!(result.final_status, 404);
        assert!(result.was_redirected());
    }

    #[tokio::test]
    async fn test_probe_follow_up_chases_further_redirects() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let hop = format!("{}/hop", mock_server.uri());
        let article = format!("{}/article", mock_server.uri());
        Mock::given(method("GET"))
            .and(path("/10.1000/chain"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", hop.as_str()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/hop"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", article.as_str()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let url = format!("{}/10.1000/chain", mock_server.uri());
        let result = test_client().probe(&url).await.unwrap();

        assert_eq!(result.initial_status, 302);
        assert_eq!(result.redirect_url, hop);
        assert_eq!(result.final_status, 200);
    }

    #[tokio::test]
    async fn test_probe_307_is_not_followed() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let landing = format!("{}/landing", mock_server.uri());
        Mock::given(method("GET"))
            .and(path("/10.1000/temp"))
            .respond_with(ResponseTemplate::new(307).insert_header("Location", landing.as_str()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/landing"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let url = format!("{}/10.1000/temp", mock_server.uri());
        let result = test_client().probe(&url).await.unwrap();

        assert_eq!(result.initial_status, 307);
        assert_eq!(result.redirect_url, "");
        assert_eq!(result.final_status, 307);
    }

    #[tokio::test]
    async fn test_probe_redirect_without_location_uses_sentinel() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/10.1000/nolocation"))
            .respond_with(ResponseTemplate::new(302))
            .mount(&mock_server)
            .await;

        let url = format!("{}/10.1000/nolocation", mock_server.uri());
        let result = test_client().probe(&url).await.unwrap();

        assert_eq!(result.initial_status, 302);
        assert_eq!(result.redirect_url, "");
        assert_eq!(result.final_status, REDIRECT_SENTINEL_STATUS);
    }

    #[tokio::test]
    async fn test_probe_unreachable_redirect_target_uses_sentinel() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        // Port 1 on localhost refuses connections.
        let dead = "http://127.0.0.1:1/gone";
        Mock::given(method("GET"))
            .and(path("/10.1000/dead"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", dead))
            .mount(&mock_server)
            .await;

        let url = format!("{}/10.1000/dead", mock_server.uri());
        let result = test_client().probe(&url).await.unwrap();

        assert_eq!(result.initial_status, 301);
        assert_eq!(result.redirect_url, dead);
        assert_eq!(result.final_status, REDIRECT_SENTINEL_STATUS);
    }

    #[tokio::test]
    async fn test_probe_relative_location_uses_sentinel() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/10.1000/relative"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/landing"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/10.1000/relative", mock_server.uri());
        let result = test_client().probe(&url).await.unwrap();

        assert_eq!(result.redirect_url, "/landing");
        assert_eq!(result.final_status, REDIRECT_SENTINEL_STATUS);
    }

    #[tokio::test]
    async fn test_probe_server_error_is_recorded_not_raised() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/10.1000/broken"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let url = format!("{}/10.1000/broken", mock_server.uri());
        let result = test_client().probe(&url).await.unwrap();

        assert_eq!(result.initial_status, 503);
        assert_eq!(result.final_status, 503);
    }

    #[test]
    fn test_sentinel_is_internal_server_error() {
        assert_eq!(
            REDIRECT_SENTINEL_STATUS,
            reqwest::StatusCode::INTERNAL_SERVER_ERROR.as_u16()
        );
    }

    #[tokio::test]
    async fn test_probe_connection_refused_is_error() {
        let result = test_client().probe("http://127.0.0.1:1/10.1000/x").await;
        assert!(matches!(result, Err(ProbeError::Network { .. })));
    }

    #[test]
    fn test_probe_invalid_url_is_error() {
        let client = test_client();
        let result = tokio_test::block_on(client.probe("not-a-valid-url"));
        assert!(matches!(result, Err(ProbeError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_probe_timeout_is_error() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("GET"))
            .and(path("/10.1000/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let client = ResolverClient::new(Duration::from_secs(1), Duration::from_millis(300)).unwrap();
        let url = format!("{}/10.1000/slow", mock_server.uri());
        let result = client.probe(&url).await;

        assert!(
            matches!(result, Err(ProbeError::Timeout { .. })),
            "Expected Timeout, got: {result:?}"
        );
    }
}
