//! Handshake-established HTTP session.
//!
//! The booking search hands out session cookies on its landing page and
//! expects them on every confinement fetch. [`Session::establish`] performs
//! that handshake once; the resulting value is immutable and threaded through
//! all subsequent fetch calls, making the initialize-once contract visible in
//! the type rather than hidden behind a flag.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, REFERER, USER_AGENT};
use tracing::{info, warn};

use crate::config::JailConfig;
use crate::error::AcquireError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// An established session against the booking search: a cookie-carrying
/// client with a fixed browser-like header set.
#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
}

impl Session {
    /// Build the client and perform the one-time cookie handshake against the
    /// landing page. A failed handshake is a total acquisition failure.
    pub async fn establish(config: &JailConfig) -> Result<Self, AcquireError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        match HeaderValue::from_str(&config.landing_url()) {
            Ok(referer) => {
                headers.insert(REFERER, referer);
            }
            Err(_) => warn!("landing URL is not a valid Referer value, omitting"),
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(AcquireError::Client)?;

        info!("initializing session with jail database");
        let response = client
            .get(config.landing_url())
            .send()
            .await
            .map_err(AcquireError::Handshake)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquireError::HandshakeStatus(status.as_u16()));
        }

        info!("session established");
        Ok(Self { client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}
