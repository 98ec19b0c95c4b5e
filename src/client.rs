//! HTTP client to interact with the catalogue API.

use eyre::{Result, WrapErr};
use rand::prelude::*;
use serde::de::DeserializeOwned;
use std::{thread, time::Duration};
use tracing::{debug, warn};
use url::Url;

/// User agent sent along every request.
const USER_AGENT: &str = concat!("dramadeck/", env!("CARGO_PKG_VERSION"));

/// Tunables for the HTTP client.
#[derive(Debug, Clone, Copy)]
pub struct ClientConfig {
    /// Max number of retry for each request.
    pub retry: u8,
    /// Base delay between each request.
    pub delay: Duration,
    /// Timeout for a whole request.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retry: 3,
            delay: Duration::from_millis(250),
            timeout: Duration::from_secs(20),
        }
    }
}

/// A simple HTTP client, handle retry and delay.
#[derive(Clone)]
pub struct Client {
    /// HTTP client.
    agent: ureq::Agent,
    /// Delay between each request.
    delay: Duration,
    /// Max number of retry for each request.
    retry: u8,
}

impl Client {
    /// Initialize a new client.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            agent: ureq::builder()
                .user_agent(USER_AGENT)
                .timeout(config.timeout)
                .build(),
            delay: config.delay,
            retry: config.retry,
        }
    }

    /// Calls `url` and parses the JSON response.
    pub fn get_json<T>(&self, url: &Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self
            .agent
            .request_url("GET", url)
            .set("accept", "application/json");
        let response = self.call(request).context("get JSON")?;

        serde_json::from_reader(response.into_reader()).context("read JSON")
    }

    /// Executes a request and handle retries.
    fn call(&self, request: ureq::Request) -> Result<ureq::Response> {
        // Spread the requests a bit, the API is rate-limited.
        if !self.delay.is_zero() {
            let mut rng = rand::thread_rng();
            let max_jiffy = u64::try_from(self.delay.as_millis() / 4)
                .unwrap_or(u64::MAX);
            let jiffy = Duration::from_millis(rng.gen_range(0..=max_jiffy));
            thread::sleep(self.delay + jiffy);
        }

        debug!(url = request.url(), "GET");

        let mut i = 0;
        loop {
            i += 1;

            let res = request.clone().call();

            if let Err(ureq::Error::Status(code, ref response)) = res {
                // If we got a retryable error, we try again!
                if is_request_retryable(code) && i <= self.retry {
                    let delay = self.retry_delay(response);

                    warn!(
                        url = request.url(),
                        status = code,
                        attempt = i,
                        "retrying in {delay:?}"
                    );
                    thread::sleep(delay);
                    continue;
                }
            }

            return res.context("HTTP request failed");
        }
    }

    /// Computes the delay to wait before retrying a failed request.
    fn retry_delay(&self, response: &ureq::Response) -> Duration {
        response
            .header("retry-after")
            .and_then(|h| h.parse::<u64>().ok())
            .map_or(self.delay, Duration::from_secs)
    }
}

/// Tests if request failed with a retryable error.
fn is_request_retryable(http_status: u16) -> bool {
    // 429 is Too Many Requests
    (500..=599).contains(&http_status) || http_status == 429
}
