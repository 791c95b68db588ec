use std::time::Instant;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use once_cell::sync::{Lazy, OnceCell};
use reqwest::{Client, StatusCode, Url};

use crate::logging::Logger;

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("http"));

/// Status and raw body of a completed request.
#[derive(Debug, Clone)]
pub struct Payload {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Performs a single GET and hands back whatever the server answered.
///
/// Implementations must not retry and must not judge the status code;
/// an `Err` means the request/response cycle itself did not complete.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: Url) -> Result<Payload>;
}

/// `Transport` backed by the shared reqwest client.
#[derive(Default, Clone, Copy)]
pub struct HttpTransport;

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: Url) -> Result<Payload> {
        get_payload(url).await
    }
}

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
///
/// Timeouts are left at the client defaults.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        // 已經安裝過 provider 時會回傳 Err，忽略即可
        let _ = rustls::crypto::ring::default_provider().install_default();

        Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            .zstd(true)
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Waits for the `http` log lines queued so far to be written.
pub fn flush_log() {
    if let Some(logger) = Lazy::get(&LOGGER) {
        logger.flush();
    }
}

/// Performs an HTTP GET request and returns the status with the raw body.
///
/// # Arguments
///
/// * `url`: The URL to send the GET request to.
///
/// # Returns
///
/// * `Result<Payload>`: The response, or an error if the request cannot be sent
///   or the body cannot be read.
pub async fn get_payload(url: Url) -> Result<Payload> {
    let client = get_client()?;
    let visit_log = format!("GET:{url}");
    let start = Instant::now();

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(why) => {
            LOGGER.error(format!(
                "{} failed because {:?}. {} ms",
                visit_log,
                why,
                start.elapsed().as_millis()
            ));
            return Err(why.into());
        }
    };

    let status = response.status();
    let body = response.bytes().await.map_err(|why| {
        LOGGER.error(format!("{} body read failed because {:?}", visit_log, why));
        anyhow!(why)
    })?;

    LOGGER.info(format!(
        "{} {} {} ms",
        visit_log,
        status,
        start.elapsed().as_millis()
    ));

    Ok(Payload {
        status,
        body: body.to_vec(),
    })
}
