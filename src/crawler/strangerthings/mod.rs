//! # Stranger Things 台詞採集模組
//!
//! 透過公開的 REST API 取得隨機的影集台詞。
//!
//! ## 站點資訊
//!
//! - 來源域名：`strangerthings-quotes.vercel.app`
//! - 存取方式：HTTP GET，不需驗證
//! - 主要端點：`/api/quotes/{count}`，回傳 `[{"quote": ..., "author": ...}]`

use std::io::Write;

use url::Url;

use crate::{
    config::SETTINGS,
    logging,
    quote::{decode_quotes, Quote},
    util::http::{HttpTransport, Transport},
};

pub use error::{Diagnostic, FetchError};

pub mod error;

/// Fetches quotes from one endpoint through a `Transport`.
pub struct QuoteFetcher<T: Transport = HttpTransport> {
    endpoint: String,
    check_status: bool,
    transport: T,
}

impl QuoteFetcher<HttpTransport> {
    /// Builds a fetcher from `SETTINGS` using the real HTTP client.
    pub fn from_settings() -> Self {
        QuoteFetcher::new(
            SETTINGS.quotes.endpoint.clone(),
            SETTINGS.quotes.check_status,
            HttpTransport,
        )
    }
}

impl<T: Transport> QuoteFetcher<T> {
    pub fn new(endpoint: impl Into<String>, check_status: bool, transport: T) -> Self {
        QuoteFetcher {
            endpoint: endpoint.into(),
            check_status,
            transport,
        }
    }

    /// Performs one GET against the endpoint and decodes the body.
    ///
    /// An unparsable endpoint fails before any request is made. The status
    /// code is only looked at when `check_status` is set; otherwise any body
    /// goes to the decoder. A valid empty array is `Ok(vec![])`.
    pub async fn fetch(&self) -> Result<Vec<Quote>, FetchError> {
        let url = Url::parse(&self.endpoint).map_err(|source| FetchError::InvalidEndpoint {
            address: self.endpoint.clone(),
            source,
        })?;

        let payload = self.transport.get(url).await?;
        if self.check_status && !payload.status.is_success() {
            return Err(FetchError::Status(payload.status));
        }

        let quotes = decode_quotes(&payload.body)?;
        if quotes.is_empty() {
            return Ok(Vec::new());
        }

        Ok(quotes)
    }

    /// Like `fetch`, but reports a failure to `out` and returns an empty list.
    pub async fn visit<W: Write>(&self, out: &mut W) -> Vec<Quote> {
        match self.fetch().await {
            Ok(quotes) => quotes,
            Err(why) => {
                logging::error_file_async(format!(
                    "Failed to fetch quotes from {} because {:?}",
                    self.endpoint, why
                ));

                if let Err(e) = why.diagnostic().write_to(out) {
                    logging::error_console(format!("Failed to write diagnostic: {:?}", e));
                }

                Vec::new()
            }
        }
    }
}
