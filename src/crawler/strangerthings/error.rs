use std::io::{self, Write};

use reqwest::StatusCode;
use thiserror::Error;

/// Headline printed when the request or the decode did not succeed.
pub const RETRIEVE_FAILED: &str =
    "Count not retrieve data from endpoint, or could not decode data.";
/// Headline printed when the endpoint is not a usable URL.
pub const INVALID_ADDRESS: &str = "Invalid address";
const SEPARATOR: &str = "----";

/// Ways a quote fetch can fail.
///
/// An empty but well-formed response is not an error.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The configured endpoint could not be parsed into a URL.
    #[error("invalid endpoint {address}: {source}")]
    InvalidEndpoint {
        address: String,
        #[source]
        source: url::ParseError,
    },

    /// DNS, connect, TLS or body read failure.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),

    /// The body was not a JSON array of quote objects.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// Non-2xx answer, only raised when status checking is enabled.
    #[error("the endpoint answered {0}")]
    Status(StatusCode),
}

impl FetchError {
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            FetchError::InvalidEndpoint { .. } => Diagnostic {
                headline: INVALID_ADDRESS,
                detail: None,
            },
            // `{:#}` 會把底層原因一併印出，例如 Connection refused
            FetchError::Transport(why) => Diagnostic {
                headline: RETRIEVE_FAILED,
                detail: Some(format!("{:#}", why)),
            },
            _ => Diagnostic {
                headline: RETRIEVE_FAILED,
                detail: Some(self.to_string()),
            },
        }
    }
}

/// User facing report of a `FetchError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub headline: &'static str,
    pub detail: Option<String>,
}

impl Diagnostic {
    /// Writes the headline, then a `----` rule and the detail if there is one.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.headline)?;
        if let Some(detail) = &self.detail {
            writeln!(out, "{}", SEPARATOR)?;
            writeln!(out, "{}", detail)?;
        }

        Ok(())
    }
}
