//! Installer download over HTTP(S).
//!
//! `Fetcher` is the seam between the update routine and the network;
//! `CurlFetcher` is the libcurl-backed implementation used by the CLI.

use std::io::{self, Write};
use std::str;
use std::time::Duration;

/// Download failure. Everything but `Storage` is a network problem.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Server answered 404: the requested version does not exist upstream.
    #[error("version not found at {url} (HTTP 404)")]
    NotFound { url: String },

    /// Any other non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Status { url: String, code: u32 },

    /// Connection, TLS, DNS or transfer failure reported by the transport.
    #[error("GET {url} failed: {reason}")]
    Transfer { url: String, reason: String },

    /// Body shorter or longer than the advertised Content-Length.
    #[error("GET {url} interrupted: received {received} of {expected} bytes")]
    Partial {
        url: String,
        expected: u64,
        received: u64,
    },

    /// Writing the body to the destination failed.
    #[error("writing response body: {source}")]
    Storage {
        #[source]
        source: io::Error,
    },
}

/// Streams the body of a GET on `url` into `dest`, returning the byte count.
pub trait Fetcher {
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64, FetchError>;
}

/// libcurl downloader: follows redirects, otherwise transport defaults.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    connect_timeout: Option<Duration>,
}

impl CurlFetcher {
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        Self { connect_timeout }
    }
}

fn transfer_error(url: &str, e: curl::Error) -> FetchError {
    FetchError::Transfer {
        url: url.to_string(),
        reason: e.to_string(),
    }
}

/// Map a non-2xx status to the matching error; `None` for success.
pub fn status_error(url: &str, code: u32) -> Option<FetchError> {
    match code {
        200..=299 => None,
        404 => Some(FetchError::NotFound {
            url: url.to_string(),
        }),
        _ => Some(FetchError::Status {
            url: url.to_string(),
            code,
        }),
    }
}

/// Tracks `Content-Length` of the last response in a redirect chain.
#[derive(Debug, Default)]
struct LengthTracker {
    content_length: Option<u64>,
}

impl LengthTracker {
    fn observe(&mut self, line: &str) {
        let line = line.trim();
        if line.starts_with("HTTP/") {
            // new response (redirect hop): previous length no longer applies
            self.content_length = None;
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                self.content_length = value.trim().parse::<u64>().ok();
            }
        }
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(|e| transfer_error(url, e))?;
        easy.follow_location(true)
            .map_err(|e| transfer_error(url, e))?;
        easy.max_redirections(10)
            .map_err(|e| transfer_error(url, e))?;
        if let Some(t) = self.connect_timeout {
            easy.connect_timeout(t)
                .map_err(|e| transfer_error(url, e))?;
        }

        let mut written = 0u64;
        let mut storage_err: Option<io::Error> = None;
        let mut lengths = LengthTracker::default();

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        lengths.observe(s);
                    }
                    true
                })
                .map_err(|e| transfer_error(url, e))?;
            transfer
                .write_function(|data| match dest.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        storage_err = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(|e| transfer_error(url, e))?;
            transfer.perform()
        };

        if let Some(source) = storage_err {
            return Err(FetchError::Storage { source });
        }
        performed.map_err(|e| transfer_error(url, e))?;

        let code = easy.response_code().map_err(|e| transfer_error(url, e))?;
        if let Some(err) = status_error(url, code) {
            return Err(err);
        }

        if let Some(expected) = lengths.content_length {
            if expected != written {
                return Err(FetchError::Partial {
                    url: url.to_string(),
                    expected,
                    received: written,
                });
            }
        }
        dest.flush().map_err(|source| FetchError::Storage { source })?;
        tracing::debug!(url, bytes = written, "download finished");
        Ok(written)
    }
}
