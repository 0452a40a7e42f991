// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;
use std::io;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_URL: &str = "https://gutenberg.net.au/ebooks06/0604171.txt";

/// The pipeline is never started when acquisition fails
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("download of {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("download of {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{source_name} is empty")]
    Empty { source_name: String },
}

/// Where the document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSource::Url(url) => write!(f, "{}", url),
            TextSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl TextSource {
    pub async fn fetch(&self) -> Result<String, AcquisitionError> {
        match self {
            TextSource::Url(url) => fetch_url(url).await,
            TextSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| AcquisitionError::Io {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

async fn fetch_url(url: &str) -> Result<String, AcquisitionError> {
    let http_error = |source| AcquisitionError::Http {
        url: url.to_string(),
        source,
    };

    let response = reqwest::get(url).await.map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(AcquisitionError::Status {
            url: url.to_string(),
            status,
        });
    }

    let text = response.text().await.map_err(http_error)?;
    debug!(url, bytes = text.len(), "document downloaded");
    Ok(text)
}
