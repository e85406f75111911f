//! Catalog retrieval: fetch the CSV text for a configured source and parse it

use crate::csv::{self, ParseOptions, ParseOutcome};
use crate::types::CatalogSource;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Anything that makes a load attempt fail. All variants are fatal to the
/// attempt and surface as one message to the user.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("part template has no {{n}} placeholder: {0}")]
    BadTemplate(String),
    #[error("catalog payload is empty")]
    EmptyPayload,
    #[error("no valid records ({skipped} rows rejected)")]
    NoRecords { skipped: usize },
}

/// Fetch, parse and validate the catalog for `source`
pub async fn load(
    client: &reqwest::Client,
    source: &CatalogSource,
    options: &ParseOptions,
) -> Result<ParseOutcome, LoadError> {
    info!(source = %source.describe(), "Loading catalog");
    let text = fetch_text(client, source).await?;
    records_from_text(&text, options)
}

/// Parse a payload, rejecting empty input and listings without usable rows
pub fn records_from_text(text: &str, options: &ParseOptions) -> Result<ParseOutcome, LoadError> {
    if text.trim().is_empty() {
        return Err(LoadError::EmptyPayload);
    }
    let outcome = csv::parse(text, options);
    if outcome.records.is_empty() {
        return Err(LoadError::NoRecords {
            skipped: outcome.skipped,
        });
    }
    if outcome.skipped > 0 {
        warn!(skipped = outcome.skipped, "Some CSV rows were rejected");
    }
    Ok(outcome)
}

pub async fn fetch_text(
    client: &reqwest::Client,
    source: &CatalogSource,
) -> Result<String, LoadError> {
    match source {
        CatalogSource::Url { url } => fetch_url(client, url).await,
        CatalogSource::Parts {
            url_template,
            count,
        } => {
            let urls = part_urls(url_template, *count)?;
            let mut parts = Vec::with_capacity(urls.len());
            // Sequential on purpose: parts are concatenated in order
            for url in &urls {
                parts.push(fetch_url(client, url).await?);
            }
            Ok(concat_parts(&parts))
        }
        CatalogSource::File { path } => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
    }
}

async fn fetch_url(client: &reqwest::Client, url: &str) -> Result<String, LoadError> {
    let request_err = |source| LoadError::Request {
        url: url.to_string(),
        source,
    };
    let response = client.get(url).send().await.map_err(request_err)?;
    let status = response.status();
    debug!(url, status = %status, "Catalog response received");
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status,
        });
    }
    response.text().await.map_err(request_err)
}

/// Expand `{n}` in the template to 1..=count
pub fn part_urls(template: &str, count: usize) -> Result<Vec<String>, LoadError> {
    if !template.contains("{n}") {
        return Err(LoadError::BadTemplate(template.to_string()));
    }
    Ok((1..=count)
        .map(|n| template.replace("{n}", &n.to_string()))
        .collect())
}

/// Join CSV parts, keeping the header of the first part only
pub fn concat_parts(parts: &[String]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        let body = if i == 0 {
            part.as_str()
        } else {
            part.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
        };
        if body.is_empty() {
            continue;
        }
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(body);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_urls_are_numbered_from_one() {
        let urls = part_urls("https://host/images{n}.csv", 3).unwrap();
        assert_eq!(
            urls,
            [
                "https://host/images1.csv",
                "https://host/images2.csv",
                "https://host/images3.csv"
            ]
        );
        assert!(part_urls("https://host/images.csv", 3).is_err());
    }

    #[test]
    fn concat_keeps_only_first_header() {
        let parts = vec![
            "url,title\nhttps://a/1.png,One".to_string(),
            "url,title\r\nhttps://a/2.png,Two\n".to_string(),
            "url,title".to_string(),
            "url,title\nhttps://a/3.png,Three\n".to_string(),
        ];
        let joined = concat_parts(&parts);
        assert_eq!(joined.matches("url,title").count(), 1);

        let out = csv::parse(&joined, &ParseOptions::default());
        let titles: Vec<_> = out.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two", "Three"]);
    }

    #[test]
    fn empty_payload_is_rejected() {
        let opts = ParseOptions::default();
        assert!(matches!(records_from_text("", &opts), Err(LoadError::EmptyPayload)));
        assert!(matches!(
            records_from_text(" \n\t\n", &opts),
            Err(LoadError::EmptyPayload)
        ));
    }

    #[test]
    fn header_only_has_no_records() {
        let result = records_from_text("url,title\n", &ParseOptions::default());
        assert!(matches!(result, Err(LoadError::NoRecords { skipped: 0 })));
    }

    #[test]
    fn all_rejected_rows_fail_the_load() {
        let result = records_from_text("url,title\n,a\nnope,b\n", &ParseOptions::default());
        assert!(matches!(result, Err(LoadError::NoRecords { skipped: 2 })));
    }

    #[test]
    fn partial_rows_still_load() {
        let out = records_from_text("url,title\n,a\nhttps://a/1.png,b\n", &ParseOptions::default())
            .unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.skipped, 1);
    }

    #[tokio::test]
    async fn file_source_reads_local_csv() {
        let path = std::env::temp_dir().join(format!(
            "lovelystock-source-test-{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, "url,title\nhttps://a/1.png,\"love, hearts\"\n").unwrap();

        let source = CatalogSource::File {
            path: path.to_string_lossy().to_string(),
        };
        let client = reqwest::Client::new();
        let out = load(&client, &source, &ParseOptions::default()).await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].title, "love, hearts");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = CatalogSource::File {
            path: "/definitely/not/here/images.csv".to_string(),
        };
        let client = reqwest::Client::new();
        let result = load(&client, &source, &ParseOptions::default()).await;
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
