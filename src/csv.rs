//! CSV parsing for the image listing
//!
//! The listing is `url,title` with a header row. Titles may contain commas,
//! either quoted (`"love, hearts"`) or bare, in which case the extra fields
//! are glued back together.

use crate::constants::URL_SCHEMES;
use crate::types::ImageRecord;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Drop rows whose url does not start with a known scheme
    pub require_scheme: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            require_scheme: true,
        }
    }
}

/// Parsed records plus the number of data rows that were rejected
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub records: Vec<ImageRecord>,
    pub skipped: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowRejection {
    #[error("row has no url")]
    EmptyUrl,
    #[error("url has no recognized scheme: {0}")]
    MissingScheme(String),
}

/// Parse the raw listing. Malformed rows are skipped, never fatal.
pub fn parse(raw: &str, options: &ParseOptions) -> ParseOutcome {
    let mut lines = raw.lines().map(str::trim).filter(|l| !l.is_empty());
    let mut outcome = ParseOutcome::default();

    // Header content is never interpreted
    if lines.next().is_none() {
        return outcome;
    }

    for (row, line) in lines.enumerate() {
        match parse_row(line, options) {
            Ok(record) => outcome.records.push(record),
            Err(reason) => {
                debug!(row = row + 1, %reason, "Skipping CSV row");
                outcome.skipped += 1;
            }
        }
    }

    debug!(
        records = outcome.records.len(),
        skipped = outcome.skipped,
        "CSV parsed"
    );
    outcome
}

/// Turn one data line into a record
pub fn parse_row(line: &str, options: &ParseOptions) -> Result<ImageRecord, RowRejection> {
    let mut fields = split_fields(line).into_iter();
    let url = fields.next().unwrap_or_default().trim().to_string();
    if url.is_empty() {
        return Err(RowRejection::EmptyUrl);
    }
    if options.require_scheme && !has_scheme(&url) {
        return Err(RowRejection::MissingScheme(url));
    }

    let title = fields.collect::<Vec<_>>().join(",").trim().to_string();
    Ok(ImageRecord { url, title })
}

/// Split a line on commas that are not inside double quotes.
///
/// Quote characters toggle the quoted state and are dropped; a doubled quote
/// inside a quoted section stands for one literal quote.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn has_scheme(url: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| {
        url.len() >= scheme.len()
            && url.as_bytes()[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_default(raw: &str) -> ParseOutcome {
        parse(raw, &ParseOptions::default())
    }

    #[test]
    fn quoted_comma_stays_in_title() {
        let out = parse_default("url,title\nhttps://x/1.jpg,\"love, hearts\"\n");
        assert_eq!(
            out.records,
            vec![ImageRecord::new("https://x/1.jpg", "love, hearts")]
        );
    }

    #[test]
    fn bare_commas_are_rejoined() {
        let out = parse_default("url,title\nhttps://x/1.jpg,red,pink, and white\n");
        assert_eq!(out.records[0].title, "red,pink, and white");
    }

    #[test]
    fn header_only_yields_nothing() {
        let out = parse_default("url,title\n");
        assert!(out.records.is_empty());
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(parse_default("").records.is_empty());
        assert!(parse_default("  \n\r\n \n").records.is_empty());
    }

    #[test]
    fn crlf_and_blank_lines_are_ignored() {
        let raw = "url,title\r\n\r\nhttps://a/1.png,One\r\n   \r\nhttps://a/2.png,Two\r\n";
        let out = parse_default(raw);
        let titles: Vec<_> = out.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two"]);
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn header_is_first_non_blank_line() {
        let out = parse_default("\n\n  \nhttps://header/looks/like/data.png,nope\nhttps://a/1.png,One");
        assert_eq!(out.records, vec![ImageRecord::new("https://a/1.png", "One")]);
    }

    #[test]
    fn rows_without_url_are_skipped() {
        let raw = "url,title\n,orphan title\nhttps://a/1.png,One\n\"\",quoted empty\n";
        let out = parse_default(raw);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.skipped, 2);
    }

    #[test]
    fn scheme_check_can_be_disabled() {
        let raw = "url,title\nftp://a/1.png,One\n/local/2.png,Two\nHTTPS://a/3.png,Three\n";

        let strict = parse_default(raw);
        assert_eq!(strict.records.len(), 1);
        assert_eq!(strict.records[0].url, "HTTPS://a/3.png");
        assert_eq!(strict.skipped, 2);

        let lax = parse(raw, &ParseOptions { require_scheme: false });
        assert_eq!(lax.records.len(), 3);
    }

    #[test]
    fn url_only_row_has_empty_title() {
        let out = parse_default("url,title\nhttps://a/1.png\n");
        assert_eq!(out.records, vec![ImageRecord::new("https://a/1.png", "")]);
    }

    #[test]
    fn output_is_never_longer_than_data_lines() {
        let raw = "h\nhttps://a/1.png,a\nnot-a-url,b\nhttps://a/2.png,c\n,d\n";
        let data_lines = raw.lines().filter(|l| !l.trim().is_empty()).count() - 1;
        let out = parse_default(raw);
        assert!(out.records.len() < data_lines);
        assert_eq!(out.records.len() + out.skipped, data_lines);
    }

    #[test]
    fn order_is_preserved_and_duplicates_kept() {
        let raw = "h\nhttps://a/2.png,b\nhttps://a/1.png,a\nhttps://a/2.png,b\n";
        let urls: Vec<_> = parse_default(raw)
            .records
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, ["https://a/2.png", "https://a/1.png", "https://a/2.png"]);
    }

    #[test]
    fn split_fields_handles_quotes() {
        assert_eq!(split_fields("a,\"b,c\",d"), ["a", "b,c", "d"]);
        assert_eq!(split_fields("a,\"say \"\"hi\"\"\""), ["a", "say \"hi\""]);
        assert_eq!(split_fields("a,,"), ["a", "", ""]);
        assert_eq!(split_fields(""), [""]);
    }

    #[test]
    fn unterminated_quote_swallows_rest_of_line() {
        assert_eq!(split_fields("a,\"b,c"), ["a", "b,c"]);
    }
}
