//! Downloads the guild sheet as CSV and materializes the parser's grid.
//!
//! The sheet only needs to be shared as "anyone with the link can view";
//! the CSV export endpoint requires no credentials.

use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::util::version::user_agent;

#[derive(Debug, Error)]
pub enum SheetFetchError {
    #[error("not a recognizable sheet share URL: {0}")]
    UnrecognizedUrl(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    BuildClient(String),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Document id: the path segment following "/d/" in the share URL.
pub fn extract_sheet_id(share_url: &str) -> Option<String> {
    let url = Url::parse(share_url).ok()?;
    let mut segments = url.path_segments()?;
    while let Some(segment) = segments.next() {
        if segment == "d" {
            return segments
                .next()
                .filter(|id| !id.is_empty())
                .map(str::to_string);
        }
    }
    None
}

/// Tab id from the query or fragment; sheets default to tab "0".
pub fn extract_gid(share_url: &str) -> String {
    if let Ok(url) = Url::parse(share_url) {
        if let Some((_, value)) = url.query_pairs().find(|(key, _)| key == "gid") {
            return value.into_owned();
        }
        if let Some(rest) = url.fragment().and_then(|f| f.split("gid=").nth(1)) {
            let digits: String = rest.chars().take_while(|ch| ch.is_ascii_digit()).collect();
            if !digits.is_empty() {
                return digits;
            }
        }
    }
    "0".to_string()
}

/// CSV export endpoint for a publicly shared sheet.
pub fn csv_export_url(share_url: &str) -> Result<Url, SheetFetchError> {
    let sheet_id = extract_sheet_id(share_url)
        .ok_or_else(|| SheetFetchError::UnrecognizedUrl(share_url.to_string()))?;
    let gid = extract_gid(share_url);
    let export =
        format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv&gid={gid}");
    Ok(Url::parse(&export)?)
}

/// Download the sheet and return its raw cell grid.
pub async fn fetch_sheet_grid(share_url: &str) -> Result<Vec<Vec<String>>, SheetFetchError> {
    let url = csv_export_url(share_url)?;
    let client = Client::builder()
        .user_agent(user_agent())
        .build()
        .map_err(|error| SheetFetchError::BuildClient(error.to_string()))?;
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(split_csv(&body))
}

/// Minimal RFC 4180 splitter: quoted cells, doubled quotes, CRLF rows.
pub fn split_csv(body: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                cell.push(ch);
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            _ => cell.push(ch),
        }
    }
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }
    rows
}
