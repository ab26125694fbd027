//! Loading student results from CSV/JSON files or the results backend.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes};
use crate::results::types::StudentResult;

/// Backend payloads come either as a bare array or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ResultsPayload {
    List(Vec<StudentResult>),
    Wrapped {
        #[serde(alias = "resultados", alias = "data")]
        results: Vec<StudentResult>,
    },
}

/// Deserializes CSV rows with a header line.
pub fn parse_results_csv<R: Read>(reader: R) -> Result<Vec<StudentResult>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        let record: StudentResult =
            result.with_context(|| format!("invalid results row {}", line + 1))?;
        rows.push(record);
    }

    Ok(rows)
}

pub fn parse_results_json(bytes: &[u8]) -> Result<Vec<StudentResult>> {
    let payload: ResultsPayload =
        serde_json::from_slice(bytes).context("invalid results JSON payload")?;
    Ok(match payload {
        ResultsPayload::List(rows) => rows,
        ResultsPayload::Wrapped { results } => results,
    })
}

/// Fetches a JSON results payload through any [`HttpClient`].
pub async fn fetch_results<C: HttpClient>(client: &C, url: &str) -> Result<Vec<StudentResult>> {
    let bytes = fetch_bytes(client, url).await?;
    parse_results_json(&bytes)
}

/// Loads results from a local `.csv`/`.json` file or an `http(s)` URL.
///
/// URLs are fetched with `Authorization: Bearer <api_token>` when a token is given.
#[tracing::instrument(skip(api_token))]
pub async fn load_results(source: &str, api_token: Option<&str>) -> Result<Vec<StudentResult>> {
    let rows = if source.starts_with("http://") || source.starts_with("https://") {
        let client = BasicClient::new()?;
        match api_token {
            Some(token) => fetch_results(&ApiKey::bearer(client, token)?, source).await?,
            None => fetch_results(&client, source).await?,
        }
    } else {
        load_results_file(Path::new(source))?
    };

    info!(rows = rows.len(), "Results loaded");
    Ok(rows)
}

fn load_results_file(path: &Path) -> Result<Vec<StudentResult>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    debug!(path = %path.display(), is_json, "Reading results file");

    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if is_json {
        parse_results_json(&bytes)
    } else {
        parse_results_csv(bytes.as_slice())
    }
}
