//! HTTP plumbing shared by the provider clients.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, bail};
use reqwest::Url;

/// Issues a GET request for `url` with `params` appended to the query string
/// and decodes the response body as JSON.
pub async fn fetch_json<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
    params: &[(&str, &str)],
) -> Result<serde_json::Value> {
    let url = Url::parse_with_params(url, params)?;
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("request failed with status {}: {}", status, body);
    }
    // The response URL may carry credentials added by an auth wrapper.
    Ok(resp.json().await.map_err(reqwest::Error::without_url)?)
}
