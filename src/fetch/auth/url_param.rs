use crate::fetch::client::HttpClient;
use async_trait::async_trait;

/// An [`HttpClient`] wrapper that appends an API key as a URL query parameter.
///
/// AMap web services expect the key as `key=<value>` on every request. Errors
/// are returned without their URL so the key never reaches logs or records.
pub struct UrlParam<C> {
    pub inner: C,
    pub param_name: String,
    pub key: String,
}

impl<C> UrlParam<C> {
    pub fn new(inner: C, param_name: &str, key: String) -> Self {
        Self {
            inner,
            param_name: param_name.to_string(),
            key,
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for UrlParam<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.url_mut()
            .query_pairs_mut()
            .append_pair(&self.param_name, &self.key);
        self.inner
            .execute(req)
            .await
            .map_err(reqwest::Error::without_url)
    }
}
