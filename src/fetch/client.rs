use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request. Wrappers such as
/// [`UrlParam`](crate::fetch::auth::UrlParam) decorate another client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
