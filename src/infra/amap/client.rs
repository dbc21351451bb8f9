use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::observation::TrafficOutcome;
use crate::parser::{parse_poi_page, parse_traffic_response};
use crate::services::road_catalog::{PoiPage, RoadCatalog};
use crate::services::traffic_status::TrafficStatusApi;

const DEFAULT_BASE_URL: &str = "https://restapi.amap.com";

/// AMap place type code for city roads.
const ROAD_TYPE_CODE: &str = "1903";

/// Maximum page size accepted by the place-search endpoint.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Client for the AMap place-search and road traffic-status web services.
pub struct AmapClient<C = UrlParam<BasicClient>> {
    base_url: String,
    http: C,
}

impl AmapClient {
    /// Creates a client that sends `key` with every request and gives up on a
    /// request after `timeout`.
    pub fn new(key: String, timeout: Duration) -> Result<Self> {
        let http = UrlParam::new(BasicClient::with_timeout(timeout)?, "key", key);
        Ok(Self::with_http(DEFAULT_BASE_URL, http))
    }
}

impl<C: HttpClient> AmapClient<C> {
    pub fn with_http(base_url: &str, http: C) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[async_trait]
impl<C: HttpClient> RoadCatalog for AmapClient<C> {
    async fn fetch_page(&self, city: &str, keyword: &str, page: u32) -> Result<PoiPage> {
        let url = format!("{}/v3/place/text", self.base_url);
        let page_size = MAX_PAGE_SIZE.to_string();
        let page_number = page.to_string();

        let payload = fetch_json(
            &self.http,
            &url,
            &[
                ("keywords", keyword),
                ("city", city),
                ("types", ROAD_TYPE_CODE),
                ("offset", page_size.as_str()),
                ("page", page_number.as_str()),
            ],
        )
        .await
        .map_err(|e| anyhow::anyhow!("Road search request for page {} failed: {}", page, e))?;

        let result = parse_poi_page(&payload);
        debug!(page, names = result.names.len(), ok = result.ok, "Road search page fetched");
        Ok(result)
    }
}

#[async_trait]
impl<C: HttpClient> TrafficStatusApi for AmapClient<C> {
    async fn road_status(&self, city: &str, road_name: &str) -> TrafficOutcome {
        let url = format!("{}/v3/traffic/status/road", self.base_url);

        match fetch_json(
            &self.http,
            &url,
            &[("city", city), ("name", road_name), ("extensions", "all")],
        )
        .await
        {
            Ok(payload) => parse_traffic_response(&payload),
            Err(e) => TrafficOutcome::Failure(e.to_string()),
        }
    }
}
