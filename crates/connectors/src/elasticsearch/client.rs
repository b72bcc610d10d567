use crate::{
    adapter::ScrollClient,
    elasticsearch::{
        config::{Auth, ElasticsearchConfig},
        dsl::{clear_scroll_body, continue_scroll_body, keep_alive_param, open_scroll_body},
        response::parse_scroll_page,
    },
    error::AdapterError,
};
use async_trait::async_trait;
use model::pagination::scroll::{ScrollId, ScrollPage, ScrollRequest};
use reqwest::{RequestBuilder, Url, header::AUTHORIZATION};
use std::time::Duration;
use tracing::{debug, trace};

/// Scroll client speaking the Elasticsearch REST API.
#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    http: reqwest::Client,
    base: Url,
    auth: Auth,
}

impl ElasticsearchClient {
    pub fn new(config: ElasticsearchConfig) -> Result<Self, AdapterError> {
        let base = Url::parse(&config.url).map_err(|e| AdapterError::InvalidUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(AdapterError::InvalidUrl {
                url: config.url,
                reason: "not a base url".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base,
            auth: config.auth,
        })
    }

    /// `{base}/{indexes}[/{types}]/_search?scroll={keep_alive}`
    pub fn search_url(&self, request: &ScrollRequest) -> Result<Url, AdapterError> {
        let mut url = self.endpoint(&[])?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| self.invalid_base())?;
            segments.push(&request.indexes.join(","));
            if !request.types.is_empty() {
                segments.push(&request.types.join(","));
            }
            segments.push("_search");
        }
        url.query_pairs_mut()
            .append_pair("scroll", &keep_alive_param(request.keep_alive));
        Ok(url)
    }

    fn scroll_url(&self) -> Result<Url, AdapterError> {
        self.endpoint(&["_search", "scroll"])
    }

    fn endpoint(&self, path: &[&str]) -> Result<Url, AdapterError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| self.invalid_base())?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    fn invalid_base(&self) -> AdapterError {
        AdapterError::InvalidUrl {
            url: self.base.to_string(),
            reason: "not a base url".to_string(),
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Auth::None => builder,
            Auth::Basic { username, password } => builder.basic_auth(username, password.as_ref()),
            Auth::ApiKey(key) => builder.header(AUTHORIZATION, format!("ApiKey {key}")),
        }
    }

    async fn fetch_page(&self, builder: RequestBuilder) -> Result<ScrollPage, AdapterError> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        trace!(bytes = body.len(), "Received scroll page.");
        parse_scroll_page(&body)
    }
}

#[async_trait]
impl ScrollClient for ElasticsearchClient {
    async fn open_scroll(&self, request: &ScrollRequest) -> Result<ScrollPage, AdapterError> {
        let url = self.search_url(request)?;
        let body = open_scroll_body(request);
        debug!(url = %url, body = %body, "Opening scroll.");

        self.fetch_page(self.http.post(url).json(&body)).await
    }

    async fn continue_scroll(
        &self,
        scroll_id: &ScrollId,
        keep_alive: Duration,
    ) -> Result<ScrollPage, AdapterError> {
        let body = continue_scroll_body(scroll_id, keep_alive);
        self.fetch_page(self.http.post(self.scroll_url()?).json(&body))
            .await
    }

    async fn clear_scroll(&self, scroll_id: &ScrollId) -> Result<(), AdapterError> {
        let body = clear_scroll_body(scroll_id);
        let response = self
            .authorize(self.http.delete(self.scroll_url()?).json(&body))
            .send()
            .await?;

        let status = response.status();
        // 404: the context already expired on the cluster side.
        if status.is_success() || status.as_u16() == 404 {
            return Ok(());
        }
        Err(AdapterError::Status {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }

    fn name(&self) -> &str {
        self.base.host_str().unwrap_or("elasticsearch")
    }
}
