//! Multi-request HTTP client
//!
//! Issues a batch of named requests concurrently and hands back the status
//! and body of each. Deciding what a non-200 status means is left to the
//! caller.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{redirect, Client, Method};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::FetchOptions;
use crate::error::FetchError;

/// One named request
#[derive(Debug, Clone)]
pub struct Request {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: vec![],
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Status code and body of a finished request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    /// Body of a 200 response
    pub fn ok_body(&self) -> Option<&str> {
        (self.status == 200).then_some(self.body.as_str())
    }
}

/// Async HTTP client built from `FetchOptions`
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&options.accept) {
            Ok(accept) => {
                headers.insert(ACCEPT, accept);
            }
            Err(_) => warn!(accept = %options.accept, "dropping invalid accept header"),
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .user_agent(options.user_agent.as_str())
            .default_headers(headers)
            .redirect(redirect::Policy::limited(options.max_redirects))
            .build()?;

        Ok(Self { client })
    }

    /// Send one request
    pub async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => builder = builder.header(name, value),
                _ => warn!(header = %name, "dropping invalid header"),
            }
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(url = %request.url, status, bytes = body.len(), "fetched");

        Ok(Response { status, body })
    }

    /// Send every request concurrently, keyed by request name
    pub async fn request(
        &self,
        requests: Vec<(String, Request)>,
    ) -> HashMap<String, Result<Response, FetchError>> {
        let pending = requests.into_iter().map(|(name, request)| async move {
            let result = self.fetch(&request).await;
            if let Err(e) = &result {
                warn!(request = %name, url = %request.url, error = %e, "request failed");
            }
            (name, result)
        });

        futures::future::join_all(pending).await.into_iter().collect()
    }
}
