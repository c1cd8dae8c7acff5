//! HTTP client wrapper

use std::time::Duration;

use cc_json::{ContractResolver, JsonSettings};
use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::HttpClientSettings;
use crate::error::HttpError;
use crate::headers::merge_headers;
use crate::request_ext::RequestExt;
use crate::response::{JsonOutcome, Response, ResponseExt};

/// HTTP client wrapper
///
/// Requests are built with [`HttpClient::request`], filled in with
/// [`crate::RequestExt`] and sent with [`HttpClient::execute`]. The client's
/// [`JsonSettings`] are the defaults of [`HttpClient::json_request`] and
/// [`HttpClient::read_json`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    json: JsonSettings,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
            json: JsonSettings::default(),
        }
    }

    /// Create a new HTTP client builder
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create an HTTP client from loaded settings
    pub fn from_settings(settings: &HttpClientSettings) -> Response<Self> {
        HttpClientBuilder::from_settings(settings).build()
    }

    /// Create an HttpClient from a reqwest::Client
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self {
            inner: client,
            json: JsonSettings::default(),
        }
    }

    /// Get the inner reqwest client
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// JSON settings used by [`HttpClient::json_request`] and
    /// [`HttpClient::read_json`]
    pub fn json_settings(&self) -> &JsonSettings {
        &self.json
    }

    /// Start an empty request
    pub fn request(&self, method: Method, url: &str) -> Response<reqwest::Request> {
        let url = Url::parse(url)?;
        Ok(reqwest::Request::new(method, url))
    }

    /// Send a request, returning the response whatever its status
    pub async fn execute(&self, request: reqwest::Request) -> Response<reqwest::Response> {
        tracing::debug!("Sending {} {}", request.method(), request.url());
        self.inner.execute(request).await.map_err(HttpError::from)
    }

    /// Start a request with a JSON body written with the client's settings
    pub fn json_request<T>(
        &self,
        method: Method,
        url: &str,
        value: Option<&T>,
        contract: Option<&dyn ContractResolver>,
    ) -> Response<reqwest::Request>
    where
        T: Serialize + ?Sized,
    {
        let mut request = self.request(method, url)?;
        request.set_json_body(value, contract, Some(&self.json))?;
        Ok(request)
    }

    /// Read a JSON response body with the client's settings
    pub async fn read_json<T>(&self, response: reqwest::Response) -> JsonOutcome<T>
    where
        T: DeserializeOwned + Default + Send + 'static,
    {
        response.deserialize_response(Some(&self.json)).await
    }
}

/// HTTP client builder for compression, TLS, timeout and default headers
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    compression: bool,
    tls12_only: bool,
    timeout: Option<Duration>,
    default_headers: HeaderMap,
    json: JsonSettings,
}

impl HttpClientBuilder {
    /// Builder preloaded from settings
    pub fn from_settings(settings: &HttpClientSettings) -> Self {
        let mut builder = Self::default()
            .compression(settings.compression)
            .tls12_only(settings.tls12_only)
            .default_headers(&settings.default_headers)
            .json_settings(settings.json.clone());
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
    }

    /// Decompress gzip and deflate responses automatically
    pub fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Refuse TLS versions older than 1.2
    pub fn tls12_only(mut self, enabled: bool) -> Self {
        self.tls12_only = enabled;
        self
    }

    /// Total timeout of each request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Headers sent with every request.
    ///
    /// Follows the same rules as [`crate::RequestExt::add_headers`]: blank
    /// entries are dropped and the first value of a name wins.
    pub fn default_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        merge_headers(&mut self.default_headers, headers);
        self
    }

    /// JSON settings the client writes and reads bodies with
    pub fn json_settings(mut self, settings: JsonSettings) -> Self {
        self.json = settings;
        self
    }

    /// Build the HTTP client
    pub fn build(self) -> Response<HttpClient> {
        let mut builder = reqwest::Client::builder()
            .gzip(self.compression)
            .deflate(self.compression)
            .default_headers(self.default_headers);

        if self.tls12_only {
            builder = builder.min_tls_version(reqwest::tls::Version::TLS_1_2);
        }

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(HttpError::from)?;
        Ok(HttpClient {
            inner: client,
            json: self.json,
        })
    }
}
