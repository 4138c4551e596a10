use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::StatusCode;
use snafu::{ensure, OptionExt, ResultExt};

use crate::auth::{fetch_token, Challenge};
use crate::models::{Credentials, HttpRequest, HttpResponse};
use crate::{error, Result};

/// A trait for sending a single http request. This is primarily implemented
/// to allow for ease of unittesting this crate.
#[async_trait]
pub(crate) trait Transport: Send + Sync + Debug {
    /// Send the request and read the whole response body
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Implements a simple transport using reqwest
#[derive(Debug, Default)]
pub struct SimpleTransport {
    client: reqwest::Client,
}

#[async_trait]
impl Transport for SimpleTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(creds) = request.basic_auth.as_ref() {
            builder = builder.basic_auth(&creds.username, Some(&creds.password));
        }
        let response = builder.send().await.context(error::RequestSnafu)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.context(error::RequestSnafu)?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Handle to the registry transport which answers bearer token challenges.
#[derive(Clone, Debug)]
pub struct RegistryClient {
    transport: Arc<dyn Transport>,
    credentials: Option<Credentials>,
}

impl RegistryClient {
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self::with_transport(Arc::new(SimpleTransport::default()), credentials)
    }

    pub(crate) fn with_transport(
        transport: Arc<dyn Transport>,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Send a request, and when the registry answers with a 401 challenge fetch a
    /// token from the challenge realm and send the request once more with it.
    /// Any other status, and the outcome of the second attempt, is returned as is.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = self.transport.send(&request).await?;
        trace!(target: "registry", "{} {}: {}", request.method, request.url, response.status);
        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let header = response
            .headers
            .get(WWW_AUTHENTICATE)
            .context(error::MissingAuthenticateHeaderSnafu {})?
            .to_str()
            .context(error::ImproperHeaderSnafu)?;
        ensure!(
            !header.trim().is_empty(),
            error::MissingAuthenticateHeaderSnafu {}
        );
        let challenge = Challenge::from_str(header)?;
        debug!(target: "registry", "{} {} requires {} authorization, realm: {}", request.method, request.url, challenge.scheme(), challenge.realm());

        let token = fetch_token(
            self.transport.as_ref(),
            &challenge,
            self.credentials.as_ref(),
        )
        .await
        .map_err(Box::new)
        .context(error::TokenExchangeSnafu)?;
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .context(error::InvalidTokenSnafu)?;

        let mut retry = request;
        retry.headers.insert(AUTHORIZATION, value);
        let response = self.transport.send(&retry).await?;
        trace!(target: "registry", "{} {} (authorized): {}", retry.method, retry.url, response.status);
        Ok(response)
    }
}
