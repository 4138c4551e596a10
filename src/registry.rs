use crate::client::RegistryClient;
use crate::config::Config;
use crate::models::{HttpRequest, HttpResponse, TagList, DOCKER_MANIFEST_V2};
use crate::uri::RegistryUri;
use crate::{error, Result};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use snafu::{ensure, OptionExt, ResultExt};

const DIGEST_HEADER: &str = "docker-content-digest";

/// Represents a client to a specific registry.
/// Every request goes through this structure
#[derive(Clone, Debug)]
pub struct Registry {
    /// URI of the registry
    uri: RegistryUri,
    /// Registry client to use
    pub(crate) client: RegistryClient,
}

impl Registry {
    /// Create a registry client from the process configuration
    pub fn new(config: Config) -> Self {
        let client = RegistryClient::new(config.credentials().cloned());
        Self {
            uri: config.registry().clone(),
            client,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_client(uri: RegistryUri, client: RegistryClient) -> Self {
        Self { uri, client }
    }

    /// GET {uri}/v2/{repository}/tags/list
    pub async fn get_tags(&self, repository: &str) -> Result<Vec<String>> {
        let url = self.uri.join(&format!("/v2/{}/tags/list", repository))?;
        let response = self
            .client
            .execute(HttpRequest::new(Method::GET, url))
            .await?;
        trace!(target: "registry", "get_tags: {:?}", response);
        ensure!(
            response.status.is_success(),
            error::ListTagsSnafu {
                status: response.status,
                body: response.text(),
            }
        );
        let taglist: TagList = Self::body(&response)?;
        Ok(taglist.tags)
    }

    /// GET {uri}/v2/{repository}/manifests/{reference}, returning the
    /// Docker-Content-Digest of the schema 2 manifest
    pub async fn fetch_digest(&self, repository: &str, reference: &str) -> Result<String> {
        let url = self
            .uri
            .join(&format!("/v2/{}/manifests/{}", repository, reference))?;
        let mut request = HttpRequest::new(Method::GET, url);
        request
            .headers
            .insert(ACCEPT, HeaderValue::from_static(DOCKER_MANIFEST_V2));
        let response = self.client.execute(request).await?;
        trace!(target: "registry", "get_manifest: {:?}", response);
        ensure!(
            response.status.is_success(),
            error::FetchManifestSnafu {
                reference,
                status: response.status,
                body: response.text(),
            }
        );
        let digest = response
            .headers
            .get(DIGEST_HEADER)
            .map(|value| value.to_str())
            .transpose()
            .context(error::ImproperHeaderSnafu)?
            .filter(|digest| !digest.is_empty())
            .context(error::EmptyDigestSnafu { reference })?;
        debug!(target: "registry", "{}:{} resolved to {}", repository, reference, digest);
        Ok(digest.to_string())
    }

    /// DELETE {uri}/v2/{repository}/manifests/{reference}
    pub async fn delete_manifest(&self, repository: &str, reference: &str) -> Result<()> {
        let url = self
            .uri
            .join(&format!("/v2/{}/manifests/{}", repository, reference))?;
        let response = self
            .client
            .execute(HttpRequest::new(Method::DELETE, url))
            .await?;
        trace!(target: "registry", "del_manifest: {:?}", response);
        ensure!(
            response.status.is_success(),
            error::DeleteManifestSnafu {
                reference,
                status: response.status,
                body: response.text(),
            }
        );
        Ok(())
    }

    /// Handles deserialization of responses with proper logging
    pub(crate) fn body<T>(response: &HttpResponse) -> Result<T>
    where
        T: DeserializeOwned,
    {
        trace!(target: "registry", "RESPONSE BODY: {}", response.text());
        serde_json::from_slice(&response.body).context(error::BodyDeserializeSnafu)
    }
}
