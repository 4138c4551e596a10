use snafu::ResultExt;

use crate::error;
use crate::registry::Registry;
use crate::uri::Reference;

/// Represents a single repository in a registry and handles
/// all repository wide operations
pub struct Repository {
    pub registry: Registry,
    pub name: String,
}

impl Repository {
    /// Create a handler to a given repository in a registry
    pub fn new(registry: &Registry, name: &str) -> Self {
        Self {
            registry: registry.clone(),
            name: name.to_string(),
        }
    }

    /// List all the tags in this repository
    pub async fn tags(&self) -> crate::Result<Vec<String>> {
        self.registry.get_tags(&self.name).await
    }

    /// Resolve a reference to the digest of its manifest. Digests are returned
    /// untouched without asking the registry.
    pub async fn digest(&self, reference: &Reference) -> crate::Result<String> {
        match reference {
            Reference::Digest(digest) => Ok(digest.clone()),
            Reference::Tag(tag) => self
                .registry
                .fetch_digest(&self.name, tag)
                .await
                .map_err(Box::new)
                .context(error::ResolveTagSnafu { tag }),
        }
    }

    /// Delete the manifest a reference points to, returning the digest that was deleted
    pub async fn delete(&self, reference: &Reference) -> crate::Result<String> {
        let digest = self.digest(reference).await?;
        self.registry.delete_manifest(&self.name, &digest).await?;
        info!(target: "registry", "deleted {}@{}", self.name, digest);
        Ok(digest)
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use std::sync::Arc;

    use reqwest::{Method, StatusCode};

    use super::Repository;
    use crate::client::test::MockTransport;
    use crate::client::RegistryClient;
    use crate::error::Error;
    use crate::registry::Registry;
    use crate::uri::{Reference, RegistryUri};

    fn repository(transport: &Arc<MockTransport>) -> Repository {
        let registry = Registry::with_client(
            RegistryUri::from_str("https://registry.example").unwrap(),
            RegistryClient::with_transport(transport.clone(), None),
        );
        Repository::new(&registry, "myorg/app")
    }

    #[tokio::test]
    async fn test_delete_tag_resolves_digest() {
        let transport = Arc::new(MockTransport::new(vec![
            MockTransport::response(
                StatusCode::OK,
                &[("docker-content-digest", "sha256:deadbeef")],
                "{}",
            ),
            MockTransport::response(StatusCode::ACCEPTED, &[], ""),
        ]));
        let digest = repository(&transport)
            .delete(&Reference::classify("v1"))
            .await
            .unwrap();
        assert_eq!(digest, "sha256:deadbeef");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(
            requests[0].url.as_str(),
            "https://registry.example/v2/myorg/app/manifests/v1"
        );
        assert_eq!(requests[1].method, Method::DELETE);
        assert_eq!(
            requests[1].url.as_str(),
            "https://registry.example/v2/myorg/app/manifests/sha256:deadbeef"
        );
    }

    #[tokio::test]
    async fn test_delete_digest_skips_resolution() {
        let transport = Arc::new(MockTransport::new(vec![MockTransport::response(
            StatusCode::ACCEPTED,
            &[],
            "",
        )]));
        let digest = repository(&transport)
            .delete(&Reference::classify("sha256:deadbeef"))
            .await
            .unwrap();
        assert_eq!(digest, "sha256:deadbeef");
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::DELETE);
    }

    #[tokio::test]
    async fn test_delete_unresolvable_tag() {
        let transport = Arc::new(MockTransport::new(vec![MockTransport::json(
            StatusCode::NOT_FOUND,
            r#"{"errors":[{"code":"MANIFEST_UNKNOWN"}]}"#,
        )]));
        let result = repository(&transport)
            .delete(&Reference::classify("v9"))
            .await;
        match result {
            Err(Error::ResolveTag { tag, source }) => {
                assert_eq!(tag, "v9");
                assert!(matches!(*source, Error::FetchManifest { .. }));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_tags() {
        let transport = Arc::new(MockTransport::new(vec![MockTransport::json(
            StatusCode::OK,
            r#"{"name":"myorg/app","tags":["v1","v2"]}"#,
        )]));
        let tags = repository(&transport).tags().await.unwrap();
        assert_eq!(tags, vec!["v1", "v2"]);
    }
}
