use snafu::{ensure, ResultExt};
use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;
use url::Url;

use crate::error;

/// Uri to the root of a registry's v2 api, eg. `https://index.docker.io`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryUri {
    base: Url,
}

impl RegistryUri {
    /// Build the url of an api path such as `/v2/{repository}/tags/list`,
    /// keeping any path prefix of the base url.
    pub fn join(&self, path: &str) -> crate::Result<Url> {
        Url::parse(&format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
        .context(error::UrlSnafu)
    }
}

impl FromStr for RegistryUri {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let base = Url::parse(s).context(error::UrlSnafu)?;
        ensure!(
            matches!(base.scheme(), "http" | "https"),
            error::MalformedUriSnafu {
                reason: format!("unsupported scheme '{}'", base.scheme()),
            }
        );
        ensure!(
            base.host_str().is_some_and(|host| !host.is_empty()),
            error::MalformedUriSnafu {
                reason: "no host was provided",
            }
        );
        Ok(Self { base })
    }
}

impl fmt::Display for RegistryUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str().trim_end_matches('/'))
    }
}

const DIGEST_PREFIX: &str = "sha256:";

/// Represents a reference to a manifest via a tag or digest.
/// A reference is a digest exactly when it starts with `sha256:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Tag(String),
    Digest(String),
}

impl Reference {
    pub fn classify(s: &str) -> Self {
        if s.starts_with(DIGEST_PREFIX) {
            Self::Digest(s.to_string())
        } else {
            Self::Tag(s.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Tag(tag) => tag,
            Self::Digest(digest) => digest,
        }
    }
}

impl FromStr for Reference {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::classify(s))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use crate::error::Error;

    #[test]
    fn test_registry_from_str() {
        let registry = super::RegistryUri::from_str("https://index.docker.io").unwrap();
        assert_eq!(registry.to_string(), "https://index.docker.io");
        let registry = super::RegistryUri::from_str("http://localhost:5000/").unwrap();
        assert_eq!(registry.to_string(), "http://localhost:5000");
        assert_eq!(
            registry.join("/v2/").unwrap().as_str(),
            "http://localhost:5000/v2/"
        );
    }

    #[test]
    fn test_registry_from_str_invalid() {
        assert!(matches!(
            super::RegistryUri::from_str("localhost:5000"),
            Err(Error::MalformedUri { .. })
        ));
        assert!(matches!(
            super::RegistryUri::from_str("registry.example"),
            Err(Error::Url { .. })
        ));
        assert!(matches!(
            super::RegistryUri::from_str("ftp://registry.example"),
            Err(Error::MalformedUri { .. })
        ));
    }

    #[test]
    fn test_registry_join() {
        let registry = super::RegistryUri::from_str("https://registry.example").unwrap();
        let url = registry.join("/v2/myorg/app/tags/list").unwrap();
        assert_eq!(url.as_str(), "https://registry.example/v2/myorg/app/tags/list");
        let registry = super::RegistryUri::from_str("https://registry.example/mirror/").unwrap();
        let url = registry.join("/v2/myorg/app/manifests/v1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://registry.example/mirror/v2/myorg/app/manifests/v1"
        );
    }

    #[test]
    fn test_reference_classify() {
        assert_eq!(
            super::Reference::classify("sha256:abc123"),
            super::Reference::Digest("sha256:abc123".to_string())
        );
        assert_eq!(
            super::Reference::classify("v1.2.3"),
            super::Reference::Tag("v1.2.3".to_string())
        );
        assert_eq!(
            super::Reference::classify("latest"),
            super::Reference::Tag("latest".to_string())
        );
        // only the literal lowercase prefix counts
        assert!(matches!(super::Reference::classify("SHA256:abc"), super::Reference::Tag(_)));
        assert!(matches!(super::Reference::classify("sha256"), super::Reference::Tag(_)));
        assert!(matches!(super::Reference::classify("sha512:abc"), super::Reference::Tag(_)));
        assert!(matches!(super::Reference::classify("sha256:"), super::Reference::Digest(_)));
    }

    #[test]
    fn test_reference_to_string() {
        let reference = super::Reference::from_str("latest").unwrap();
        assert_eq!(reference.to_string(), "latest");
        let reference = super::Reference::from_str("sha256:deadbeef").unwrap();
        assert_eq!(reference.to_string(), "sha256:deadbeef");
    }
}
