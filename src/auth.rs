use std::collections::HashMap;
use std::str::FromStr;

use reqwest::Method;
use snafu::{ensure, OptionExt, ResultExt};
use url::Url;

use crate::client::Transport;
use crate::models::{Credentials, HttpRequest, TokenResponse};
use crate::{error, Result};

/// A parsed `WWW-Authenticate` challenge, for example
/// `Bearer realm="https://auth.docker.io/token",service="registry.docker.io",scope="repository:library/nginx:pull"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    scheme: String,
    params: HashMap<String, String>,
}

impl Challenge {
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Value of a parameter, empty when the challenge did not carry it
    pub fn get(&self, key: &str) -> &str {
        self.params.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn realm(&self) -> &str {
        self.get("realm")
    }

    pub fn service(&self) -> &str {
        self.get("service")
    }

    pub fn scope(&self) -> &str {
        self.get("scope")
    }
}

impl FromStr for Challenge {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (scheme, rest) = s
            .trim()
            .split_once(' ')
            .context(error::MalformedChallengeSnafu {
                header: s,
                reason: "no space between scheme and parameters",
            })?;
        let mut params = HashMap::new();
        for part in split_params(rest) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (key, value) = part
                .split_once('=')
                .context(error::MalformedChallengeSnafu {
                    header: s,
                    reason: format!("parameter '{part}' has no value"),
                })?;
            let key = key.trim();
            ensure!(
                !key.is_empty(),
                error::MalformedChallengeSnafu {
                    header: s,
                    reason: format!("parameter '{part}' has no name"),
                }
            );
            let value = value.trim().trim_matches(|c| c == '"' || c == ',');
            params.insert(key.to_string(), value.to_string());
        }
        Ok(Self {
            scheme: scheme.to_string(),
            params,
        })
    }
}

/// Split challenge parameters on commas that are not inside a quoted value,
/// so scopes such as `repository:a/b:pull,push` stay whole.
fn split_params(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    for (index, c) in input.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                parts.push(&input[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Exchange the challenge for a bearer token at its realm.
///
/// The realm answer is read permissively: a body without a usable token yields
/// an empty token, and the retried request then fails with the registry's own
/// status.
pub(crate) async fn fetch_token(
    transport: &dyn Transport,
    challenge: &Challenge,
    credentials: Option<&Credentials>,
) -> Result<String> {
    let realm = challenge.realm();
    let url = Url::parse(realm).context(error::InvalidRealmSnafu { realm })?;
    let mut request = HttpRequest::new(Method::GET, url);
    for (key, value) in [("scope", challenge.scope()), ("service", challenge.service())] {
        if !value.is_empty() {
            request.query.push((key.to_string(), value.to_string()));
        }
    }
    request.basic_auth = credentials.cloned();
    debug!(target: "auth", "requesting token from {} (scope: '{}', service: '{}')", realm, challenge.scope(), challenge.service());

    let response = transport.send(&request).await?;
    trace!(target: "auth", "token response status: {}", response.status);
    match serde_json::from_slice::<TokenResponse>(&response.body) {
        Ok(body) => Ok(body.into_token().unwrap_or_else(|| {
            warn!(target: "auth", "token realm {} returned no token", realm);
            String::new()
        })),
        Err(e) => {
            warn!(target: "auth", "token realm {} returned an unreadable body: {}", realm, e);
            Ok(String::new())
        }
    }
}
