use reqwest::header::{InvalidHeaderValue, ToStrError};
use reqwest::StatusCode;
use snafu::Snafu;

use crate::config::ConfigBuilderError;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("failed to deserialize response body: {source}"))]
    BodyDeserialize { source: serde_json::Error },
    #[snafu(display("invalid client configuration: {source}"))]
    Config { source: ConfigBuilderError },
    #[snafu(display("failed to delete manifest '{reference}': registry returned {status}: {body}"))]
    DeleteManifest {
        reference: String,
        status: StatusCode,
        body: String,
    },
    #[snafu(display("registry returned an empty digest for '{reference}'"))]
    EmptyDigest { reference: String },
    #[snafu(display("failed to fetch manifest '{reference}': registry returned {status}: {body}"))]
    FetchManifest {
        reference: String,
        status: StatusCode,
        body: String,
    },
    #[snafu(display("registry did not return a proper header: {source}"))]
    ImproperHeader { source: ToStrError },
    #[snafu(display("invalid token realm '{realm}': {source}"))]
    InvalidRealm {
        realm: String,
        source: url::ParseError,
    },
    #[snafu(display("token cannot be used as an authorization header: {source}"))]
    InvalidToken { source: InvalidHeaderValue },
    #[snafu(display("failed to list tags in repository: registry returned {status}: {body}"))]
    ListTags { status: StatusCode, body: String },
    #[snafu(display("malformed authenticate challenge '{header}': {reason}"))]
    MalformedChallenge { header: String, reason: String },
    #[snafu(display("malformed registry uri provided: {reason}"))]
    MalformedUri { reason: String },
    #[snafu(display("no registry provided, pass --registry or set REGISTRY"))]
    MissingRegistry,
    #[snafu(display("registry answered 401 without a www-authenticate header"))]
    MissingAuthenticateHeader,
    #[snafu(display("failed to make request to registry: {source}"))]
    Request { source: reqwest::Error },
    #[snafu(display("cannot retrieve tag digest for '{tag}': {source}"))]
    ResolveTag { tag: String, source: Box<Error> },
    #[snafu(display("cannot retrieve token: {source}"))]
    TokenExchange { source: Box<Error> },
    #[snafu(display("invalid url detected: {source}"))]
    Url { source: url::ParseError },
}
