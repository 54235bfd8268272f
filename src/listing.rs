use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    time::Duration,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, trace};
use reqwest::{blocking::Client, header::AUTHORIZATION, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::model::{FetchParams, RepositoryDescriptor};

#[cfg(test)]
use mockall::automock;

pub const DEFAULT_HOST: &str = "https://dev.azure.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_VERSION: &str = "6.0";
const CONTINUATION_HEADER: &str = "x-ms-continuationtoken";

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Failed to fetch repositories: HTTP {status}")]
    ConnectionFailure { status: u16 },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid service host `{host}`: {reason}")]
    InvalidHost { host: String, reason: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown token encoding `{0}`, expected `raw` or `pat`")]
pub struct TokenEncodingError(String);

/// How the configured token becomes the `Authorization: Basic` credential.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Default, Deserialize)]
pub enum TokenEncoding {
    /// The token is sent as-is; the caller is expected to have encoded it already.
    #[default]
    #[serde(rename = "raw")]
    Raw,
    /// The token is a personal access token and is sent as base64 of `:<token>`.
    #[serde(rename = "pat")]
    Pat,
}

impl TokenEncoding {
    pub fn credential(&self, token: &str) -> String {
        match self {
            TokenEncoding::Raw => token.to_owned(),
            TokenEncoding::Pat => STANDARD.encode(format!(":{token}")),
        }
    }
}

impl FromStr for TokenEncoding {
    type Err = TokenEncodingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.to_ascii_lowercase();
        match value.as_str() {
            "raw" => Ok(TokenEncoding::Raw),
            "pat" => Ok(TokenEncoding::Pat),
            _ => Err(TokenEncodingError(value)),
        }
    }
}

impl Display for TokenEncoding {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            TokenEncoding::Raw => f.write_str("raw"),
            TokenEncoding::Pat => f.write_str("pat"),
        }
    }
}

/// Result of one listing call.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Listing {
    pub repositories: Vec<RepositoryDescriptor>,
    /// Set when the service announced more results than it returned.
    pub continuation: Option<String>,
}

#[cfg_attr(test, automock)]
pub trait RepositoryLister {
    fn list(&self, params: &FetchParams) -> Result<Listing, ListingError>;
}

#[derive(Deserialize)]
struct RepositoryListResponse {
    #[serde(default)]
    value: Option<Vec<RepositoryDescriptor>>,
}

pub struct AzureDevOpsLister {
    client: Client,
    host: Url,
    encoding: TokenEncoding,
}

impl AzureDevOpsLister {
    pub fn new(
        host: &str,
        encoding: TokenEncoding,
        timeout: Duration,
    ) -> Result<AzureDevOpsLister, ListingError> {
        let invalid_host = |reason: String| ListingError::InvalidHost {
            host: host.to_owned(),
            reason,
        };
        let parsed = Url::parse(host).map_err(|e| invalid_host(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid_host("not a base url".to_owned()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ado-mirror/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(AzureDevOpsLister {
            client,
            host: parsed,
            encoding,
        })
    }

    /// `{host}/{organization}/{project}/_apis/git/repositories?api-version=6.0`
    pub fn listing_url(&self, organization: &str, project: &str) -> Result<Url, ListingError> {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|_| ListingError::InvalidHost {
                host: self.host.to_string(),
                reason: "not a base url".to_owned(),
            })?
            .pop_if_empty()
            .extend([organization, project, "_apis", "git", "repositories"]);
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }
}

impl RepositoryLister for AzureDevOpsLister {
    fn list(&self, params: &FetchParams) -> Result<Listing, ListingError> {
        let url = self.listing_url(&params.organization, &params.project)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(
                AUTHORIZATION,
                format!("Basic {}", self.encoding.credential(&params.token)),
            )
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ListingError::ConnectionFailure {
                status: status.as_u16(),
            });
        }

        let continuation = response
            .headers()
            .get(CONTINUATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body: RepositoryListResponse = response.json()?;
        let repositories = body.value.unwrap_or_default();
        trace!("Listing returned {} entries", repositories.len());

        Ok(Listing {
            repositories,
            continuation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;

    fn params(token: &str) -> FetchParams {
        FetchParams {
            organization: "contoso".to_owned(),
            project: "platform".to_owned(),
            target_directory: PathBuf::from("/unused"),
            token: token.to_owned(),
        }
    }

    fn lister(server: &Server, encoding: TokenEncoding) -> AzureDevOpsLister {
        AzureDevOpsLister::new(&server.url(), encoding, DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn listing_url_for_default_host() {
        let lister =
            AzureDevOpsLister::new(DEFAULT_HOST, TokenEncoding::Raw, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            lister.listing_url("contoso", "platform").unwrap().as_str(),
            "https://dev.azure.com/contoso/platform/_apis/git/repositories?api-version=6.0"
        );
    }

    #[test]
    fn listing_url_encodes_segments() {
        let lister =
            AzureDevOpsLister::new(DEFAULT_HOST, TokenEncoding::Raw, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            lister.listing_url("contoso", "My Project").unwrap().as_str(),
            "https://dev.azure.com/contoso/My%20Project/_apis/git/repositories?api-version=6.0"
        );
    }

    #[test]
    fn invalid_host() {
        let result = AzureDevOpsLister::new("not a url", TokenEncoding::Raw, DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(ListingError::InvalidHost { .. })));
    }

    #[test]
    fn token_encodings() {
        assert_eq!(TokenEncoding::Raw.credential("abc"), "abc");
        assert_eq!(TokenEncoding::Pat.credential("abc"), "OmFiYw==");
        assert_eq!("PAT".parse::<TokenEncoding>(), Ok(TokenEncoding::Pat));
        assert!("bearer".parse::<TokenEncoding>().is_err());
    }

    #[test]
    fn list_parses_repositories() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/contoso/platform/_apis/git/repositories")
            .match_query(Matcher::UrlEncoded("api-version".into(), "6.0".into()))
            .match_header("authorization", "Basic dG9rZW4=")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "count": 3,
                    "value": [
                        {"id": "1", "name": "api", "remoteUrl": "https://contoso@dev.azure.com/contoso/platform/_git/api"},
                        {"id": "2", "name": "web"},
                        {"id": "3", "remoteUrl": "https://contoso@dev.azure.com/contoso/platform/_git/anon"}
                    ]
                }"#,
            )
            .create();

        let listing = lister(&server, TokenEncoding::Raw)
            .list(&params("dG9rZW4="))
            .unwrap();

        mock.assert();
        assert_eq!(
            listing,
            Listing {
                repositories: vec![
                    RepositoryDescriptor::new(
                        "api",
                        Some("https://contoso@dev.azure.com/contoso/platform/_git/api".to_owned())
                    ),
                    RepositoryDescriptor::new("web", None),
                    RepositoryDescriptor::new(
                        "Unnamed Repository",
                        Some("https://contoso@dev.azure.com/contoso/platform/_git/anon".to_owned())
                    ),
                ],
                continuation: None,
            }
        );
    }

    #[test]
    fn list_sends_pat_credential() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/contoso/platform/_apis/git/repositories")
            .match_query(Matcher::Any)
            .match_header("authorization", "Basic OnNlY3JldA==")
            .with_status(200)
            .with_body(r#"{"count": 0, "value": []}"#)
            .create();

        let listing = lister(&server, TokenEncoding::Pat)
            .list(&params("secret"))
            .unwrap();

        mock.assert();
        assert!(listing.repositories.is_empty());
    }

    #[test]
    fn missing_value_is_empty() {
        let mut server = Server::new();
        server
            .mock("GET", "/contoso/platform/_apis/git/repositories")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"count": 0}"#)
            .create();

        let listing = lister(&server, TokenEncoding::Raw)
            .list(&params("t"))
            .unwrap();
        assert_eq!(listing, Listing::default());
    }

    #[test]
    fn continuation_header_is_reported() {
        let mut server = Server::new();
        server
            .mock("GET", "/contoso/platform/_apis/git/repositories")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("x-ms-continuationtoken", "next-page")
            .with_body(r#"{"value": [{"name": "api", "remoteUrl": "https://x/_git/api"}]}"#)
            .create();

        let listing = lister(&server, TokenEncoding::Raw)
            .list(&params("t"))
            .unwrap();
        assert_eq!(listing.continuation.as_deref(), Some("next-page"));
        assert_eq!(listing.repositories.len(), 1);
    }

    #[test]
    fn null_name_does_not_break_the_listing() {
        let mut server = Server::new();
        server
            .mock("GET", "/contoso/platform/_apis/git/repositories")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"value": [
                    {"name": null, "remoteUrl": "https://x/_git/a"},
                    {"name": "b", "remoteUrl": "https://x/_git/b"}
                ]}"#,
            )
            .create();

        let listing = lister(&server, TokenEncoding::Raw)
            .list(&params("t"))
            .unwrap();

        assert_eq!(
            listing.repositories,
            vec![
                RepositoryDescriptor::new(
                    "Unnamed Repository",
                    Some("https://x/_git/a".to_owned())
                ),
                RepositoryDescriptor::new("b", Some("https://x/_git/b".to_owned())),
            ]
        );
    }

    #[test]
    fn no_content_is_connection_failure() {
        let mut server = Server::new();
        server
            .mock("GET", "/contoso/platform/_apis/git/repositories")
            .match_query(Matcher::Any)
            .with_status(204)
            .create();

        let error = lister(&server, TokenEncoding::Raw)
            .list(&params("t"))
            .unwrap_err();
        assert!(matches!(
            error,
            ListingError::ConnectionFailure { status: 204 }
        ));
    }

    #[test]
    fn non_success_status_is_connection_failure() {
        let mut server = Server::new();
        server
            .mock("GET", "/contoso/platform/_apis/git/repositories")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("unauthorized")
            .create();

        let error = lister(&server, TokenEncoding::Raw)
            .list(&params("bad"))
            .unwrap_err();
        assert!(matches!(
            error,
            ListingError::ConnectionFailure { status: 401 }
        ));
        assert_eq!(error.to_string(), "Failed to fetch repositories: HTTP 401");
    }
}
