//! WebDAV helpers for the address book and calendar collections.
//!
//! Only the four operations the sync needs are implemented: a depth-1
//! PROPFIND listing, GET, PUT and DELETE, all with basic authentication.

use reqwest::{Client, Method, StatusCode};
use tracing::debug;

use crate::error::{BdayError, BdayResult};

/// Extension of contact-card files in an address book.
pub const VCF_EXT: &str = ".vcf";

/// Extension of event files in a calendar.
pub const ICS_EXT: &str = ".ics";

const DAV_NS: &str = "DAV:";

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<d:propfind xmlns:d="DAV:">
    <d:prop>
        <d:resourcetype/>
    </d:prop>
</d:propfind>"#;

/// Statuses accepted as a successful DELETE.
const DELETE_OK: [StatusCode; 3] = [StatusCode::OK, StatusCode::ACCEPTED, StatusCode::NO_CONTENT];

/// Statuses accepted as a successful PUT.
const PUT_OK: [StatusCode; 3] = [StatusCode::OK, StatusCode::CREATED, StatusCode::NO_CONTENT];

/// HTTP client bound to one set of credentials.
#[derive(Clone)]
pub struct DavClient {
    http: Client,
    username: String,
    password: String,
}

impl DavClient {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> BdayResult<Self> {
        let http = Client::builder().build().map_err(BdayError::Client)?;

        Ok(DavClient {
            http,
            username: username.into(),
            password: password.into(),
        })
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
    }

    /// List the names of files in a collection ending with `extension`.
    ///
    /// Anything other than a 207 Multi-Status response is an error.
    pub async fn list(&self, collection_url: &str, extension: &str) -> BdayResult<Vec<String>> {
        debug!("PROPFIND {}", collection_url);

        let propfind = Method::from_bytes(b"PROPFIND").map_err(|e| BdayError::Multistatus {
            url: collection_url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .request(propfind, collection_url)
            .header("Depth", "1")
            .header("Content-Type", "application/xml; charset=utf-8")
            .body(PROPFIND_BODY)
            .send()
            .await
            .map_err(|source| BdayError::Http {
                url: collection_url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::MULTI_STATUS {
            return Err(BdayError::ListStatus {
                url: collection_url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| BdayError::Http {
            url: collection_url.to_string(),
            source,
        })?;

        let files = parse_multistatus(&body, extension).map_err(|e| BdayError::Multistatus {
            url: collection_url.to_string(),
            reason: e.to_string(),
        })?;

        debug!("Found {} {} files in {}", files.len(), extension, collection_url);
        Ok(files)
    }

    /// Download one file from a collection.
    pub async fn get(&self, collection_url: &str, name: &str) -> BdayResult<String> {
        let url = resource_url(collection_url, name);
        debug!("GET {}", url);

        let response = self
            .request(Method::GET, &url)
            .send()
            .await
            .map_err(|source| BdayError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BdayError::Download { url, status });
        }

        response
            .text()
            .await
            .map_err(|source| BdayError::Http { url, source })
    }

    /// Delete one file from a collection.
    pub async fn delete(&self, collection_url: &str, name: &str) -> BdayResult<()> {
        let url = resource_url(collection_url, name);
        debug!("DELETE {}", url);

        let response = self
            .request(Method::DELETE, &url)
            .send()
            .await
            .map_err(|source| BdayError::Http {
                url: url.clone(),
                source,
            })?;

        check_status(url, response, &DELETE_OK).await
    }

    /// Create or replace a calendar file in a collection.
    pub async fn put_calendar(&self, collection_url: &str, name: &str, ics: String) -> BdayResult<()> {
        let url = resource_url(collection_url, name);
        debug!("PUT {} ({} bytes)", url, ics.len());

        let response = self
            .request(Method::PUT, &url)
            .header("Content-Type", "text/calendar; charset=utf-8")
            .body(ics)
            .send()
            .await
            .map_err(|source| BdayError::Http {
                url: url.clone(),
                source,
            })?;

        check_status(url, response, &PUT_OK).await
    }
}

async fn check_status(url: String, response: reqwest::Response, accepted: &[StatusCode]) -> BdayResult<()> {
    let status = response.status();
    if accepted.contains(&status) {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(BdayError::Rejected { url, status, body })
}

/// Build the URL of a file inside a collection.
pub fn resource_url(collection_url: &str, name: &str) -> String {
    let base = collection_url.trim_end_matches('/');
    format!("{}/{}", base, name)
}

/// Extract file names from a multistatus body.
///
/// Only `href`s of top-level `response` elements are considered. The name is
/// the last path segment of each href ending with `extension`.
pub fn parse_multistatus(body: &str, extension: &str) -> Result<Vec<String>, roxmltree::Error> {
    let doc = roxmltree::Document::parse(body)?;
    let root = doc.root_element();

    let files = root
        .children()
        .filter(|n| is_dav(n, "response"))
        .filter_map(|response| {
            response
                .children()
                .find(|n| is_dav(n, "href"))
                .and_then(|n| n.text())
        })
        .map(str::trim)
        .filter(|href| href.ends_with(extension))
        .filter_map(|href| href.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    Ok(files)
}

fn is_dav(node: &roxmltree::Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(DAV_NS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:" xmlns:card="urn:ietf:params:xml:ns:carddav">
  <d:response>
    <d:href>/dav/alice/contacts/</d:href>
    <d:propstat><d:prop><d:resourcetype><d:collection/><card:addressbook/></d:resourcetype></d:prop></d:propstat>
  </d:response>
  <d:response>
    <d:href>/dav/alice/contacts/ada.vcf</d:href>
    <d:propstat><d:prop><d:resourcetype/></d:prop></d:propstat>
  </d:response>
  <d:response>
    <d:href>
      /dav/alice/contacts/grace.vcf
    </d:href>
  </d:response>
  <d:response>
    <d:href>/dav/alice/contacts/notes.txt</d:href>
  </d:response>
</d:multistatus>"#;

    #[test]
    fn test_parse_multistatus_filters_by_extension() {
        let files = parse_multistatus(LISTING, VCF_EXT).unwrap();
        assert_eq!(files, vec!["ada.vcf", "grace.vcf"]);

        assert!(parse_multistatus(LISTING, ICS_EXT).unwrap().is_empty());
    }

    #[test]
    fn test_parse_multistatus_default_namespace() {
        let body = r#"<multistatus xmlns="DAV:">
  <response><href>https://dav.example.com/cal/b1.ics</href></response>
  <response><href>https://dav.example.com/cal/b2.ics</href></response>
</multistatus>"#;
        assert_eq!(parse_multistatus(body, ICS_EXT).unwrap(), vec!["b1.ics", "b2.ics"]);
    }

    #[test]
    fn test_parse_multistatus_ignores_foreign_namespace() {
        let body = r#"<d:multistatus xmlns:d="DAV:" xmlns:x="urn:example">
  <x:response><x:href>/cal/ghost.ics</x:href></x:response>
</d:multistatus>"#;
        assert!(parse_multistatus(body, ICS_EXT).unwrap().is_empty());
    }

    #[test]
    fn test_parse_multistatus_rejects_invalid_xml() {
        assert!(parse_multistatus("<d:multistatus", ICS_EXT).is_err());
    }

    #[test]
    fn test_resource_url_joins_with_single_slash() {
        assert_eq!(
            resource_url("https://dav.example.com/cal/", "a.ics"),
            "https://dav.example.com/cal/a.ics"
        );
        assert_eq!(
            resource_url("https://dav.example.com/cal", "a.ics"),
            "https://dav.example.com/cal/a.ics"
        );
    }
}
