//! Parsed htsget tickets.
//!
//! A [`SliceDescriptor`] is built once from a ticket response body and then
//! handed to the chunk fetcher. Inline `data:` URIs are decoded here so a bad
//! payload fails the ticket before any bytes reach the sink.

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use std::collections::HashMap;

use crate::types::{DataClass, TicketResponse, UrlEntry};
use crate::{Error, Result};

/// Ordered set of chunks making up one retrieval.
#[derive(Debug, Clone)]
pub struct SliceDescriptor {
    chunks: Vec<ChunkDescriptor>,
    format: Option<String>,
    md5: Option<String>,
}

impl SliceDescriptor {
    pub fn new(chunks: Vec<ChunkDescriptor>) -> Self {
        Self {
            chunks,
            format: None,
            md5: None,
        }
    }

    /// Parse a ticket response body.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let ticket: TicketResponse = serde_json::from_slice(body)
            .map_err(|e| Error::MalformedTicket(e.to_string()))?;

        let chunks = ticket
            .htsget
            .urls
            .into_iter()
            .map(ChunkDescriptor::from_entry)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            chunks,
            format: ticket.htsget.format,
            md5: ticket.htsget.md5,
        })
    }

    pub fn chunks(&self) -> &[ChunkDescriptor] {
        &self.chunks
    }

    /// Output format announced by the server, if any.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    /// MD5 of the assembled output announced by the server, if any.
    pub fn md5(&self) -> Option<&str> {
        self.md5.as_deref()
    }
}

/// One segment of the assembled byte stream.
#[derive(Debug, Clone)]
pub struct ChunkDescriptor {
    url: String,
    headers: HashMap<String, String>,
    class: Option<DataClass>,
    inline: Option<Bytes>,
}

impl ChunkDescriptor {
    /// A chunk fetched over HTTP.
    pub fn remote(url: impl Into<String>, headers: HashMap<String, String>) -> Self {
        Self {
            url: url.into(),
            headers,
            class: None,
            inline: None,
        }
    }

    /// A chunk given by a URL, decoding it up front when it is a `data:` URI.
    pub fn from_url(url: impl Into<String>, headers: HashMap<String, String>) -> Result<Self> {
        let url = url.into();
        let inline = if is_data_uri(&url) {
            Some(decode_data_uri(&url)?)
        } else {
            None
        };
        Ok(Self {
            url,
            headers,
            class: None,
            inline,
        })
    }

    fn from_entry(entry: UrlEntry) -> Result<Self> {
        let mut chunk = Self::from_url(entry.url, entry.headers.unwrap_or_default())?;
        chunk.class = entry.class;
        Ok(chunk)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn class(&self) -> Option<DataClass> {
        self.class
    }

    /// Decoded inline payload; when present no request is made for this chunk.
    pub fn inline(&self) -> Option<&Bytes> {
        self.inline.as_ref()
    }
}

fn is_data_uri(url: &str) -> bool {
    url.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Decode `data:[<mediatype>][;base64],<payload>`. Only base64 payloads are
/// accepted.
fn decode_data_uri(url: &str) -> Result<Bytes> {
    let rest = &url[5..];
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::MalformedTicket("data URI without payload separator".to_string()))?;

    let is_base64 = meta
        .rsplit(';')
        .next()
        .is_some_and(|p| p.eq_ignore_ascii_case("base64"));
    if !is_base64 {
        return Err(Error::MalformedTicket(format!(
            "data URI is not base64 encoded: data:{}",
            meta
        )));
    }

    STANDARD
        .decode(payload)
        .map(Bytes::from)
        .map_err(|e| Error::MalformedTicket(format!("invalid base64 in data URI: {}", e)))
}
