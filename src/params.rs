//! Request descriptors for the ticket phase.
//!
//! [`RetrievalParameters`] is validated when it is built, so an instance in hand
//! never carries a contradictory filter combination. [`TicketRequest`] pairs the
//! parameters with the resource URL they apply to.

use crate::types::{DataClass, Format};
use crate::{Error, Result, query};

/// Optional filters for an htsget retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalParameters {
    format: Option<Format>,
    class: Option<DataClass>,
    reference_name: Option<String>,
    reference_md5: Option<String>,
    start: Option<u64>,
    end: Option<u64>,
    fields: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    notags: Option<Vec<String>>,
}

impl RetrievalParameters {
    pub fn builder() -> RetrievalParametersBuilder {
        RetrievalParametersBuilder::default()
    }

    pub fn format(&self) -> Option<Format> {
        self.format
    }

    pub fn class(&self) -> Option<DataClass> {
        self.class
    }

    pub fn reference_name(&self) -> Option<&str> {
        self.reference_name.as_deref()
    }

    pub fn reference_md5(&self) -> Option<&str> {
        self.reference_md5.as_deref()
    }

    pub fn start(&self) -> Option<u64> {
        self.start
    }

    pub fn end(&self) -> Option<u64> {
        self.end
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    pub fn notags(&self) -> Option<&[String]> {
        self.notags.as_deref()
    }

    /// Query pairs for the supplied parameters, in a stable order.
    ///
    /// List parameters are comma-joined into a single value. A supplied but
    /// empty list still yields its key with an empty value, which htsget reads
    /// as "none of these".
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(format) = self.format {
            pairs.push(("format", format.to_string()));
        }
        if let Some(class) = self.class {
            pairs.push(("class", class.to_string()));
        }
        if let Some(name) = &self.reference_name {
            pairs.push(("referenceName", name.clone()));
        }
        if let Some(md5) = &self.reference_md5 {
            pairs.push(("referenceMd5", md5.clone()));
        }
        if let Some(start) = self.start {
            pairs.push(("start", start.to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end", end.to_string()));
        }
        if let Some(fields) = &self.fields {
            pairs.push(("fields", fields.join(",")));
        }
        if let Some(tags) = &self.tags {
            pairs.push(("tags", tags.join(",")));
        }
        if let Some(notags) = &self.notags {
            pairs.push(("notags", notags.join(",")));
        }

        pairs
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetrievalParametersBuilder {
    inner: RetrievalParameters,
}

impl RetrievalParametersBuilder {
    pub fn format(mut self, format: Format) -> Self {
        self.inner.format = Some(format);
        self
    }

    pub fn class(mut self, class: DataClass) -> Self {
        self.inner.class = Some(class);
        self
    }

    pub fn reference_name(mut self, name: impl Into<String>) -> Self {
        self.inner.reference_name = Some(name.into());
        self
    }

    pub fn reference_md5(mut self, md5: impl Into<String>) -> Self {
        self.inner.reference_md5 = Some(md5.into());
        self
    }

    pub fn start(mut self, start: u64) -> Self {
        self.inner.start = Some(start);
        self
    }

    pub fn end(mut self, end: u64) -> Self {
        self.inner.end = Some(end);
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn notags<I, S>(mut self, notags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.notags = Some(notags.into_iter().map(Into::into).collect());
        self
    }

    /// Validate and freeze the parameters.
    pub fn build(self) -> Result<RetrievalParameters> {
        let params = self.inner;

        if params.reference_name.is_some() && params.reference_md5.is_some() {
            return Err(Error::InvalidParameters(
                "referenceName and referenceMd5 are mutually exclusive".to_string(),
            ));
        }

        if let (Some(start), Some(end)) = (params.start, params.end) {
            if start > end {
                return Err(Error::InvalidParameters(format!(
                    "start ({}) is greater than end ({})",
                    start, end
                )));
            }
        }

        if let (Some(tags), Some(notags)) = (&params.tags, &params.notags) {
            if let Some(tag) = tags.iter().find(|t| notags.contains(*t)) {
                return Err(Error::InvalidParameters(format!(
                    "tag {} appears in both tags and notags",
                    tag
                )));
            }
        }

        Ok(params)
    }
}

/// A resource URL plus the filters to request it with.
#[derive(Debug, Clone)]
pub struct TicketRequest {
    url: String,
    params: RetrievalParameters,
}

impl TicketRequest {
    pub fn new(url: impl Into<String>, params: RetrievalParameters) -> Result<Self> {
        let url = url.into();
        url::Url::parse(&url)
            .map_err(|e| Error::InvalidParameters(format!("invalid url {}: {}", url, e)))?;
        Ok(Self { url, params })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> &RetrievalParameters {
        &self.params
    }

    /// The fully encoded URL the ticket is requested from.
    pub fn ticket_url(&self) -> String {
        query::ticket_request_url(&self.url, &self.params)
    }
}
