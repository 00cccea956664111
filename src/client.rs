use std::io::Write;
use std::time::Duration;

use crate::params::{RetrievalParameters, TicketRequest};
use crate::ticket::SliceDescriptor;
use crate::transport::{Transport, UreqTransport};
use crate::{Result, fetcher, resolver};

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Blocking htsget client: resolve a ticket, then fetch its chunks.
pub struct Client<T = UreqTransport> {
    transport: T,
}

impl Client {
    /// A client where connecting, waiting for a response and receiving a
    /// chunk body are each bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self::with_timeouts(timeout, timeout)
    }

    /// A client that allows each chunk body up to `body_timeout`, for slices
    /// whose chunks are too large to arrive within `timeout`.
    pub fn with_timeouts(timeout: Duration, body_timeout: Duration) -> Self {
        Self {
            transport: UreqTransport::with_body_timeout(timeout, body_timeout),
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn resolve(&self, request: &TicketRequest) -> Result<SliceDescriptor> {
        resolver::resolve(&self.transport, request)
    }

    pub fn fetch_all<W: Write + ?Sized>(&self, slice: &SliceDescriptor, sink: &mut W) -> Result<u64> {
        fetcher::fetch_all(&self.transport, slice, sink)
    }

    /// Retrieve `url` filtered by `params` into `sink`.
    ///
    /// On error the sink may hold a prefix of the output; it is not rolled back.
    pub fn retrieve<W: Write + ?Sized>(
        &self,
        url: &str,
        sink: &mut W,
        params: &RetrievalParameters,
    ) -> Result<()> {
        let request = TicketRequest::new(url, params.clone())?;
        let slice = self.resolve(&request)?;
        let total = self.fetch_all(&slice, sink)?;
        tracing::info!(
            "retrieved {} bytes in {} chunk(s) from {}",
            total,
            slice.chunks().len(),
            url
        );
        Ok(())
    }
}

/// Retrieve `url` into `sink` with a default [`Client`].
pub fn retrieve<W: Write + ?Sized>(
    url: &str,
    sink: &mut W,
    params: &RetrievalParameters,
) -> Result<()> {
    Client::new(DEFAULT_TIMEOUT).retrieve(url, sink, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::transport::mock::{MockTransport, Reply};

    #[test]
    fn test_retrieve_end_to_end() {
        let ticket = br#"{"htsget": {"format": "VCF", "urls": [
            {"url": "data:;base64,aGVhZGVyCg==", "class": "header"},
            {"url": "http://data.example.com/body", "headers": {"Range": "bytes=100-199"}}
        ]}}"#;
        let transport = MockTransport::new()
            .reply(
                "http://example.com/variants/x?format=VCF&referenceName=chr2",
                Reply::Ok(ticket.to_vec()),
            )
            .reply("http://data.example.com/body", Reply::Ok(b"body\n".to_vec()));
        let client = Client::with_transport(transport);

        let params = RetrievalParameters::builder()
            .format(crate::types::Format::Vcf)
            .reference_name("chr2")
            .build()
            .unwrap();
        let mut sink: Vec<u8> = Vec::new();
        client
            .retrieve("http://example.com/variants/x", &mut sink, &params)
            .unwrap();

        assert_eq!(sink, b"header\nbody\n");
        let requests = client.transport().requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].1["Range"], "bytes=100-199");
    }

    #[test]
    fn test_ticket_failure_writes_nothing() {
        let transport =
            MockTransport::new().reply("http://example.com/reads/x", Reply::Status(404));
        let client = Client::with_transport(transport);

        let mut sink: Vec<u8> = Vec::new();
        let err = client
            .retrieve(
                "http://example.com/reads/x",
                &mut sink,
                &RetrievalParameters::default(),
            )
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_invalid_url_rejected_before_network() {
        let client = Client::with_transport(MockTransport::new());

        let err = client
            .retrieve("example.com/reads/x", &mut Vec::<u8>::new(), &RetrievalParameters::default())
            .unwrap_err();

        assert!(matches!(err, Error::InvalidParameters(_)));
        assert!(client.transport().requested_urls().is_empty());
    }
}
