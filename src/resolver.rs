use std::collections::HashMap;
use std::io::Read;

use crate::params::TicketRequest;
use crate::ticket::SliceDescriptor;
use crate::transport::Transport;
use crate::{Error, Result};

/// Request the ticket for `request` and parse it.
///
/// One attempt, no custom headers. Non-2xx statuses fail with
/// [`Error::HttpStatus`] before the body is looked at.
pub fn resolve<T: Transport>(transport: &T, request: &TicketRequest) -> Result<SliceDescriptor> {
    let url = request.ticket_url();
    tracing::debug!("requesting ticket: {}", url);

    let mut response = transport.get(&url, &HashMap::new())?;
    if !response.is_success() {
        return Err(Error::HttpStatus {
            url,
            status: response.status,
        });
    }

    let mut body = Vec::new();
    response
        .body
        .read_to_end(&mut body)
        .map_err(|e| Error::transport(&url, e))?;

    let slice = SliceDescriptor::from_json(&body)?;
    tracing::debug!(
        "ticket lists {} chunk(s), format={:?}",
        slice.chunks().len(),
        slice.format()
    );
    Ok(slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RetrievalParameters;
    use crate::transport::mock::{MockTransport, Reply};

    const TICKET: &[u8] = br#"{"htsget": {"format": "BAM", "urls": [
        {"url": "http://data.example.com/1", "headers": {"Range": "bytes=0-9"}},
        {"url": "data:;base64,aGVsbG8="}
    ]}}"#;

    fn request(url: &str, params: RetrievalParameters) -> TicketRequest {
        TicketRequest::new(url, params).unwrap()
    }

    #[test]
    fn test_resolve_builds_query_and_sends_no_headers() {
        let transport = MockTransport::new().reply(
            "http://a.com/reads/x?referenceName=1&start=2&end=100",
            Reply::Ok(TICKET.to_vec()),
        );
        let params = RetrievalParameters::builder()
            .reference_name("1")
            .start(2)
            .end(100)
            .build()
            .unwrap();

        let slice = resolve(&transport, &request("http://a.com/reads/x", params)).unwrap();
        assert_eq!(slice.chunks().len(), 2);
        assert_eq!(slice.format(), Some("BAM"));

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].1.is_empty());
    }

    #[test]
    fn test_resolve_non_success_status() {
        let transport = MockTransport::new().reply("http://a.com/reads/x", Reply::Status(403));

        let err = resolve(
            &transport,
            &request("http://a.com/reads/x", RetrievalParameters::default()),
        )
        .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_resolve_malformed_body() {
        let transport = MockTransport::new()
            .reply("http://a.com/reads/x", Reply::Ok(b"<html></html>".to_vec()));

        let err = resolve(
            &transport,
            &request("http://a.com/reads/x", RetrievalParameters::default()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedTicket(_)));
    }

    #[test]
    fn test_resolve_unreachable() {
        let transport = MockTransport::new().reply("http://a.com/reads/x", Reply::Unreachable);

        let err = resolve(
            &transport,
            &request("http://a.com/reads/x", RetrievalParameters::default()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
        assert_eq!(transport.requested_urls().len(), 1);
    }
}
