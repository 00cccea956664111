use super::{HttpResponse, Transport};
use crate::{Error, Result};
use std::collections::HashMap;
use std::time::Duration;
use ureq::Agent;
use ureq::http::header::CONTENT_LENGTH;

/// Blocking HTTP/HTTPS transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Create a transport that gives up after `timeout` at every stage:
    /// connecting, waiting for the response head and receiving the body.
    pub fn new(timeout: Duration) -> Self {
        Self::with_body_timeout(timeout, timeout)
    }

    /// Like [`UreqTransport::new`], but the whole body of one response may
    /// take up to `body_timeout`. ureq has no idle timeout, so this bounds the
    /// transfer of a single chunk, not the gap between reads.
    pub fn with_body_timeout(timeout: Duration, body_timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(timeout))
            .timeout_recv_response(Some(timeout))
            .timeout_recv_body(Some(body_timeout))
            .build();

        Self {
            agent: Agent::new_with_config(config),
        }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, headers: &HashMap<String, String>) -> Result<HttpResponse> {
        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.call().map_err(|e| Error::transport(url, e))?;

        let status = response.status().as_u16();
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let body = response.into_body().into_reader();

        Ok(HttpResponse {
            status,
            content_length,
            body: Box::new(body),
        })
    }
}
