//! HTTP transport abstraction for the blocking client.
//!
//! The ticket resolver and the chunk fetcher only ever issue GET requests, so
//! the seam is a single method. Anything that can answer a GET with a status,
//! an optional declared length and a body reader can stand in for the network.
//!
//! # Implementations
//!
//! - [`UreqTransport`] - blocking HTTP/HTTPS via `ureq`

mod blocking;

pub use blocking::UreqTransport;

use crate::Result;
use std::collections::HashMap;
use std::io::Read;

/// A response whose body has not been read yet.
pub struct HttpResponse {
    pub status: u16,
    /// Value of the Content-Length header, if the server declared one
    pub content_length: Option<u64>,
    pub body: Box<dyn Read>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking transport used by [`crate::Client`].
pub trait Transport {
    /// Issue a GET to `url` with exactly the given headers.
    ///
    /// Non-2xx responses are returned, not turned into errors; callers decide.
    fn get(&self, url: &str, headers: &HashMap<String, String>) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, headers: &HashMap<String, String>) -> Result<HttpResponse> {
        (**self).get(url, headers)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::{HttpResponse, Transport};
    use crate::{Error, Result};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::{self, Cursor, Read};

    /// Canned reply for one URL.
    #[derive(Clone)]
    pub enum Reply {
        Ok(Vec<u8>),
        Status(u16),
        /// Declares `declared` bytes but only sends the body
        Short { body: Vec<u8>, declared: u64 },
        /// Sends the body then fails mid-stream
        Broken(Vec<u8>),
        /// Declares `declared` bytes, sends the body, then the peer goes away
        Truncated { body: Vec<u8>, declared: u64 },
        Unreachable,
    }

    /// In-memory transport recording every request it sees.
    #[derive(Default)]
    pub struct MockTransport {
        replies: HashMap<String, Reply>,
        pub requests: RefCell<Vec<(String, HashMap<String, String>)>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(mut self, url: &str, reply: Reply) -> Self {
            self.replies.insert(url.to_string(), reply);
            self
        }

        pub fn requested_urls(&self) -> Vec<String> {
            self.requests.borrow().iter().map(|(u, _)| u.clone()).collect()
        }
    }

    struct FailAfter(Cursor<Vec<u8>>);

    impl Read for FailAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")),
                n => Ok(n),
            }
        }
    }

    impl Transport for MockTransport {
        fn get(&self, url: &str, headers: &HashMap<String, String>) -> Result<HttpResponse> {
            self.requests
                .borrow_mut()
                .push((url.to_string(), headers.clone()));

            let reply = self
                .replies
                .get(url)
                .cloned()
                .unwrap_or(Reply::Status(404));

            let response = match reply {
                Reply::Ok(body) => HttpResponse {
                    status: 200,
                    content_length: Some(body.len() as u64),
                    body: Box::new(Cursor::new(body)),
                },
                Reply::Status(status) => HttpResponse {
                    status,
                    content_length: Some(0),
                    body: Box::new(io::empty()),
                },
                Reply::Short { body, declared } => HttpResponse {
                    status: 200,
                    content_length: Some(declared),
                    body: Box::new(Cursor::new(body)),
                },
                Reply::Broken(body) => HttpResponse {
                    status: 200,
                    content_length: None,
                    body: Box::new(FailAfter(Cursor::new(body))),
                },
                Reply::Truncated { body, declared } => HttpResponse {
                    status: 200,
                    content_length: Some(declared),
                    body: Box::new(FailAfter(Cursor::new(body))),
                },
                Reply::Unreachable => return Err(Error::transport(url, "connection refused")),
            };
            Ok(response)
        }
    }
}
