//! Non-blocking client built on `reqwest` and `tokio`.
//!
//! Shares URL construction and ticket parsing with the blocking client and
//! keeps the same contract: chunks are fetched one after another, in ticket
//! order, and the first failure ends the retrieval.

use reqwest::Client as HttpClient;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::fetcher::PIECE_SIZE;
use crate::params::{RetrievalParameters, TicketRequest};
use crate::ticket::{ChunkDescriptor, SliceDescriptor};
use crate::{Error, Result};

#[derive(Clone)]
pub struct AsyncClient {
    client: HttpClient,
}

impl AsyncClient {
    /// Build a client whose connects and individual body reads give up after
    /// `timeout`. Fails if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))?;
        Ok(Self { client })
    }

    pub async fn resolve(&self, request: &TicketRequest) -> Result<SliceDescriptor> {
        let url = request.ticket_url();
        tracing::debug!("requesting ticket: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        SliceDescriptor::from_json(&body)
    }

    pub async fn fetch_all<W>(&self, slice: &SliceDescriptor, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut total = 0;
        for (index, chunk) in slice.chunks().iter().enumerate() {
            let written = self.fetch_chunk(chunk, sink).await?;
            tracing::debug!("chunk {} done: {} bytes", index, written);
            total += written;
        }
        Ok(total)
    }

    pub async fn fetch_chunk<W>(&self, chunk: &ChunkDescriptor, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        if let Some(payload) = chunk.inline() {
            sink.write_all(payload).await?;
            return Ok(payload.len() as u64);
        }

        let url = chunk.url();
        tracing::debug!("fetching chunk: {}", url);

        let mut request = self.client.get(url);
        for (name, value) in chunk.headers() {
            request = request.header(name.as_str(), value.as_str());
        }

        let mut response = request
            .send()
            .await
            .map_err(|e| Error::transport(url, e))?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let expected = response.content_length();
        let mut received = 0u64;

        while let Some(bytes) = response
            .chunk()
            .await
            .map_err(|e| Error::body_read(url, expected, received, e.is_timeout(), e))?
        {
            for piece in bytes.chunks(PIECE_SIZE) {
                sink.write_all(piece).await?;
            }
            received += bytes.len() as u64;
        }

        if let Some(expected) = expected {
            if expected != received {
                return Err(Error::ContentLengthMismatch {
                    url: url.to_string(),
                    expected,
                    received,
                });
            }
        }

        Ok(received)
    }

    /// Retrieve `url` filtered by `params` into `sink`.
    pub async fn retrieve<W>(
        &self,
        url: &str,
        sink: &mut W,
        params: &RetrievalParameters,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let request = TicketRequest::new(url, params.clone())?;
        let slice = self.resolve(&request).await?;
        let total = self.fetch_all(&slice, sink).await?;
        tracing::info!(
            "retrieved {} bytes in {} chunk(s) from {}",
            total,
            slice.chunks().len(),
            url
        );
        Ok(())
    }
}
