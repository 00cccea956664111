//! Chunk retrieval and assembly.
//!
//! Chunks are materialized strictly in ticket order. The first failure aborts
//! the whole slice; whatever was written before it stays in the sink and must
//! be treated as incomplete by the caller.

use std::io::{ErrorKind, Read, Write};

use crate::ticket::{ChunkDescriptor, SliceDescriptor};
use crate::transport::Transport;
use crate::{Error, Result};

/// Bytes copied from a response body to the sink per read.
pub const PIECE_SIZE: usize = 8192;

/// Write every chunk of `slice` to `sink`, in order. Returns the total number
/// of bytes written.
pub fn fetch_all<T, W>(transport: &T, slice: &SliceDescriptor, sink: &mut W) -> Result<u64>
where
    T: Transport,
    W: Write + ?Sized,
{
    let mut total = 0;
    for (index, chunk) in slice.chunks().iter().enumerate() {
        let written = fetch_chunk(transport, chunk, sink)?;
        tracing::debug!("chunk {} done: {} bytes", index, written);
        total += written;
    }
    Ok(total)
}

/// Write a single chunk to `sink`.
pub fn fetch_chunk<T, W>(transport: &T, chunk: &ChunkDescriptor, sink: &mut W) -> Result<u64>
where
    T: Transport,
    W: Write + ?Sized,
{
    if let Some(payload) = chunk.inline() {
        sink.write_all(payload)?;
        return Ok(payload.len() as u64);
    }

    let url = chunk.url();
    tracing::debug!("fetching chunk: {}", url);

    let mut response = transport.get(url, chunk.headers())?;
    if !response.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    let received = copy_body(url, response.content_length, &mut response.body, sink)?;

    if let Some(expected) = response.content_length {
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

/// Stream `body` into `sink` in [`PIECE_SIZE`] pieces. Write failures are
/// sink (io) errors; read failures go through [`Error::body_read`].
fn copy_body<R, W>(url: &str, declared: Option<u64>, body: &mut R, sink: &mut W) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut piece = [0u8; PIECE_SIZE];
    let mut received = 0u64;

    loop {
        let n = match body.read(&mut piece) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                let timed_out = matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock);
                return Err(Error::body_read(url, declared, received, timed_out, e));
            }
        };
        sink.write_all(&piece[..n])?;
        received += n as u64;
    }

    Ok(received)
}
