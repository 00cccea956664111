pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod params;
pub mod query;
pub mod resolver;
pub mod ticket;
pub mod transport;
pub mod types;

#[cfg(feature = "async")]
pub mod nonblocking;

#[cfg(feature = "python")]
pub mod python;

pub use client::{Client, DEFAULT_TIMEOUT, retrieve};
pub use config::Config;
pub use error::{Error, Result};
pub use params::{RetrievalParameters, TicketRequest};
pub use ticket::{ChunkDescriptor, SliceDescriptor};

#[cfg(feature = "async")]
pub use nonblocking::AsyncClient;
