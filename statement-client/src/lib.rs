//! statement-client: submits loan statement requests to the statement service and
//! saves the rendered files

pub mod client;
pub mod deliver;
pub mod error;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::StatementClient;
pub use deliver::{deliver, generate_and_deliver, DirectorySink, DownloadSink};
pub use error::{ClientError, ClientResult};
pub use transport::{HttpTransport, RawResponse, StatementTransport};
