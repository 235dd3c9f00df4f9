//! TCP client for the ABX server.

use abx_types::{AbxError, RecordSet, TickerRecord};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::decode_record;
use crate::request::{Request, RequestError};
use crate::session::{StreamSummary, read_records};

/// Configuration for the ABX client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Maximum time to wait for a connection to be established.
    pub connect_timeout: Duration,
    /// Maximum time to wait for a single read.
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given endpoint with default timeouts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Returns the endpoint as `host:port`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Errors that can occur while talking to the ABX server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The connection could not be established.
    #[error("Failed to connect to {endpoint}: {source}")]
    Connect {
        /// The endpoint that refused or failed.
        endpoint: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The connection was not established in time.
    #[error("Connection to {endpoint} timed out after {timeout:?}")]
    ConnectTimeout {
        /// The endpoint that did not answer.
        endpoint: String,
        /// The configured connect timeout.
        timeout: Duration,
    },

    /// A read did not complete in time.
    #[error("Read timed out after {0:?}")]
    ReadTimeout(Duration),

    /// I/O error on an established connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be encoded.
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl ClientError {
    /// Returns true if the error came from the transport rather than the request.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        !matches!(self, Self::Request(_))
    }
}

impl From<ClientError> for AbxError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Request(e) => Self::Request(e.to_string()),
            other => Self::Connection(other.to_string()),
        }
    }
}

/// Client for the ABX server.
///
/// Every exchange opens its own connection, which is closed when the exchange
/// returns. Connections are never pooled or reused.
#[derive(Debug, Clone, Default)]
pub struct AbxClient {
    config: ClientConfig,
}

impl AbxClient {
    /// Creates a new client with the given configuration.
    #[must_use]
    pub const fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Creates a client for `localhost:3000`.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Streams every available packet into a new record set.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or the request
    /// cannot be sent.
    pub async fn fetch_all(&self) -> Result<RecordSet, ClientError> {
        let mut records = RecordSet::new();
        self.stream_all(&mut records, |_| {}).await?;
        Ok(records)
    }

    /// Streams every available packet into `records`.
    ///
    /// `on_record` is called for each newly inserted record. The session ends
    /// when the server closes the connection. A trailing partial packet or a
    /// failure after the request was sent truncates the session; the records
    /// decoded until then are kept and the returned summary says so.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or the request
    /// cannot be sent.
    pub async fn stream_all<F>(
        &self,
        records: &mut RecordSet,
        on_record: F,
    ) -> Result<StreamSummary, ClientError>
    where
        F: FnMut(&TickerRecord),
    {
        let mut stream = self.connect().await?;
        send_request(&mut stream, Request::StreamAll).await?;

        let summary = read_records(&mut stream, records, self.config.read_timeout, on_record).await;
        info!(
            received = summary.received,
            duplicates = summary.duplicates,
            total = records.len(),
            truncated = summary.is_truncated(),
            "Stream session finished"
        );
        Ok(summary)
    }

    /// Asks the server to resend a single packet.
    ///
    /// Returns `Ok(None)` if the server closed the connection before a full
    /// packet arrived.
    ///
    /// # Errors
    ///
    /// Returns an error if `sequence` does not fit the resend field, or on
    /// connection, I/O or timeout failures.
    pub async fn request_resend(&self, sequence: i32) -> Result<Option<TickerRecord>, ClientError> {
        let request = Request::resend(sequence)?;
        let mut stream = self.connect().await?;
        send_request(&mut stream, request).await?;

        let (filled, window) = tokio::time::timeout(self.config.read_timeout, read_window(&mut stream))
            .await
            .map_err(|_| ClientError::ReadTimeout(self.config.read_timeout))??;

        if filled < TickerRecord::SIZE {
            debug!(sequence, received = filled, "Resend returned an incomplete packet");
            return Ok(None);
        }

        Ok(Some(decode_record(&window)))
    }

    async fn connect(&self) -> Result<TcpStream, ClientError> {
        let endpoint = self.config.endpoint();
        let stream = tokio::time::timeout(self.config.connect_timeout, TcpStream::connect(&endpoint))
            .await
            .map_err(|_| ClientError::ConnectTimeout {
                endpoint: endpoint.clone(),
                timeout: self.config.connect_timeout,
            })?
            .map_err(|source| ClientError::Connect {
                endpoint: endpoint.clone(),
                source,
            })?;

        // Requests are two bytes; don't let Nagle hold them back
        stream.set_nodelay(true)?;
        debug!(%endpoint, "Connected");
        Ok(stream)
    }
}

async fn send_request(stream: &mut TcpStream, request: Request) -> Result<(), ClientError> {
    stream.write_all(&request.to_bytes()).await?;
    stream.flush().await?;
    Ok(())
}

/// Reads until one full packet is buffered or the peer closes.
async fn read_window<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<(usize, [u8; TickerRecord::SIZE]), ClientError> {
    let mut window = [0u8; TickerRecord::SIZE];
    let mut filled = 0;

    while filled < window.len() {
        let read = reader.read(&mut window[filled..]).await?;
        if read == 0 {
            break;
        }
        filled += read;
    }

    Ok((filled, window))
}
