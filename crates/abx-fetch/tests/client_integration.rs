//! End-to-end tests against an in-process ABX server.

use abx_fetch::{AbxClient, ClientConfig, ClientError, RecoveryConfig, fetch_records};
use byteorder::{BigEndian, ByteOrder};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

fn packet(sequence: i32) -> [u8; 17] {
    let mut bytes = [0u8; 17];
    bytes[0..4].copy_from_slice(b"AAPL");
    bytes[4] = if sequence % 2 == 0 { b'S' } else { b'B' };
    BigEndian::write_i32(&mut bytes[5..9], sequence * 10);
    BigEndian::write_i32(&mut bytes[9..13], 1000 + sequence);
    BigEndian::write_i32(&mut bytes[13..17], sequence);
    bytes
}

/// Behaviour of the mock server.
#[derive(Default)]
struct Script {
    /// Bytes written in answer to a stream-all request.
    stream: Vec<u8>,
    /// Number of resend requests for a sequence answered with no data
    /// before the packet is sent.
    refusals: HashMap<u8, usize>,
    /// Sequences never answered.
    never: Vec<u8>,
}

struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<[u8; 2]>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    async fn start(script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let script = Arc::new(Mutex::new(script));

        let log = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut request = [0u8; 2];
                if socket.read_exact(&mut request).await.is_err() {
                    continue;
                }
                log.lock().unwrap().push(request);

                let reply = {
                    let mut script = script.lock().unwrap();
                    match request {
                        [1, _] => script.stream.clone(),
                        [2, seq] if script.never.contains(&seq) => Vec::new(),
                        [2, seq] => match script.refusals.get_mut(&seq) {
                            Some(left) if *left > 0 => {
                                *left -= 1;
                                Vec::new()
                            }
                            _ => packet(i32::from(seq)).to_vec(),
                        },
                        _ => Vec::new(),
                    }
                };
                let _ = socket.write_all(&reply).await;
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    fn client(&self) -> AbxClient {
        AbxClient::new(ClientConfig {
            host: self.addr.ip().to_string(),
            port: self.addr.port(),
            connect_timeout: Duration::from_secs(2),
            read_timeout: Duration::from_secs(2),
        })
    }

    fn requests(&self) -> Vec<[u8; 2]> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn stream_of(sequences: &[i32]) -> Vec<u8> {
    sequences.iter().flat_map(|&s| packet(s)).collect()
}

fn fast_recovery(max_passes: u32) -> RecoveryConfig {
    RecoveryConfig {
        max_passes,
        retry_delay: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn test_fetch_all_decodes_stream() {
    let server = MockServer::start(Script {
        stream: stream_of(&[2, 1, 3]),
        ..Default::default()
    })
    .await;

    let records = server.client().fetch_all().await.unwrap();

    assert_eq!(records.sequences().collect::<Vec<_>>(), vec![1, 2, 3]);
    let first = records.get(1).unwrap();
    assert_eq!(first.symbol.to_string(), "AAPL");
    assert_eq!(first.quantity, 10);
    assert_eq!(first.price, 1001);
    assert_eq!(server.requests(), vec![[1, 0]]);
}

#[tokio::test]
async fn test_single_gap_is_recovered() {
    let server = MockServer::start(Script {
        stream: stream_of(&[1, 2, 4, 5]),
        ..Default::default()
    })
    .await;

    let mut streamed = Vec::new();
    let outcome = fetch_records(&server.client(), &fast_recovery(5), |r| {
        streamed.push(r.sequence);
    })
    .await
    .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(streamed, vec![1, 2, 4, 5]);
    assert_eq!(outcome.stream.received, 4);
    assert_eq!(outcome.recovery.recovered, 1);
    assert_eq!(
        outcome.records.sequences().collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
    assert_eq!(server.requests(), vec![[1, 0], [2, 3]]);
}

#[tokio::test]
async fn test_empty_stream_makes_no_resends() {
    let server = MockServer::start(Script::default()).await;

    let outcome = fetch_records(&server.client(), &fast_recovery(5), |_| {})
        .await
        .unwrap();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.recovery.passes, 0);
    assert_eq!(server.requests(), vec![[1, 0]]);
}

#[tokio::test]
async fn test_empty_resend_is_retried_next_pass() {
    let server = MockServer::start(Script {
        stream: stream_of(&[6, 8]),
        refusals: HashMap::from([(7, 1)]),
        ..Default::default()
    })
    .await;

    let outcome = fetch_records(&server.client(), &fast_recovery(3), |_| {})
        .await
        .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.recovery.passes, 2);
    assert_eq!(outcome.recovery.failed_attempts, 1);
    assert_eq!(outcome.recovery.recovered, 1);
    assert_eq!(server.requests(), vec![[1, 0], [2, 7], [2, 7]]);
    assert_eq!(
        outcome.records.sequences().collect::<Vec<_>>(),
        vec![6, 7, 8]
    );
}

#[tokio::test]
async fn test_unanswered_sequence_exhausts_budget() {
    let server = MockServer::start(Script {
        stream: stream_of(&[1, 2, 4]),
        never: vec![3],
        ..Default::default()
    })
    .await;

    let outcome = fetch_records(&server.client(), &fast_recovery(3), |_| {})
        .await
        .unwrap();

    assert!(!outcome.is_complete());
    assert_eq!(outcome.recovery.passes, 3);
    assert_eq!(outcome.recovery.failed_attempts, 3);
    assert_eq!(outcome.recovery.unresolved, vec![3]);
    assert_eq!(outcome.records.len(), 3);
}

#[tokio::test]
async fn test_trailing_bytes_truncate_session() {
    let mut stream = stream_of(&[1, 3]);
    stream.extend_from_slice(&packet(4)[..5]);
    let server = MockServer::start(Script {
        stream,
        ..Default::default()
    })
    .await;

    let outcome = fetch_records(&server.client(), &fast_recovery(2), |_| {})
        .await
        .unwrap();

    assert_eq!(outcome.stream.trailing_bytes, 5);
    assert!(outcome.stream.is_truncated());
    assert_eq!(
        outcome.records.sequences().collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AbxClient::new(ClientConfig::new(addr.ip().to_string(), addr.port()));
    let result = client.fetch_all().await;

    match result {
        Err(e @ ClientError::Connect { .. }) => assert!(e.is_transport()),
        other => panic!("expected connect error, got {other:?}"),
    }
}
