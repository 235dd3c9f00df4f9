//! Benchmark utilities for abx.

use abx_lib::TickerRecord;
use byteorder::{BigEndian, ByteOrder};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const SYMBOLS: [&[u8; 4]; 4] = [b"AAPL", b"MSFT", b"AMZN", b"META"];

/// Encodes one packet in wire layout.
pub fn encode_packet(sequence: i32) -> [u8; TickerRecord::SIZE] {
    let mut bytes = [0u8; TickerRecord::SIZE];
    let index = sequence.unsigned_abs() as usize % SYMBOLS.len();
    bytes[0..4].copy_from_slice(SYMBOLS[index]);
    bytes[4] = if sequence % 2 == 0 { b'S' } else { b'B' };
    BigEndian::write_i32(&mut bytes[5..9], sequence.wrapping_mul(7) % 500);
    BigEndian::write_i32(&mut bytes[9..13], 100 + sequence % 97);
    BigEndian::write_i32(&mut bytes[13..17], sequence);
    bytes
}

/// Builds a stream of sequences `1..=count`, skipping every `drop_every`-th
/// sequence when `drop_every` is non-zero.
pub fn synthetic_stream(count: i32, drop_every: i32) -> Vec<u8> {
    (1..=count)
        .filter(|seq| drop_every == 0 || seq % drop_every != 0)
        .flat_map(encode_packet)
        .collect()
}

/// Starts an in-process ABX server that streams `stream` and answers every
/// resend request.
pub async fn spawn_server(stream: Vec<u8>) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let stream = Arc::new(stream);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let stream = Arc::clone(&stream);
            tokio::spawn(async move {
                let mut request = [0u8; 2];
                if socket.read_exact(&mut request).await.is_err() {
                    return;
                }
                let _ = match request {
                    [1, _] => socket.write_all(&stream).await,
                    [2, seq] => socket.write_all(&encode_packet(i32::from(seq))).await,
                    _ => Ok(()),
                };
            });
        }
    });

    Ok(addr)
}
