/*
 *  listener.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Controller feed: one line per TCP connection
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::time::{self, Duration};

use crate::protocol::parse;
use crate::scheduler::RenderHandle;

/// Longest line read from one connection. A line with no newline within
/// this many bytes is dropped whole.
pub const MAX_LINE_BYTES: u64 = 4096;

// pause after a failed accept so a persistent fault does not spin
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
    #[error("no line within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub connections: u64,
    pub forwarded: u64,
    pub parse_errors: u64,
    pub oversized: u64,
    pub transport_errors: u64,
}

/// Sequential accept loop.
///
/// Connections are served strictly one after another: read one line,
/// hand the parsed command to the render loop, close. A client that
/// connects and stays silent holds the slot until it sends, hangs up or
/// the optional read timeout expires.
pub struct Listener {
    listener: TcpListener,
    read_timeout: Option<Duration>,
}

impl Listener {
    pub async fn bind(address: &str, port: u16, read_timeout: Option<Duration>) -> Result<Self, ListenerError> {
        let addr = format!("{}:{}", address, port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ListenerError::Bind { addr: addr.clone(), source })?;
        info!("listening on {}", listener.local_addr().map(|a| a.to_string()).unwrap_or(addr));
        Ok(Self { listener, read_timeout })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve connections until `shutdown` flips to true (or its sender is
    /// dropped) or the render loop goes away. Dropping `self` on return
    /// closes the socket.
    pub async fn run(self, handle: RenderHandle, mut shutdown: watch::Receiver<bool>) -> ListenerStats {
        let mut stats = ListenerStats::default();

        loop {
            if *shutdown.borrow() {
                break;
            }

            let (stream, peer) = tokio::select! {
                _ = shutdown.changed() => break,
                res = self.listener.accept() => match res {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!("accept failed: {}", e);
                        stats.transport_errors += 1;
                        time::sleep(ACCEPT_BACKOFF).await;
                        continue;
                    }
                },
            };
            stats.connections += 1;

            let line = tokio::select! {
                _ = shutdown.changed() => break,
                res = read_one_line(stream, self.read_timeout) => res,
            };

            let line = match line {
                Ok(Some(RawLine { oversized: true, .. })) => {
                    warn!("{}: dropped line longer than {} bytes", peer, MAX_LINE_BYTES);
                    stats.oversized += 1;
                    continue;
                }
                Ok(Some(RawLine { text, .. })) => text,
                Ok(None) => {
                    debug!("{} closed without sending", peer);
                    continue;
                }
                Err(e) => {
                    error!("{}: {}", peer, e);
                    stats.transport_errors += 1;
                    continue;
                }
            };

            match parse(&line) {
                Ok(cmd) => {
                    debug!("{} -> {}", peer, cmd);
                    if !handle.post(cmd).await {
                        warn!("render loop gone, no one to feed");
                        break;
                    }
                    stats.forwarded += 1;
                }
                Err(e) => {
                    warn!("{}: dropped {:?}: {}", peer, line.trim_end(), e);
                    stats.parse_errors += 1;
                }
            }
        }

        info!(
            "listener stopped: {} connections, {} forwarded, {} malformed, {} oversized",
            stats.connections, stats.forwarded, stats.parse_errors, stats.oversized
        );
        stats
    }
}

/// One received line, decoded leniently.
#[derive(Debug)]
struct RawLine {
    text: String,
    /// No newline within `MAX_LINE_BYTES`
    oversized: bool,
}

/// Read up to the first newline, then drop the connection.
/// `None` when the peer hung up before sending anything.
async fn read_one_line(stream: TcpStream, timeout: Option<Duration>) -> Result<Option<RawLine>, ListenerError> {
    let mut reader = BufReader::new(stream.take(MAX_LINE_BYTES));
    let mut buf = Vec::new();

    let n = match timeout {
        Some(limit) => time::timeout(limit, reader.read_until(b'\n', &mut buf))
            .await
            .map_err(|_| ListenerError::Timeout(limit))??,
        None => reader.read_until(b'\n', &mut buf).await?,
    };
    if n == 0 {
        return Ok(None);
    }

    let oversized = buf.len() as u64 >= MAX_LINE_BYTES && buf.last() != Some(&b'\n');
    // bad bytes become U+FFFD; the line still parses
    let text = String::from_utf8_lossy(&buf).into_owned();
    Ok(Some(RawLine { text, oversized }))
}
