use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::pose::HeadDirection;

/// Persistent outbound connection carrying direction lines to the game.
///
/// The game server is expected to be listening before this process starts,
/// so a refused connection at startup is fatal. After that, a failed send
/// triggers exactly one reconnect attempt on a fresh connection; the failed
/// message itself is dropped either way. Delivery is at most once.
pub struct DirectionDispatcher {
    addr: String,
    stream: TcpStream,
}

impl DirectionDispatcher {
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("game server not reachable at {addr}"))?;
        Ok(Self {
            addr: addr.to_string(),
            stream,
        })
    }

    /// Write one direction label, lower-case and newline-terminated.
    pub async fn send(&mut self, direction: HeadDirection) {
        let line = format!("{direction}\n");
        match self.stream.write_all(line.as_bytes()).await {
            Ok(()) => debug!(%direction, "direction sent"),
            Err(err) => {
                warn!(%err, %direction, "send failed, reconnecting");
                // The old socket is dead; replace it rather than reuse it.
                // The direction that failed is not resent.
                match TcpStream::connect(&self.addr).await {
                    Ok(stream) => self.stream = stream,
                    Err(err) => warn!(%err, "reconnect failed, direction dropped"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_sends_newline_terminated_labels() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut dispatcher = DirectionDispatcher::connect(&addr.to_string())
            .await
            .unwrap();
        let (mut peer, _) = listener.accept().await.unwrap();

        dispatcher.send(HeadDirection::Left).await;
        dispatcher.send(HeadDirection::Forward).await;

        let mut received = [0u8; 13];
        timeout(Duration::from_secs(5), peer.read_exact(&mut received))
            .await
            .expect("timed out reading from dispatcher")
            .unwrap();
        assert_eq!(&received, b"left\nforward\n");
    }

    #[tokio::test]
    async fn test_startup_refusal_is_fatal() {
        // Grab a port that nobody is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert!(DirectionDispatcher::connect(&addr.to_string())
            .await
            .is_err());
    }
}
