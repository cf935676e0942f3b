use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::codec::CommandDecoder;
use crate::game::Direction;

/// TCP command server feeding the game's command queue.
///
/// Accepts one client at a time; when that client disconnects the loop goes
/// straight back to `accept`, for the life of the process. Decoded commands
/// are published into an unbounded queue that the game loop drains with
/// non-blocking reads, so a slow or absent client never stalls a tick.
pub struct CommandServer {
    listener: TcpListener,
    commands: mpsc::UnboundedSender<Direction>,
}

impl CommandServer {
    /// Bind the listener and create the command queue. Returns the receiving
    /// half for the game loop.
    pub async fn bind(addr: &str) -> Result<(Self, mpsc::UnboundedReceiver<Direction>)> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind command server on {addr}"))?;
        info!(%addr, "command server listening");

        let (tx, rx) = mpsc::unbounded_channel();
        Ok((
            Self {
                listener,
                commands: tx,
            },
            rx,
        ))
    }

    /// The address actually bound, useful when the port was 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("command server has no local address")
    }

    /// Accept-and-decode loop. Never returns; a failed accept is logged and
    /// retried, a disconnecting client is replaced by the next one.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    info!(%peer, "client connected");
                    self.serve(stream).await;
                    info!(%peer, "client disconnected");
                }
                Err(err) => warn!(%err, "accept failed"),
            }
        }
    }

    /// Read the client's byte stream until EOF or error, publishing every
    /// accepted command. Decoder state (residual and dedup) lives and dies
    /// with the connection.
    async fn serve(&self, mut stream: TcpStream) {
        let mut decoder = CommandDecoder::new();
        let mut buf = [0u8; 1024];

        loop {
            let read = match stream.read(&mut buf).await {
                Ok(0) => return,
                Ok(n) => n,
                Err(err) => {
                    warn!(%err, "client read failed");
                    return;
                }
            };

            for command in decoder.feed(&buf[..read]) {
                debug!(%command, "command received");
                if self.commands.send(command).is_err() {
                    // The game loop is gone; nothing left to feed.
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;
    use tokio::time::timeout;

    async fn recv(rx: &mut mpsc::UnboundedReceiver<Direction>) -> Direction {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for a command")
            .expect("command channel closed")
    }

    #[tokio::test]
    async fn test_decodes_and_dedups_a_client_stream() {
        let (server, mut rx) = CommandServer::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        let mut client = TcpStream::connect(addr).await.unwrap();
        client
            .write_all(b"LEFT\nup\nGARBAGE\nup\ndown\n")
            .await
            .unwrap();

        assert_eq!(recv(&mut rx).await, Direction::Left);
        assert_eq!(recv(&mut rx).await, Direction::Up);
        assert_eq!(recv(&mut rx).await, Direction::Down);
    }

    #[tokio::test]
    async fn test_accepts_the_next_client_after_disconnect() {
        let (server, mut rx) = CommandServer::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        let mut first = TcpStream::connect(addr).await.unwrap();
        first.write_all(b"down\n").await.unwrap();
        assert_eq!(recv(&mut rx).await, Direction::Down);
        drop(first);

        // A fresh connection gets a fresh decoder, so the same command is
        // accepted again.
        let mut second = TcpStream::connect(addr).await.unwrap();
        second.write_all(b"down\n").await.unwrap();
        assert_eq!(recv(&mut rx).await, Direction::Down);
    }

    #[tokio::test]
    async fn test_split_writes_reassemble() {
        let (server, mut rx) = CommandServer::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"ri").await.unwrap();
        client.flush().await.unwrap();
        client.write_all(b"ght\n").await.unwrap();

        assert_eq!(recv(&mut rx).await, Direction::Right);
    }
}
