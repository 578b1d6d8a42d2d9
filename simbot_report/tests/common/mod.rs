// Stub `all_sims/` endpoint for integration tests.

use std::{net::SocketAddr, sync::Arc};

use parking_lot::Mutex;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Html(u16, &'static str),
    /// Accept, read the request, then never answer.
    Hang,
}

pub struct StubSite {
    pub addr: SocketAddr,
    /// Request heads in arrival order.
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl StubSite {
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// First line of every request, e.g. `GET /all_sims/?region=US&... HTTP/1.1`.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|head| head.lines().next().unwrap_or_default().to_string())
            .collect()
    }
}

pub async fn serve(reply: Reply) -> StubSite {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let seen = requests.clone();
    tokio::spawn(async move {
        loop {
            let (sock, _) = match listener.accept().await {
                Ok(x) => x,
                Err(_) => break,
            };
            let seen = seen.clone();
            tokio::spawn(async move {
                let _ = answer(sock, reply, seen).await;
            });
        }
    });

    StubSite { addr, requests }
}

async fn answer(mut sock: TcpStream, reply: Reply, seen: Arc<Mutex<Vec<String>>>) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = sock.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    seen.lock().push(String::from_utf8_lossy(&buf).into_owned());

    match reply {
        Reply::Html(status, body) => {
            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            sock.write_all(response.as_bytes()).await?;
            sock.shutdown().await?;
        }
        Reply::Hang => {
            // keep the socket open until the client gives up.
            let _ = sock.read(&mut chunk).await;
        }
    }
    Ok(())
}

/// An address nobody listens on.
///
/// The listener is dropped right away, so this assumes the OS does not hand
/// the same port to another socket before the test connects to it.
pub async fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
