//! Server lifecycle management.

use std::net::SocketAddr;

use anyhow::Result;
use tokio::net::TcpListener;

use crate::log;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to `hostname` at `base_port`, trying the next ports while the
/// address is in use.
pub async fn bind_with_retry(hostname: &str, base_port: u16) -> Result<(TcpListener, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let Some(port) = base_port.checked_add(offset) else {
            break;
        };
        match TcpListener::bind((hostname, port)).await {
            Ok(listener) => {
                let addr = listener.local_addr()?;
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((listener, addr));
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => last_error = Some(e),
            Err(e) => {
                return Err(anyhow::Error::new(e).context(format!("failed to bind {hostname}:{port}")));
            }
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind {} after {} attempts (ports {}-{}): {}",
        hostname,
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_skips_port_in_use() {
        let (taken, taken_addr) = bind_with_retry("127.0.0.1", 0).await.unwrap();
        let port = taken_addr.port();

        let (_next, addr) = bind_with_retry("127.0.0.1", port).await.unwrap();
        assert_ne!(addr.port(), port);
        assert!(addr.port() > port && addr.port() < port.saturating_add(MAX_PORT_RETRIES));
        drop(taken);
    }

    #[tokio::test]
    async fn test_bind_bad_host() {
        assert!(bind_with_retry("host.invalid", 3000).await.is_err());
    }
}
