use crate::config::SharedConfig;
use crate::correlation_store::DynCorrelationStore;
use crate::dns::handlers::Handler;
use crate::error::Error;
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;

const RECV_BUF_LEN: usize = 65_535;

/// The UDP DNS server. Each datagram is handled to completion before the next is received.
pub struct DnsServer {
    socket: UdpSocket,
    handler: Handler,
}

impl DnsServer {
    #[must_use]
    pub fn new(socket: UdpSocket, handler: Handler) -> Self {
        DnsServer { socket, handler }
    }

    /// The address the server is bound to.
    ///
    /// # Errors
    ///
    /// Returns the underlying socket error, if any.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Serve datagrams until receiving fails.
    ///
    /// Dropped datagrams, failed sends and transient receive errors (such as an ICMP port
    /// unreachable reported back on the socket) are logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] when the socket can no longer receive.
    pub async fn block_until_done(self) -> Result<(), Error> {
        let mut buf = vec![0u8; RECV_BUF_LEN];
        loop {
            let (len, src) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(err) if is_transient(err.kind()) => {
                    tracing::warn!("receive failed, continuing: {err}");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            let response = match self.handler.handle_datagram(&buf[..len], src).await {
                Ok(Some(response)) => response,
                Ok(None) => continue,
                Err(err) => {
                    tracing::debug!("dropped {len} byte datagram from {src}: {err}");
                    continue;
                }
            };
            if let Err(err) = self.send_reply(&response, src).await {
                tracing::warn!("{err}");
            }
        }
    }

    async fn send_reply(&self, response: &[u8], dst: SocketAddr) -> Result<(), Error> {
        self.socket
            .send_to(response, dst)
            .await
            .map(|_| ())
            .map_err(|err| Error::SendFailure(dst, err))
    }
}

/// Receive errors that concern a single peer rather than the socket. Windows and some Linux
/// setups surface a previous send's ICMP error on the next receive.
fn is_transient(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

/// Bind the DNS server to [`Config::dns_udp_bind_addr`][crate::config::Config::dns_udp_bind_addr],
/// resolving with a [`SuffixPolicy`][crate::dns::policy::SuffixPolicy] built from `config`.
///
/// # Errors
///
/// Returns an error if the socket can't be bound.
pub async fn new(
    config: SharedConfig,
    store: DynCorrelationStore,
) -> anyhow::Result<DnsServer> {
    let socket = UdpSocket::bind(config.dns_udp_bind_addr).await?;
    let handler = Handler::new(&config, store);
    Ok(DnsServer::new(socket, handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation_store::shared;
    use crate::dns::codec::tests::query;
    use crate::dns::policy::SuffixPolicy;
    use std::str::FromStr;
    use std::sync::Arc;
    use trust_dns_client::rr::{LowerName, Name};

    async fn server() -> DnsServer {
        let policy = SuffixPolicy::new(
            LowerName::from(Name::from_str("example.com").unwrap()),
            "43.156.28.183".parse().unwrap(),
        );
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        DnsServer::new(socket, Handler::with_policy(Arc::new(policy), shared()))
    }

    #[test]
    fn test_peer_errors_are_transient() {
        assert!(is_transient(io::ErrorKind::ConnectionReset));
        assert!(is_transient(io::ErrorKind::ConnectionRefused));
        assert!(is_transient(io::ErrorKind::Interrupted));
        assert!(!is_transient(io::ErrorKind::PermissionDenied));
        assert!(!is_transient(io::ErrorKind::InvalidInput));
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_send_failure() {
        let server = server().await;
        // An IPv4 socket can't send to an IPv6 address.
        let dst: SocketAddr = "[::1]:53".parse().unwrap();

        let result = server.send_reply(&[0u8; 12], dst).await;

        assert!(matches!(result, Err(Error::SendFailure(addr, _)) if addr == dst));
    }

    #[tokio::test]
    async fn test_keeps_serving_after_send_failure() {
        let server = server().await;
        let server_addr = server.local_addr().unwrap();
        let dst: SocketAddr = "[::1]:53".parse().unwrap();
        assert!(server.send_reply(&[0u8; 12], dst).await.is_err());

        tokio::spawn(server.block_until_done());
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let request = query(0x4242, 0x0100, "after.example.com");
        client.send_to(&request, server_addr).await.unwrap();

        let mut buf = [0u8; 512];
        let (len, _) =
            tokio::time::timeout(std::time::Duration::from_secs(2), client.recv_from(&mut buf))
                .await
                .unwrap()
                .unwrap();
        assert_eq!(&buf[..2], &[0x42, 0x42]);
        assert_eq!(&buf[len - 4..len], &[43, 156, 28, 183]);
    }
}
