use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use donos_parser::{BytePacketBuffer, DnsPacket, Header, Question, QueryType, ResponseCode};
use tokio::net::UdpSocket;

use crate::prelude::{Resolver, ResolverError};

const TIMEOUT: Duration = Duration::from_secs(5);
const MAX_RESPONSE_LEN: usize = 1024;

/// Forwards A/AAAA queries to a single upstream resolver over UDP.
///
/// Every exchange draws a fresh transaction id from a monotonically
/// increasing counter, so concurrent in-flight queries toward the same
/// upstream never collide, and validates that the reply echoes that id,
/// is marked as a response, and carries `rcode == 0` before handing it back.
#[derive(Debug)]
pub struct RemoteResolver {
    socket: UdpSocket,
    peer: SocketAddr,
    identifier: String,
    next_id: AtomicU16,
}

impl RemoteResolver {
    /// Binds a fresh local UDP socket and targets `nameserver:53`.
    pub async fn bind(bind_addr: SocketAddr, nameserver: IpAddr) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(bind_addr).await?;
        Ok(Self {
            socket,
            peer: SocketAddr::new(nameserver, 53),
            identifier: nameserver.to_string(),
            next_id: AtomicU16::new(0),
        })
    }

    fn fresh_id(&self) -> u16 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn exchange(&self, kind: QueryType, hostname: &str) -> Result<DnsPacket, ResolverError> {
        let id = self.fresh_id();

        let mut query = DnsPacket::new(Header::question(id));
        query.header.recursion_desired = true;
        query = query.with_question(Question::new(hostname.to_string(), kind));

        let request = query
            .create_buffer()
            .map_err(|err| ResolverError::Io(err.to_string()))?;

        send_within_timeout(&self.socket, &request.buf[..request.pos()], self.peer).await?;

        let mut response = [0u8; MAX_RESPONSE_LEN];
        let size = recv_within_timeout(&self.socket, &mut response).await?;
        if size == 0 {
            return Err(ResolverError::Timeout);
        }

        let mut buffer = BytePacketBuffer::default();
        let copy_len = size.min(buffer.buf.len());
        buffer.buf[..copy_len].copy_from_slice(&response[..copy_len]);

        let reply = DnsPacket::try_from(buffer).map_err(|_| ResolverError::Malformed)?;

        if reply.header.id != id
            || !reply.header.response
            || reply.header.response_code != ResponseCode::NoError
        {
            return Err(ResolverError::Mismatch);
        }

        Ok(reply)
    }
}

async fn send_within_timeout(
    socket: &UdpSocket,
    data: &[u8],
    peer: SocketAddr,
) -> Result<(), ResolverError> {
    let sent = tokio::time::timeout(TIMEOUT, socket.send_to(data, peer))
        .await
        .map_err(|_| ResolverError::Timeout)?
        .map_err(|err| ResolverError::Io(err.to_string()))?;
    if sent != data.len() {
        return Err(ResolverError::Io("short write to upstream socket".into()));
    }
    Ok(())
}

async fn recv_within_timeout(
    socket: &UdpSocket,
    buffer: &mut [u8],
) -> Result<usize, ResolverError> {
    let (size, _) = tokio::time::timeout(TIMEOUT, socket.recv_from(buffer))
        .await
        .map_err(|_| ResolverError::Timeout)?
        .map_err(|err| ResolverError::Io(err.to_string()))?;
    Ok(size)
}

#[async_trait::async_trait]
impl Resolver for RemoteResolver {
    fn kind(&self) -> &'static str {
        "remote-resolver"
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    #[tracing::instrument(skip(self))]
    async fn resolve(&self, kind: QueryType, hostname: &str) -> Result<DnsPacket, ResolverError> {
        self.exchange(kind, hostname).await
    }
}

#[cfg(test)]
mod tests {
    use super::RemoteResolver;
    use crate::prelude::{extract_addresses, Resolver};
    use donos_parser::{DnsPacket, Header, QueryType, Record};
    use std::net::{Ipv4Addr, SocketAddr};
    use tokio::net::UdpSocket;

    async fn fake_upstream(answer: Option<Ipv4Addr>) -> SocketAddr {
        let socket = UdpSocket::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = socket.local_addr().unwrap();

        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (size, from) = socket.recv_from(&mut buf).await.unwrap();
            let mut request_buffer = donos_parser::BytePacketBuffer::default();
            request_buffer.buf[..size].copy_from_slice(&buf[..size]);
            let request = DnsPacket::try_from(request_buffer).unwrap();

            let mut response = DnsPacket::response_from(&request);
            if let Some(ip) = answer {
                response = response.with_answer(Record::a(
                    request.questions[0].name.clone(),
                    ip.octets(),
                    60,
                ));
            }
            let buffer = response.create_buffer().unwrap();
            socket
                .send_to(&buffer.buf[..buffer.pos()], from)
                .await
                .unwrap();
        });

        addr
    }

    #[tokio::test]
    async fn resolves_an_a_record_from_upstream() {
        let upstream = fake_upstream(Some(Ipv4Addr::new(93, 184, 216, 34))).await;
        let resolver = RemoteResolver::bind(([0, 0, 0, 0], 0).into(), upstream.ip())
            .await
            .unwrap();

        let response = resolver
            .resolve(QueryType::A, "example.com")
            .await
            .unwrap();
        let addresses = extract_addresses(&response, QueryType::A);
        assert_eq!(addresses, vec![vec![93, 184, 216, 34]]);
    }

    #[tokio::test]
    async fn mismatched_id_is_reported_as_a_resolver_error() {
        // The fake upstream here answers with whatever id the request bore
        // (via response_from), so to exercise the mismatch path we instead
        // send a canned response id ourselves.
        let socket = UdpSocket::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = socket.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (_, from) = socket.recv_from(&mut buf).await.unwrap();
            let response = DnsPacket::new(Header::response(0xFFFF));
            let buffer = response.create_buffer().unwrap();
            socket
                .send_to(&buffer.buf[..buffer.pos()], from)
                .await
                .unwrap();
        });

        let resolver = RemoteResolver::bind(([0, 0, 0, 0], 0).into(), addr.ip())
            .await
            .unwrap();
        let err = resolver.resolve(QueryType::A, "example.com").await;
        assert!(err.is_err());
    }
}
