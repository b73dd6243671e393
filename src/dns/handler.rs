use super::error::HandleError;
use crate::repository::blocklist::BlocklistService;
use crate::repository::cache::CacheService;
use donos_parser::{BytePacketBuffer, DnsPacket, QueryType, Record, ResponseCode};
use donos_resolver::prelude::{extract_addresses, Resolver};
use donos_server::prelude::Message;
use std::sync::Arc;

pub(crate) struct DnsHandler {
    blocklist: Arc<dyn BlocklistService + Send + Sync>,
    cache: Arc<dyn CacheService + Send + Sync>,
    resolver: Arc<dyn Resolver + Send + Sync>,
}

impl DnsHandler {
    pub fn new(
        blocklist: Arc<dyn BlocklistService + Send + Sync>,
        cache: Arc<dyn CacheService + Send + Sync>,
        resolver: Arc<dyn Resolver + Send + Sync>,
    ) -> Self {
        Self {
            blocklist,
            cache,
            resolver,
        }
    }
}

/// Builds an answer record for `name` carrying `octets` as its rdata, with
/// the fixed TTL every reply synthesizes regardless of origin (cache hit or
/// fresh forward). `None` if `octets` doesn't match the expected width for
/// `kind`.
fn build_answer(name: &str, kind: QueryType, octets: &[u8]) -> Option<Record> {
    const ANSWER_TTL: u32 = 3600;
    match kind {
        QueryType::A if octets.len() == 4 => {
            let mut addr = [0u8; 4];
            addr.copy_from_slice(octets);
            Some(Record::a(name.to_string(), addr, ANSWER_TTL))
        }
        QueryType::AAAA if octets.len() == 16 => {
            let mut addr = [0u8; 16];
            addr.copy_from_slice(octets);
            Some(Record::aaaa(name.to_string(), addr, ANSWER_TTL))
        }
        _ => None,
    }
}

impl DnsHandler {
    async fn try_handle(&self, packet: &DnsPacket) -> Result<DnsPacket, HandleError> {
        let question = packet.questions.first().ok_or(HandleError::NoQuestion)?;

        if self.blocklist.is_blocked(question.name.as_str()).await {
            tracing::info!(domain = question.name.as_str(), "blocked by blocklist");
            let mut res = DnsPacket::response_from(packet);
            res.header.response_code = ResponseCode::NameError;
            return Ok(res);
        }

        if question.qtype == QueryType::A {
            if let Some(addr) = self.cache.get(question.name.as_str()).await {
                tracing::debug!(domain = question.name.as_str(), "cache hit");
                let record = Record::a(question.name.clone(), addr, 3600);
                return Ok(DnsPacket::response_from(packet).with_answer(record));
            }
            tracing::debug!(domain = question.name.as_str(), "cache miss");
        }

        let addresses = match self
            .resolver
            .resolve(question.qtype, question.name.as_str())
            .await
        {
            Ok(response) => extract_addresses(&response, question.qtype),
            Err(error) => {
                tracing::warn!(domain = question.name.as_str(), "upstream failure: {error}");
                Vec::new()
            }
        };

        if addresses.is_empty() {
            let mut res = DnsPacket::response_from(packet);
            res.header.response_code = ResponseCode::NameError;
            return Ok(res);
        }

        if question.qtype == QueryType::A {
            if let Some(first) = addresses.first() {
                if first.len() == 4 {
                    let mut addr = [0u8; 4];
                    addr.copy_from_slice(first);
                    self.cache.insert(question.name.as_str(), addr).await;
                }
            }
        }

        let mut response = DnsPacket::response_from(packet);
        for octets in &addresses {
            if let Some(record) = build_answer(&question.name, question.qtype, octets) {
                response = response.with_answer(record);
            }
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl donos_server::Handler for DnsHandler {
    #[tracing::instrument(skip_all, fields(origin = ?message.address, id = tracing::field::Empty))]
    async fn handle(&self, message: Message) -> Option<Message> {
        let Message {
            address,
            buffer,
            size: _,
        } = message;

        let buffer = BytePacketBuffer::new(buffer);
        let request = match DnsPacket::try_from(buffer) {
            Ok(req) => req,
            Err(err) => {
                tracing::debug!("unable to read packet: {err:?}");
                return None;
            }
        };

        tracing::Span::current().record("id", request.header.id);

        match self.try_handle(&request).await {
            Ok(packet) => match packet.create_buffer() {
                Ok(buffer) => Some(Message {
                    address,
                    buffer: buffer.buf,
                    size: buffer.pos(),
                }),
                Err(err) => {
                    tracing::error!("unable to pack response: {err:?}");
                    None
                }
            },
            Err(HandleError::NoQuestion) => {
                tracing::debug!("no question provided");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DnsHandler;
    use crate::repository::blocklist::MemoryBlocklistService;
    use crate::repository::cache::{CacheService, MockCacheService};
    use donos_parser::{BytePacketBuffer, DnsPacket, Header, Question, QueryType, Record, ResponseCode};
    use donos_resolver::mock::MockResolver;
    use donos_server::{prelude::Message, Handler};
    use similar_asserts::assert_eq;
    use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
    use std::sync::Arc;

    fn socket_address() -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 1, 0, 1), 42))
    }

    fn message_for(packet: &DnsPacket) -> Message {
        let buffer = packet.create_buffer().unwrap();
        Message {
            address: socket_address(),
            buffer: buffer.buf,
            size: buffer.pos(),
        }
    }

    #[tokio::test]
    async fn should_resolve_query() {
        let input_packet =
            DnsPacket::new(Header::question(1)).with_question(Question::new("perdu.com".into(), QueryType::A));
        let input = message_for(&input_packet);

        let blocklist = Arc::new(MemoryBlocklistService::default());
        let cache = Arc::new(MockCacheService::default());
        let resolver = Arc::new(MockResolver::new("upstream").with_query(
            QueryType::A,
            "perdu.com",
            DnsPacket::new(Header::response(10)).with_answer(Record::a(
                "perdu.com".into(),
                [99, 99, 99, 99],
                100,
            )),
        ));

        let result = DnsHandler::new(blocklist, cache, resolver)
            .handle(input)
            .await;

        let result = result.expect("should have a message");
        let result = BytePacketBuffer::new(result.buffer);
        let result = DnsPacket::try_from(result).unwrap();

        assert_eq!(result.header.id, input_packet.header.id);
        assert!(result.header.response);
        assert_eq!(result.header.response_code, ResponseCode::NoError);
        assert_eq!(result.answers.len(), 1);
    }

    #[tokio::test]
    async fn should_block_query() {
        let input_packet = DnsPacket::new(Header::question(1))
            .with_question(Question::new("www.facebook.com".into(), QueryType::A));
        let input = message_for(&input_packet);

        let blocklist = Arc::new(MemoryBlocklistService::default().with_domain("www.facebook.com"));
        let cache = Arc::new(MockCacheService::default());
        let resolver = Arc::new(MockResolver::new("upstream"));

        let result = DnsHandler::new(blocklist, cache, resolver)
            .handle(input)
            .await;

        let result = result.expect("should have a message");
        let result = BytePacketBuffer::new(result.buffer);
        let result = DnsPacket::try_from(result).unwrap();

        assert_eq!(result.header.id, 1);
        assert!(result.header.response);
        assert_eq!(result.header.response_code, ResponseCode::NameError);
        assert!(result.answers.is_empty());
    }

    #[tokio::test]
    async fn should_not_answer_if_no_question() {
        let input_packet = DnsPacket::new(Header::question(1));
        let input = message_for(&input_packet);

        let blocklist = Arc::new(MemoryBlocklistService::default());
        let cache = Arc::new(MockCacheService::default());
        let resolver = Arc::new(MockResolver::new("upstream"));

        let result = DnsHandler::new(blocklist, cache, resolver)
            .handle(input)
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_use_cache_for_a_queries() {
        let input_packet =
            DnsPacket::new(Header::question(1)).with_question(Question::new("perdu.com".into(), QueryType::A));
        let input = message_for(&input_packet);

        let blocklist = Arc::new(MemoryBlocklistService::default());
        let cache = Arc::new(MockCacheService::default().with_record("perdu.com", [10, 0, 0, 1]));
        let resolver = Arc::new(MockResolver::new("upstream"));

        let result = DnsHandler::new(blocklist, cache, resolver)
            .handle(input)
            .await;

        let result = result.expect("should have a message");
        let result = BytePacketBuffer::new(result.buffer);
        let result = DnsPacket::try_from(result).unwrap();

        assert_eq!(result.header.id, 1);
        assert!(result.header.response);
        assert_eq!(result.header.response_code, ResponseCode::NoError);
        assert_eq!(result.answers.len(), 1);
    }

    #[tokio::test]
    async fn should_not_cache_aaaa_answers() {
        let input_packet =
            DnsPacket::new(Header::question(1)).with_question(Question::new("perdu.com".into(), QueryType::AAAA));
        let input = message_for(&input_packet);

        let blocklist = Arc::new(MemoryBlocklistService::default());
        let cache = Arc::new(MockCacheService::default());
        let resolver = Arc::new(MockResolver::new("upstream").with_query(
            QueryType::AAAA,
            "perdu.com",
            DnsPacket::new(Header::response(10)).with_answer(Record::aaaa(
                "perdu.com".into(),
                [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
                100,
            )),
        ));

        let handler = DnsHandler::new(blocklist, cache.clone(), resolver);
        let result = handler.handle(input).await;

        let result = result.expect("should have a message");
        let result = BytePacketBuffer::new(result.buffer);
        let result = DnsPacket::try_from(result).unwrap();
        assert_eq!(result.answers.len(), 1);

        // AAAA answers never populate the (A-only) answer cache.
        assert_eq!(cache.get("perdu.com").await, None);
    }

    #[tokio::test]
    async fn should_drop_reply_that_would_overflow_the_512_octet_buffer() {
        let input_packet =
            DnsPacket::new(Header::question(1)).with_question(Question::new("perdu.com".into(), QueryType::A));
        let input = message_for(&input_packet);

        let blocklist = Arc::new(MemoryBlocklistService::default());
        let cache = Arc::new(MockCacheService::default());

        let mut upstream_response = DnsPacket::new(Header::response(10));
        for i in 0..40u8 {
            upstream_response = upstream_response.with_answer(Record::a(
                "perdu.com".into(),
                [10, 0, 0, i],
                100,
            ));
        }
        let resolver = Arc::new(MockResolver::new("upstream").with_query(
            QueryType::A,
            "perdu.com",
            upstream_response,
        ));

        let result = DnsHandler::new(blocklist, cache, resolver)
            .handle(input)
            .await;

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_return_nxdomain_when_upstream_has_no_answer() {
        let input_packet =
            DnsPacket::new(Header::question(1)).with_question(Question::new("perdu.com".into(), QueryType::A));
        let input = message_for(&input_packet);

        let blocklist = Arc::new(MemoryBlocklistService::default());
        let cache = Arc::new(MockCacheService::default());
        let resolver = Arc::new(MockResolver::new("upstream"));

        let result = DnsHandler::new(blocklist, cache, resolver)
            .handle(input)
            .await;

        let result = result.expect("should have a message");
        let result = BytePacketBuffer::new(result.buffer);
        let result = DnsPacket::try_from(result).unwrap();
        assert_eq!(result.header.response_code, ResponseCode::NameError);
        assert!(result.answers.is_empty());
    }
}
