use donos_parser::packet::record::Record;
use donos_parser::packet::{DnsPacket, QueryType};

#[derive(Clone, Debug)]
pub enum ResolverError {
    /// No canned response was registered for this query (mock resolver only).
    Unknown,
    /// The upstream socket could not be created, or send/recv failed.
    Io(String),
    /// No reply arrived within the 5-second budget.
    Timeout,
    /// The reply didn't echo the query id, wasn't marked as a response, or
    /// carried a non-zero response code.
    Mismatch,
    /// The reply bytes didn't decode as a DNS message.
    Malformed,
}

impl std::fmt::Display for ResolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "no resolver could answer the query"),
            Self::Io(reason) => write!(f, "upstream io error: {reason}"),
            Self::Timeout => write!(f, "upstream did not answer within the timeout"),
            Self::Mismatch => write!(f, "upstream reply did not match the query"),
            Self::Malformed => write!(f, "upstream reply could not be decoded"),
        }
    }
}

impl std::error::Error for ResolverError {}

#[async_trait::async_trait]
pub trait Resolver: std::fmt::Debug {
    fn kind(&self) -> &'static str;
    fn identifier(&self) -> &str;

    async fn resolve(&self, kind: QueryType, hostname: &str) -> Result<DnsPacket, ResolverError>;
}

/// Walks a resolved packet's answer section and returns the raw rdata of
/// every record matching `kind` (A ⇒ 4 octets, AAAA ⇒ 16 octets), in
/// answer order. Mirrors the `nslookup`/`nslookup6` helpers: every matching
/// record is counted, even if the caller only keeps the first.
pub fn extract_addresses(packet: &DnsPacket, kind: QueryType) -> Vec<Vec<u8>> {
    packet
        .answers
        .iter()
        .filter_map(|record| match (kind, record) {
            (QueryType::A, Record::A { addr, .. }) => Some(addr.octets().to_vec()),
            (QueryType::AAAA, Record::AAAA { addr, .. }) => Some(addr.octets().to_vec()),
            _ => None,
        })
        .collect()
}
