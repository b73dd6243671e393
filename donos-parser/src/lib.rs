pub mod buffer;
pub mod packet;

pub use buffer::BytePacketBuffer;
pub use packet::header::{Header, ResponseCode};
pub use packet::question::{DnsClass, Question};
pub use packet::record::Record;
pub use packet::{DnsPacket, QueryType};
