use super::QueryType;
use crate::buffer::reader::ReaderError;
use crate::buffer::writer::WriterError;
use crate::buffer::BytePacketBuffer;
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum Record {
    Unknown {
        domain: String,
        qtype: u16,
        data_len: u16,
        ttl: u32,
    },
    A {
        domain: String,
        addr: Ipv4Addr,
        ttl: u32,
    },
    NS {
        domain: String,
        host: String,
        ttl: u32,
    },
    CNAME {
        domain: String,
        host: String,
        ttl: u32,
    },
    MX {
        domain: String,
        priority: u16,
        host: String,
        ttl: u32,
    },
    AAAA {
        domain: String,
        addr: Ipv6Addr,
        ttl: u32,
    },
}

impl Record {
    pub fn ttl(&self) -> u32 {
        match self {
            Self::A { ttl, .. } => *ttl,
            Self::AAAA { ttl, .. } => *ttl,
            Self::CNAME { ttl, .. } => *ttl,
            Self::MX { ttl, .. } => *ttl,
            Self::NS { ttl, .. } => *ttl,
            Self::Unknown { ttl, .. } => *ttl,
        }
    }

    pub fn delayed_ttl(&self, ttl: u32) -> Self {
        match self {
            Self::A { domain, addr, .. } => Self::A {
                domain: domain.clone(),
                addr: *addr,
                ttl,
            },
            Self::AAAA { domain, addr, .. } => Self::AAAA {
                domain: domain.clone(),
                addr: *addr,
                ttl,
            },
            Self::CNAME { domain, host, .. } => Self::CNAME {
                domain: domain.clone(),
                host: host.clone(),
                ttl,
            },
            Self::MX {
                domain,
                priority,
                host,
                ..
            } => Self::MX {
                domain: domain.clone(),
                priority: *priority,
                host: host.clone(),
                ttl,
            },
            Self::NS { domain, host, .. } => Self::NS {
                domain: domain.clone(),
                host: host.clone(),
                ttl,
            },
            Self::Unknown {
                domain,
                qtype,
                data_len,
                ..
            } => Self::Unknown {
                domain: domain.clone(),
                qtype: *qtype,
                data_len: *data_len,
                ttl,
            },
        }
    }

    /// Builds an A record straight from the 4 raw octets held by the answer
    /// cache or by a hosts-file override.
    pub fn a(domain: String, octets: [u8; 4], ttl: u32) -> Self {
        Self::A {
            domain,
            addr: Ipv4Addr::from(octets),
            ttl,
        }
    }

    /// Builds an AAAA record straight from the 16 raw octets returned by an
    /// upstream lookup.
    pub fn aaaa(domain: String, octets: [u8; 16], ttl: u32) -> Self {
        Self::AAAA {
            domain,
            addr: Ipv6Addr::from(octets),
            ttl,
        }
    }

    pub fn read(buffer: &mut BytePacketBuffer) -> Result<Record, ReaderError> {
        let domain = buffer.read_qname()?;

        let qtype_num = buffer.read_u16()?;
        let qtype = QueryType::from_num(qtype_num);

        let _qclass = buffer.read_u16()?;
        let ttl = buffer.read_u32()?;
        let data_len = buffer.read_u16()?;

        match qtype {
            QueryType::A => {
                let raw_addr = buffer.read_u32()?;
                let addr = Ipv4Addr::from(raw_addr);

                Ok(Record::A { domain, addr, ttl })
            }
            QueryType::AAAA => {
                let raw_addr1 = buffer.read_u32()?;
                let raw_addr2 = buffer.read_u32()?;
                let raw_addr3 = buffer.read_u32()?;
                let raw_addr4 = buffer.read_u32()?;
                let addr = Ipv6Addr::new(
                    ((raw_addr1 >> 16) & 0xFFFF) as u16,
                    (raw_addr1 & 0xFFFF) as u16,
                    ((raw_addr2 >> 16) & 0xFFFF) as u16,
                    (raw_addr2 & 0xFFFF) as u16,
                    ((raw_addr3 >> 16) & 0xFFFF) as u16,
                    (raw_addr3 & 0xFFFF) as u16,
                    ((raw_addr4 >> 16) & 0xFFFF) as u16,
                    (raw_addr4 & 0xFFFF) as u16,
                );

                Ok(Record::AAAA { domain, addr, ttl })
            }
            QueryType::NS => {
                let host = buffer.read_qname()?;

                Ok(Record::NS { domain, host, ttl })
            }
            QueryType::CNAME => {
                let host = buffer.read_qname()?;

                Ok(Record::CNAME { domain, host, ttl })
            }
            QueryType::MX => {
                let priority = buffer.read_u16()?;
                let host = buffer.read_qname()?;

                Ok(Record::MX {
                    domain,
                    priority,
                    host,
                    ttl,
                })
            }
            QueryType::Unknown(_) => {
                buffer.step(data_len as usize)?;

                Ok(Record::Unknown {
                    domain,
                    qtype: qtype_num,
                    data_len,
                    ttl,
                })
            }
        }
    }

    pub fn write(&self, buffer: &mut BytePacketBuffer) -> Result<usize, WriterError> {
        let start_pos = buffer.pos();

        match self {
            Record::A { domain, addr, ttl } => {
                buffer.write_qname(domain)?;
                buffer.write_u16(QueryType::A.into_num())?;
                buffer.write_u16(1)?;
                buffer.write_u32(*ttl)?;
                buffer.write_u16(4)?;

                for octet in addr.octets() {
                    buffer.write_u8(octet)?;
                }
            }
            Record::NS { domain, host, ttl } => {
                buffer.write_qname(domain)?;
                buffer.write_u16(QueryType::NS.into_num())?;
                buffer.write_u16(1)?;
                buffer.write_u32(*ttl)?;

                let pos = buffer.pos();
                buffer.write_u16(0)?;

                buffer.write_qname(host)?;

                let size = buffer.pos() - (pos + 2);
                buffer.set_u16(pos, size as u16)?;
            }
            Record::CNAME { domain, host, ttl } => {
                buffer.write_qname(domain)?;
                buffer.write_u16(QueryType::CNAME.into_num())?;
                buffer.write_u16(1)?;
                buffer.write_u32(*ttl)?;

                let pos = buffer.pos();
                buffer.write_u16(0)?;

                buffer.write_qname(host)?;

                let size = buffer.pos() - (pos + 2);
                buffer.set_u16(pos, size as u16)?;
            }
            Record::MX {
                domain,
                priority,
                host,
                ttl,
            } => {
                buffer.write_qname(domain)?;
                buffer.write_u16(QueryType::MX.into_num())?;
                buffer.write_u16(1)?;
                buffer.write_u32(*ttl)?;

                let pos = buffer.pos();
                buffer.write_u16(0)?;

                buffer.write_u16(*priority)?;
                buffer.write_qname(host)?;

                let size = buffer.pos() - (pos + 2);
                buffer.set_u16(pos, size as u16)?;
            }
            Record::AAAA { domain, addr, ttl } => {
                buffer.write_qname(domain)?;
                buffer.write_u16(QueryType::AAAA.into_num())?;
                buffer.write_u16(1)?;
                buffer.write_u32(*ttl)?;
                buffer.write_u16(16)?;

                for segment in addr.segments() {
                    buffer.write_u16(segment)?;
                }
            }
            Record::Unknown { .. } => {
                tracing::debug!("skipping unsupported record on write: {self:?}");
            }
        }

        Ok(buffer.pos() - start_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_round_trip_a_record() {
        let record = Record::a("example.com".into(), [93, 184, 216, 34], 3600);
        let mut buffer = BytePacketBuffer::default();
        record.write(&mut buffer).unwrap();
        buffer.pos = 0;
        let decoded = Record::read(&mut buffer).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn should_round_trip_aaaa_record() {
        let record = Record::aaaa(
            "example.com".into(),
            [
                0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
            ],
            60,
        );
        let mut buffer = BytePacketBuffer::default();
        record.write(&mut buffer).unwrap();
        buffer.pos = 0;
        let decoded = Record::read(&mut buffer).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn should_round_trip_cname_record() {
        let record = Record::CNAME {
            domain: "www.example.com".into(),
            host: "example.com".into(),
            ttl: 120,
        };
        let mut buffer = BytePacketBuffer::default();
        record.write(&mut buffer).unwrap();
        buffer.pos = 0;
        let decoded = Record::read(&mut buffer).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn delayed_ttl_preserves_payload() {
        let record = Record::a("example.com".into(), [1, 2, 3, 4], 10);
        let updated = record.delayed_ttl(3600);
        assert_eq!(updated.ttl(), 3600);
        match updated {
            Record::A { addr, .. } => assert_eq!(addr, Ipv4Addr::new(1, 2, 3, 4)),
            other => panic!("unexpected record {other:?}"),
        }
    }
}
