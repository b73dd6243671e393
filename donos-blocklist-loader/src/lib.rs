//! Parses a `/etc/hosts`-style file into the two populations the DNS
//! dispatcher seeds its caches from: domains to block (`0.0.0.0`) and
//! domains with a static A-record override (any other IPv4 address).

use std::fmt::Display;
use std::net::Ipv4Addr;
use std::path::Path;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "couldn't read hosts file: {err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// A parsed hosts-file: entries to block outright, and entries that resolve
/// to a fixed address without going upstream.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostsFile {
    pub blocked: Vec<String>,
    pub overrides: Vec<(String, [u8; 4])>,
}

impl HostsFile {
    /// Parses hosts-file content. Total: a line that doesn't split into at
    /// least an IP and a domain is skipped, never an error.
    pub fn parse(input: &str) -> Self {
        let mut blocked = Vec::new();
        let mut overrides = Vec::new();

        for line in input.lines() {
            let mut fields = line.split_whitespace();
            let Some(ip) = fields.next() else {
                continue;
            };
            let Some(domain) = fields.next() else {
                continue;
            };

            if ip == "0.0.0.0" {
                blocked.push(domain.to_string());
            } else if let Ok(addr) = ip.parse::<Ipv4Addr>() {
                overrides.push((domain.to_string(), addr.octets()));
            }
        }

        Self { blocked, overrides }
    }

    /// Reads and parses `path`. Fails only if the file cannot be opened;
    /// malformed lines within it are silently skipped by `parse`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        tracing::debug!("loading hosts file {path:?}");
        let content = std::fs::read_to_string(path)?;
        let parsed = Self::parse(&content);
        tracing::info!(
            "loaded {} blocked domains and {} overrides from {path:?}",
            parsed.blocked.len(),
            parsed.overrides.len()
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::HostsFile;

    #[test]
    fn blocks_domains_mapped_to_zero_address() {
        let result = HostsFile::parse("0.0.0.0 ads.example\n0.0.0.0 tracker.example");
        assert_eq!(result.blocked, vec!["ads.example", "tracker.example"]);
        assert!(result.overrides.is_empty());
    }

    #[test]
    fn overrides_domains_mapped_to_another_address() {
        let result = HostsFile::parse("192.168.1.10 printer.local");
        assert_eq!(
            result.overrides,
            vec![("printer.local".to_string(), [192, 168, 1, 10])]
        );
        assert!(result.blocked.is_empty());
    }

    #[test]
    fn ignores_trailing_fields_on_a_line() {
        let result = HostsFile::parse("0.0.0.0 ads.example extra ignored tokens");
        assert_eq!(result.blocked, vec!["ads.example"]);
    }

    #[test]
    fn skips_lines_that_do_not_split_into_ip_and_domain() {
        let result = HostsFile::parse("# a comment\n\n0.0.0.0\nnotanip justadomain\n127.0.0.1 localhost");
        assert!(result.blocked.is_empty());
        assert_eq!(
            result.overrides,
            vec![("localhost".to_string(), [127, 0, 0, 1])]
        );
    }

    #[test]
    fn mixes_blocked_and_override_entries() {
        let result = HostsFile::parse(
            "0.0.0.0 ads.example\n1.2.3.4 printer.local\n0.0.0.0 tracker.example",
        );
        assert_eq!(result.blocked, vec!["ads.example", "tracker.example"]);
        assert_eq!(
            result.overrides,
            vec![("printer.local".to_string(), [1, 2, 3, 4])]
        );
    }
}
