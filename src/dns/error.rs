use std::fmt::Display;

/// Only a missing question escapes `DnsHandler::try_handle` as an error;
/// blocklist/cache misses and upstream failures are absorbed into an
/// NXDOMAIN reply rather than propagated.
#[derive(Debug)]
pub enum HandleError {
    NoQuestion,
}

impl Display for HandleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoQuestion => write!(f, "query carries no question"),
        }
    }
}

impl std::error::Error for HandleError {}
