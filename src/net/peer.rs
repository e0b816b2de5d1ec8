use std::fmt;

use serde::{Deserialize, Serialize};

/// Addressing metadata for one directory entry. Purely an endpoint; a peer's
/// chain is only ever seen through its RPC responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub host: String,
    pub port: u16,
}

impl Peer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Full URL for one of this peer's RPC endpoints.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.host, self.port, path)
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parse a `host:port,host:port` list into a directory. Entries that do not
/// parse are skipped; an empty string yields an empty directory.
pub fn parse_peers(list: &str) -> Vec<Peer> {
    list.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            let (host, port) = entry.rsplit_once(':')?;
            let port: u16 = port.parse().ok()?;
            if host.is_empty() {
                return None;
            }
            Some(Peer::new(host, port))
        })
        .collect()
}
