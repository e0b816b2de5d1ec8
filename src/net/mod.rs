pub mod gossip;
pub mod peer;
pub mod sync;

pub use peer::Peer;
