use std::net::SocketAddr;

/// The sender of one validated datagram.
///
/// Built fresh for every datagram and never kept around; this is not a
/// session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Client {
    pub address: SocketAddr,
    pub key: u64,
}
