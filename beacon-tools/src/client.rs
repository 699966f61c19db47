//! Device side of the protocol.

use beacon_net::{
    de::from_prefix,
    geo::Location,
    packets::{
        checksum, received_crc, seal, AckPacket, FixPacket, Packet, PingPacket, ResponseType,
        DEFAULT_PORT, MAGIC,
    },
};
use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket},
    time::{Duration, Instant},
};

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("server address {0} could not be resolved")]
    Resolve(String),
    #[error("i/o failure {0}")]
    Io(#[from] io::Error),
    #[error("packet could not be encoded: {0}")]
    Protocol(#[from] beacon_net::error::Error),
    #[error("no ack arrived within {0:?}")]
    Timeout(Duration),
    #[error("the key must not be zero")]
    ZeroKey,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Resolves `server`, using the default port when none is given.
pub fn resolve(server: &str) -> Result<SocketAddr> {
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }

    let with_port = server.to_socket_addrs().ok().and_then(|mut a| a.next());
    let addr = match with_port {
        Some(addr) => Some(addr),
        None => (server, DEFAULT_PORT)
            .to_socket_addrs()
            .ok()
            .and_then(|mut a| a.next()),
    };

    addr.ok_or_else(|| Error::Resolve(server.to_owned()))
}

/// Parses a device key written in hex, with or without a `0x` prefix.
pub fn parse_key(text: &str) -> std::result::Result<u64, std::num::ParseIntError> {
    let digits = text.trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(digits, 16)
}

pub struct BeaconClient {
    key: u64,
    server: SocketAddr,
    socket: UdpSocket,
}

impl BeaconClient {
    pub fn connect(server: &str, key: u64) -> Result<Self> {
        if key == 0 {
            return Err(Error::ZeroKey);
        }

        let server = resolve(server)?;
        let local = if server.is_ipv6() {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(local)?;
        socket.connect(server)?;

        Ok(Self {
            key,
            server,
            socket,
        })
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    /// Sends one fix. The server does not answer fixes.
    pub fn send_fix(&self, location: Location) -> Result<()> {
        self.send(&mut FixPacket::new(self.key, location))
    }

    /// Pings the server and waits for the matching ack.
    ///
    /// Datagrams that are not a valid ack for this ping are skipped.
    pub fn ping(&self, timeout: Duration) -> Result<AckPacket> {
        let id = rand::random::<u16>();
        self.send(&mut PingPacket::new(self.key, id))?;

        let deadline = Instant::now() + timeout;
        let mut buf = [0u8; 512];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining == Duration::from_secs(0) {
                return Err(Error::Timeout(timeout));
            }
            self.socket.set_read_timeout(Some(remaining))?;

            let len = match self.socket.recv(&mut buf) {
                Ok(len) => len,
                Err(e)
                    if e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::TimedOut =>
                {
                    return Err(Error::Timeout(timeout));
                }
                Err(e) => return Err(e.into()),
            };

            match parse_ack(&buf[..len]) {
                Some(ack) if ack.id == id && ack.header.key == self.key => return Ok(ack),
                _ => continue,
            }
        }
    }

    fn send<P: Packet>(&self, packet: &mut P) -> Result<()> {
        let bytes = seal(packet)?;
        self.socket.send(&bytes)?;
        Ok(())
    }
}

/// Checks and decodes an ack datagram.
pub fn parse_ack(datagram: &[u8]) -> Option<AckPacket> {
    if datagram.len() < AckPacket::SIZE || checksum(datagram)? != received_crc(datagram)? {
        return None;
    }

    let ack: AckPacket = from_prefix(datagram).ok()?;
    if ack.header.magic != MAGIC || ack.header.kind != ResponseType::Ack as u16 {
        return None;
    }

    Some(ack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_net::{
        dispatch::{decode, Request},
        packets::{make_ack, FLAG_BAD_KEY},
        ser::to_bytes,
    };
    use std::thread;

    fn fake_server() -> UdpSocket {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        socket
    }

    fn client_for(server: &UdpSocket) -> BeaconClient {
        BeaconClient::connect(&server.local_addr().unwrap().to_string(), 0xABC).unwrap()
    }

    #[test]
    fn resolve_adds_default_port() {
        assert_eq!(
            resolve("127.0.0.1").unwrap(),
            "127.0.0.1:5598".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            resolve("127.0.0.1:7000").unwrap(),
            "127.0.0.1:7000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            resolve("::1").unwrap(),
            "[::1]:5598".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn keys_are_hex() {
        assert_eq!(parse_key("0xABC").unwrap(), 0xABC);
        assert_eq!(parse_key("ffffffffffffffff").unwrap(), u64::MAX);
        assert!(parse_key("xyz").is_err());
    }

    #[test]
    fn zero_key_is_refused() {
        assert!(matches!(
            BeaconClient::connect("127.0.0.1", 0),
            Err(Error::ZeroKey)
        ));
    }

    #[test]
    fn fix_arrives_intact() {
        let server = fake_server();
        let client = client_for(&server);

        client.send_fix(Location::new(48.0, 11.0)).unwrap();

        let mut buf = [0u8; 64];
        let (len, _) = server.recv_from(&mut buf).unwrap();
        assert_eq!(len, 32);

        let datagram = decode(&buf[..len]).expect("fix was discarded");
        assert_eq!(datagram.key, 0xABC);
        match datagram.request {
            Request::Fix(fix) => {
                let location = fix.location.unwrap();
                assert!((location.latitude - 48.0).abs() <= 1e-6);
                assert!((location.longitude - 11.0).abs() <= 1e-6);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn ping_waits_for_matching_ack() {
        let server = fake_server();
        let client = client_for(&server);

        let responder = thread::spawn(move || {
            let mut buf = [0u8; 64];
            let (len, from) = server.recv_from(&mut buf).unwrap();
            let id = match decode(&buf[..len]).unwrap().request {
                Request::Ping { id } => id,
                other => panic!("unexpected request: {:?}", other),
            };

            // Noise and a stale ack first; the client must skip both
            server.send_to(&[1, 2, 3], from).unwrap();
            let stale = to_bytes(&make_ack(0xABC, id.wrapping_add(1), 0)).unwrap();
            server.send_to(&stale, from).unwrap();

            let ack = to_bytes(&make_ack(0xABC, id, FLAG_BAD_KEY)).unwrap();
            server.send_to(&ack, from).unwrap();
            id
        });

        let ack = client.ping(Duration::from_secs(5)).unwrap();
        let id = responder.join().unwrap();

        assert_eq!(ack.id, id);
        assert!(ack.has_flag(FLAG_BAD_KEY));
    }

    #[test]
    fn ping_times_out() {
        let server = fake_server();
        let client = client_for(&server);

        assert!(matches!(
            client.ping(Duration::from_millis(50)),
            Err(Error::Timeout(_))
        ));
    }

    #[test]
    fn parse_ack_rejects_corruption() {
        let mut bytes = to_bytes(&make_ack(5, 6, 0)).unwrap();
        assert!(parse_ack(&bytes).is_some());

        bytes[17] ^= 1;
        assert!(parse_ack(&bytes).is_none());
        assert!(parse_ack(&bytes[..10]).is_none());
    }
}
