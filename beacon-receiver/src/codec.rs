use beacon_net::dispatch::{self, Datagram, Discard};
use bytes::BytesMut;
use std::io;
use tokio_util::codec::Decoder;

/// Decodes whole datagrams for [`tokio_util::udp::UdpFramed`].
///
/// Every non-empty datagram yields exactly one item. Malformed input comes
/// out as a [`Discard`] item rather than an error, so the only errors the
/// framed stream produces are transport failures.
#[derive(Clone, Copy, Debug, Default)]
pub struct DatagramCodec;

impl Decoder for DatagramCodec {
    type Item = Result<Datagram, Discard>;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<Self::Item>> {
        // An empty datagram has nothing to decode; returning an item here
        // would make UdpFramed yield it forever.
        if src.is_empty() {
            return Ok(None);
        }

        let datagram = src.split();
        Ok(Some(dispatch::decode(&datagram)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_net::packets::{seal, PingPacket};

    #[test]
    fn consumes_whole_datagram() {
        let bytes = seal(&mut PingPacket::new(5, 6)).expect("Failed to seal packet");
        let mut src = BytesMut::from(&bytes[..]);

        let item = DatagramCodec.decode(&mut src).expect("decode failed");

        assert!(src.is_empty());
        assert!(matches!(item, Some(Ok(_))));
    }

    #[test]
    fn garbage_is_an_item_not_an_error() {
        let mut src = BytesMut::from(&[1u8, 2, 3][..]);

        let item = DatagramCodec.decode(&mut src).expect("decode failed");

        assert_eq!(item, Some(Err(Discard::TooShort(3))));
        assert!(src.is_empty());
    }

    #[test]
    fn empty_buffer_yields_nothing() {
        let mut src = BytesMut::new();

        assert_eq!(DatagramCodec.decode(&mut src).expect("decode failed"), None);
        assert!(DatagramCodec
            .decode_eof(&mut src)
            .expect("decode_eof failed")
            .is_none());
    }
}
