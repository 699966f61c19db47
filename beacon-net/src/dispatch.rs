//! Turning a raw datagram into a request.
//!
//! Decoding is pure: it never sends, logs or stores anything. The caller
//! acts on the returned [`Request`]. Anything that fails a check comes back
//! as a [`Discard`], which must be dropped without a reply.

use crate::{
    de::from_prefix,
    packets::{checksum, received_crc, Fix, FixPacket, Header, Packet, PingPacket, RequestType},
};
use std::convert::TryFrom;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Request {
    Nop,
    Ping { id: u16 },
    Fix(Fix),
    /// A request type this side does not know. Dropped for forward
    /// compatibility.
    Unknown(u16),
}

/// A datagram that passed the length and CRC checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Datagram {
    /// May be zero; the wire format does not forbid it.
    pub key: u64,
    pub request: Request,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Discard {
    #[error("datagram of {0} bytes is shorter than a header")]
    TooShort(usize),
    #[error("crc mismatch (received {received:#06x}, calculated {calculated:#06x})")]
    BadCrc { received: u16, calculated: u16 },
    #[error("{kind:?} request needs {need} bytes, got {len}")]
    Truncated {
        kind: RequestType,
        need: usize,
        len: usize,
    },
}

/// Validates `datagram` and extracts its request.
///
/// The magic number is not compared on its own; it is covered by the CRC.
/// Bytes beyond the end of the declared packet are covered by the CRC too,
/// and otherwise ignored.
pub fn decode(datagram: &[u8]) -> Result<Datagram, Discard> {
    let len = datagram.len();
    let (received, calculated) = match (received_crc(datagram), checksum(datagram)) {
        (Some(received), Some(calculated)) => (received, calculated),
        _ => return Err(Discard::TooShort(len)),
    };

    if received != calculated {
        return Err(Discard::BadCrc {
            received,
            calculated,
        });
    }

    let header: Header = from_prefix(datagram).map_err(|_| Discard::TooShort(len))?;

    let request = match RequestType::try_from(header.kind) {
        Ok(RequestType::Nop) => Request::Nop,
        Ok(RequestType::Ping) => {
            let ping: PingPacket = read(datagram, RequestType::Ping)?;
            Request::Ping { id: ping.id }
        }
        Ok(RequestType::Fix) => {
            let fix: FixPacket = read(datagram, RequestType::Fix)?;
            Request::Fix(Fix::from(&fix))
        }
        Err(kind) => Request::Unknown(kind),
    };

    Ok(Datagram {
        key: header.key,
        request,
    })
}

fn read<P>(datagram: &[u8], kind: RequestType) -> Result<P, Discard>
where
    P: Packet + serde::de::DeserializeOwned,
{
    let truncated = Discard::Truncated {
        kind,
        need: P::SIZE,
        len: datagram.len(),
    };

    if datagram.len() < P::SIZE {
        return Err(truncated);
    }

    from_prefix(datagram).map_err(|_| truncated)
}
