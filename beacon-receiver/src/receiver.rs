//! The receiving side of the protocol.
//!
//! [`Receiver::run`] frames a UDP socket and [`serve`] takes the datagrams
//! one at a time, handing each to [`dispatch`]. That sends acks through a
//! [`Transport`] and reports fixes to a [`Handler`]. Nothing is kept between
//! datagrams.

use crate::{
    client::Client,
    codec::DatagramCodec,
    error::{Error, Result},
    handler::Handler,
};
use beacon_net::{
    dispatch::{decode, Datagram, Discard, Request},
    packets::make_ack,
    ser::to_bytes,
};
use std::{future::Future, io, net::SocketAddr, sync::Arc};
use tokio::net::UdpSocket;
use tokio_stream::{Stream, StreamExt};
use tokio_util::udp::UdpFramed;
use tracing::{debug, error, info, trace};

/// Outbound half of the datagram transport.
pub trait Transport {
    /// Sends without waiting. A failure only concerns this one datagram.
    fn send(&self, bytes: &[u8], destination: SocketAddr) -> io::Result<()>;
}

impl Transport for UdpSocket {
    fn send(&self, bytes: &[u8], destination: SocketAddr) -> io::Result<()> {
        let sent = self.try_send_to(bytes, destination)?;
        if sent != bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sent {} of {} bytes", sent, bytes.len()),
            ));
        }

        Ok(())
    }
}

/// Validates and acts on one raw datagram.
pub fn deliver<T, H>(transport: &T, handler: &mut H, bytes: &[u8], from: SocketAddr)
where
    T: Transport + ?Sized,
    H: Handler + ?Sized,
{
    dispatch(transport, handler, decode(bytes), from)
}

/// Acts on a decoded datagram.
///
/// Discarded datagrams get no reply at all. Pings with key 0 are dropped as
/// well, since an ack must carry the key it answers.
pub fn dispatch<T, H>(
    transport: &T,
    handler: &mut H,
    decoded: std::result::Result<Datagram, Discard>,
    from: SocketAddr,
) where
    T: Transport + ?Sized,
    H: Handler + ?Sized,
{
    let datagram = match decoded {
        Ok(datagram) => datagram,
        Err(reason) => {
            trace!(%from, %reason, "Discarding datagram");
            return;
        }
    };

    let client = Client {
        address: from,
        key: datagram.key,
    };

    match datagram.request {
        Request::Nop => {}
        Request::Ping { id } => {
            if client.key == 0 {
                trace!(%from, id, "Discarding ping without key");
                return;
            }

            debug!(%from, key = client.key, id, "Ping");
            match to_bytes(&make_ack(client.key, id, 0)) {
                Ok(bytes) => {
                    if let Err(e) = transport.send(&bytes, from) {
                        handler.on_send_error(from, &e);
                    }
                }
                Err(e) => error!(error = %e, "Failed to encode ack"),
            }
        }
        Request::Fix(fix) => handler.on_fix(&client, &fix),
        Request::Unknown(kind) => trace!(%from, kind, "Discarding unknown request"),
    }
}

pub struct Receiver {
    socket: Arc<UdpSocket>,
}

impl Receiver {
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;

        Ok(Self::from_socket(socket))
    }

    pub fn from_socket(socket: UdpSocket) -> Self {
        Self {
            socket: Arc::new(socket),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Runs until `shutdown` completes or the socket fails.
    ///
    /// A receive failure is reported to [`Handler::on_fatal_error`] and
    /// returned as [`Error::Receive`]. The socket is closed either way.
    pub async fn run<H, F>(self, handler: &mut H, shutdown: F) -> Result<()>
    where
        H: Handler + ?Sized,
        F: Future<Output = ()>,
    {
        let frames = UdpFramed::new(Arc::clone(&self.socket), DatagramCodec);
        serve(frames, &*self.socket, handler, shutdown).await
    }
}

/// One decoded datagram and its sender, or a transport failure.
pub type Frame = io::Result<(std::result::Result<Datagram, Discard>, SocketAddr)>;

/// Dispatches frames one at a time until `shutdown` completes, the stream
/// ends or it yields an error.
///
/// An error is fatal: it goes to [`Handler::on_fatal_error`], nothing after
/// it is read, and it is returned as [`Error::Receive`].
pub async fn serve<S, T, H, F>(
    mut frames: S,
    transport: &T,
    handler: &mut H,
    shutdown: F,
) -> Result<()>
where
    S: Stream<Item = Frame> + Unpin,
    T: Transport + ?Sized,
    H: Handler + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Receiver shutting down");
                return Ok(());
            }
            frame = frames.next() => match frame {
                Some(Ok((decoded, from))) => dispatch(transport, handler, decoded, from),
                Some(Err(e)) => {
                    handler.on_fatal_error(&e);
                    return Err(Error::Receive(e));
                }
                None => return Ok(()),
            }
        }
    }
}
