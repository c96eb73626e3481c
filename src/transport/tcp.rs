use std::{
    collections::VecDeque,
    io::{self, ErrorKind, Read},
    net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs},
};

use super::{Error, FrameAssembler, Transport};
use crate::{protocol::Frame, Protocol};

/// Frames read from a single TCP client.
///
/// The listener and the client socket are both non-blocking. Only one client
/// is served at a time; further connections wait in the backlog until the
/// current client goes away.
pub struct TcpTransport {
    listener: TcpListener,
    client: Option<TcpStream>,
    pending: VecDeque<u8>,
    assembler: FrameAssembler,
}

impl TcpTransport {
    /// Default listening port.
    pub const PORT: u16 = 4001;

    /// Binds a listener on `addr`.
    pub fn bind<A: ToSocketAddrs>(addr: A, protocol: Protocol) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            client: None,
            pending: VecDeque::new(),
            assembler: FrameAssembler::new(protocol),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts a waiting client, if there is one.
    fn accept(&mut self) -> nb::Result<(), Error> {
        let accepted = self.listener.accept().map(|(stream, _peer)| stream);
        self.admit(accepted)
    }

    /// Takes on the result of an accept as the current client.
    fn admit(&mut self, accepted: io::Result<TcpStream>) -> nb::Result<(), Error> {
        let stream = match accepted {
            Ok(stream) => stream,
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                return Err(nb::Error::WouldBlock)
            }
            Err(_) => return Err(nb::Error::Other(Error::AcceptFailed)),
        };
        stream
            .set_nonblocking(true)
            .and_then(|()| stream.set_nodelay(true))
            .map_err(|_| nb::Error::Other(Error::AcceptFailed))?;
        self.client = Some(stream);
        self.pending.clear();
        self.assembler.reset();
        Ok(())
    }

    fn drop_client(&mut self) -> nb::Error<Error> {
        self.client = None;
        self.pending.clear();
        self.assembler.reset();
        nb::Error::Other(Error::Disconnected)
    }

    /// Feeds buffered bytes to the assembler until a frame completes.
    fn assemble(&mut self) -> Option<Result<Frame, Error>> {
        while let Some(byte) = self.pending.pop_front() {
            if let Some(result) = self.assembler.push(byte) {
                return Some(result);
            }
        }
        None
    }
}

impl Transport for TcpTransport {
    fn poll_frame(&mut self) -> nb::Result<Frame, Error> {
        if self.client.is_none() {
            self.accept()?;
        }

        let mut buf = [0u8; 64];
        loop {
            if let Some(result) = self.assemble() {
                return result.map_err(nb::Error::Other);
            }
            let Some(client) = self.client.as_mut() else {
                return Err(nb::Error::WouldBlock);
            };
            match client.read(&mut buf) {
                Ok(0) => return Err(self.drop_client()),
                Ok(n) => self.pending.extend(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    return Err(nb::Error::WouldBlock)
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(_) => return Err(self.drop_client()),
            }
        }
    }

    fn is_connected(&mut self) -> bool {
        self.client.is_some()
    }
}
