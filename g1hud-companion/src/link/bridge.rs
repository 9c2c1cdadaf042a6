//! TCP bridge link
//!
//! Talks to a BLE bridge that relays packets to the glasses. Packets are
//! framed on the stream (see [`g1hud_protocol::frame`]). The socket is
//! non-blocking so neither half ever stalls the scheduler.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use g1hud_hal::{ConnectionState, LinkError, PacketLink, PacketSource};
use g1hud_protocol::{Frame, FrameParser};
use log::{debug, info, warn};

#[derive(Debug, Default)]
struct BridgeShared {
    state: ConnectionState,
    stream: Option<TcpStream>,
}

impl BridgeShared {
    fn drop_stream(&mut self, state: ConnectionState) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
        self.state = state;
    }
}

type Shared = Arc<Mutex<BridgeShared>>;

fn lock(shared: &Shared) -> Result<MutexGuard<'_, BridgeShared>, LinkError> {
    shared.lock().map_err(|_| LinkError::Io)
}

/// Transmit half
#[derive(Debug)]
pub struct BridgeLink {
    address: String,
    timeout: Duration,
    shared: Shared,
}

/// Receive half
#[derive(Debug)]
pub struct BridgeRx {
    shared: Shared,
    parser: FrameParser,
    frames: VecDeque<Frame>,
}

/// Create the two halves for a bridge at `address`
pub fn bridge_link(address: impl Into<String>, timeout: Duration) -> (BridgeLink, BridgeRx) {
    let shared = Shared::default();
    (
        BridgeLink {
            address: address.into(),
            timeout,
            shared: Arc::clone(&shared),
        },
        BridgeRx {
            shared,
            parser: FrameParser::new(),
            frames: VecDeque::new(),
        },
    )
}

fn connect(address: &str, timeout: Duration) -> io::Result<TcpStream> {
    let addrs: Vec<SocketAddr> = address.to_socket_addrs()?.collect();
    let mut last_error = io::Error::new(io::ErrorKind::NotFound, "address resolved to nothing");
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => {
                stream.set_nodelay(true)?;
                stream.set_nonblocking(true)?;
                return Ok(stream);
            }
            Err(e) => last_error = e,
        }
    }
    Err(last_error)
}

impl PacketLink for BridgeLink {
    fn start_scan(&mut self) -> Result<(), LinkError> {
        {
            let mut shared = lock(&self.shared)?;
            if matches!(shared.state, ConnectionState::Scanning | ConnectionState::Connected) {
                return Ok(());
            }
            shared.state = ConnectionState::Scanning;
        }

        info!("Connecting to bridge at {}", self.address);
        let address = self.address.clone();
        let timeout = self.timeout;
        let shared = Arc::clone(&self.shared);
        thread::Builder::new()
            .name("bridge-connect".into())
            .spawn(move || {
                let result = connect(&address, timeout);
                let Ok(mut shared) = shared.lock() else {
                    return;
                };
                // A disconnect while connecting wins
                if shared.state != ConnectionState::Scanning {
                    return;
                }
                match result {
                    Ok(stream) => {
                        info!("Bridge connected");
                        shared.stream = Some(stream);
                        shared.state = ConnectionState::Connected;
                    }
                    Err(e) => {
                        warn!("Bridge connection to {} failed: {}", address, e);
                        shared.state = ConnectionState::Error;
                    }
                }
            })
            .map_err(|e| {
                warn!("Failed to spawn connect thread: {}", e);
                if let Ok(mut shared) = self.shared.lock() {
                    shared.state = ConnectionState::Error;
                }
                LinkError::Io
            })?;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), LinkError> {
        lock(&self.shared)?.drop_stream(ConnectionState::Disconnected);
        info!("Bridge disconnected");
        Ok(())
    }

    fn state(&self) -> ConnectionState {
        self.shared
            .lock()
            .map(|shared| shared.state)
            .unwrap_or(ConnectionState::Error)
    }

    fn write_packet(&mut self, packet: &[u8]) -> Result<(), LinkError> {
        let frame = Frame::new(packet)
            .and_then(|frame| frame.encode_to_vec())
            .map_err(|_| LinkError::PacketTooLarge)?;

        let mut shared = lock(&self.shared)?;
        let stream = shared.stream.as_mut().ok_or(LinkError::NotConnected)?;
        match stream.write(&frame) {
            Ok(n) if n == frame.len() => Ok(()),
            Ok(n) => {
                // The peer sees a torn frame; its parser resyncs on the next START
                debug!("Partial bridge write ({}/{} bytes)", n, frame.len());
                Err(LinkError::Busy)
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(LinkError::Busy),
            Err(e) => {
                warn!("Bridge write failed: {}", e);
                shared.drop_stream(ConnectionState::Error);
                Err(LinkError::Io)
            }
        }
    }
}

impl BridgeRx {
    fn fill(&mut self) -> Result<(), LinkError> {
        let mut shared = lock(&self.shared)?;
        let Some(stream) = shared.stream.as_mut() else {
            return Ok(());
        };

        let mut chunk = [0u8; 256];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => {
                    info!("Bridge closed the connection");
                    shared.drop_stream(ConnectionState::Disconnected);
                    self.parser.reset();
                    return Err(LinkError::Closed);
                }
                Ok(n) => {
                    for &byte in &chunk[..n] {
                        match self.parser.feed(byte) {
                            Ok(Some(frame)) => self.frames.push_back(frame),
                            Ok(None) => {}
                            Err(e) => debug!("Dropped bad frame: {}", e),
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!("Bridge read failed: {}", e);
                    shared.drop_stream(ConnectionState::Error);
                    self.parser.reset();
                    return Err(LinkError::Io);
                }
            }
        }
    }
}

impl PacketSource for BridgeRx {
    fn poll_packet(&mut self, buf: &mut [u8]) -> Result<Option<usize>, LinkError> {
        if self.frames.is_empty() {
            self.fill()?;
        }
        let Some(frame) = self.frames.pop_front() else {
            return Ok(None);
        };
        let dest = buf
            .get_mut(..frame.payload.len())
            .ok_or(LinkError::PacketTooLarge)?;
        dest.copy_from_slice(&frame.payload);
        Ok(Some(frame.payload.len()))
    }
}
