//! Wireless packet link abstractions
//!
//! The glasses talk in discrete packets (one BLE write or notification
//! each). A link is split into a transmit half, owned by the transport, and
//! a receive half, polled by whoever consumes peripheral events.

/// Connection status of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// No peripheral connected
    #[default]
    Disconnected,
    /// Looking for / connecting to the peripheral
    Scanning,
    /// Ready to carry packets
    Connected,
    /// Last connection attempt or write failed
    Error,
}

impl ConnectionState {
    /// Human-readable label for the status line
    pub const fn label(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Scanning => "Scanning...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Error => "Error",
        }
    }

    /// Returns true if packets can be written
    pub const fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl core::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors from link operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// No peripheral connected
    NotConnected,
    /// Write would block; the packet was not sent
    Busy,
    /// Packet larger than the link allows
    PacketTooLarge,
    /// Underlying I/O failed
    Io,
    /// Peer closed the connection
    Closed,
}

/// Transmit half of a packet link
///
/// Every method must return promptly. Connection setup that takes time is
/// started by [`PacketLink::start_scan`] and observed through
/// [`PacketLink::state`].
pub trait PacketLink {
    /// Begin looking for and connecting to the peripheral
    fn start_scan(&mut self) -> Result<(), LinkError>;

    /// Drop the connection
    fn disconnect(&mut self) -> Result<(), LinkError>;

    /// Current connection state
    fn state(&self) -> ConnectionState;

    /// Write one packet
    ///
    /// Must not block. Returns [`LinkError::Busy`] if the packet could not be
    /// queued right now.
    fn write_packet(&mut self, packet: &[u8]) -> Result<(), LinkError>;
}

/// Receive half of a packet link
pub trait PacketSource {
    /// Poll for one inbound packet
    ///
    /// Returns `Ok(Some(len))` with the packet copied into `buf`, or
    /// `Ok(None)` if nothing is pending.
    fn poll_packet(&mut self, buf: &mut [u8]) -> Result<Option<usize>, LinkError>;
}
