//! Text command packets
//!
//! A text body is split into chunks of at most [`MAX_TEXT_CHUNK`] bytes.
//! Chunks never split a UTF-8 character. All chunks of one body carry the
//! same sequence number and know their index and the total count, so the
//! glasses can reassemble them.

use heapless::Vec;

/// Text command identifier
pub const CMD_TEXT: u8 = 0x4E;
/// Exit to dashboard
pub const CMD_EXIT: u8 = 0x18;
/// Keep-alive, echoed by the glasses
pub const CMD_HEARTBEAT: u8 = 0x25;
/// Battery report from the glasses
pub const CMD_BATTERY: u8 = 0x2C;

/// Bytes before the text in a text packet
pub const TEXT_HEADER_LEN: usize = 7;

/// Maximum text bytes per packet
pub const MAX_TEXT_CHUNK: usize = 191;

/// Maximum size of any packet
pub const MAX_PACKET_SIZE: usize = TEXT_HEADER_LEN + MAX_TEXT_CHUNK;

/// One encoded packet
pub type Packet = Vec<u8, MAX_PACKET_SIZE>;

/// Errors while building or decoding packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Body needs more than 255 packets
    TextTooLong,
    /// Packet shorter than its header
    Truncated,
    /// Command byte not recognized
    UnknownCommand(u8),
}

impl core::fmt::Display for PacketError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PacketError::TextTooLong => f.write_str("text needs more than 255 packets"),
            PacketError::Truncated => f.write_str("packet truncated"),
            PacketError::UnknownCommand(cmd) => write!(f, "unknown command 0x{:02X}", cmd),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PacketError {}

/// Screen mode carried in the STATUS byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ScreenStatus {
    /// Clear the text area
    Blank = 0x70,
    /// Show the carried text
    NewContent = 0x71,
}

impl ScreenStatus {
    /// Status for a body
    pub fn for_text(text: &str) -> Self {
        if text.is_empty() {
            ScreenStatus::Blank
        } else {
            ScreenStatus::NewContent
        }
    }
}

/// End (exclusive) of the chunk starting at `start`
fn chunk_end(text: &str, start: usize) -> usize {
    let mut end = (start + MAX_TEXT_CHUNK).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}

fn count_chunks(text: &str) -> usize {
    if text.is_empty() {
        return 1;
    }
    let mut count = 0;
    let mut start = 0;
    while start < text.len() {
        start = chunk_end(text, start);
        count += 1;
    }
    count
}

/// Iterator over the packets of one text body
#[derive(Debug, Clone)]
pub struct TextPackets<'a> {
    text: &'a str,
    seq: u8,
    status: ScreenStatus,
    total: u8,
    index: u8,
    offset: usize,
}

impl<'a> TextPackets<'a> {
    /// Split `text` into packets sharing `seq`
    pub fn new(seq: u8, text: &'a str) -> Result<Self, PacketError> {
        let total = count_chunks(text);
        if total > u8::MAX as usize {
            return Err(PacketError::TextTooLong);
        }
        Ok(Self {
            text,
            seq,
            status: ScreenStatus::for_text(text),
            total: total as u8,
            index: 0,
            offset: 0,
        })
    }

    /// Number of packets this body needs
    pub fn total(&self) -> u8 {
        self.total
    }
}

impl Iterator for TextPackets<'_> {
    type Item = Packet;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total {
            return None;
        }

        let end = chunk_end(self.text, self.offset);
        let chunk = &self.text.as_bytes()[self.offset..end];

        let mut packet = Packet::new();
        // Header plus one chunk always fits MAX_PACKET_SIZE
        let _ = packet.extend_from_slice(&[
            CMD_TEXT,
            self.seq,
            self.total,
            self.index,
            self.status as u8,
            1, // page
            1, // max page
        ]);
        let _ = packet.extend_from_slice(chunk);

        self.offset = end;
        self.index += 1;
        Some(packet)
    }
}

/// Header fields of a decoded text packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextHeader {
    pub seq: u8,
    pub total: u8,
    pub index: u8,
    pub status: u8,
}

/// Split a text packet into header and text bytes
pub fn parse_text_packet(packet: &[u8]) -> Result<(TextHeader, &[u8]), PacketError> {
    if packet.len() < TEXT_HEADER_LEN {
        return Err(PacketError::Truncated);
    }
    if packet[0] != CMD_TEXT {
        return Err(PacketError::UnknownCommand(packet[0]));
    }
    let header = TextHeader {
        seq: packet[1],
        total: packet[2],
        index: packet[3],
        status: packet[4],
    };
    Ok((header, &packet[TEXT_HEADER_LEN..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_single_blank_packet() {
        let packets: std::vec::Vec<_> = TextPackets::new(7, "").unwrap().collect();
        assert_eq!(packets.len(), 1);

        let (header, text) = parse_text_packet(&packets[0]).unwrap();
        assert_eq!(header.seq, 7);
        assert_eq!(header.total, 1);
        assert_eq!(header.index, 0);
        assert_eq!(header.status, ScreenStatus::Blank as u8);
        assert!(text.is_empty());
    }

    #[test]
    fn test_short_text_single_packet() {
        let packets: std::vec::Vec<_> = TextPackets::new(3, "12:30\nMon\n").unwrap().collect();
        assert_eq!(packets.len(), 1);

        let (header, text) = parse_text_packet(&packets[0]).unwrap();
        assert_eq!(header.status, ScreenStatus::NewContent as u8);
        assert_eq!(text, b"12:30\nMon\n");
    }

    #[test]
    fn test_long_text_splits_and_shares_seq() {
        let body = "a".repeat(MAX_TEXT_CHUNK * 2 + 10);
        let packets = TextPackets::new(42, &body).unwrap();
        assert_eq!(packets.total(), 3);

        let mut reassembled = std::string::String::new();
        for (i, packet) in packets.enumerate() {
            let (header, text) = parse_text_packet(&packet).unwrap();
            assert_eq!(header.seq, 42);
            assert_eq!(header.total, 3);
            assert_eq!(header.index as usize, i);
            assert!(text.len() <= MAX_TEXT_CHUNK);
            reassembled.push_str(core::str::from_utf8(text).unwrap());
        }
        assert_eq!(reassembled, body);
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        // 3-byte characters never land exactly on the chunk size
        let body = "€".repeat(100);
        let mut reassembled = std::string::String::new();
        for packet in TextPackets::new(0, &body).unwrap() {
            let (_, text) = parse_text_packet(&packet).unwrap();
            reassembled.push_str(core::str::from_utf8(text).unwrap());
        }
        assert_eq!(reassembled, body);
    }

    #[test]
    fn test_text_too_long() {
        let body = "x".repeat(MAX_TEXT_CHUNK * 256);
        assert_eq!(
            TextPackets::new(0, &body).map(|p| p.total()),
            Err(PacketError::TextTooLong)
        );
    }

    #[test]
    fn test_parse_truncated() {
        assert_eq!(parse_text_packet(&[CMD_TEXT, 1]), Err(PacketError::Truncated));
    }
}
