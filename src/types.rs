//! # Core Transport Types (RFC 9000 Section 12, RFC 9002 Section 2)
//!
//! Fundamental types shared by the recovery subsystem: packet numbers and
//! their spaces, encryption levels and key phases, connection identity, and
//! the monotonic timestamp the whole crate runs on.

use bytes::Bytes;
use core::time::Duration;

// ============================================================================
// Packet Numbers (RFC 9000 Section 12.3)
// ============================================================================

/// Packet Number - Monotonically increasing per packet number space
///
/// Packet numbers are 62-bit integers (0 to 2^62-1) that increase
/// monotonically within each packet number space.
pub type PacketNumber = u64;

/// Maximum packet number value (2^62 - 1)
pub const MAX_PACKET_NUMBER: u64 = (1u64 << 62) - 1;

/// Packet Number Space (RFC 9000 Section 12.3)
///
/// QUIC uses three separate packet number spaces to avoid ambiguity.
/// Per-space recovery state is triplicated and indexed by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketNumberSpace {
    /// Initial packet space (Initial packets)
    Initial = 0,
    /// Handshake packet space (Handshake packets)
    Handshake = 1,
    /// Application data packet space (0-RTT and 1-RTT packets)
    ApplicationData = 2,
}

impl PacketNumberSpace {
    /// Number of packet number spaces.
    pub const COUNT: usize = 3;

    /// All spaces in timer tie-break order (Initial < Handshake < ApplicationData).
    pub const ALL: [PacketNumberSpace; Self::COUNT] = [
        PacketNumberSpace::Initial,
        PacketNumberSpace::Handshake,
        PacketNumberSpace::ApplicationData,
    ];

    /// Index into per-space state arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl core::fmt::Display for PacketNumberSpace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            PacketNumberSpace::Initial => "initial",
            PacketNumberSpace::Handshake => "handshake",
            PacketNumberSpace::ApplicationData => "application_data",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Encryption Levels and Key Phases (RFC 9001 Section 2.1, 4.1)
// ============================================================================

/// Encryption level a packet or frame was protected at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionLevel {
    Initial,
    ZeroRtt,
    Handshake,
    OneRtt,
}

impl EncryptionLevel {
    /// Packet number space the level's packets are tracked in
    /// (RFC 9001 Section 4.1.1: 0-RTT and 1-RTT share the application space).
    pub fn pn_space(self) -> PacketNumberSpace {
        match self {
            EncryptionLevel::Initial => PacketNumberSpace::Initial,
            EncryptionLevel::Handshake => PacketNumberSpace::Handshake,
            EncryptionLevel::ZeroRtt | EncryptionLevel::OneRtt => {
                PacketNumberSpace::ApplicationData
            }
        }
    }
}

impl core::fmt::Display for EncryptionLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            EncryptionLevel::Initial => "initial",
            EncryptionLevel::ZeroRtt => "0rtt",
            EncryptionLevel::Handshake => "handshake",
            EncryptionLevel::OneRtt => "1rtt",
        };
        f.write_str(name)
    }
}

/// Packet protection key phase.
///
/// `Phase0` and `Phase1` are the two 1-RTT key phases (RFC 9001 Section 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Initial,
    ZeroRtt,
    Handshake,
    Phase0,
    Phase1,
}

// ============================================================================
// Connection Metadata
// ============================================================================

/// Which side opened the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Accepted from a peer (server side).
    Incoming,
    /// Dialed to a peer (client side).
    Outgoing,
}

/// Long/short header packet type, carried through for logging only.
///
/// `VersionNegotiation` packets carry no packet number and are never
/// tracked by recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    Initial,
    ZeroRtt,
    Handshake,
    Retry,
    OneRtt,
    VersionNegotiation,
}

/// Maximum length of a Connection ID (20 bytes per RFC 9000)
pub const MAX_CID_LENGTH: usize = 20;

/// Connection ID - Version-independent identifier (RFC 8999 Section 5.3)
///
/// Opaque byte sequence chosen by an endpoint. Zero-length CIDs are
/// permitted.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId {
    bytes: Bytes,
}

impl ConnectionId {
    /// Create a new ConnectionId from bytes
    ///
    /// Returns None if length exceeds MAX_CID_LENGTH
    pub fn new(bytes: Bytes) -> Option<Self> {
        if bytes.len() > MAX_CID_LENGTH {
            return None;
        }
        Some(Self { bytes })
    }

    /// Create from a borrowed slice (copies data)
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() > MAX_CID_LENGTH {
            return None;
        }
        Some(Self {
            bytes: Bytes::copy_from_slice(slice),
        })
    }

    /// Create an empty (zero-length) connection ID
    pub fn empty() -> Self {
        Self {
            bytes: Bytes::new(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl core::fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ConnectionId({:02x?})", &self.bytes[..])
    }
}

impl core::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for byte in &self.bytes[..] {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

// ============================================================================
// Monotonic Time
// ============================================================================

/// Monotonic timestamp with nanosecond resolution.
///
/// The caller supplies a monotonic clock source (see [`crate::clock::Clock`]);
/// timestamps are nanoseconds since an arbitrary per-process epoch. Absent
/// timestamps are modeled as `Option<Instant>`, never as a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    nanos: u64,
}

impl Instant {
    /// The process epoch.
    pub const ZERO: Instant = Instant { nanos: 0 };

    /// Create an Instant from nanoseconds since epoch
    pub fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Get nanoseconds since epoch
    pub fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Duration since another instant, or None if `other` is later.
    pub fn duration_since(&self, other: Instant) -> Option<Duration> {
        self.nanos
            .checked_sub(other.nanos)
            .map(Duration::from_nanos)
    }

    /// Duration since another instant, zero if `other` is later.
    pub fn saturating_duration_since(&self, other: Instant) -> Duration {
        Duration::from_nanos(self.nanos.saturating_sub(other.nanos))
    }

    /// Add a duration to this instant
    pub fn checked_add(&self, duration: Duration) -> Option<Instant> {
        u64::try_from(duration.as_nanos())
            .ok()
            .and_then(|n| self.nanos.checked_add(n))
            .map(Instant::from_nanos)
    }

    /// Add a duration, clamping at the representable maximum.
    pub fn saturating_add(&self, duration: Duration) -> Instant {
        self.checked_add(duration)
            .unwrap_or(Instant { nanos: u64::MAX })
    }

    /// Subtract a duration from this instant
    pub fn checked_sub(&self, duration: Duration) -> Option<Instant> {
        u64::try_from(duration.as_nanos())
            .ok()
            .and_then(|n| self.nanos.checked_sub(n))
            .map(Instant::from_nanos)
    }

    /// Subtract a duration, clamping at the epoch.
    pub fn saturating_sub(&self, duration: Duration) -> Instant {
        self.checked_sub(duration).unwrap_or(Instant::ZERO)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
