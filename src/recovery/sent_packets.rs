//! Sent-packet tracking (RFC 9002 Section 2, Appendix A.1).
//!
//! One ordered table per packet number space holds the descriptor of every
//! packet from the moment it is sent until it is acknowledged, declared
//! lost, or the detector is reset.

use crate::frames::FrameId;
use crate::recovery::ack_ranges::PacketNumberRange;
use crate::recovery::traits::FrameGenerator;
use crate::types::{Instant, PacketNumber, PacketNumberSpace, PacketType};
use std::collections::btree_map::{self, BTreeMap};
use std::sync::Weak;

/// One frame inside a sent packet, with a weak handle back to whatever
/// generated it.
///
/// The handle is weak so a retired generator never keeps descriptors alive
/// (and vice versa); its callbacks are simply skipped once it is gone.
#[derive(Clone)]
pub struct FrameRecord {
    pub id: FrameId,
    pub generated_by: Weak<dyn FrameGenerator>,
}

impl FrameRecord {
    pub fn new(id: FrameId, generated_by: Weak<dyn FrameGenerator>) -> Self {
        Self { id, generated_by }
    }
}

impl core::fmt::Debug for FrameRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameRecord")
            .field("id", &self.id)
            .field("generator_alive", &(self.generated_by.strong_count() > 0))
            .finish()
    }
}

/// Descriptor of a locally-sent packet (RFC 9002 Appendix A.1.1).
#[derive(Debug, Clone)]
pub struct PacketInfo {
    /// Monotonically increasing within `pn_space` (caller contract).
    pub packet_number: PacketNumber,

    pub pn_space: PacketNumberSpace,

    /// Carried through for logging only.
    pub packet_type: PacketType,

    pub time_sent: Instant,

    /// Contains at least one ack-eliciting frame.
    pub ack_eliciting: bool,

    /// Counts toward congestion-window occupancy.
    pub in_flight: bool,

    /// Carries CRYPTO frames (Initial or Handshake space).
    pub is_crypto_packet: bool,

    pub sent_bytes: usize,

    pub frames: Vec<FrameRecord>,
}

/// Ordered map of in-flight descriptors for one packet number space.
///
/// Packet-number ordering is what lets the loss scan stop at the first key
/// above `largest_acked` and lets ACK expansion walk ranges directly.
#[derive(Debug, Default)]
pub struct SentPacketTable {
    packets: BTreeMap<PacketNumber, PacketInfo>,
}

impl SentPacketTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor. Returns the displaced descriptor if the packet
    /// number was already tracked (a caller-contract violation).
    pub fn insert(&mut self, packet: PacketInfo) -> Option<PacketInfo> {
        self.packets.insert(packet.packet_number, packet)
    }

    pub fn remove(&mut self, packet_number: PacketNumber) -> Option<PacketInfo> {
        self.packets.remove(&packet_number)
    }

    pub fn get(&self, packet_number: PacketNumber) -> Option<&PacketInfo> {
        self.packets.get(&packet_number)
    }

    pub fn contains(&self, packet_number: PacketNumber) -> bool {
        self.packets.contains_key(&packet_number)
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn clear(&mut self) {
        self.packets.clear();
    }

    /// Ascending packet-number iteration.
    pub fn iter(&self) -> btree_map::Iter<'_, PacketNumber, PacketInfo> {
        self.packets.iter()
    }

    /// Tracked descriptors inside an acknowledged range, ascending.
    pub fn in_range(
        &self,
        range: &PacketNumberRange,
    ) -> btree_map::Range<'_, PacketNumber, PacketInfo> {
        self.packets.range(range.lo()..=range.hi())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
