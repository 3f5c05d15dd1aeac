//! Collaborator seams for the recovery subsystem.
//!
//! The loss detector orchestrates but does not own congestion control,
//! frame regeneration, probe sending, or key state; those live behind the
//! traits here. Every callback is invoked while the loss-detection mutex is
//! held: implementations must be non-blocking and must not call back into
//! the detector.

use crate::frames::{EcnCounts, FrameId};
use crate::recovery::sent_packets::PacketInfo;
use crate::types::{ConnectionId, Direction, EncryptionLevel, KeyPhase, PacketNumber};
use std::collections::BTreeMap;

/// Congestion controller notifications (RFC 9002 Section 7).
///
/// The detector reports send/ack/loss events and asks for probe credit; it
/// never reads or mutates controller state directly.
pub trait CongestionController: Send + Sync {
    /// An in-flight packet of `bytes` left the endpoint.
    fn on_packet_sent(&self, bytes: usize);

    /// A previously in-flight packet was acknowledged.
    fn on_packet_acked(&self, packet: &PacketInfo);

    /// In-flight packets were declared lost, keyed by packet number.
    fn on_packets_lost(&self, packets: &BTreeMap<PacketNumber, &PacketInfo>);

    /// The peer reported ECN counts on an ACK whose largest-acknowledged
    /// packet is still tracked (RFC 9002 Section 7.5).
    fn process_ecn(&self, largest_acked: &PacketInfo, ecn: &EcnCounts);

    /// Grant window credit for a probe packet the detector is sending.
    fn add_extra_credit(&self);
}

/// A component that produced frames and wants to hear about their fate.
///
/// The detector holds only a weak handle (captured at send time); a
/// generator that has been dropped silently stops receiving callbacks.
pub trait FrameGenerator: Send + Sync {
    fn on_frame_acked(&self, id: FrameId);
    fn on_frame_lost(&self, id: FrameId);
}

/// Queues a PING frame at the given encryption level.
pub trait Pinger: Send + Sync {
    fn request(&self, level: EncryptionLevel);
}

/// Queues PADDING at the given encryption level.
pub trait Padder: Send + Sync {
    fn request(&self, level: EncryptionLevel);
}

/// Packet protection key availability (RFC 9001 Section 4).
pub trait KeyInfo: Send + Sync {
    fn is_encryption_key_available(&self, phase: KeyPhase) -> bool;
    fn is_decryption_key_available(&self, phase: KeyPhase) -> bool;
}

/// Identity of the enclosing connection.
pub trait ConnectionInfo: Send + Sync {
    fn direction(&self) -> Direction;

    /// Connection id, for logging.
    fn connection_id(&self) -> ConnectionId;
}

/// Connection-level events the detector raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackEvent {
    PacketLost,
}

/// The enclosing connection's view handed to the detector at construction.
pub trait RecoveryContext: Send + Sync {
    fn connection_info(&self) -> &dyn ConnectionInfo;

    fn key_info(&self) -> &dyn KeyInfo;

    /// Raise a connection-level event about a tracked packet.
    fn trigger(&self, event: CallbackEvent, packet: &PacketInfo);
}
