//! # Loss Detection (RFC 9002 Section 6)
//!
//! The loss detector tracks every sent packet per packet number space,
//! interprets peer ACK frames, declares losses by packet and time
//! thresholds, and drives a single loss-detection timer that dispatches
//! crypto retransmissions, anti-deadlock probes, and PTO probes.
//!
//! ## Locking
//!
//! One mutex guards all detector state; every operation holds it for its
//! entire body and there are no suspension points inside. The two
//! outstanding counters and the shared [`RttMeasure`] use atomics so other
//! tasks can read them without the mutex. Collaborator callbacks run with
//! the mutex held and must neither block nor re-enter the detector.
//!
//! ## Timer
//!
//! The alarm target is stored with nanosecond precision but polled from a
//! recurring 25 ms tick, so arming is a field store instead of a timer
//! reprogram on every send and ack. Alarm firing therefore jitters by up to
//! one tick.

use crate::clock::Clock;
use crate::config::RecoveryConfig;
use crate::error::Result;
use crate::frames::{AckFrame, Frame, FRAME_TYPE_ACK, FRAME_TYPE_ACK_ECN};
use crate::recovery::ack_ranges::expand_ack_frame;
use crate::recovery::rtt::RttMeasure;
use crate::recovery::sent_packets::{PacketInfo, SentPacketTable};
use crate::recovery::traits::{
    CallbackEvent, CongestionController, Padder, Pinger, RecoveryContext,
};
use crate::timer::{Scheduler, TickCallback, TickHandle};
use crate::types::{
    ConnectionId, Direction, EncryptionLevel, Instant, KeyPhase, PacketNumber, PacketNumberSpace,
    PacketType,
};
use core::time::Duration;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, error, trace};

/// Period of the recurring tick that polls the alarm target.
const TICK_PERIOD: Duration = Duration::from_millis(25);

/// Default ACK Delay exponent before the peer's transport parameters are
/// known (RFC 9000 Section 18.2).
const DEFAULT_ACK_DELAY_EXPONENT: u8 = 3;

/// Per-space detector state.
#[derive(Default)]
struct SpaceState {
    /// Monotonically non-decreasing; 0 until the first ACK.
    largest_acked_packet: PacketNumber,

    /// Earliest time an as-yet-unacked packet in this space becomes
    /// loss-eligible.
    loss_time: Option<Instant>,

    sent_packets: SentPacketTable,
}

/// State guarded by the loss-detection mutex.
struct DetectorState {
    spaces: [SpaceState; PacketNumberSpace::COUNT],
    time_of_last_sent_ack_eliciting_packet: Option<Instant>,
    time_of_last_sent_crypto_packet: Option<Instant>,
    loss_detection_alarm_at: Option<Instant>,
    tick: Option<Box<dyn TickHandle>>,
    ack_delay_exponent: u8,
}

impl DetectorState {
    fn new() -> Self {
        Self {
            spaces: Default::default(),
            time_of_last_sent_ack_eliciting_packet: None,
            time_of_last_sent_crypto_packet: None,
            loss_detection_alarm_at: None,
            tick: None,
            ack_delay_exponent: DEFAULT_ACK_DELAY_EXPONENT,
        }
    }
}

/// Loss detection and probe scheduling for one connection.
pub struct LossDetector {
    state: Mutex<DetectorState>,

    /// Tracked descriptors with `ack_eliciting`, summed across spaces.
    /// Written only under the mutex; read lock-free by other components.
    ack_eliciting_outstanding: AtomicU32,

    /// Tracked descriptors with `is_crypto_packet`, summed across spaces.
    crypto_outstanding: AtomicU32,

    rtt: Arc<RttMeasure>,
    cc: Arc<dyn CongestionController>,
    pinger: Arc<dyn Pinger>,
    padder: Arc<dyn Padder>,
    context: Arc<dyn RecoveryContext>,
    scheduler: Arc<dyn Scheduler>,
    clock: Arc<dyn Clock>,

    k_packet_threshold: u32,
    k_time_threshold: f64,

    /// Cached for logging.
    cid: ConnectionId,

    /// Handle the tick callback upgrades to reach the detector.
    weak_self: Weak<LossDetector>,
}

impl LossDetector {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &RecoveryConfig,
        context: Arc<dyn RecoveryContext>,
        cc: Arc<dyn CongestionController>,
        rtt: Arc<RttMeasure>,
        pinger: Arc<dyn Pinger>,
        padder: Arc<dyn Padder>,
        scheduler: Arc<dyn Scheduler>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let cid = context.connection_info().connection_id();
        let detector = Arc::new_cyclic(|weak| Self {
            state: Mutex::new(DetectorState::new()),
            ack_eliciting_outstanding: AtomicU32::new(0),
            crypto_outstanding: AtomicU32::new(0),
            rtt,
            cc,
            pinger,
            padder,
            context,
            scheduler,
            clock,
            k_packet_threshold: config.packet_threshold,
            k_time_threshold: config.time_threshold,
            cid,
            weak_self: weak.clone(),
        });
        detector.reset();
        detector
    }

    /// Frame types this component handles.
    pub fn interests(&self) -> &'static [u8] {
        &[FRAME_TYPE_ACK, FRAME_TYPE_ACK_ECN]
    }

    /// Dispatch a frame decoded at `level`.
    ///
    /// Anything but an ACK here is a dispatch bug in the caller: logged and
    /// asserted in debug builds, ignored in release.
    pub fn handle_frame(&self, level: EncryptionLevel, frame: &Frame) -> Result<()> {
        match frame {
            Frame::Ack(ack) => self.on_ack_received(ack, level.pn_space()),
            other => {
                error!(
                    cid = %self.cid,
                    frame_type = other.frame_type(),
                    "unexpected frame type"
                );
                debug_assert!(false, "loss detector registered for ACK frames only");
                Ok(())
            }
        }
    }

    /// Track a freshly sent packet.
    ///
    /// Packets must arrive in increasing packet-number order within each
    /// space (caller contract). `VersionNegotiation` packets carry no
    /// packet number and are never tracked.
    pub fn on_packet_sent(&self, packet: PacketInfo, in_flight: bool) {
        if packet.packet_type == PacketType::VersionNegotiation {
            return;
        }

        let mut state = self.state.lock();
        let state = &mut *state;

        let now = packet.time_sent;
        let ack_eliciting = packet.ack_eliciting;
        let is_crypto_packet = packet.is_crypto_packet;
        let sent_bytes = packet.sent_bytes;

        debug!(
            cid = %self.cid,
            space = %packet.pn_space,
            pn = packet.packet_number,
            bytes = sent_bytes,
            ack_eliciting,
            "packet sent"
        );

        self.increment_outstanding_counters(&packet);
        let displaced = state.spaces[packet.pn_space.index()]
            .sent_packets
            .insert(packet);
        debug_assert!(displaced.is_none(), "packet number reused within a space");
        if let Some(old) = displaced {
            self.decrement_outstanding_counters(&old);
        }

        if in_flight {
            if is_crypto_packet {
                state.time_of_last_sent_crypto_packet = Some(now);
            }
            if ack_eliciting {
                state.time_of_last_sent_ack_eliciting_packet = Some(now);
            }
            self.cc.on_packet_sent(sent_bytes);
            self.set_loss_detection_timer(state);
        }
    }

    /// Largest packet number the peer has acknowledged in `pn_space`.
    pub fn largest_acked_packet_number(&self, pn_space: PacketNumberSpace) -> PacketNumber {
        self.state.lock().spaces[pn_space.index()].largest_acked_packet
    }

    /// Apply the peer's ack_delay_exponent transport parameter to future
    /// ACK-delay decoding.
    pub fn update_ack_delay_exponent(&self, exponent: u8) {
        self.state.lock().ack_delay_exponent = exponent;
    }

    /// Tracked ack-eliciting descriptors across all spaces. Lock-free.
    pub fn ack_eliciting_outstanding(&self) -> u32 {
        self.ack_eliciting_outstanding.load(Ordering::Relaxed)
    }

    /// Tracked crypto descriptors across all spaces. Lock-free.
    pub fn crypto_outstanding(&self) -> u32 {
        self.crypto_outstanding.load(Ordering::Relaxed)
    }

    /// Cancel the timer and drop every descriptor and sample.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        if let Some(mut tick) = state.tick.take() {
            tick.cancel();
        }
        state.loss_detection_alarm_at = None;

        self.ack_eliciting_outstanding.store(0, Ordering::Relaxed);
        self.crypto_outstanding.store(0, Ordering::Relaxed);

        state.time_of_last_sent_ack_eliciting_packet = None;
        state.time_of_last_sent_crypto_packet = None;
        for space in state.spaces.iter_mut() {
            space.largest_acked_packet = 0;
            space.loss_time = None;
            space.sent_packets.clear();
        }

        self.rtt.reset();
    }

    /// Stop the timer ahead of teardown; no tick callback fires afterward.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        debug!(cid = %self.cid, "shutdown");
        if let Some(mut tick) = state.tick.take() {
            tick.cancel();
        }
        state.loss_detection_alarm_at = None;
    }

    // ========================================================================
    // ACK processing
    // ========================================================================

    fn on_ack_received(&self, ack: &AckFrame, pn_space: PacketNumberSpace) -> Result<()> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let idx = pn_space.index();

        // Expand before touching anything: a malformed ACK must leave the
        // detector unchanged.
        let ranges = expand_ack_frame(ack)?;

        state.spaces[idx].largest_acked_packet = state.spaces[idx]
            .largest_acked_packet
            .max(ack.largest_acknowledged);

        // Intersect the expanded ranges with the tracked descriptors,
        // descending. ACKs for packets we never sent fall out here.
        let mut newly_acked: Vec<PacketNumber> = Vec::new();
        for range in &ranges {
            for (&pn, _) in state.spaces[idx].sent_packets.in_range(range).rev() {
                newly_acked.push(pn);
            }
        }
        if newly_acked.is_empty() {
            return Ok(());
        }

        // RTT samples come only from the largest-acknowledged descriptor,
        // so reordered ACKs never feed stale samples in.
        let includes_ack_eliciting = newly_acked.iter().any(|&pn| {
            state.spaces[idx]
                .sent_packets
                .get(pn)
                .is_some_and(|p| p.ack_eliciting)
        });
        if let Some(largest_info) = state.spaces[idx].sent_packets.get(ack.largest_acknowledged) {
            if largest_info.ack_eliciting || includes_ack_eliciting {
                let latest_rtt = self
                    .clock
                    .now()
                    .saturating_duration_since(largest_info.time_sent);
                // The wire field is microseconds scaled down by the peer's
                // ack_delay_exponent.
                let ack_delay = Duration::from_micros(
                    ack.ack_delay
                        .checked_shl(u32::from(state.ack_delay_exponent))
                        .unwrap_or(u64::MAX),
                );
                self.rtt.update_rtt(latest_rtt, ack_delay);
            }

            if let Some(ecn) = &ack.ecn_counts {
                self.cc.process_ecn(largest_info, ecn);
            }
        }

        trace!(
            cid = %self.cid,
            space = %pn_space,
            unacked = state.spaces[idx].sent_packets.len(),
            ack_eliciting_outstanding = self.ack_eliciting_outstanding(),
            crypto_outstanding = self.crypto_outstanding(),
            newly_acked = newly_acked.len(),
            "ack received"
        );

        for &pn in &newly_acked {
            self.on_packet_acked(state, pn_space, pn);
        }

        self.detect_lost_packets(state, pn_space, self.clock.now());

        // An ACK proves the peer is reachable and the RTT is current.
        self.rtt.set_crypto_count(0);
        self.rtt.set_pto_count(0);

        self.set_loss_detection_timer(state);
        Ok(())
    }

    fn on_packet_acked(
        &self,
        state: &mut DetectorState,
        pn_space: PacketNumberSpace,
        packet_number: PacketNumber,
    ) {
        // Callbacks see the descriptor while it is still tracked; removal
        // (and the counter decrements) comes last, as in the loss and
        // crypto-retransmit paths.
        {
            let Some(packet) = state.spaces[pn_space.index()]
                .sent_packets
                .get(packet_number)
            else {
                return;
            };

            debug!(cid = %self.cid, space = %pn_space, pn = packet_number, "packet acked");

            if packet.in_flight {
                self.cc.on_packet_acked(packet);
            }

            for record in &packet.frames {
                if let Some(generator) = record.generated_by.upgrade() {
                    generator.on_frame_acked(record.id);
                }
            }
        }

        if let Some(packet) = state.spaces[pn_space.index()]
            .sent_packets
            .remove(packet_number)
        {
            self.decrement_outstanding_counters(&packet);
        }
    }

    // ========================================================================
    // Loss detection
    // ========================================================================

    fn detect_lost_packets(
        &self,
        state: &mut DetectorState,
        pn_space: PacketNumberSpace,
        now: Instant,
    ) {
        let idx = pn_space.index();
        let largest_acked = state.spaces[idx].largest_acked_packet;

        // RFC 9002 Section 6.1.2 lower-bounds the loss delay with
        // max(..., kGranularity); this takes min(), capping it instead.
        // Kept as-is pending review.
        let max_rtt = self.rtt.latest_rtt().max(self.rtt.smoothed_rtt());
        let loss_delay = max_rtt
            .mul_f64(self.k_time_threshold)
            .min(self.rtt.granularity());

        // Packets sent before this time are deemed lost.
        let lost_send_time = now.saturating_sub(loss_delay);
        // Packets with packet numbers before this are deemed lost.
        let lost_pn = largest_acked.saturating_sub(u64::from(self.k_packet_threshold));

        let mut lost_pns: Vec<PacketNumber> = Vec::new();
        let mut loss_time: Option<Instant> = None;
        for (&pn, unacked) in state.spaces[idx].sent_packets.iter() {
            if pn > largest_acked {
                // Sorted by packet number: nothing past largest_acked can
                // be declared lost yet.
                break;
            }

            if unacked.time_sent < lost_send_time || pn < lost_pn {
                if unacked.time_sent < lost_send_time {
                    debug!(
                        cid = %self.cid,
                        space = %pn_space,
                        pn,
                        sent_at = unacked.time_sent.as_nanos(),
                        loss_delay_us = loss_delay.as_micros() as u64,
                        "lost: time since sent exceeds loss delay"
                    );
                } else {
                    debug!(
                        cid = %self.cid,
                        space = %pn_space,
                        pn,
                        largest_acked,
                        packet_threshold = self.k_packet_threshold,
                        "lost: packet threshold exceeded"
                    );
                }
                if unacked.in_flight {
                    lost_pns.push(pn);
                }
            } else {
                let when = unacked.time_sent.saturating_add(loss_delay);
                loss_time = Some(loss_time.map_or(when, |t| t.min(when)));
            }
        }
        state.spaces[idx].loss_time = loss_time;

        if lost_pns.is_empty() {
            return;
        }

        {
            let table = &state.spaces[idx].sent_packets;
            let lost: BTreeMap<PacketNumber, &PacketInfo> = lost_pns
                .iter()
                .filter_map(|&pn| table.get(pn).map(|packet| (pn, packet)))
                .collect();

            self.cc.on_packets_lost(&lost);

            // Retransmission fires immediately after reporting the loss,
            // without waiting for congestion-controller feedback. Whether
            // it should be deferred is unresolved.
            for packet in lost.values() {
                self.context.trigger(CallbackEvent::PacketLost, packet);
                self.retransmit_lost_packet(packet);
            }
        }

        for &pn in &lost_pns {
            if let Some(packet) = state.spaces[idx].sent_packets.remove(pn) {
                self.decrement_outstanding_counters(&packet);
            }
        }
    }

    fn retransmit_lost_packet(&self, packet: &PacketInfo) {
        debug!(
            cid = %self.cid,
            packet_type = ?packet.packet_type,
            pn = packet.packet_number,
            "retransmit"
        );
        for record in &packet.frames {
            if let Some(generator) = record.generated_by.upgrade() {
                generator.on_frame_lost(record.id);
            }
        }
    }

    fn retransmit_all_unacked_crypto_data(&self, state: &mut DetectorState) {
        for pn_space in PacketNumberSpace::ALL {
            let idx = pn_space.index();
            let crypto_pns: Vec<PacketNumber> = state.spaces[idx]
                .sent_packets
                .iter()
                .filter(|(_, packet)| packet.is_crypto_packet)
                .map(|(&pn, _)| pn)
                .collect();
            if crypto_pns.is_empty() {
                continue;
            }

            {
                let table = &state.spaces[idx].sent_packets;
                let lost: BTreeMap<PacketNumber, &PacketInfo> = crypto_pns
                    .iter()
                    .filter_map(|&pn| table.get(pn).map(|packet| (pn, packet)))
                    .collect();
                for packet in lost.values() {
                    self.retransmit_lost_packet(packet);
                }
                self.cc.on_packets_lost(&lost);
            }

            for &pn in &crypto_pns {
                if let Some(packet) = state.spaces[idx].sent_packets.remove(pn) {
                    self.decrement_outstanding_counters(&packet);
                }
            }
        }
    }

    // ========================================================================
    // Timer
    // ========================================================================

    /// Earliest per-space loss time; ties go to the earlier space
    /// (Initial < Handshake < ApplicationData).
    fn earliest_loss_time(state: &DetectorState) -> Option<(Instant, PacketNumberSpace)> {
        let mut earliest: Option<(Instant, PacketNumberSpace)> = None;
        for pn_space in PacketNumberSpace::ALL {
            if let Some(time) = state.spaces[pn_space.index()].loss_time {
                match earliest {
                    Some((t, _)) if t <= time => {}
                    _ => earliest = Some((time, pn_space)),
                }
            }
        }
        earliest
    }

    fn set_loss_detection_timer(&self, state: &mut DetectorState) {
        // Time-threshold loss detection pending in some space.
        if let Some((alarm, pn_space)) = Self::earliest_loss_time(state) {
            self.update_timer(state, alarm);
            debug!(
                cid = %self.cid,
                space = %pn_space,
                in_ms = alarm.saturating_duration_since(self.clock.now()).as_millis() as u64,
                "time threshold loss detection timer armed"
            );
            return;
        }

        // Crypto retransmission.
        if self.crypto_outstanding() > 0 || self.is_client_without_one_rtt_key() {
            let timeout = self.rtt.handshake_retransmit_timeout();
            let base = state
                .time_of_last_sent_crypto_packet
                .unwrap_or(Instant::ZERO);
            let alarm = base.saturating_add(timeout);
            self.update_timer(state, alarm);
            debug!(
                cid = %self.cid,
                in_ms = timeout.as_millis() as u64,
                "crypto retransmission timer armed"
            );
            return;
        }

        // Nothing ack-eliciting in flight: no alarm to arm.
        if self.ack_eliciting_outstanding() == 0 {
            if state.tick.is_some() {
                state.loss_detection_alarm_at = None;
                if let Some(mut tick) = state.tick.take() {
                    tick.cancel();
                }
                debug!(cid = %self.cid, "loss detection alarm unset");
            }
            return;
        }

        // PTO.
        let period = self.rtt.current_pto_period();
        let base = state
            .time_of_last_sent_ack_eliciting_packet
            .unwrap_or(Instant::ZERO);
        let alarm = base.saturating_add(period);
        self.update_timer(state, alarm);
        debug!(
            cid = %self.cid,
            in_ms = period.as_millis() as u64,
            "pto timer armed"
        );
    }

    fn update_timer(&self, state: &mut DetectorState, alarm_at: Instant) {
        state.loss_detection_alarm_at = Some(alarm_at);
        if state.tick.is_none() {
            let weak = self.weak_self.clone();
            let callback: TickCallback = Arc::new(move || {
                if let Some(detector) = weak.upgrade() {
                    detector.on_interval();
                }
            });
            state.tick = Some(self.scheduler.schedule_every(TICK_PERIOD, callback));
        }
    }

    /// Recurring tick: fire the alarm once its target has passed.
    fn on_interval(&self) {
        let mut state = self.state.lock();
        let state = &mut *state;
        let now = self.clock.now();
        match state.loss_detection_alarm_at {
            Some(alarm_at) if now >= alarm_at => {
                state.loss_detection_alarm_at = None;
                self.on_loss_detection_timeout(state, now);
            }
            // Not due yet, or already cleared: stale tick, nothing to do.
            _ => {}
        }
    }

    fn on_loss_detection_timeout(&self, state: &mut DetectorState, now: Instant) {
        if let Some((_, pn_space)) = Self::earliest_loss_time(state) {
            // Time threshold loss detection.
            self.detect_lost_packets(state, pn_space, now);
        } else if self.crypto_outstanding() > 0 {
            trace!(cid = %self.cid, "crypto retransmission");
            self.retransmit_all_unacked_crypto_data(state);
            self.rtt.set_crypto_count(self.rtt.crypto_count() + 1);
        } else if self.is_client_without_one_rtt_key() {
            // Anti-deadlock probe: a Handshake packet proves address
            // ownership; a padded Initial earns anti-amplification credit.
            if self
                .context
                .key_info()
                .is_encryption_key_available(KeyPhase::Handshake)
            {
                self.send_one_handshake_packet();
            } else {
                self.send_one_padded_packet();
            }
            self.rtt.set_crypto_count(self.rtt.crypto_count() + 1);
        } else {
            trace!(cid = %self.cid, "pto");
            self.send_one_or_two_packets();
            self.rtt.set_pto_count(self.rtt.pto_count() + 1);
        }

        if tracing::enabled!(tracing::Level::TRACE) {
            for pn_space in PacketNumberSpace::ALL {
                for (&pn, packet) in state.spaces[pn_space.index()].sent_packets.iter() {
                    trace!(
                        cid = %self.cid,
                        space = %pn_space,
                        pn,
                        is_crypto = packet.is_crypto_packet,
                        ack_eliciting = packet.ack_eliciting,
                        bytes = packet.sent_bytes,
                        "unacked"
                    );
                }
            }
        }

        self.set_loss_detection_timer(state);
    }

    // ========================================================================
    // Probes
    // ========================================================================

    fn send_packet(&self, level: EncryptionLevel, padded: bool) {
        if padded {
            self.padder.request(level);
        } else {
            self.pinger.request(level);
        }
        self.cc.add_extra_credit();
    }

    fn send_one_or_two_packets(&self) {
        self.send_packet(EncryptionLevel::OneRtt, false);
        self.send_packet(EncryptionLevel::OneRtt, false);
        debug!(cid = %self.cid, level = %EncryptionLevel::OneRtt, "pto probe pings requested");
    }

    fn send_one_handshake_packet(&self) {
        self.send_packet(EncryptionLevel::Handshake, false);
        debug!(cid = %self.cid, level = %EncryptionLevel::Handshake, "anti-deadlock ping requested");
    }

    fn send_one_padded_packet(&self) {
        self.send_packet(EncryptionLevel::Initial, true);
        debug!(cid = %self.cid, level = %EncryptionLevel::Initial, "anti-deadlock padding requested");
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn is_client_without_one_rtt_key(&self) -> bool {
        let key_info = self.context.key_info();
        self.context.connection_info().direction() == Direction::Outgoing
            && !((key_info.is_encryption_key_available(KeyPhase::Phase1)
                && key_info.is_decryption_key_available(KeyPhase::Phase1))
                || (key_info.is_encryption_key_available(KeyPhase::Phase0)
                    && key_info.is_decryption_key_available(KeyPhase::Phase0)))
    }

    fn increment_outstanding_counters(&self, packet: &PacketInfo) {
        if packet.is_crypto_packet {
            self.crypto_outstanding.fetch_add(1, Ordering::Relaxed);
        }
        if packet.ack_eliciting {
            self.ack_eliciting_outstanding.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn decrement_outstanding_counters(&self, packet: &PacketInfo) {
        if packet.is_crypto_packet {
            let prev = self.crypto_outstanding.fetch_sub(1, Ordering::Relaxed);
            debug_assert!(prev > 0, "crypto_outstanding underflow");
        }
        if packet.ack_eliciting {
            let prev = self.ack_eliciting_outstanding.fetch_sub(1, Ordering::Relaxed);
            debug_assert!(prev > 0, "ack_eliciting_outstanding underflow");
        }
    }
}

impl Drop for LossDetector {
    fn drop(&mut self) {
        // Timer first; the tables go down with the rest of the state.
        let state = self.state.get_mut();
        if let Some(mut tick) = state.tick.take() {
            tick.cancel();
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
