//! Error types for recovery operations.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Connection-level errors surfaced by the recovery core.
///
/// Peer misbehavior that is safe to ignore (ACKs for packets never sent)
/// does not produce an error; only frames the detector cannot safely
/// interpret do. The connection layer owns closing the connection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// ACK range expansion stepped below packet number zero, which also
    /// covers inverted and overlapping range encodings (RFC 9000
    /// Section 19.3.1). Detector state is untouched when this is returned.
    #[error("malformed ACK frame: range underflow in block {block}")]
    AckRangeUnderflow {
        /// Zero-based index of the offending range; 0 is the first ACK
        /// range, 1.. are the gap/length blocks that follow.
        block: usize,
    },
}
