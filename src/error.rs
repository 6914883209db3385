//! Error Types
//!
//! Error taxonomy for the translation and scheduling pipeline.
//!
//! # Design Philosophy
//!
//! Translation failures are fatal to the event that caused them but never to
//! the batch: the sequencer catches them per-event, logs the payload, and
//! proceeds with an empty animation list. Silently guessing a patch timing
//! would produce an undetectable visual desync, so an unconfigured patch path
//! raises instead of defaulting. Malformed queues and version regressions are
//! programmer errors and are never recovered silently.

use thiserror::Error;

/// Errors raised while translating a single backend event into animations
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    /// A patch path matched no configured timing prefix
    ///
    /// Timed patches must land at an explicit offset; defaulting would desync
    /// visuals from authoritative state.
    #[error("no start time provided for patch path '{path}'")]
    NoStartTime {
        /// The offending slash-delimited patch path
        path: String,
    },

    /// A players/ patch path did not yield a player id
    ///
    /// The backend contract guarantees per-player patches address a concrete
    /// seat; anything else is an invariant violation.
    #[error("malformed player path '{path}' (no player id)")]
    MalformedPlayerPath {
        /// The offending slash-delimited patch path
        path: String,
    },

    /// An event kind that requires a subject arrived without one
    #[error("event {kind} arrived without a subject player")]
    MissingSubject {
        /// Wire name of the event kind
        kind: &'static str,
    },
}

/// Errors raised while sequencing a batch of events
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// Sequencing produced no animations at all
    ///
    /// The dispatcher always terminates a batch with a full-state snapshot,
    /// so an empty result means the calling contract was violated.
    #[error("sequenced batch produced an empty animation list")]
    EmptyBatch,

    /// The final animation is not an instantaneous full-state assignment
    #[error("sequenced batch does not terminate in a snapshot (last entry: {last})")]
    BadTerminal {
        /// Description of the offending terminal entry
        last: String,
    },
}

/// Errors raised by the dispatcher
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// An update arrived with a version lower than one already dispatched
    #[error("gamestate version regressed: last dispatched {last}, received {received}")]
    VersionRegression {
        /// Highest version dispatched so far
        last: i64,
        /// Version of the rejected update
        received: i64,
    },

    /// Sequencing the batch failed
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_start_time_message_names_path() {
        let err = TranslateError::NoStartTime {
            path: "players/p3/vanity".to_string(),
        };
        assert!(err.to_string().contains("players/p3/vanity"));
        assert!(err.to_string().contains("no start time"));
    }

    #[test]
    fn test_dispatch_error_wraps_sequence_error() {
        let err: DispatchError = SequenceError::EmptyBatch.into();
        assert!(matches!(err, DispatchError::Sequence(_)));
    }
}
