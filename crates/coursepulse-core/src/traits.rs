//! Collaborator traits at the core's boundary.
//!
//! The core never performs I/O or reads the clock directly; storage,
//! invitation counts, and time are injected through these traits. The
//! `coursepulse-store` crate provides the store and invitation
//! implementations.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StorageError;
use crate::response::Response;

/// Append-only storage of completed responses.
///
/// Implementations must serialize appends per survey: the engine evaluates
/// the acceptance gate and appends in one synchronous call and relies on the
/// store for write ordering when submitters are concurrent (single writer per
/// survey, or an optimistic check-and-append with retry).
pub trait ResponseStore: Send + Sync {
    /// Append a validated response and return the stored copy.
    fn append(&self, response: Response) -> Result<Response, StorageError>;

    /// All responses stored for a survey, in unspecified order.
    fn list_by_survey(&self, survey_id: Uuid) -> Result<Vec<Response>, StorageError>;

    /// Remove every response for a survey and return the number removed.
    ///
    /// Used only by survey deletion, which cascades to responses.
    fn purge_survey(&self, survey_id: Uuid) -> Result<u64, StorageError>;
}

/// Source of the current time, injected to keep validation deterministic and
/// testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a fixed instant, for deterministic validation in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Invitation counts from the entitlement collaborator.
///
/// Consumed only by completion-rate reporting; the core never mutates
/// invitations.
pub trait InvitationSource: Send + Sync {
    fn invitation_count(&self, survey_id: Uuid) -> u64;
}

/// An invitation source that reports zero for every survey.
///
/// Useful when wiring an engine for flows that never summarize.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInvitations;

impl InvitationSource for NoInvitations {
    fn invitation_count(&self, _survey_id: Uuid) -> u64 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_is_deterministic() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), instant);
    }

    #[test]
    fn no_invitations_reports_zero() {
        assert_eq!(NoInvitations.invitation_count(Uuid::new_v4()), 0);
    }
}
