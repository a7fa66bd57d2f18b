//! Invitation-count collaborators.

use std::collections::HashMap;

use uuid::Uuid;

use coursepulse_core::traits::InvitationSource;

/// An invitation source backed by a fixed per-survey table.
///
/// The entitlement system owns invitation data in a real deployment; this
/// implementation covers tests and demo wiring.
#[derive(Debug, Clone, Default)]
pub struct FixedInvitations {
    counts: HashMap<Uuid, u64>,
}

impl FixedInvitations {
    pub fn new(counts: HashMap<Uuid, u64>) -> Self {
        Self { counts }
    }

    /// Record the invitation count for one survey.
    pub fn set(&mut self, survey_id: Uuid, count: u64) {
        self.counts.insert(survey_id, count);
    }
}

impl InvitationSource for FixedInvitations {
    fn invitation_count(&self, survey_id: Uuid) -> u64 {
        self.counts.get(&survey_id).copied().unwrap_or(0)
    }
}
