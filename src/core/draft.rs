use chrono::{DateTime, SubsecRound, Utc};
use tracing::debug;

use crate::{
    entry::{now_millis, Entry, Guest},
    types::{Attending, DraftField, GuestField},
};

use super::validate::{guest_slots_for, is_plausible_email, parse_guest_count, ValidationError};

/// Editable guest slot inside a [`Draft`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuestDraft {
    /// Guest name; required when attending.
    pub name: String,
    /// Dietary note; always optional.
    pub dietary: String,
}

/// In-progress RSVP form state.
///
/// The guest slots always number `guest_slots_for(guest_count_text)`; every
/// guest-count edit resizes them on the spot, keeping surviving slots intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    full_name: String,
    email: String,
    attending: Attending,
    guest_count: String,
    message: String,
    guests: Vec<GuestDraft>,
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

impl Draft {
    /// Blank form: attending, guest count `1`, one empty guest slot.
    pub fn new() -> Self {
        let mut draft = Self {
            full_name: String::new(),
            email: String::new(),
            attending: Attending::Yes,
            guest_count: String::new(),
            message: String::new(),
            guests: Vec::new(),
        };
        draft.set_guest_count("1");
        draft
    }

    /// Primary contact name as typed.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Primary contact email as typed.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Attendance decision.
    pub fn attending(&self) -> Attending {
        self.attending
    }

    /// Guest count exactly as typed.
    pub fn guest_count_text(&self) -> &str {
        &self.guest_count
    }

    /// Free-text message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Current guest slots, one per counted guest.
    pub fn guests(&self) -> &[GuestDraft] {
        &self.guests
    }

    /// Applies one scalar edit. No validation happens here.
    pub fn set_field(&mut self, field: DraftField) {
        match field {
            DraftField::FullName(v) => self.full_name = v,
            DraftField::Email(v) => self.email = v,
            DraftField::Attending(v) => self.attending = v,
            DraftField::GuestCount(v) => self.set_guest_count(&v),
            DraftField::Message(v) => self.message = v,
        }
    }

    /// Stores the raw text and resizes the guest slots to match it.
    pub fn set_guest_count(&mut self, raw: &str) {
        self.guest_count = raw.to_string();
        let n = guest_slots_for(raw);
        self.guests.resize_with(n, GuestDraft::default);
    }

    /// Edits one guest slot. Returns false, touching nothing, when `index`
    /// no longer exists.
    pub fn set_guest_field(&mut self, index: usize, field: GuestField, value: impl Into<String>) -> bool {
        let Some(slot) = self.guests.get_mut(index) else {
            debug!(index, slots = self.guests.len(), "ignoring edit to vanished guest slot");
            return false;
        };
        match field {
            GuestField::Name => slot.name = value.into(),
            GuestField::Dietary => slot.dietary = value.into(),
        }
        true
    }

    /// Checks the draft; the first failing rule wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validated_guest_count().map(|_| ())
    }

    /// Validates, then snapshots the draft stamped with the current time.
    pub fn finalize(&self, client_context: impl Into<String>) -> Result<Entry, ValidationError> {
        self.finalize_at(now_millis(), client_context)
    }

    /// Like [`Draft::finalize`] with an explicit creation instant.
    pub fn finalize_at(
        &self,
        submitted_at: DateTime<Utc>,
        client_context: impl Into<String>,
    ) -> Result<Entry, ValidationError> {
        let guest_count = self.validated_guest_count()?;
        let guests = self
            .guests
            .iter()
            .take(guest_count as usize)
            .map(|g| Guest {
                name: g.name.clone(),
                dietary: g.dietary.clone(),
            })
            .collect();

        Ok(Entry {
            submitted_at: submitted_at.trunc_subsecs(3),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            attending: self.attending,
            guest_count,
            message: self.message.clone(),
            guests,
            client_context: client_context.into(),
        })
    }

    fn validated_guest_count(&self) -> Result<u32, ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !is_plausible_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        let guest_count = parse_guest_count(&self.guest_count)
            .ok_or(ValidationError::InvalidGuestCount)?;

        if self.attending == Attending::Yes {
            for i in 0..guest_count as usize {
                let named = self.guests.get(i).is_some_and(|g| !g.name.trim().is_empty());
                if !named {
                    return Err(ValidationError::MissingGuestName(i));
                }
            }
        }
        Ok(guest_count)
    }
}
