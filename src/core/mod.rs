//! Form draft state and its validation rules.

/// Mutable RSVP draft and guest-slot bookkeeping.
pub mod draft;
/// Validation errors and field checks.
pub mod validate;
