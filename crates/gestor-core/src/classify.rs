//! Status classification from the free-text columns of a planilla row.
//!
//! Rules are tested in a fixed order and the first match wins:
//!
//! 1. interest answer is exactly `no` → [`ContactStatus::NotInterested`]
//! 2. review state mentions `cargando` → [`ContactStatus::Playing`]
//! 3. current state mentions `contacto` → [`ContactStatus::Contacted`]
//! 4. review state says `no esta en wsp` → [`ContactStatus::NoMessaging`]
//! 5. anything else → [`ContactStatus::Unreviewed`]

use crate::contact::ContactStatus;

/// Answer in the interest column that marks a contact as not interested.
pub const INTEREST_NO: &str = "no";

/// Review-state marker for a contact that is currently playing.
/// Also matches the longer `esta cargando` phrase.
pub const REVIEW_PLAYING: &str = "cargando";

/// Current-state marker for a contact already reached
/// (`contacto`, `en contacto`).
pub const ACTUAL_CONTACTED: &str = "contacto";

/// Review-state phrase for a number that is not on the messaging app.
pub const REVIEW_NO_MESSAGING: &str = "no esta en wsp";

/// Derive a single status from the three free-text fragments of a row.
///
/// Matching is case-insensitive; absent columns should be passed as `""`,
/// which falls through to the default.
pub fn classify(review: &str, actual: &str, interest: &str) -> ContactStatus {
  let review = review.to_lowercase();
  let actual = actual.to_lowercase();

  if interest.trim().eq_ignore_ascii_case(INTEREST_NO) {
    ContactStatus::NotInterested
  } else if review.contains(REVIEW_PLAYING) {
    ContactStatus::Playing
  } else if actual.contains(ACTUAL_CONTACTED) {
    ContactStatus::Contacted
  } else if review.contains(REVIEW_NO_MESSAGING) {
    ContactStatus::NoMessaging
  } else {
    ContactStatus::Unreviewed
  }
}
