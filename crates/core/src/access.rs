//! Visit participation checks.
//!
//! A user may see or act on a visit only when their phone number is the
//! visit's prospect or visitor. The repository layer answers the same
//! question in SQL for the route guards; this module covers the decisions
//! taken once a visit row is in hand.

use crate::error::CoreError;

/// Which side of a visit the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Prospect,
    Visitor,
}

impl Participant {
    /// Only the prospect may see the verification code.
    pub fn may_see_code(self) -> bool {
        self == Participant::Prospect
    }
}

/// Whether `phone` is one of the two parties of a visit.
pub fn is_participant(phone: &str, prospect_phone: &str, visitor_phone: &str) -> bool {
    participant(phone, prospect_phone, visitor_phone).is_some()
}

/// Resolve the caller's side of a visit, if any.
pub fn participant(phone: &str, prospect_phone: &str, visitor_phone: &str) -> Option<Participant> {
    if phone.is_empty() {
        None
    } else if phone == prospect_phone {
        Some(Participant::Prospect)
    } else if phone == visitor_phone {
        Some(Participant::Visitor)
    } else {
        None
    }
}

/// Like [`participant`], failing with the uniform access error.
pub fn require_participant(
    phone: &str,
    prospect_phone: &str,
    visitor_phone: &str,
) -> Result<Participant, CoreError> {
    participant(phone, prospect_phone, visitor_phone).ok_or_else(CoreError::access_denied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const PROSPECT: &str = "+33600000001";
    const VISITOR: &str = "+33600000002";

    #[test]
    fn both_parties_are_participants() {
        assert!(is_participant(PROSPECT, PROSPECT, VISITOR));
        assert!(is_participant(VISITOR, PROSPECT, VISITOR));
    }

    #[test]
    fn third_party_is_not_a_participant() {
        assert!(!is_participant("+33600000003", PROSPECT, VISITOR));
        assert!(!is_participant("", PROSPECT, VISITOR));
    }

    #[test]
    fn participant_reports_the_side() {
        assert_eq!(participant(PROSPECT, PROSPECT, VISITOR), Some(Participant::Prospect));
        assert_eq!(participant(VISITOR, PROSPECT, VISITOR), Some(Participant::Visitor));
    }

    #[test]
    fn code_is_only_visible_to_the_prospect() {
        assert!(Participant::Prospect.may_see_code());
        assert!(!Participant::Visitor.may_see_code());
    }

    #[test]
    fn outsiders_get_the_uniform_error() {
        assert_matches!(
            require_participant("+33600000003", PROSPECT, VISITOR),
            Err(CoreError::Unauthorized(msg)) if msg == "Unauthorized access"
        );
    }
}
