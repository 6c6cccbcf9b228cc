//! Screening criteria rules.
//!
//! A prospect attaches criteria to a visit: a question with an optional
//! expected answer, and optional photo/video requirements the visitor fulfils
//! on site.

use crate::error::CoreError;

/// Maximum prompt length (characters).
pub const MAX_PROMPT_LENGTH: usize = 2_000;

/// Validate the prompt text of a criteria.
pub fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Criteria prompt must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Criteria prompt exceeds maximum length of {MAX_PROMPT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A criteria that is not reusable may only ever be linked to one visit.
pub fn validate_link(reusable: bool, linked_to_other_visit: bool) -> Result<(), CoreError> {
    if !reusable && linked_to_other_visit {
        return Err(CoreError::Conflict(
            "Criteria is not reusable and is already linked to another visit".into(),
        ));
    }
    Ok(())
}

/// A criteria attached to several visits cannot be made single-use.
pub fn validate_reusable_change(reusable: Option<bool>, link_count: i64) -> Result<(), CoreError> {
    if reusable == Some(false) && link_count > 1 {
        return Err(CoreError::Conflict(
            "Criteria is attached to several visits and must stay reusable".into(),
        ));
    }
    Ok(())
}

/// Who is editing a criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaEditor {
    /// The prospect who wrote it; may change everything.
    Owner,
    /// The other party of a linked visit; may only submit media.
    Participant,
}

/// Check that `editor` is allowed to touch the fields of a patch.
///
/// `touches_owner_fields` is set when the patch changes anything other than
/// the submitted photo or video.
pub fn authorize_patch(editor: CriteriaEditor, touches_owner_fields: bool) -> Result<(), CoreError> {
    match editor {
        CriteriaEditor::Owner => Ok(()),
        CriteriaEditor::Participant if touches_owner_fields => Err(CoreError::access_denied()),
        CriteriaEditor::Participant => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn prompt_must_have_content() {
        assert!(validate_prompt("Is the kitchen renovated?").is_ok());
        assert_matches!(validate_prompt(""), Err(CoreError::Validation(_)));
        assert_matches!(validate_prompt("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn prompt_length_is_capped() {
        let long = "a".repeat(MAX_PROMPT_LENGTH + 1);
        assert_matches!(validate_prompt(&long), Err(CoreError::Validation(_)));
        assert!(validate_prompt(&"a".repeat(MAX_PROMPT_LENGTH)).is_ok());
    }

    #[test]
    fn single_use_criteria_cannot_be_linked_twice() {
        assert_matches!(validate_link(false, true), Err(CoreError::Conflict(_)));
        assert!(validate_link(false, false).is_ok());
        assert!(validate_link(true, true).is_ok());
    }

    #[test]
    fn shared_criteria_stays_reusable() {
        assert_matches!(validate_reusable_change(Some(false), 2), Err(CoreError::Conflict(_)));
        assert!(validate_reusable_change(Some(false), 1).is_ok());
        assert!(validate_reusable_change(Some(true), 3).is_ok());
        assert!(validate_reusable_change(None, 3).is_ok());
    }

    #[test]
    fn participant_may_only_submit_media() {
        assert!(authorize_patch(CriteriaEditor::Participant, false).is_ok());
        assert_matches!(
            authorize_patch(CriteriaEditor::Participant, true),
            Err(CoreError::Unauthorized(_))
        );
        assert!(authorize_patch(CriteriaEditor::Owner, true).is_ok());
    }
}
