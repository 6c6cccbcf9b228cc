//! Six-digit visit verification codes.
//!
//! A code is drawn when the visit is created and never changes. On site the
//! visitor asks the prospect for it; a matching code confirms an accepted
//! visit, moving it to `DONE`.

use rand::Rng;

use crate::error::CoreError;
use crate::visit::VisitStatus;

/// Smallest code that can be issued.
pub const CODE_MIN: i32 = 100_000;
/// Codes are drawn below this bound.
pub const CODE_MAX_EXCLUSIVE: i32 = 999_999;

/// Draw a code uniformly from `[CODE_MIN, CODE_MAX_EXCLUSIVE)`.
pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.random_range(CODE_MIN..CODE_MAX_EXCLUSIVE)
}

/// Draw a code from the thread-local generator.
pub fn generate_code() -> i32 {
    generate_code_with(&mut rand::rng())
}

/// Compare a supplied code with the stored one. Surrounding whitespace is
/// ignored; anything that is not a number never matches.
pub fn code_matches(expected: i32, supplied: &str) -> bool {
    supplied
        .trim()
        .parse::<i32>()
        .map(|code| code == expected)
        .unwrap_or(false)
}

/// Decide the outcome of a code check on a visit in `status`.
///
/// Returns the status to store on success. A wrong code is an access error;
/// a right code on a visit that is not `ACCEPTED` is a conflict, so a visit
/// is confirmed at most once.
pub fn confirm_with_code(
    status: VisitStatus,
    expected: i32,
    supplied: &str,
) -> Result<VisitStatus, CoreError> {
    if !code_matches(expected, supplied) {
        return Err(CoreError::Unauthorized("Invalid verification code".into()));
    }
    if status != VisitStatus::Accepted {
        return Err(CoreError::Conflict(format!(
            "Visit cannot be confirmed while '{status}'"
        )));
    }
    Ok(VisitStatus::Done)
}
