//! Count assertions over a recorded [`History`].

use crate::{Error, ExpectedCounts, History, Result};

/// Check `history` against `expected`.
///
/// Two passes run, and both are needed:
///
/// 1. Every event that actually occurred is checked against the
///    expectation. In `strict` mode the name must appear as a key (any
///    count, including zero, counts as "expected"). When the expected count
///    is non-zero it must equal the recorded count exactly. A zero count
///    performs no count check.
/// 2. Every expectation with a positive count must name an event that
///    occurred at least once. A zero expectation for an event that never
///    occurred is accepted without any history entry.
///
/// The first failure found is returned; actual events are checked before
/// expected ones.
pub fn assert_count(history: &History, expected: &ExpectedCounts, strict: bool) -> Result {
    for (event, seq) in history.iter() {
        let actual = seq.len();
        let wanted = expected.get(event);

        if strict && wanted.is_none() {
            return Err(Error::UnexpectedEvent {
                event: event.to_string(),
            });
        }

        if let Some(wanted) = wanted.filter(|w| *w > 0)
            && actual != wanted
        {
            return Err(Error::CountMismatch {
                event: event.to_string(),
                expected: wanted,
                actual,
            });
        }
    }

    for (event, wanted) in expected.iter().filter(|(_, w)| *w > 0) {
        if !history.contains(event) {
            return Err(Error::MissingEvent {
                event: event.to_string(),
                expected: wanted,
            });
        }
    }

    Ok(())
}
