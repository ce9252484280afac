//! Log vocabulary shared by the traversal engines
//!
//! Field keys are tracing identifiers and are spelled out at each call site;
//! the values below are what those fields carry.

/// Key carrying one of the `EVENT_*` values on every entry-point event
pub const FIELD_EVENT: &str = "event";
/// Key carrying one of the `DECISION_*` values on trace events
pub const FIELD_DECISION: &str = "decision";
/// Key naming the type a decision was taken on
pub const FIELD_TYPE_NAME: &str = "type_name";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

/// A field was left out of a traversal
pub const DECISION_EXCLUDE: &str = "exclude";
/// An object already in progress was met again and not recursed into
pub const DECISION_REENTER: &str = "reenter";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_events_are_distinct() {
        let events = [EVENT_START, EVENT_END, EVENT_END_ERROR];
        for (i, a) in events.iter().enumerate() {
            for b in &events[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_decisions_never_collide_with_events() {
        for decision in [DECISION_EXCLUDE, DECISION_REENTER] {
            assert!(![EVENT_START, EVENT_END, EVENT_END_ERROR].contains(&decision));
        }
    }
}
