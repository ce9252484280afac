//! Event macros used by the engines
//!
//! Entry points emit a `start` event, then exactly one of `end` or
//! `end_error`, all at debug level and all tagged with the emitting module
//! and the operation name. Traversal decisions are trace level.

/// Shared body of the three lifecycle macros
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($op:expr, $event:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Entry into a reflective operation
///
/// ```
/// # use refract_core::log_op_start;
/// log_op_start!("structural_equals");
/// log_op_start!("structural_equals", type_name = "Point");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!($op, $crate::schema::EVENT_START $(, $($field)*)?)
    };
}

/// Successful return; `duration_ms` is mandatory
///
/// ```
/// # use refract_core::log_op_end;
/// log_op_end!("structural_hash", duration_ms = 3);
/// log_op_end!("structural_diff", duration_ms = 3, entries = 2usize);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            $op,
            $crate::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Failed return. The error's kind and stable code are attached as
/// `err.kind` and `err.code`.
///
/// ```
/// # use refract_core::{log_op_error, errors::RefractError};
/// let err = RefractError::no_such_field("Point", "z");
/// log_op_error!("structural_compare", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let err: &$crate::errors::RefractError = &$err;
        $crate::__log_op_event!(
            $op,
            $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?err.kind(),
            err.code = err.code()
            $(, $($field)*)?
        )
    }};
}

/// A traversal decision on one type: a skipped field, a cycle cut short
///
/// ```
/// # use refract_core::{log_decision, schema::DECISION_REENTER};
/// log_decision!(DECISION_REENTER, "demo::Node");
/// ```
#[macro_export]
macro_rules! log_decision {
    ($decision:expr, $type_name:expr $(, $($field:tt)*)?) => {
        tracing::trace!(
            component = module_path!(),
            type_name = $type_name,
            decision = $decision,
            $($($field)*)?
        )
    };
}
