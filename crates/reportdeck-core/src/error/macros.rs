//! Error macros for reportdeck

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::DeckError::invalid_value($context, $value))
    };
}

/// Macro for rejecting a report or run identifier
#[macro_export]
macro_rules! bail_invalid_name {
    ($name:expr, $reason:expr) => {
        return Err($crate::error::DeckError::invalid_name($name, $reason))
    };
}

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::DeckError::UsageError($msg.to_string()))
    };
}
