//! Structured logging helpers.
//!
//! Every wallet log line carries a `module` field so transaction and deposit
//! activity can be filtered apart.

/// Log with a `module` field at the given level.
#[macro_export]
macro_rules! log_event {
    (info, $module:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            module = $module,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $module:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            module = $module,
            $($($field)*,)?
            $msg
        )
    };

    (error, $module:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            module = $module,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $module:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            module = $module,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a block-height related event with standard fields.
#[macro_export]
macro_rules! log_height_event {
    ($level:ident, $module:expr, $msg:expr, $height:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            module = $module,
            height = $height,
            $($($field)*,)?
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_expand() {
        crate::log_event!(debug, "transactions", "fetch started", category = "staking");
        crate::log_event!(info, "deposits", "loaded");
        crate::log_height_event!(debug, "transactions", "block time resolved", 42u64);
    }
}
