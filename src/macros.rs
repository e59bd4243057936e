//! Call-site macros
//!
//! The severity macros capture the caller's file, function and line with
//! [`location!`] and forward `format_args!` to the matching [`Logger`](crate::Logger)
//! method, so the message is only formatted when the level is enabled.

/// Capture the current source location
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(
            ::core::file!(),
            {
                fn __here() {}
                fn __type_name_of<T>(_: T) -> &'static str {
                    ::core::any::type_name::<T>()
                }
                let name = __type_name_of(__here);
                name.strip_suffix("::__here").unwrap_or(name)
            },
            ::core::line!(),
        )
    };
}

/// Log at an explicit level: `log_at!(logger, Level::Info, "x={}", 5)`
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, &$crate::location!(), ::core::format_args!($($arg)+))
    };
}

/// Log a debug message: `log_debug!(logger, "x={}", 5)`
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(&$crate::location!(), ::core::format_args!($($arg)+))
    };
}

/// Log a trace message
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace(&$crate::location!(), ::core::format_args!($($arg)+))
    };
}

/// Log an info message
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(&$crate::location!(), ::core::format_args!($($arg)+))
    };
}

/// Log a warning (goes to the `.wf` file)
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(&$crate::location!(), ::core::format_args!($($arg)+))
    };
}

/// Log an error (goes to the `.wf` file)
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(&$crate::location!(), ::core::format_args!($($arg)+))
    };
}

/// Log a fatal message (goes to the `.wf` file)
///
/// Only records the message; it does not terminate the process.
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(&$crate::location!(), ::core::format_args!($($arg)+))
    };
}
