//! Macros and other utility code.
//!
//! All diagnostics go to stderr so the transformed proof can be written to stdout.

/// This should be used for every diagnostic write.
#[macro_export]
macro_rules! write_to_stderr {
    ($($arg:tt)*) => ({
        use std::io::Write;
        match write!(std::io::stderr(), $($arg)*) {
            Ok(()) => (),
            // Don't panic on SIGPIPE.
            Err(ref err) if err.kind() == std::io::ErrorKind::BrokenPipe => std::process::exit(141),
            Err(ref err) => panic!("{}", err),
        };
    })
}

/// This should be used for every write to stdout that is not proof output.
#[macro_export]
macro_rules! write_to_stdout {
    ($($arg:tt)*) => ({
        use std::io::Write;
        match write!(std::io::stdout(), $($arg)*) {
            Ok(()) => (),
            Err(ref err) if err.kind() == std::io::ErrorKind::BrokenPipe => std::process::exit(141),
            Err(ref err) => panic!("{}", err),
        };
    })
}

/// Implementation of log.
#[macro_export]
macro_rules! _log {
    ($verbosity:expr, $level:expr, $($arg:tt)*) => {
        if $crate::config::ENABLE_LOGGING && $level <= $verbosity
        {
            $crate::comment!($($arg)*);
        }
    }
}

/// Print a formatted message based on verbosity level
#[macro_export]
macro_rules! log {
    ($owner:expr, $level:expr, $($arg:tt)*) => {
        $crate::_log!($owner.flags.verbosity, $level, $($arg)*)
    };
}

/// Print to stderr with yellow font color.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => ({
        let style = $crate::output::warning_style();
        $crate::write_to_stderr!("{}", style.paint("Warning: "));
        $crate::write_to_stderr!("{}\n", style.paint(&format!($($arg)*)));
    })
}

/// Report a fatal error and exit.
#[macro_export]
macro_rules! die {
    ($($arg:tt)*) => ({
        let style = $crate::output::error_style();
        $crate::write_to_stderr!("{}", style.paint("Error: "));
        $crate::write_to_stderr!("{}\n", style.paint(&format!($($arg)*)));
        std::process::exit(2);
    })
}

/// Native assertions cannot be disabled, that's why why prefer to use this
/// macro.
#[macro_export]
macro_rules! invariant {
    ($($arg:tt)*) => ({
        if $crate::config::CHECK_INVARIANTS {
            assert!($($arg)*);
        }
    })
}

/// Like invariant, but for preconditions.
#[macro_export]
macro_rules! requires {
    ($($arg:tt)*) => ({
        if $crate::config::CHECK_PRECONDITIONS {
            assert!($($arg)*);
        }
    })
}

/// Print to stderr, prefixed by "c ".
#[macro_export]
macro_rules! comment {
    ($($arg:tt)*) => ({
        $crate::write_to_stderr!("c ");
        $crate::write_to_stderr!($($arg)*);
        $crate::write_to_stderr!("\n");
    })
}
