//! Unified routines to print data, and process-level plumbing.

use ansi_term::{Colour, Style};
use atty::{self, Stream};
use libc::{self, signal};
use std::{
    fmt::Display,
    fs::File,
    io::{self, BufWriter, Write},
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, SystemTime},
};

/// Write a solution line (`"s ..."`) to stdout.
pub fn print_solution(verdict: &str) {
    write_to_stdout!("s {}\n", verdict);
}

/// Write a key-value pair to stderr.
pub fn print_key_value(key: &str, value: impl Display) {
    requires!(key.len() < 35);
    comment!("{:<35} {:>15}", format!("{}:", key), value);
}

/// We handle SIGPIPE ourselves to avoid printing errors.
pub fn install_signal_handler() {
    // You can't disable assert! in Rust so this is fine.
    assert!(unsafe { signal(libc::SIGPIPE, libc::SIG_DFL) } != libc::SIG_ERR);
}

/// Set by SIGINT or SIGTERM, polled between elimination rounds.
static INTERRUPT_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn request_interrupt(_signal: libc::c_int) {
    INTERRUPT_REQUESTED.store(true, Ordering::SeqCst);
}

/// Turn SIGINT and SIGTERM into a request to stop after the current round.
pub fn install_interrupt_handler() {
    let handler = request_interrupt as extern "C" fn(libc::c_int) as libc::sighandler_t;
    for &signal_number in &[libc::SIGINT, libc::SIGTERM] {
        assert!(unsafe { signal(signal_number, handler) } != libc::SIG_ERR);
    }
}

/// Whether a termination signal has arrived since startup.
pub fn interrupt_requested() -> bool {
    INTERRUPT_REQUESTED.load(Ordering::SeqCst)
}

/// Check whether diagnostics go to a terminal.
pub fn is_a_tty() -> bool {
    atty::is(Stream::Stderr)
}

pub fn warning_style() -> Style {
    if is_a_tty() {
        Colour::Yellow.normal()
    } else {
        Style::default()
    }
}

pub fn error_style() -> Style {
    if is_a_tty() {
        Colour::Red.normal()
    } else {
        Style::default()
    }
}

/// Open a file for writing, `"-"` meaning stdout.
///
/// Dies on error.
pub fn open_file_for_writing(filename: &str) -> Box<dyn Write> {
    match filename {
        "-" => Box::new(BufWriter::new(io::stdout())),
        filename => Box::new(BufWriter::new(File::create(filename).unwrap_or_else(|err| {
            die!("cannot open file for writing: {}: {}", filename, err)
        }))),
    }
}

/// Render a duration the way timers print it.
pub fn format_seconds(duration: Duration) -> String {
    format!("{}.{:03}", duration.as_secs(), duration.subsec_millis())
}

/// A RAII object that prints a timing message when it is destroyed.
pub struct Timer {
    /// The name of the thing that is being timed
    name: &'static str,
    /// The start time, set at construction time
    start: SystemTime,
    /// Whether this timer should be silenced
    pub disabled: bool,
}

impl Timer {
    /// Create a timer with a given name.
    pub fn name(name: &'static str) -> Timer {
        Timer {
            name,
            start: SystemTime::now(),
            disabled: false,
        }
    }
}

impl Drop for Timer {
    /// Write the elapsed time as comment.
    fn drop(&mut self) {
        if self.disabled {
            return;
        }
        let elapsed_time = self.start.elapsed().unwrap_or_default();
        print_key_value(&format!("{} (s)", self.name), format_seconds(elapsed_time));
    }
}
