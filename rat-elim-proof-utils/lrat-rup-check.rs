//! Check that an LRAT proof is free of RAT steps and accepted by unit
//! propagation over its hints.

use clap::Arg;
use rat_elim_common::{output, rupcheck::check_files};

/// Run `lrat-rup-check`.
fn main() {
    output::install_signal_handler();
    let matches = clap::App::new("lrat-rup-check")
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "
Check an LRAT proof using only unit propagation along the hints of each step.
Prints \"s VERIFIED\" and exits with 0 if the proof derives the empty clause."
                .trim(),
        )
        .arg(
            Arg::with_name("INPUT")
                .required(true)
                .help("input formula file in DIMACS format"),
        )
        .arg(
            Arg::with_name("PROOF")
                .required(true)
                .help("proof file in LRAT format without RAT steps"),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .help("Print timing and the number of checked steps."),
        )
        .get_matches();
    let verified = check_files(
        matches.value_of("INPUT").unwrap(),
        matches.value_of("PROOF").unwrap(),
        matches.is_present("v"),
    );
    std::process::exit(if verified { 0 } else { 1 });
}
