//! Eliminate RAT steps from LRAT proofs

use clap::{Arg, ArgMatches};
use rat_elim_common::{
    comment, config, die,
    elimination::{EliminationFlags, Eliminator, Outcome},
    emission::write_proof,
    memory::{format_memory_usage, HeapSpace},
    output::{
        install_interrupt_handler, install_signal_handler, interrupt_requested,
        open_file_for_writing, print_key_value, Timer,
    },
    parser::parse_files,
    warn,
};
use std::time::Instant;

/// Run `rat-elim`.
fn main() {
    std::process::exit(run_frontend());
}

/// Run `rat-elim`, returning its exit code.
///
/// This is a separate function because `std::process::exit` does not
/// call destructors.
fn run_frontend() -> i32 {
    install_signal_handler();
    install_interrupt_handler();
    let mut app = clap::App::new("rat-elim")
    .version(env!("CARGO_PKG_VERSION"))
    .about(env!("CARGO_PKG_DESCRIPTION"))
    .after_help(
        "Input files may be compressed - supported file extensions are: zst, gz, bz2, xz and lz4.
Use \"-\" for an output file to write it to standard output.
On SIGINT or SIGTERM the current elimination round is completed and the
partially eliminated proof is written."
        )
    .arg(Arg::with_name("INPUT").required(true).help("input file in DIMACS format"))
    .arg(Arg::with_name("PROOF").required(true).help("proof file in LRAT format"))

    .arg(Arg::with_name("OUTPUT").takes_value(true).short("o").long("output")
         .help("Write the transformed proof to this file (default: standard output)."))
    .arg(Arg::with_name("PRINT_PIVOTS").short("p").long("pivots")
         .help("Print the pivot after each antecedent. The output is not valid LRAT."))
    .arg(Arg::with_name("STRICT").long("strict")
         .help("Reject chains with antecedents that are not unit instead of repairing them."))
    .arg(Arg::with_name("STATS_FILE").takes_value(true).short("s").long("stats")
         .help("Write statistics to this file in TOML format."))
    .arg(Arg::with_name("MEMORY_USAGE_BREAKDOWN").short("m").long("memory-breakdown")
         .help("Output detailed memory usage metrics.").hidden(true))
    ;

    if config::ENABLE_LOGGING {
        app = app.arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Verbose output. Repeat for a line per round and per clause."),
        );
    }

    let flags = Flags::new(app.get_matches());
    let mut timer = Timer::name("total time");
    timer.disabled = !flags.verbose();

    let start = Instant::now();
    let parser = parse_files(
        &flags.formula_filename,
        &flags.proof_filename,
        flags.verbose(),
    );
    let parse_seconds = start.elapsed().as_secs_f64();
    let (input_clauses, proof_clauses, skipped_deletions) = (
        parser.input_clauses,
        parser.proof_clauses,
        parser.skipped_deletions,
    );

    let mut eliminator = Eliminator::new(
        parser.proof,
        EliminationFlags {
            verbosity: flags.verbosity,
            strict: flags.strict,
        },
    )
    .unwrap_or_else(|err| die!("{}", err));
    eliminator.stats.input_clauses = input_clauses;
    eliminator.stats.proof_clauses = proof_clauses;
    eliminator.stats.skipped_deletions = skipped_deletions;
    eliminator.stats.parse_seconds = parse_seconds;

    let outcome = {
        let mut _timer = Timer::name("elimination");
        _timer.disabled = !flags.verbose();
        eliminator
            .run(interrupt_requested)
            .unwrap_or_else(|err| die!("{}", err))
    };
    if let Outcome::Interrupted { remaining } = outcome {
        warn!(
            "interrupted, writing a proof with {} RAT steps left",
            remaining
        );
    }
    if flags.verbose() || flags.memory_usage_breakdown {
        print_memory_usage(&eliminator, flags.memory_usage_breakdown);
    }

    let (proof, mut stats) = eliminator.into_parts();
    let start = Instant::now();
    let emission = {
        let mut _timer = Timer::name("writing proof");
        _timer.disabled = !flags.verbose();
        let mut output = open_file_for_writing(&flags.output_filename);
        write_proof(&proof, &mut output, flags.print_pivots)
            .unwrap_or_else(|err| die!("failed to write proof: {}", err))
    };
    stats.emission_seconds = start.elapsed().as_secs_f64();
    stats.emitted_clauses = emission.clauses;
    stats.aliases = emission.aliases;
    stats.deleted_clauses = emission.deletions;

    if flags.verbose() {
        stats.print();
    }
    if let Some(filename) = &flags.stats_filename {
        stats
            .write_toml(filename)
            .unwrap_or_else(|err| die!("cannot write statistics to {}: {}", filename, err));
    }
    drop(timer);
    0
}

/// Parsed arguments.
#[derive(Debug)]
pub struct Flags {
    /// Input formula
    pub formula_filename: String,
    /// Input proof
    pub proof_filename: String,
    /// Output proof, `"-"` for stdout
    pub output_filename: String,
    /// Present when we want to write statistics
    pub stats_filename: Option<String>,
    pub print_pivots: bool,
    pub strict: bool,
    pub memory_usage_breakdown: bool,
    pub verbosity: u8,
}

impl Flags {
    /// Create a flags instance from commandline arguments.
    pub fn new(matches: ArgMatches) -> Flags {
        let verbosity = if config::ENABLE_LOGGING {
            matches.occurrences_of("v").min(u64::from(u8::max_value())) as u8
        } else {
            0
        };
        Flags {
            formula_filename: matches.value_of("INPUT").unwrap().to_string(),
            proof_filename: matches.value_of("PROOF").unwrap().to_string(),
            output_filename: matches.value_of("OUTPUT").unwrap_or("-").to_string(),
            stats_filename: matches.value_of("STATS_FILE").map(String::from),
            print_pivots: matches.is_present("PRINT_PIVOTS"),
            strict: matches.is_present("STRICT"),
            memory_usage_breakdown: matches.is_present("MEMORY_USAGE_BREAKDOWN"),
            verbosity,
        }
    }
    pub fn verbose(&self) -> bool {
        self.verbosity > 0
    }
}

/// Print the heap usage of the elimination state.
fn print_memory_usage(eliminator: &Eliminator, breakdown: bool) {
    let usages = vec![
        ("proof", eliminator.proof.heap_space()),
        ("marks", eliminator.marks.heap_space()),
    ];
    let total = usages.iter().fold(0, |sum, pair| sum + pair.1);
    print_key_value("memory (MB)", format_memory_usage(total));
    if !breakdown {
        return;
    }
    for (name, usage) in usages {
        print_key_value(&format!("memory-{}", name), format_memory_usage(usage));
    }
    comment!("{} clause slots", eliminator.proof.slots());
}
