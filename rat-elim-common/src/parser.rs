//! DIMACS and LRAT parser

use crate::{
    clause::{normalize, Chain, ChainLink, ClauseIndex, ProofClause},
    input::Input,
    literal::{Literal, Variable},
    memory::Vector,
    output::Timer,
    proof::{ClauseRef, Proof},
};
use std::{
    cmp,
    convert::TryFrom,
    fs::File,
    io::{BufReader, Read, Result},
};

/// Builds a [`Proof`](../proof/struct.Proof.html) from a formula and an LRAT proof.
#[derive(Debug, Default)]
pub struct Parser {
    /// The highest variable parsed so far
    pub maxvar: Variable,
    pub proof: Proof,
    /// Clause identifiers as written in the files, in increasing order,
    /// with the clause they denote.
    identifiers: Vector<(u64, ClauseRef)>,
    pub input_clauses: usize,
    pub proof_clauses: usize,
    pub rat_clauses: usize,
    pub skipped_deletions: usize,
    /// Print diagnostics and timing information
    pub verbose: bool,
}

impl Parser {
    pub fn new() -> Parser {
        Parser::default()
    }
    fn next_index(&self) -> ClauseIndex {
        ClauseIndex(self.identifiers.len() as u64 + 1)
    }
    fn add(&mut self, identifier: u64, clause: ProofClause) -> ClauseRef {
        requires!(self
            .identifiers
            .last()
            .map_or(true, |&(last, _)| last < identifier));
        let handle = self.proof.push_back(clause);
        self.identifiers.push((identifier, handle));
        handle
    }
    /// Look up a clause by the identifier used in the files.
    pub fn lookup(&self, identifier: u64) -> Option<ClauseRef> {
        self.identifiers
            .binary_search_by_key(&identifier, |&(id, _)| id)
            .ok()
            .map(|position| self.identifiers[position].1)
    }
}

/// One line of an LRAT proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LratLine {
    /// A new clause: literals in the order written, then hints, negative
    /// hints marking RAT candidates.
    Addition {
        id: u64,
        literals: Vector<Literal>,
        hints: Vector<i64>,
    },
    Deletion {
        id: u64,
        clauses: Vector<u64>,
    },
}

/// Parse a formula and a proof file, dying on error.
pub fn parse_files(formula_file: &str, proof_file: &str, verbose: bool) -> Parser {
    let mut parser = Parser::new();
    parser.verbose = verbose;
    {
        let mut _timer = Timer::name("parsing formula");
        _timer.disabled = !verbose;
        parse_formula(&mut parser, &mut read_compressed_file(formula_file))
            .unwrap_or_else(|err| die!("failed to parse formula: {}", err));
    }
    {
        let mut _timer = Timer::name("parsing proof");
        _timer.disabled = !verbose;
        parse_proof(&mut parser, &mut read_compressed_file(proof_file))
            .unwrap_or_else(|err| die!("failed to parse proof: {}", err));
    }
    parser
}

/// Open a file for reading.
/// # Panics
/// Dies on error.
pub fn open_file(filename: &str) -> File {
    File::open(filename).unwrap_or_else(|err| die!("cannot open file {}: {}", filename, err))
}

/// File extension of Zstandard archives.
const ZSTD: &str = ".zst";
/// File extension of Gzip archives.
const GZIP: &str = ".gz";
/// File extension of Bzip2 archives.
const BZIP2: &str = ".bz2";
/// File extension of LZ4 archives.
const LZ4: &str = ".lz4";
/// File extension of XZ archives.
const XZ: &str = ".xz";

/// The compression extension of a filename, if any.
fn compression_format_by_extension(filename: &str) -> Option<&'static str> {
    [ZSTD, GZIP, BZIP2, LZ4, XZ]
        .iter()
        .find(|extension| filename.ends_with(*extension))
        .cloned()
}

/// Return an [Input](../input/struct.Input.html) to read from a possibly compressed file.
///
/// If the file is compressed it is transparently uncompressed.
pub fn read_compressed_file(filename: &str) -> Input<'static> {
    let file = open_file(filename);
    Input::new(read_from_compressed_file(file, filename))
}

fn read_from_compressed_file(file: File, filename: &str) -> Box<dyn Iterator<Item = u8>> {
    match compression_format_by_extension(filename) {
        None => Box::new(BufReader::new(file).bytes().map(panic_on_error)),
        Some(ZSTD) => {
            let de = zstd::stream::read::Decoder::new(file)
                .unwrap_or_else(|err| die!("failed to decompress ZST archive: {}", err));
            Box::new(de.bytes().map(panic_on_error))
        }
        Some(GZIP) => Box::new(
            flate2::read::GzDecoder::new(file)
                .bytes()
                .map(panic_on_error),
        ),
        Some(BZIP2) => Box::new(
            bzip2::read::BzDecoder::new(file)
                .bytes()
                .map(panic_on_error),
        ),
        Some(XZ) => Box::new(xz2::read::XzDecoder::new(file).bytes().map(panic_on_error)),
        Some(_) => {
            let de = lz4::Decoder::new(file)
                .unwrap_or_else(|err| die!("failed to decode LZ4 archive: {}", err));
            Box::new(de.bytes().map(panic_on_error))
        }
    }
}

/// Unwraps a result, dying on error.
pub fn panic_on_error<T>(result: Result<T>) -> T {
    result.unwrap_or_else(|error| die!("{}", error))
}

/// Parse a DIMACS header, returning the number of variables and clauses.
pub fn parse_formula_header(input: &mut Input) -> Result<(u64, u64)> {
    input.skip_whitespace_and_comments();
    for &expected in b"p cnf" {
        if input.peek() != Some(expected) {
            return Err(input.error(Input::P_CNF));
        }
        input.next();
    }
    input.skip_some_whitespace()?;
    let maxvar = input.parse_unsigned()?;
    input.skip_some_whitespace()?;
    let clauses = input.parse_unsigned()?;
    input.skip_some_whitespace()?;
    Ok((maxvar, clauses))
}

/// Parse a nonzero literal, or the terminating zero.
fn parse_literal(input: &mut Input) -> Result<Option<Literal>> {
    if input.peek().is_none() {
        return Err(input.error(Input::EOF));
    }
    let value = input.parse_dec64()?;
    input.skip_some_whitespace()?;
    if value == 0 {
        return Ok(None);
    }
    match i32::try_from(value) {
        Ok(value) if value != i32::min_value() => Ok(Some(Literal::from_dimacs(value))),
        _ => Err(input.error(Input::OVERFLOW)),
    }
}

/// Parse literals up to and including the terminating zero, in the order written.
pub fn parse_literals(input: &mut Input) -> Result<Vector<Literal>> {
    let mut literals = Vector::new();
    while let Some(literal) = parse_literal(input)? {
        literals.push(literal);
    }
    Ok(literals)
}

/// Parse signed numbers up to and including the terminating zero.
fn parse_numbers(input: &mut Input) -> Result<Vector<i64>> {
    let mut numbers = Vector::new();
    loop {
        if input.peek().is_none() {
            return Err(input.error(Input::EOF));
        }
        let number = input.parse_dec64()?;
        input.skip_some_whitespace()?;
        if number == 0 {
            return Ok(numbers);
        }
        numbers.push(number);
    }
}

/// Parse the next LRAT line, skipping comments.
pub fn parse_lrat_line(input: &mut Input) -> Result<Option<LratLine>> {
    input.skip_whitespace_and_comments();
    if input.peek().is_none() {
        return Ok(None);
    }
    let id = input.parse_unsigned()?;
    input.skip_some_whitespace()?;
    if input.peek() == Some(b'd') {
        input.next();
        input.skip_some_whitespace()?;
        let mut clauses = Vector::new();
        for number in parse_numbers(input)? {
            clauses.push(u64::try_from(number).map_err(|_| input.error(Input::UNSIGNED))?);
        }
        return Ok(Some(LratLine::Deletion { id, clauses }));
    }
    let literals = parse_literals(input)?;
    let hints = parse_numbers(input)?;
    Ok(Some(LratLine::Addition {
        id,
        literals,
        hints,
    }))
}

/// Parse a DIMACS formula. Input clauses are numbered from one.
pub fn parse_formula(parser: &mut Parser, input: &mut Input) -> Result<()> {
    let (declared_variables, declared_clauses) = parse_formula_header(input)?;
    loop {
        input.skip_whitespace_and_comments();
        if input.peek().is_none() {
            break;
        }
        let mut literals = parse_literals(input)?;
        normalize(&mut literals);
        for literal in &literals {
            parser.maxvar = cmp::max(parser.maxvar, literal.variable());
        }
        let index = parser.next_index();
        parser.add(index.0, ProofClause::input(index, literals));
        parser.input_clauses += 1;
    }
    parser.proof.mark_end_of_input();
    if parser.input_clauses as u64 != declared_clauses {
        warn!(
            "header declares {} clauses, found {}",
            declared_clauses, parser.input_clauses
        );
    }
    if parser.input_clauses > 0 && u64::from(parser.maxvar.0) + 1 > declared_variables {
        warn!(
            "header declares {} variables, found variable {}",
            declared_variables,
            parser.maxvar.0 + 1
        );
    }
    Ok(())
}

/// Parse an LRAT proof, after the formula.
///
/// Deletions are skipped. A step with a negative hint, or with no hints at
/// all, is a RAT step on its first literal.
pub fn parse_proof(parser: &mut Parser, input: &mut Input) -> Result<()> {
    while let Some(line) = parse_lrat_line(input)? {
        let (id, written, hints) = match line {
            LratLine::Deletion { .. } => {
                parser.skipped_deletions += 1;
                continue;
            }
            LratLine::Addition {
                id,
                literals,
                hints,
            } => (id, literals, hints),
        };
        if parser
            .identifiers
            .last()
            .map_or(false, |&(last, _)| last >= id)
        {
            return Err(input.error(&format!("clause id {} is not increasing", id)));
        }
        let mut links = Vector::with_capacity(hints.len());
        for &hint in &hints {
            let clause = parser
                .lookup(hint.unsigned_abs())
                .ok_or_else(|| input.error(&format!("unknown clause id {} in hints", hint.abs())))?;
            links.push(if hint < 0 {
                ChainLink::Negated(clause)
            } else {
                ChainLink::Plain(clause)
            });
        }
        let is_rat = links.is_empty() || links.iter().any(|link| link.is_negated());
        let pivot = written.first().cloned();
        let mut literals = written;
        normalize(&mut literals);
        for literal in &literals {
            parser.maxvar = cmp::max(parser.maxvar, literal.variable());
        }
        let index = parser.next_index();
        let clause = if is_rat {
            let pivot = pivot.ok_or_else(|| {
                input.error(&format!("clause {} has RAT hints but no pivot literal", id))
            })?;
            parser.rat_clauses += 1;
            ProofClause::rat(index, pivot, literals, links)
        } else {
            ProofClause::derived(
                index,
                literals,
                Chain {
                    links,
                    pivots: Vector::new(),
                },
            )
        };
        parser.add(id, clause);
        parser.proof_clauses += 1;
    }
    if parser.verbose {
        comment!(
            "parsed {} input clauses, {} proof clauses ({} RAT), skipped {} deletions",
            parser.input_clauses,
            parser.proof_clauses,
            parser.rat_clauses,
            parser.skipped_deletions
        );
    }
    Ok(())
}
