//! Unit-propagation checker for RAT-free LRAT proofs
//!
//! Each added clause is checked by assigning its negation and walking its
//! hints in order: every hint must be unit, until one is falsified.

use crate::{
    input::Input,
    literal::{literal_array_len, Literal, Variable},
    memory::{MarkSet, Vector},
    output::{print_solution, Timer},
    parser::{parse_formula_header, parse_literals, parse_lrat_line, read_compressed_file, LratLine},
};
use std::{cmp, collections::HashMap, fmt, io::Result};

/// Why a proof step was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The step uses a RAT candidate marker.
    RatHint,
    /// A hint refers to a clause that does not exist or was deleted.
    UnknownHint(u64),
    /// A hint is already satisfied when it is reached.
    SatisfiedHint(u64),
    /// A hint has more than one unassigned literal.
    NonUnitHint(u64),
    /// All hints were used without reaching a conflict.
    NoConflict,
    /// The clause id is already in use.
    DuplicateId,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Rejection::RatHint => write!(f, "negative hint"),
            Rejection::UnknownHint(id) => write!(f, "unknown hint {}", id),
            Rejection::SatisfiedHint(id) => write!(f, "hint {} is satisfied", id),
            Rejection::NonUnitHint(id) => write!(f, "hint {} is not unit", id),
            Rejection::NoConflict => write!(f, "hints do not lead to a conflict"),
            Rejection::DuplicateId => write!(f, "clause id is already in use"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Verified,
    /// Every step was accepted but the empty clause was never derived.
    NoEmptyClause,
    Rejected { id: u64, reason: Rejection },
}

#[derive(Debug, Default)]
pub struct RupChecker {
    clauses: HashMap<u64, Vector<Literal>>,
    /// Marked literals are true.
    assignment: MarkSet<Literal>,
    maxvar: Variable,
    derived_empty_clause: bool,
    pub checked: usize,
    pub deleted: usize,
}

impl RupChecker {
    pub fn new() -> RupChecker {
        RupChecker::default()
    }

    fn reserve(&mut self, literals: &[Literal]) {
        let maxvar = literals
            .iter()
            .map(|literal| literal.variable())
            .max()
            .unwrap_or_default();
        if maxvar > self.maxvar || self.assignment.size() == 0 {
            self.maxvar = cmp::max(self.maxvar, maxvar);
            self.assignment.grow(literal_array_len(self.maxvar));
        }
    }

    pub fn add_input(&mut self, id: u64, literals: Vector<Literal>) {
        self.reserve(&literals);
        if literals.is_empty() {
            self.derived_empty_clause = true;
        }
        self.clauses.insert(id, literals);
    }

    pub fn delete(&mut self, id: u64) {
        if self.clauses.remove(&id).is_some() {
            self.deleted += 1;
        }
    }

    /// Check a derived clause and add it on success.
    pub fn add_derived(
        &mut self,
        id: u64,
        literals: Vector<Literal>,
        hints: &[i64],
    ) -> std::result::Result<(), Rejection> {
        if self.clauses.contains_key(&id) {
            return Err(Rejection::DuplicateId);
        }
        self.reserve(&literals);
        self.propagate(&literals, hints)?;
        self.checked += 1;
        if literals.is_empty() {
            self.derived_empty_clause = true;
        }
        self.clauses.insert(id, literals);
        Ok(())
    }

    fn propagate(&mut self, literals: &[Literal], hints: &[i64]) -> std::result::Result<(), Rejection> {
        let clauses = &self.clauses;
        let mut assignment = self.assignment.scope();
        for &literal in literals {
            assignment.mark(-literal);
        }
        for &hint in hints {
            if hint < 0 {
                return Err(Rejection::RatHint);
            }
            let id = hint as u64;
            let antecedent = clauses.get(&id).ok_or(Rejection::UnknownHint(id))?;
            let mut unit = None;
            for &literal in antecedent {
                if assignment.is_marked(literal) {
                    return Err(Rejection::SatisfiedHint(id));
                }
                if assignment.is_marked(-literal) {
                    continue;
                }
                if unit.is_some() {
                    return Err(Rejection::NonUnitHint(id));
                }
                unit = Some(literal);
            }
            match unit {
                Some(unit) => {
                    assignment.mark(unit);
                }
                None => return Ok(()),
            }
        }
        Err(Rejection::NoConflict)
    }

    pub fn verdict(&self) -> Verdict {
        if self.derived_empty_clause {
            Verdict::Verified
        } else {
            Verdict::NoEmptyClause
        }
    }
}

/// Load a DIMACS formula, numbering its clauses from one.
pub fn read_formula(checker: &mut RupChecker, input: &mut Input) -> Result<()> {
    parse_formula_header(input)?;
    let mut id = 0;
    loop {
        input.skip_whitespace_and_comments();
        if input.peek().is_none() {
            return Ok(());
        }
        let literals = parse_literals(input)?;
        id += 1;
        checker.add_input(id, literals);
    }
}

/// Check every step of an LRAT proof, stopping at the first rejected one.
pub fn check_proof(checker: &mut RupChecker, input: &mut Input) -> Result<Verdict> {
    while let Some(line) = parse_lrat_line(input)? {
        match line {
            LratLine::Deletion { clauses, .. } => {
                for id in clauses {
                    checker.delete(id);
                }
            }
            LratLine::Addition {
                id,
                literals,
                hints,
            } => {
                if let Err(reason) = checker.add_derived(id, literals, &hints) {
                    return Ok(Verdict::Rejected { id, reason });
                }
            }
        }
    }
    Ok(checker.verdict())
}

/// Check a proof file against a formula file, printing the verdict.
///
/// Returns whether the proof was verified; dies on malformed input.
pub fn check_files(formula_file: &str, proof_file: &str, verbose: bool) -> bool {
    let mut checker = RupChecker::new();
    let verdict = {
        let mut _timer = Timer::name("checking");
        _timer.disabled = !verbose;
        read_formula(&mut checker, &mut read_compressed_file(formula_file))
            .unwrap_or_else(|err| die!("failed to parse formula: {}", err));
        check_proof(&mut checker, &mut read_compressed_file(proof_file))
            .unwrap_or_else(|err| die!("failed to parse proof: {}", err))
    };
    if verbose {
        comment!("checked {} steps, {} deletions", checker.checked, checker.deleted);
    }
    match verdict {
        Verdict::Verified => {
            print_solution("VERIFIED");
            true
        }
        Verdict::NoEmptyClause => {
            comment!("no empty clause was derived");
            print_solution("NOT VERIFIED");
            false
        }
        Verdict::Rejected { id, reason } => {
            comment!("step {}: {}", id, reason);
            print_solution("NOT VERIFIED");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        elimination::{EliminationFlags, Eliminator, Outcome},
        emission::write_proof,
        parser::{parse_formula, parse_proof, Parser},
    };

    fn check(formula: &str, proof: &str) -> Verdict {
        let mut checker = RupChecker::new();
        read_formula(&mut checker, &mut Input::from_bytes(formula.as_bytes())).unwrap();
        check_proof(&mut checker, &mut Input::from_bytes(proof.as_bytes())).unwrap()
    }

    /// Eliminate all RAT steps, then check the written proof.
    fn eliminate_and_check(formula: &str, proof: &str) -> Verdict {
        let mut parser = Parser::new();
        parse_formula(&mut parser, &mut Input::from_bytes(formula.as_bytes())).unwrap();
        parse_proof(&mut parser, &mut Input::from_bytes(proof.as_bytes())).unwrap();
        let mut eliminator = Eliminator::new(
            parser.proof,
            EliminationFlags {
                verbosity: 0,
                strict: true,
            },
        )
        .unwrap();
        assert_eq!(eliminator.run(|| false), Ok(Outcome::Complete));
        assert!(eliminator.proof.rat_clauses().is_empty());
        let mut output = Vec::new();
        write_proof(&eliminator.proof, &mut output, false).unwrap();
        check(formula, &String::from_utf8(output).unwrap())
    }

    const FORMULA: &str = "p cnf 4 5\n1 2 0\n1 -2 0\n-1 3 0\n-1 -3 0\n-4 2 0\n";

    #[test]
    fn unit_propagation() {
        assert_eq!(check(FORMULA, "6 1 0 1 2 0\n7 0 6 3 4 0\n"), Verdict::Verified);
        assert_eq!(check(FORMULA, "6 1 0 1 2 0\n"), Verdict::NoEmptyClause);
        assert_eq!(
            check(FORMULA, "6 1 0 1 2 0\n6 d 1 0\n7 0 6 3 4 0\n"),
            Verdict::Verified
        );
        assert_eq!(
            check(FORMULA, "6 1 0 1 2 0\n6 d 3 0\n7 0 6 3 4 0\n"),
            Verdict::Rejected {
                id: 7,
                reason: Rejection::UnknownHint(3)
            }
        );
    }

    #[test]
    fn rejected_steps() {
        let rejection = |proof: &str| match check(FORMULA, proof) {
            Verdict::Rejected { reason, .. } => Some(reason),
            _ => None,
        };
        assert_eq!(rejection("6 -1 0 -1 3 4 -2 3 4 0\n"), Some(Rejection::RatHint));
        assert_eq!(rejection("6 1 0 2 0\n"), Some(Rejection::NoConflict));
        assert_eq!(rejection("6 1 0 3 1 2 0\n"), Some(Rejection::SatisfiedHint(3)));
        assert_eq!(rejection("6 0 1 2 0\n"), Some(Rejection::NonUnitHint(1)));
        assert_eq!(rejection("5 1 0 1 2 0\n"), Some(Rejection::DuplicateId));
    }

    #[test]
    fn single_rat_step() {
        assert_eq!(
            eliminate_and_check(FORMULA, "6 -1 0 -1 3 4 -2 3 4 0\n7 0 6 1 2 0\n"),
            Verdict::Verified
        );
    }

    #[test]
    fn impure_clauses() {
        assert_eq!(
            eliminate_and_check(
                FORMULA,
                "6 -1 4 0 -1 3 4 -2 3 4 0\n7 -1 2 0 6 5 0\n8 2 0 7 1 0\n9 0 8 2 4 3 0\n"
            ),
            Verdict::Verified
        );
    }

    #[test]
    fn units_with_a_rat_step() {
        // (x), (-x y), (-y): -y is RAT against (-x y) only.
        let formula = "p cnf 2 3\n1 0\n-1 2 0\n-2 0\n";
        assert_eq!(
            eliminate_and_check(formula, "4 -2 0 -2 3 0\n5 0 4 1 2 0\n"),
            Verdict::Verified
        );
    }

    #[test]
    fn rup_only_proofs() {
        assert_eq!(
            eliminate_and_check(FORMULA, "6 1 0 1 2 0\n7 0 6 3 4 0\n"),
            Verdict::Verified
        );
    }
}
