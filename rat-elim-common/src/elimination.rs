//! Elimination driver
//!
//! RAT clauses are eliminated one per round, starting with the last one.
//! Each round classifies the clauses after the RAT clause, sweeps them from
//! the back to rewrite the chains that depend on it, and finally removes it.

use crate::{
    clause::reconstruct_pivots,
    config,
    distribution::{sweep, Round},
    error::EliminationError,
    finalization::finalize,
    literal::{literal_array_len, Literal},
    memory::{HeapSpace, MarkSet, Vector},
    proof::{ClauseRef, Proof},
    purity::classify,
    stats::Statistics,
};
use rat_elim_macros::HeapSpace;
use std::time::Instant;

/// Knobs that change how the elimination behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EliminationFlags {
    /// 0 is quiet, higher levels log more.
    pub verbosity: u8,
    /// Reject chains with non-unit antecedents instead of repairing them.
    pub strict: bool,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    /// Stopped between rounds, with this many RAT clauses left.
    Interrupted { remaining: usize },
}

#[derive(Debug, HeapSpace)]
pub struct Eliminator {
    pub proof: Proof,
    pub flags: EliminationFlags,
    #[heap_space(skip)]
    pub stats: Statistics,
    /// Scratch space for pivot reconstruction.
    pub marks: MarkSet<Literal>,
}

impl Eliminator {
    /// Prepare a parsed proof, reconstructing the pivots of every chain.
    pub fn new(proof: Proof, flags: EliminationFlags) -> Result<Eliminator, EliminationError> {
        let marks = MarkSet::new(literal_array_len(proof.maxvar()));
        let mut eliminator = Eliminator {
            proof,
            flags,
            stats: Statistics::default(),
            marks,
        };
        let start = Instant::now();
        let clauses: Vector<ClauseRef> = eliminator.proof.iter().collect();
        for clause in clauses {
            reconstruct_pivots(
                &mut eliminator.proof,
                clause,
                &mut eliminator.marks,
                flags.strict,
            )?;
        }
        eliminator.stats.rat_clauses = eliminator.proof.rat_clauses().len();
        eliminator.stats.pivot_seconds += start.elapsed().as_secs_f64();
        Ok(eliminator)
    }

    /// Eliminate RAT clauses until none are left or `interrupted` says to stop.
    ///
    /// `interrupted` is polled before each round, never during one.
    pub fn run(&mut self, interrupted: impl Fn() -> bool) -> Result<Outcome, EliminationError> {
        while !self.proof.rat_clauses().is_empty() {
            if interrupted() {
                let remaining = self.proof.rat_clauses().len();
                self.stats.remaining_rat_clauses = remaining;
                return Ok(Outcome::Interrupted { remaining });
            }
            self.eliminate_next()?;
        }
        self.stats.remaining_rat_clauses = 0;
        Ok(Outcome::Complete)
    }

    /// Run one round on the last remaining RAT clause.
    ///
    /// Returns false if there was none.
    pub fn eliminate_next(&mut self) -> Result<bool, EliminationError> {
        let rat = match self.proof.pop_rat() {
            Some(rat) => rat,
            None => return Ok(false),
        };
        let literal = match self.proof[rat].rat_pivot() {
            Some(pivot) => pivot,
            None => unreachable!("only RAT clauses are queued for elimination"),
        };
        log!(
            self,
            1,
            "eliminating {} ({} left)",
            self.proof.clause_to_string(rat),
            self.proof.rat_clauses().len()
        );
        let mut round = Round::new(rat, self.proof[rat].index, literal);

        let start = Instant::now();
        classify(&mut self.proof, rat, literal);
        self.stats.classification_seconds += start.elapsed().as_secs_f64();

        let start = Instant::now();
        sweep(self, &mut round)?;
        self.stats.distribution_seconds += start.elapsed().as_secs_f64();

        let start = Instant::now();
        finalize(self, round)?;
        self.stats.finalization_seconds += start.elapsed().as_secs_f64();

        self.stats.eliminated += 1;
        if config::CHECK_LINK_INVARIANTS {
            self.check_links();
        }
        Ok(true)
    }

    /// Assert that every chain only refers to live clauses before it.
    pub fn check_links(&self) {
        let mut preceding = MarkSet::<ClauseRef>::new(self.proof.slots());
        let mut seen = preceding.scope();
        for clause in self.proof.iter() {
            for link in &self.proof[clause].chain.links {
                invariant!(
                    seen.is_marked(link.clause()),
                    "{} refers to a clause that does not precede it",
                    self.proof.clause_to_string(clause)
                );
            }
            seen.mark(clause);
        }
    }

    pub fn into_parts(self) -> (Proof, Statistics) {
        (self.proof, self.stats)
    }
}
