//! Failures of proof transformation

use crate::{clause::ClauseIndex, literal::Literal};
use thiserror::Error;

/// A proof that cannot be transformed.
///
/// Malformed input is reported by the parser as `std::io::Error`; these are
/// the errors that show up once the proof has been read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EliminationError {
    /// A chain needs the resolvent of a RAT clause with a clause its RAT
    /// hints do not cover.
    #[error("clause {candidate} is not a resolution candidate of RAT clause {rat}")]
    MissingCandidate {
        rat: ClauseIndex,
        candidate: ClauseIndex,
    },
    /// Resolving two clauses did not remove exactly one complementary pair.
    #[error("clauses {first} and {second} do not resolve on {pivot}")]
    NonResolvingPivot {
        first: ClauseIndex,
        second: ClauseIndex,
        pivot: Literal,
    },
    /// The resolvent would contain both polarities of a variable.
    #[error("resolvent of clauses {first} and {second} on {pivot} is tautological in {literal}")]
    TautologicalResolvent {
        first: ClauseIndex,
        second: ClauseIndex,
        pivot: Literal,
        literal: Literal,
    },
    /// An antecedent leaves more than one literal unassigned (in strict mode).
    #[error("antecedent {antecedent} of clause {clause} is not unit")]
    MultiplePivots {
        clause: ClauseIndex,
        antecedent: ClauseIndex,
    },
}
