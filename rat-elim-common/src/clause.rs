//! Proof clauses and the operations on their literals and chains

use crate::{
    config,
    error::EliminationError,
    literal::Literal,
    memory::{HeapSpace, MarkSet, Vector},
    proof::{ClauseRef, Proof},
    purity::Purity,
};
use rat_elim_macros::HeapSpace;
use std::{cmp::Ordering, fmt, fmt::Display, iter, mem};

/// The position of a clause in the proof.
///
/// Clauses before the RAT clause being eliminated keep the index they were
/// parsed with; later ones are renumbered in each round.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct ClauseIndex(pub u64);

impl ClauseIndex {
    pub fn next(self) -> ClauseIndex {
        ClauseIndex(self.0 + 1)
    }
}

impl Display for ClauseIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a clause is justified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    /// Part of the input formula.
    Input,
    /// Derived by unit propagation along its chain.
    Rup,
    /// Resolution asymmetric tautology on `pivot`, the first literal as written.
    Rat { pivot: Literal },
}

/// One antecedent reference in a chain.
///
/// `Negated` only occurs in RAT hints, where it introduces the resolution
/// candidate whose propagation steps follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainLink {
    Plain(ClauseRef),
    Negated(ClauseRef),
}

impl ChainLink {
    pub fn clause(self) -> ClauseRef {
        match self {
            ChainLink::Plain(clause) | ChainLink::Negated(clause) => clause,
        }
    }
    pub fn is_negated(self) -> bool {
        match self {
            ChainLink::Plain(_) => false,
            ChainLink::Negated(_) => true,
        }
    }
}

/// A resolution chain: antecedents plus the literal each non-final
/// antecedent makes false.
///
/// For a RUP clause with canonical pivots, `pivots.len() + 1 == links.len()`.
/// Antecedent `i` is unit under the negated clause and the earlier
/// antecedents; its unit literal is `-pivots[i]`. The last antecedent is
/// falsified.
#[derive(Debug, Clone, Default, PartialEq, Eq, HeapSpace)]
pub struct Chain {
    pub links: Vector<ChainLink>,
    pub pivots: Vector<Literal>,
}

impl Chain {
    /// A chain over plain antecedents, pivots still to be reconstructed.
    pub fn from_antecedents(antecedents: impl IntoIterator<Item = ClauseRef>) -> Chain {
        Chain {
            links: antecedents.into_iter().map(ChainLink::Plain).collect(),
            pivots: Vector::new(),
        }
    }
    pub fn len(&self) -> usize {
        self.links.len()
    }
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
    pub fn antecedent(&self, position: usize) -> ClauseRef {
        self.links[position].clause()
    }
}

/// A clause in the proof together with its justification and per-round state.
#[derive(Debug, Clone, PartialEq, Eq, HeapSpace)]
pub struct ProofClause {
    pub index: ClauseIndex,
    pub kind: ClauseKind,
    /// Sorted and free of duplicates.
    pub literals: Vector<Literal>,
    pub chain: Chain,
    pub purity: Purity,
}

/// How a variable occurs in a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    Absent,
    /// The literal that was asked for.
    Same,
    /// Its negation.
    Opposite,
}

impl ProofClause {
    pub fn input(index: ClauseIndex, literals: Vector<Literal>) -> ProofClause {
        ProofClause {
            index,
            kind: ClauseKind::Input,
            literals,
            chain: Chain::default(),
            purity: Purity::Pure,
        }
    }
    pub fn derived(index: ClauseIndex, literals: Vector<Literal>, chain: Chain) -> ProofClause {
        requires!(!chain.is_empty());
        ProofClause {
            index,
            kind: ClauseKind::Rup,
            literals,
            chain,
            purity: Purity::Pure,
        }
    }
    pub fn rat(
        index: ClauseIndex,
        pivot: Literal,
        literals: Vector<Literal>,
        links: Vector<ChainLink>,
    ) -> ProofClause {
        requires!(contains(&literals, pivot));
        ProofClause {
            index,
            kind: ClauseKind::Rat { pivot },
            literals,
            chain: Chain {
                links,
                pivots: Vector::new(),
            },
            purity: Purity::Pure,
        }
    }
    pub fn is_rup(&self) -> bool {
        self.kind == ClauseKind::Rup
    }
    /// A RUP clause whose chain is a single antecedent, which it subsumes.
    pub fn is_alias(&self) -> bool {
        self.is_rup() && self.chain.len() == 1
    }
    pub fn rat_pivot(&self) -> Option<Literal> {
        match self.kind {
            ClauseKind::Rat { pivot } => Some(pivot),
            _ => None,
        }
    }
    pub fn contains(&self, literal: Literal) -> bool {
        contains(&self.literals, literal)
    }
    pub fn occurrence(&self, literal: Literal) -> Occurrence {
        occurrence(&self.literals, literal)
    }
}

/// Sort literals and drop duplicates.
pub fn normalize(literals: &mut Vector<Literal>) {
    literals.sort_unstable();
    literals.dedup();
}

pub fn is_sorted_and_tautology_free(literals: &[Literal]) -> bool {
    literals
        .windows(2)
        .all(|pair| pair[0] < pair[1] && pair[0].variable() != pair[1].variable())
}

/// Whether a sorted clause contains the exact literal.
pub fn contains(literals: &[Literal], literal: Literal) -> bool {
    if literals.len() <= config::LINEAR_SEARCH_THRESHOLD {
        literals.iter().any(|&candidate| candidate == literal)
    } else {
        literals.binary_search(&literal).is_ok()
    }
}

/// Look up the variable of `literal` in a sorted clause.
pub fn occurrence(literals: &[Literal], literal: Literal) -> Occurrence {
    let variable = literal.variable();
    let found = if literals.len() <= config::LINEAR_SEARCH_THRESHOLD {
        literals
            .iter()
            .find(|candidate| candidate.variable() == variable)
            .cloned()
    } else {
        literals
            .binary_search_by_key(&variable, |candidate| candidate.variable())
            .ok()
            .map(|position| literals[position])
    };
    match found {
        None => Occurrence::Absent,
        Some(found) if found == literal => Occurrence::Same,
        Some(_) => Occurrence::Opposite,
    }
}

/// Resolve two clauses on the variable of `pivot`.
///
/// One of them must contain `pivot` and the other its negation. The result
/// is sorted and contains neither polarity of the pivot variable.
pub fn resolve(
    first: &ProofClause,
    second: &ProofClause,
    pivot: Literal,
) -> Result<Vector<Literal>, EliminationError> {
    let variable = pivot.variable();
    let in_first = first.literals.iter().find(|l| l.variable() == variable);
    let in_second = second.literals.iter().find(|l| l.variable() == variable);
    match (in_first, in_second) {
        (Some(&a), Some(&b)) if a == -b && (a == pivot || b == pivot) => (),
        _ => {
            return Err(EliminationError::NonResolvingPivot {
                first: first.index,
                second: second.index,
                pivot,
            })
        }
    }
    let mut resolvent = Vector::with_capacity(first.literals.len() + second.literals.len());
    let mut left = first.literals.iter().peekable();
    let mut right = second.literals.iter().peekable();
    loop {
        let literal = match (left.peek(), right.peek()) {
            (None, None) => break,
            (Some(&&a), None) => {
                left.next();
                a
            }
            (None, Some(&&b)) => {
                right.next();
                b
            }
            (Some(&&a), Some(&&b)) => match a.cmp(&b) {
                Ordering::Less => {
                    left.next();
                    a
                }
                Ordering::Greater => {
                    right.next();
                    b
                }
                Ordering::Equal => {
                    left.next();
                    right.next();
                    a
                }
            },
        };
        if literal.variable() == variable {
            continue;
        }
        // Both polarities of a variable are adjacent in sort order.
        if resolvent.last() == Some(&-literal) {
            return Err(EliminationError::TautologicalResolvent {
                first: first.index,
                second: second.index,
                pivot,
                literal,
            });
        }
        resolvent.push(literal);
    }
    if config::CHECK_CLAUSE_INVARIANTS {
        invariant!(is_sorted_and_tautology_free(&resolvent));
    }
    Ok(resolvent)
}

/// The hints of a RAT clause before the first candidate marker.
pub fn pre_chain(links: &[ChainLink]) -> &[ChainLink] {
    let end = links
        .iter()
        .position(|link| link.is_negated())
        .unwrap_or_else(|| links.len());
    &links[..end]
}

/// The hints following the marker of `candidate`, up to the next marker.
pub fn post_chain(links: &[ChainLink], candidate: ClauseRef) -> Option<&[ChainLink]> {
    let start = links
        .iter()
        .position(|&link| link == ChainLink::Negated(candidate))?
        + 1;
    let length = links[start..]
        .iter()
        .position(|link| link.is_negated())
        .unwrap_or_else(|| links.len() - start);
    Some(&links[start..start + length])
}

/// The chain deriving the resolvent of a RAT clause with one of its
/// candidates: the candidate, the pre-chain, then the candidate's post-chain.
pub fn candidate_chain(rat_hints: &[ChainLink], candidate: ClauseRef) -> Option<Chain> {
    let post = post_chain(rat_hints, candidate)?;
    let antecedents = pre_chain(rat_hints)
        .iter()
        .chain(post)
        .map(|link| link.clause());
    Some(Chain::from_antecedents(
        iter::once(candidate).chain(antecedents),
    ))
}

/// Recompute the pivots of a RUP clause and drop redundant antecedents.
///
/// Antecedents that are satisfied when they are reached are dropped, and the
/// chain ends at the first antecedent that is falsified. Applying this to a
/// canonical chain changes nothing.
pub fn reconstruct_pivots(
    proof: &mut Proof,
    clause: ClauseRef,
    marks: &mut MarkSet<Literal>,
    strict: bool,
) -> Result<(), EliminationError> {
    if !proof[clause].is_rup() {
        return Ok(());
    }
    let chain = mem::take(&mut proof[clause].chain);
    let result = canonical_chain(proof, clause, &chain, marks, strict);
    proof[clause].chain = match result {
        Ok(canonical) => canonical,
        Err(err) => {
            proof[clause].chain = chain;
            return Err(err);
        }
    };
    Ok(())
}

fn canonical_chain(
    proof: &Proof,
    clause: ClauseRef,
    chain: &Chain,
    marks: &mut MarkSet<Literal>,
    strict: bool,
) -> Result<Chain, EliminationError> {
    requires!(!chain.is_empty());
    // Marked literals are false.
    let mut falsified = marks.scope();
    for &literal in &proof[clause].literals {
        falsified.mark(literal);
    }
    let mut canonical = Chain::default();
    let last = chain.len() - 1;
    let mut conflict = chain.links[last];
    for &link in &chain.links[..last] {
        let antecedent = &proof[link.clause()];
        let mut satisfied = false;
        let mut unit = None;
        let mut unassigned = 0;
        for &literal in &antecedent.literals {
            if falsified.is_marked(literal) {
                continue;
            }
            if falsified.is_marked(-literal) {
                satisfied = true;
                break;
            }
            unassigned += 1;
            unit.get_or_insert(literal);
        }
        if satisfied {
            continue;
        }
        let unit = match unit {
            Some(unit) => unit,
            None => {
                conflict = link;
                break;
            }
        };
        if unassigned > 1 {
            if strict {
                return Err(EliminationError::MultiplePivots {
                    clause: proof[clause].index,
                    antecedent: antecedent.index,
                });
            }
            warn!(
                "antecedent {} is not unit in the chain of {}, using {} as pivot",
                antecedent.index,
                proof.clause_to_string(clause),
                -unit
            );
            for &literal in &antecedent.literals {
                if !falsified.is_marked(literal) {
                    falsified.mark(-literal);
                }
            }
        } else {
            falsified.mark(-unit);
        }
        canonical.links.push(link);
        canonical.pivots.push(-unit);
    }
    canonical.links.push(conflict);
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(values: &[i32]) -> Vector<Literal> {
        let mut literals: Vector<Literal> = values.iter().map(|&v| Literal::from_dimacs(v)).collect();
        normalize(&mut literals);
        literals
    }

    fn input(index: u64, values: &[i32]) -> ProofClause {
        ProofClause::input(ClauseIndex(index), literals(values))
    }

    #[test]
    fn membership() {
        let clause = input(1, &[3, -1, 2]);
        assert!(clause.contains(Literal::from_dimacs(-1)));
        assert!(!clause.contains(Literal::from_dimacs(1)));
        assert_eq!(clause.occurrence(Literal::from_dimacs(1)), Occurrence::Opposite);
        assert_eq!(clause.occurrence(Literal::from_dimacs(2)), Occurrence::Same);
        assert_eq!(clause.occurrence(Literal::from_dimacs(4)), Occurrence::Absent);
        let long: Vec<i32> = (1..=20).map(|v| if v % 3 == 0 { -v } else { v }).collect();
        let clause = input(2, &long);
        assert!(clause.contains(Literal::from_dimacs(-18)));
        assert!(!clause.contains(Literal::from_dimacs(18)));
        assert_eq!(clause.occurrence(Literal::from_dimacs(-17)), Occurrence::Opposite);
        assert_eq!(clause.occurrence(Literal::from_dimacs(21)), Occurrence::Absent);
    }

    #[test]
    fn resolution() {
        let a = input(1, &[1, 2, -3]);
        let b = input(2, &[-1, 4]);
        assert_eq!(
            resolve(&a, &b, Literal::from_dimacs(1)),
            Ok(literals(&[2, -3, 4]))
        );
        assert_eq!(
            resolve(&b, &a, Literal::from_dimacs(-1)),
            Ok(literals(&[2, -3, 4]))
        );
        let shared = input(3, &[-1, 2]);
        assert_eq!(resolve(&a, &shared, Literal::from_dimacs(1)), Ok(literals(&[2, -3])));
    }

    #[test]
    fn resolution_failures() {
        let a = input(1, &[1, 2]);
        let b = input(2, &[1, 3]);
        assert_eq!(
            resolve(&a, &b, Literal::from_dimacs(1)),
            Err(EliminationError::NonResolvingPivot {
                first: ClauseIndex(1),
                second: ClauseIndex(2),
                pivot: Literal::from_dimacs(1),
            })
        );
        let c = input(3, &[-1, -2]);
        assert_eq!(
            resolve(&a, &c, Literal::from_dimacs(1)),
            Err(EliminationError::TautologicalResolvent {
                first: ClauseIndex(1),
                second: ClauseIndex(3),
                pivot: Literal::from_dimacs(1),
                literal: Literal::from_dimacs(-2),
            })
        );
    }

    #[test]
    fn rat_hint_slices() {
        let refs: Vec<ClauseRef> = (0..6).map(ClauseRef::new).collect();
        let hints = vector![
            ChainLink::Plain(refs[0]),
            ChainLink::Negated(refs[1]),
            ChainLink::Plain(refs[2]),
            ChainLink::Plain(refs[3]),
            ChainLink::Negated(refs[4]),
            ChainLink::Plain(refs[5])
        ];
        assert_eq!(pre_chain(&hints), &hints[..1]);
        assert_eq!(post_chain(&hints, refs[1]), Some(&hints[2..4]));
        assert_eq!(post_chain(&hints, refs[4]), Some(&hints[5..]));
        assert_eq!(post_chain(&hints, refs[2]), None);
        assert_eq!(
            candidate_chain(&hints, refs[1]),
            Some(Chain::from_antecedents(vec![refs[1], refs[0], refs[2], refs[3]]))
        );
    }

    fn proof_with(clauses: Vec<ProofClause>) -> (Proof, Vec<ClauseRef>) {
        let mut proof = Proof::new();
        let refs = clauses.into_iter().map(|clause| proof.push_back(clause)).collect();
        (proof, refs)
    }

    #[test]
    fn pivots_follow_unit_propagation() {
        let (mut proof, refs) = proof_with(vec![
            input(1, &[1, 2]),
            input(2, &[-1, 3]),
            input(3, &[-2, 3]),
            input(4, &[-3]),
        ]);
        let derived = proof.push_back(ProofClause::derived(
            ClauseIndex(5),
            literals(&[1]),
            Chain::from_antecedents(vec![refs[0], refs[2], refs[3]]),
        ));
        let mut marks = MarkSet::new(8);
        reconstruct_pivots(&mut proof, derived, &mut marks, true).unwrap();
        let expected = Chain {
            links: vector![
                ChainLink::Plain(refs[0]),
                ChainLink::Plain(refs[2]),
                ChainLink::Plain(refs[3])
            ],
            pivots: vector![Literal::from_dimacs(-2), Literal::from_dimacs(-3)],
        };
        assert_eq!(proof[derived].chain, expected);
        assert!(marks.is_clear());
        reconstruct_pivots(&mut proof, derived, &mut marks, true).unwrap();
        assert_eq!(proof[derived].chain, expected);
    }

    #[test]
    fn redundant_antecedents_are_dropped() {
        let (mut proof, refs) = proof_with(vec![
            input(1, &[-1, 2]),
            input(2, &[1, 3]),
            input(3, &[-2]),
            input(4, &[-3, 4]),
        ]);
        // Under -1: clause 2 is satisfied, clause 1 is falsified right away.
        let derived = proof.push_back(ProofClause::derived(
            ClauseIndex(5),
            literals(&[-1, 2]),
            Chain::from_antecedents(vec![refs[1], refs[0], refs[2], refs[3]]),
        ));
        let mut marks = MarkSet::new(8);
        reconstruct_pivots(&mut proof, derived, &mut marks, true).unwrap();
        assert_eq!(proof[derived].chain, Chain::from_antecedents(vec![refs[0]]));
        assert!(marks.is_clear());
    }

    #[test]
    fn non_unit_antecedents() {
        let (mut proof, refs) = proof_with(vec![input(1, &[1, 2]), input(2, &[-1])]);
        let derived = proof.push_back(ProofClause::derived(
            ClauseIndex(3),
            literals(&[3]),
            Chain::from_antecedents(vec![refs[0], refs[1]]),
        ));
        let mut marks = MarkSet::new(8);
        assert_eq!(
            reconstruct_pivots(&mut proof, derived, &mut marks, true),
            Err(EliminationError::MultiplePivots {
                clause: ClauseIndex(3),
                antecedent: ClauseIndex(1),
            })
        );
        assert!(marks.is_clear());
        assert_eq!(proof[derived].chain.len(), 2);
        reconstruct_pivots(&mut proof, derived, &mut marks, false).unwrap();
        assert_eq!(proof[derived].chain.pivots, vector![Literal::from_dimacs(-1)]);
        assert!(marks.is_clear());
    }
}
