//! Classification of the clauses that follow the RAT clause being eliminated

use crate::{
    clause::{Occurrence, ProofClause},
    literal::Literal,
    proof::{ClauseRef, Proof},
};

/// Per-round state of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purity {
    /// The clause and its chain stay as they are.
    Pure,
    /// The clause stays but its chain is rewritten from `position` on.
    Semipure { position: usize },
    /// The clause depends on the RAT clause and is removed.
    Impure,
    /// A resolvent created in this round whose chain is not final yet.
    Pending(Pending),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    /// The chain was copied from an impure clause; `partner`, which contains
    /// `literal`, still has to be distributed over it.
    Distribution { partner: ClauseRef, literal: Literal },
    /// The chain is complete but its pivots need to be reconstructed.
    Finalization,
}

impl Default for Purity {
    fn default() -> Purity {
        Purity::Pure
    }
}

/// Classify every clause after `rat`, renumbering them consecutively.
///
/// `literal` is the pivot of the RAT clause, which itself becomes impure.
pub fn classify(proof: &mut Proof, rat: ClauseRef, literal: Literal) {
    proof[rat].purity = Purity::Impure;
    let mut index = proof[rat].index;
    let mut cursor = proof.next(rat);
    while let Some(clause) = cursor {
        index = index.next();
        let purity = classify_clause(proof, &proof[clause], literal);
        proof[clause].index = index;
        proof[clause].purity = purity;
        cursor = proof.next(clause);
    }
}

fn is_impure(proof: &Proof, clause: ClauseRef) -> bool {
    proof[clause].purity == Purity::Impure
}

/// Decide the purity of one clause, given that all earlier ones are classified.
pub fn classify_clause(proof: &Proof, clause: &ProofClause, literal: Literal) -> Purity {
    let chain = &clause.chain;
    match clause.occurrence(literal) {
        Occurrence::Opposite => Purity::Pure,
        Occurrence::Same => {
            if chain.links.iter().any(|link| is_impure(proof, link.clause())) {
                Purity::Impure
            } else {
                Purity::Pure
            }
        }
        Occurrence::Absent => {
            // Only the first step that touches the variable matters.
            let position = match chain
                .pivots
                .iter()
                .position(|pivot| pivot.variable() == literal.variable())
            {
                Some(position) => position,
                None => return Purity::Pure,
            };
            let depends_on_rat = if chain.pivots[position] == -literal {
                // The antecedent propagates `literal`.
                is_impure(proof, chain.antecedent(position))
            } else {
                // The antecedent falsifies `literal`, later steps may rely on it.
                chain.links[position + 1..]
                    .iter()
                    .any(|link| is_impure(proof, link.clause()))
            };
            if depends_on_rat {
                Purity::Semipure { position }
            } else {
                Purity::Pure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clause::{normalize, Chain, ClauseIndex},
        memory::{MarkSet, Vector},
    };

    fn literals(values: &[i32]) -> Vector<Literal> {
        let mut literals: Vector<Literal> = values.iter().map(|&v| Literal::from_dimacs(v)).collect();
        normalize(&mut literals);
        literals
    }

    /// Inputs (1 2), (1 -2), (-1 3), (-1 -3), (-4 2), a RAT clause (-1 4) on -1,
    /// then derived clauses over it.
    fn sample() -> (Proof, Vec<ClauseRef>) {
        let mut proof = Proof::new();
        let mut refs = Vec::new();
        for (i, values) in [[1, 2], [1, -2], [-1, 3], [-1, -3], [-4, 2]].iter().enumerate() {
            refs.push(proof.push_back(ProofClause::input(ClauseIndex(i as u64 + 1), literals(values))));
        }
        proof.mark_end_of_input();
        refs.push(proof.push_back(ProofClause::rat(
            ClauseIndex(6),
            Literal::from_dimacs(-1),
            literals(&[-1, 4]),
            Vector::new(),
        )));
        // (-1 2): the RAT clause propagates 4, then (-4 2) conflicts.
        refs.push(proof.push_back(ProofClause::derived(
            ClauseIndex(7),
            literals(&[-1, 2]),
            Chain::from_antecedents(vec![refs[5], refs[4]]),
        )));
        // (2): (-1 2) propagates -1, then (1 2) conflicts.
        refs.push(proof.push_back(ProofClause::derived(
            ClauseIndex(8),
            literals(&[2]),
            Chain::from_antecedents(vec![refs[6], refs[0]]),
        )));
        // (1): (1 -2) propagates -2, then (1 2) conflicts; no dependency.
        refs.push(proof.push_back(ProofClause::derived(
            ClauseIndex(9),
            literals(&[1]),
            Chain::from_antecedents(vec![refs[1], refs[0]]),
        )));
        // (3): (1) propagates 1, then (-1 3) conflicts.
        refs.push(proof.push_back(ProofClause::derived(
            ClauseIndex(10),
            literals(&[3]),
            Chain::from_antecedents(vec![refs[8], refs[2]]),
        )));
        let mut marks = MarkSet::new(10);
        for &clause in &refs {
            crate::clause::reconstruct_pivots(&mut proof, clause, &mut marks, true).unwrap();
        }
        (proof, refs)
    }

    #[test]
    fn classification() {
        let (mut proof, refs) = sample();
        classify(&mut proof, refs[5], Literal::from_dimacs(-1));
        assert_eq!(proof[refs[5]].purity, Purity::Impure);
        assert_eq!(proof[refs[0]].purity, Purity::Pure);
        assert_eq!(proof[refs[6]].purity, Purity::Impure);
        assert_eq!(proof[refs[7]].purity, Purity::Semipure { position: 0 });
        assert_eq!(proof[refs[8]].purity, Purity::Pure);
        assert_eq!(proof[refs[9]].purity, Purity::Pure);
        assert_eq!(proof[refs[9]].index, ClauseIndex(10));
    }

    #[test]
    fn falsified_literal_used_later() {
        let (mut proof, refs) = sample();
        // (4 2): the input (1 2) is unit 1, making -1 false, then the
        // dependent (-1 2) conflicts.
        let clause = proof.push_back(ProofClause::derived(
            ClauseIndex(11),
            literals(&[2, 4]),
            Chain::from_antecedents(vec![refs[0], refs[6]]),
        ));
        let mut marks = MarkSet::new(10);
        crate::clause::reconstruct_pivots(&mut proof, clause, &mut marks, true).unwrap();
        assert_eq!(proof[clause].chain.pivots, literals(&[-1]));
        classify(&mut proof, refs[5], Literal::from_dimacs(-1));
        assert_eq!(proof[clause].purity, Purity::Semipure { position: 0 });
    }
}
