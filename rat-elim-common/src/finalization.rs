//! Closing an elimination round

use crate::{
    clause::reconstruct_pivots,
    distribution::Round,
    elimination::Eliminator,
    error::EliminationError,
    memory::Vector,
    purity::{Pending, Purity},
};

/// Move resolvents out of the part of the proof before the RAT clause,
/// canonicalize the chains of the new resolvents, then free the RAT clause.
pub fn finalize(eliminator: &mut Eliminator, round: Round) -> Result<(), EliminationError> {
    let proof = &mut eliminator.proof;
    let rat = round.rat;
    for &point in &round.relocation_points {
        let mut run = Vector::new();
        let mut cursor = proof.next(point);
        while let Some(clause) = cursor {
            if proof[clause].purity != Purity::Pending(Pending::Finalization) {
                break;
            }
            run.push(clause);
            cursor = proof.next(clause);
        }
        let mut anchor = rat;
        for clause in run {
            proof.unlink(clause);
            proof.link_after(anchor, clause);
            anchor = clause;
            eliminator.stats.relocated_resolvents += 1;
        }
    }
    let mut cursor = proof.next(rat);
    while let Some(clause) = cursor {
        match proof[clause].purity {
            Purity::Pending(_) => (),
            _ => break,
        }
        reconstruct_pivots(proof, clause, &mut eliminator.marks, eliminator.flags.strict)?;
        proof[clause].purity = Purity::Pure;
        cursor = proof.next(clause);
    }
    proof.free(rat);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clause::{normalize, Chain, ChainLink, ClauseIndex, ProofClause},
        distribution::{eliminate, sweep},
        elimination::EliminationFlags,
        literal::Literal,
        proof::{ClauseRef, Proof},
    };

    fn lit(value: i32) -> Literal {
        Literal::from_dimacs(value)
    }

    fn literals(values: &[i32]) -> Vector<Literal> {
        let mut literals: Vector<Literal> = values.iter().map(|&v| lit(v)).collect();
        normalize(&mut literals);
        literals
    }

    #[test]
    fn resolvents_of_earlier_clauses_move_behind_the_rat_clause() {
        let mut proof = Proof::new();
        let c1 = proof.push_back(ProofClause::input(ClauseIndex(1), literals(&[1, 2])));
        let c2 = proof.push_back(ProofClause::input(ClauseIndex(2), literals(&[-1, 3])));
        let c3 = proof.push_back(ProofClause::input(ClauseIndex(3), literals(&[-3, 4])));
        proof.mark_end_of_input();
        let rat = proof.push_back(ProofClause::rat(
            ClauseIndex(4),
            lit(5),
            literals(&[5]),
            Vector::new(),
        ));
        let later = proof.push_back(ProofClause::derived(
            ClauseIndex(5),
            literals(&[-1, 4]),
            Chain::from_antecedents(vec![c2, c3]),
        ));
        let mut eliminator = Eliminator::new(proof, EliminationFlags::default()).unwrap();
        let mut round = Round::new(rat, ClauseIndex(4), lit(5));

        // Resolving (1 2) with (-1 4) leaves a resolvent that still needs
        // (1 2) distributed over the chain it inherits. That creates (2 3)
        // from two clauses before the RAT clause.
        let resolvent = eliminate(&mut eliminator, &mut round, c1, later, lit(1)).unwrap();
        sweep(&mut eliminator, &mut round).unwrap();
        let inner = eliminator.proof[resolvent].chain.antecedent(0);
        assert_eq!(eliminator.proof[inner].literals, literals(&[2, 3]));
        assert_eq!(eliminator.proof.prev(inner), Some(c2));
        assert_eq!(&round.relocation_points[..], &[c2]);

        finalize(&mut eliminator, round).unwrap();
        let proof = &eliminator.proof;
        let order: Vec<ClauseRef> = proof.iter().collect();
        assert_eq!(order, vec![c1, c2, c3, inner, later, resolvent]);
        assert!(!proof.is_live(rat));
        assert_eq!(eliminator.stats.resolvents, 2);
        assert_eq!(eliminator.stats.relocated_resolvents, 1);
        assert_eq!(proof[inner].purity, Purity::Pure);
        assert_eq!(
            proof[inner].chain,
            Chain {
                links: vector![ChainLink::Plain(c1), ChainLink::Plain(c2)],
                pivots: vector![lit(-1)]
            }
        );
        assert_eq!(proof[resolvent].literals, literals(&[2, 4]));
        assert_eq!(
            proof[resolvent].chain,
            Chain {
                links: vector![ChainLink::Plain(inner), ChainLink::Plain(c3)],
                pivots: vector![lit(-3)]
            }
        );
        eliminator.check_links();
    }
}
