//! Rewriting the chains that depend on the RAT clause being eliminated
//!
//! The sweep walks backwards from the end of the proof. Impure clauses are
//! dropped. The chain of a semipure clause is cut where it starts to depend
//! on the RAT clause, and the remainder is rebuilt by distributing the
//! antecedent at the cut over it: every later antecedent that contains the
//! complement of the distributed literal is replaced by its resolvent with
//! the distributed clause.
//!
//! Resolvents are inserted right behind the later of their two parents, so
//! antecedents keep preceding the clauses that use them. If that parent is
//! impure, the resolvent inherits its chain and is distributed over itself
//! when the sweep reaches it.

use crate::{
    clause::{candidate_chain, resolve, Chain, ChainLink, ClauseIndex, ProofClause},
    elimination::Eliminator,
    error::EliminationError,
    literal::Literal,
    memory::Vector,
    proof::ClauseRef,
    purity::{Pending, Purity},
};
use std::{cmp::Ordering, collections::HashMap, mem};

/// State of one elimination round.
#[derive(Debug)]
pub struct Round {
    /// The RAT clause being eliminated.
    pub rat: ClauseRef,
    pub rat_index: ClauseIndex,
    /// Its pivot.
    pub literal: Literal,
    /// Resolvents created so far, by (later parent, earlier parent).
    resolvents: HashMap<(ClauseRef, ClauseRef), ClauseRef>,
    /// Clauses before the RAT clause that received resolvents, which will be
    /// moved behind the RAT clause.
    pub relocation_points: Vector<ClauseRef>,
}

impl Round {
    pub fn new(rat: ClauseRef, rat_index: ClauseIndex, literal: Literal) -> Round {
        Round {
            rat,
            rat_index,
            literal,
            resolvents: HashMap::new(),
            relocation_points: Vector::new(),
        }
    }
}

/// Replace `antecedent` by its resolvent with `distributing` if it contains
/// the complement of `literal`, the literal of `distributing` on the pivot
/// variable.
pub fn eliminate(
    eliminator: &mut Eliminator,
    round: &mut Round,
    distributing: ClauseRef,
    antecedent: ClauseRef,
    literal: Literal,
) -> Result<ClauseRef, EliminationError> {
    let proof = &mut eliminator.proof;
    if !proof[antecedent].contains(-literal) {
        return Ok(antecedent);
    }
    let (higher, lower) = if proof[distributing].index > proof[antecedent].index {
        (distributing, antecedent)
    } else {
        (antecedent, distributing)
    };
    if let Some(&resolvent) = round.resolvents.get(&(higher, lower)) {
        eliminator.stats.reused_resolvents += 1;
        return Ok(resolvent);
    }
    let lower_literal = if lower == distributing {
        literal
    } else {
        -literal
    };
    let literals = resolve(&proof[lower], &proof[higher], lower_literal).map_err(|err| {
        warn!(
            "cannot resolve {} with {}",
            proof.clause_to_string(lower),
            proof.clause_to_string(higher)
        );
        err
    })?;
    let higher_index = proof[higher].index;
    let (chain, purity) = match higher_index.cmp(&round.rat_index) {
        Ordering::Greater => (
            proof[higher].chain.clone(),
            Purity::Pending(Pending::Distribution {
                partner: lower,
                literal: lower_literal,
            }),
        ),
        Ordering::Equal => {
            let chain = candidate_chain(&proof[higher].chain.links, lower).ok_or_else(|| {
                EliminationError::MissingCandidate {
                    rat: higher_index,
                    candidate: proof[lower].index,
                }
            })?;
            (chain, Purity::Pending(Pending::Finalization))
        }
        Ordering::Less => {
            round.relocation_points.push(higher);
            // `lower` propagates its literal on the pivot variable, which
            // falsifies the complement in `higher`.
            let chain = Chain {
                links: vector![ChainLink::Plain(lower), ChainLink::Plain(higher)],
                pivots: vector![-lower_literal],
            };
            (chain, Purity::Pending(Pending::Finalization))
        }
    };
    let mut clause = ProofClause::derived(higher_index, literals, chain);
    clause.purity = purity;
    let resolvent = proof.insert_after(higher, clause);
    round.resolvents.insert((higher, lower), resolvent);
    eliminator.stats.resolvents += 1;
    log!(
        eliminator,
        2,
        "resolvent of {} and {} on {}",
        higher_index,
        eliminator.proof[lower].index,
        lower_literal
    );
    Ok(resolvent)
}

/// Distribute `distributing`, which contains `literal`, over
/// `chain[start..]`, appending the result to `target`.
///
/// Steps whose pivot is `-literal` or already false in `distributing` are
/// dropped. The chain ends early when `distributing` contains the literal a
/// step would propagate, since that antecedent is then falsified.
pub fn distribute(
    eliminator: &mut Eliminator,
    round: &mut Round,
    distributing: ClauseRef,
    literal: Literal,
    chain: &Chain,
    start: usize,
    target: &mut Chain,
) -> Result<(), EliminationError> {
    requires!(!chain.is_empty() && start < chain.len());
    let last = chain.len() - 1;
    for position in start..last {
        let pivot = chain.pivots[position];
        if pivot == -literal || eliminator.proof[distributing].contains(pivot) {
            continue;
        }
        let antecedent =
            eliminate(eliminator, round, distributing, chain.antecedent(position), literal)?;
        target.links.push(ChainLink::Plain(antecedent));
        if eliminator.proof[distributing].contains(-pivot) {
            return Ok(());
        }
        target.pivots.push(pivot);
    }
    let antecedent = eliminate(eliminator, round, distributing, chain.antecedent(last), literal)?;
    target.links.push(ChainLink::Plain(antecedent));
    Ok(())
}

/// Visit all clauses after the RAT clause, from the back.
pub fn sweep(eliminator: &mut Eliminator, round: &mut Round) -> Result<(), EliminationError> {
    let mut cursor = eliminator.proof.last();
    while let Some(clause) = cursor {
        if clause == round.rat {
            break;
        }
        let purity = eliminator.proof[clause].purity;
        match purity {
            Purity::Impure => {
                cursor = eliminator.proof.prev(clause);
                log!(eliminator, 2, "dropping {}", eliminator.proof.clause_to_string(clause));
                eliminator.proof.free(clause);
                eliminator.stats.freed_clauses += 1;
                continue;
            }
            Purity::Semipure { position } => rewrite_semipure(eliminator, round, clause, position)?,
            Purity::Pending(Pending::Distribution { partner, literal }) => {
                let chain = mem::take(&mut eliminator.proof[clause].chain);
                let mut rewritten = Chain::default();
                distribute(eliminator, round, partner, literal, &chain, 0, &mut rewritten)?;
                eliminator.proof[clause].chain = rewritten;
                eliminator.proof[clause].purity = Purity::Pure;
            }
            Purity::Pure | Purity::Pending(Pending::Finalization) => (),
        }
        // Resolvents inserted while processing `clause` are visited next.
        cursor = eliminator.proof.prev(clause);
    }
    Ok(())
}

/// Keep the chain up to `position` and distribute the antecedent there over
/// the rest.
fn rewrite_semipure(
    eliminator: &mut Eliminator,
    round: &mut Round,
    clause: ClauseRef,
    position: usize,
) -> Result<(), EliminationError> {
    let chain = mem::take(&mut eliminator.proof[clause].chain);
    let distributing = chain.antecedent(position);
    let literal = -chain.pivots[position];
    let mut rewritten = Chain {
        links: chain.links[..position].iter().cloned().collect(),
        pivots: chain.pivots[..position].iter().cloned().collect(),
    };
    distribute(
        eliminator,
        round,
        distributing,
        literal,
        &chain,
        position + 1,
        &mut rewritten,
    )?;
    log!(
        eliminator,
        2,
        "rewrote chain of {} from position {}",
        eliminator.proof[clause].index,
        position
    );
    eliminator.proof[clause].chain = rewritten;
    eliminator.proof[clause].purity = Purity::Pure;
    Ok(())
}
