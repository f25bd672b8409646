//! Writing the final proof in LRAT format
//!
//! Input clauses keep their numbers, derived clauses are numbered
//! consecutively after them. A RUP clause with a single antecedent is not
//! written; references to it are redirected to that antecedent.
//! Every clause is deleted right after the last line that refers to it.

use crate::{
    clause::ProofClause,
    memory::{Array, Vector},
    proof::{ClauseRef, Proof},
};
use std::io::{Result, Write};

/// What was written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emission {
    /// Lines for derived clauses.
    pub clauses: usize,
    /// Clauses that were folded into their antecedent.
    pub aliases: usize,
    /// Clause numbers that appeared in deletion lines.
    pub deletions: usize,
}

/// Output numbering and reference counts.
struct Numbering {
    number: Array<ClauseRef, u64>,
    /// For aliases, the clause that is written in their place.
    representative: Array<ClauseRef, Option<ClauseRef>>,
    references: Array<ClauseRef, usize>,
}

impl Numbering {
    fn resolve(&self, clause: ClauseRef) -> ClauseRef {
        self.representative[clause].unwrap_or(clause)
    }
}

fn number_clauses(proof: &Proof) -> Numbering {
    let slots = proof.slots();
    let mut numbering = Numbering {
        number: Array::new(0, slots),
        representative: Array::new(None, slots),
        references: Array::new(0, slots),
    };
    let mut next = 0;
    for clause in proof.iter() {
        if proof[clause].is_alias() {
            let target = numbering.resolve(proof[clause].chain.antecedent(0));
            numbering.representative[clause] = Some(target);
            continue;
        }
        for link in &proof[clause].chain.links {
            let target = numbering.resolve(link.clause());
            numbering.references[target] += 1;
        }
        next += 1;
        numbering.number[clause] = next;
    }
    numbering
}

fn write_clause(
    output: &mut impl Write,
    numbering: &Numbering,
    clause: &ProofClause,
    number: u64,
    print_pivots: bool,
) -> Result<()> {
    write!(output, "{}", number)?;
    let pivot = clause.rat_pivot();
    if let Some(pivot) = pivot {
        write!(output, " {}", pivot)?;
    }
    for &literal in &clause.literals {
        if Some(literal) != pivot {
            write!(output, " {}", literal)?;
        }
    }
    write!(output, " 0")?;
    for (position, link) in clause.chain.links.iter().enumerate() {
        let antecedent = numbering.number[numbering.resolve(link.clause())];
        let sign = if link.is_negated() { "-" } else { "" };
        write!(output, " {}{}", sign, antecedent)?;
        if print_pivots {
            if let Some(pivot) = clause.chain.pivots.get(position) {
                write!(output, " [{}]", pivot)?;
            }
        }
    }
    writeln!(output, " 0")
}

fn write_deletion(output: &mut impl Write, number: u64, deleted: &[u64]) -> Result<()> {
    write!(output, "{} d", number)?;
    for id in deleted {
        write!(output, " {}", id)?;
    }
    writeln!(output, " 0")
}

/// Write all derived clauses of `proof` to `output`.
///
/// Input clauses that are never referenced are deleted in a first line.
/// With `print_pivots`, every antecedent but the last is followed by its
/// pivot in brackets, which is not valid LRAT.
pub fn write_proof(proof: &Proof, output: &mut impl Write, print_pivots: bool) -> Result<Emission> {
    let mut numbering = number_clauses(proof);
    let mut emission = Emission::default();

    let mut cursor = proof.first();
    if let Some(last_input) = proof.last_input() {
        let mut unused = Vector::new();
        while let Some(clause) = cursor {
            if numbering.references[clause] == 0 {
                unused.push(numbering.number[clause]);
            }
            cursor = proof.next(clause);
            if clause == last_input {
                break;
            }
        }
        if !unused.is_empty() {
            write_deletion(output, numbering.number[last_input], &unused)?;
            emission.deletions += unused.len();
        }
    }

    let mut deleted = Vector::new();
    while let Some(clause) = cursor {
        cursor = proof.next(clause);
        if numbering.representative[clause].is_some() {
            emission.aliases += 1;
            continue;
        }
        let number = numbering.number[clause];
        write_clause(output, &numbering, &proof[clause], number, print_pivots)?;
        emission.clauses += 1;
        for link in &proof[clause].chain.links {
            let target = numbering.resolve(link.clause());
            numbering.references[target] -= 1;
            if numbering.references[target] == 0 {
                deleted.push(numbering.number[target]);
            }
        }
        if !deleted.is_empty() {
            write_deletion(output, number, &deleted)?;
            emission.deletions += deleted.len();
            deleted.clear();
        }
    }
    output.flush()?;
    Ok(emission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        elimination::{EliminationFlags, Eliminator},
        input::Input,
        parser::{parse_formula, parse_proof, Parser},
    };
    use std::collections::HashMap;

    fn eliminator(formula: &str, proof: &str) -> Eliminator {
        let mut parser = Parser::new();
        parse_formula(&mut parser, &mut Input::from_bytes(formula.as_bytes())).unwrap();
        parse_proof(&mut parser, &mut Input::from_bytes(proof.as_bytes())).unwrap();
        Eliminator::new(parser.proof, EliminationFlags::default()).unwrap()
    }

    fn emit(proof: &Proof, print_pivots: bool) -> (String, Emission) {
        let mut output = Vec::new();
        let emission = write_proof(proof, &mut output, print_pivots).unwrap();
        (String::from_utf8(output).unwrap(), emission)
    }

    const FORMULA: &str = "p cnf 4 5\n1 2 0\n1 -2 0\n-1 3 0\n-1 -3 0\n-4 2 0\n";

    #[test]
    fn eliminated_proof() {
        let mut eliminator = eliminator(FORMULA, "6 -1 0 -1 3 4 -2 3 4 0\n7 0 6 1 2 0\n");
        eliminator.run(|| false).unwrap();
        let (text, emission) = emit(&eliminator.proof, false);
        assert_eq!(
            text,
            "5 d 5 0\n\
             6 -2 0 2 3 4 0\n\
             6 d 2 0\n\
             7 2 0 1 3 4 0\n\
             7 d 1 3 4 0\n\
             8 0 7 6 0\n\
             8 d 7 6 0\n"
        );
        assert_eq!(
            emission,
            Emission {
                clauses: 3,
                aliases: 0,
                deletions: 7,
            }
        );
    }

    #[test]
    fn remaining_rat_steps_keep_their_hints() {
        let eliminator = eliminator(FORMULA, "6 -1 0 -1 3 4 -2 3 4 0\n7 0 6 1 2 0\n");
        let (text, _) = emit(&eliminator.proof, false);
        assert_eq!(
            text,
            "5 d 5 0\n\
             6 -1 0 -1 3 4 -2 3 4 0\n\
             6 d 3 4 0\n\
             7 0 6 1 2 0\n\
             7 d 6 1 2 0\n"
        );
    }

    #[test]
    fn aliases_are_folded() {
        // 6 is a copy of input 1, 7 a copy of 6.
        let eliminator = eliminator(
            FORMULA,
            "6 1 2 0 1 0\n7 1 2 0 6 0\n8 1 0 7 2 0\n9 0 8 3 4 0\n",
        );
        let (text, emission) = emit(&eliminator.proof, false);
        assert_eq!(
            text,
            "5 d 5 0\n\
             6 1 0 1 2 0\n\
             6 d 1 2 0\n\
             7 0 6 3 4 0\n\
             7 d 6 3 4 0\n"
        );
        assert_eq!(emission.aliases, 2);
        assert_eq!(emission.clauses, 2);
    }

    #[test]
    fn pivots_for_debugging() {
        let eliminator = eliminator(FORMULA, "6 1 0 1 2 0\n7 0 6 3 4 0\n");
        let (text, _) = emit(&eliminator.proof, true);
        assert!(text.contains("6 1 0 1 [-2] 2 0\n"));
        assert!(text.contains("7 0 6 [-1] 3 [-3] 4 0\n"));
    }

    #[test]
    fn every_referenced_clause_is_deleted_once() {
        let mut eliminator = eliminator(
            FORMULA,
            "6 -1 4 0 -1 3 4 -2 3 4 0\n7 -1 2 0 6 5 0\n8 2 0 7 1 0\n9 0 8 2 4 3 0\n",
        );
        eliminator.run(|| false).unwrap();
        let (text, _) = emit(&eliminator.proof, false);
        let mut deletions = HashMap::new();
        let mut last_use = HashMap::new();
        for (line, fields) in text
            .lines()
            .map(|line| line.split(' ').collect::<Vec<_>>())
            .enumerate()
        {
            if fields[1] == "d" {
                for id in &fields[2..fields.len() - 1] {
                    *deletions.entry(id.to_string()).or_insert(0) += 1;
                    assert!(last_use.get(*id).map_or(true, |&used| used < line));
                }
                continue;
            }
            let zero = fields.iter().position(|&field| field == "0").unwrap();
            for id in &fields[zero + 1..fields.len() - 1] {
                assert!(!deletions.contains_key(*id), "{} used after deletion", id);
                last_use.insert(id.to_string(), line);
            }
        }
        assert!(deletions.values().all(|&count| count == 1));
        for id in last_use.keys() {
            assert!(deletions.contains_key(id));
        }
    }
}
