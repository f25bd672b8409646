//! The proof as an ordered, editable sequence of clauses
//!
//! Clauses live in an arena and are addressed by [`ClauseRef`](struct.ClauseRef.html)
//! handles, which stay valid while clauses are inserted, moved and freed.
//! The proof order is a doubly linked list threaded through the arena.

use crate::{
    clause::{Chain, ProofClause},
    literal::Variable,
    memory::{HeapSpace, Offset, Vector},
};
use rat_elim_macros::HeapSpace;
use std::{
    cmp, fmt,
    fmt::Display,
    ops::{Index, IndexMut},
};

/// A stable handle to a clause in a [`Proof`](struct.Proof.html).
///
/// Handles are arena offsets stored in 32 bits, so a proof holds fewer than
/// `u32::MAX` clauses over its lifetime, counting freed ones.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct ClauseRef(u32);

impl ClauseRef {
    /// # Panics
    /// Panics if assertions are enabled and `offset` does not fit in 32 bits.
    pub fn new(offset: usize) -> ClauseRef {
        requires!(offset < u32::max_value() as usize);
        ClauseRef(offset as u32)
    }
}

impl Offset for ClauseRef {
    fn as_offset(&self) -> usize {
        self.0 as usize
    }
}

impl Display for ClauseRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, HeapSpace)]
struct Node {
    clause: ProofClause,
    prev: Option<ClauseRef>,
    next: Option<ClauseRef>,
    /// False once the clause has been freed.
    live: bool,
}

#[derive(Debug, Default, HeapSpace)]
pub struct Proof {
    /// The arena. Slots of freed clauses are not reused, since resolvent
    /// memos of the current round may still name them.
    nodes: Vector<Node>,
    head: Option<ClauseRef>,
    tail: Option<ClauseRef>,
    /// The last clause of the input formula.
    last_input: Option<ClauseRef>,
    /// RAT clauses in proof order, eliminated from the back.
    rat_clauses: Vector<ClauseRef>,
    maxvar: Variable,
    /// The number of linked clauses.
    live: usize,
}

impl Proof {
    pub fn new() -> Proof {
        Proof::default()
    }
    /// The number of clauses in the proof.
    pub fn len(&self) -> usize {
        self.live
    }
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
    /// The size of the arena, for side tables indexed by `ClauseRef`.
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }
    pub fn maxvar(&self) -> Variable {
        self.maxvar
    }
    pub fn first(&self) -> Option<ClauseRef> {
        self.head
    }
    pub fn last(&self) -> Option<ClauseRef> {
        self.tail
    }
    pub fn next(&self, clause: ClauseRef) -> Option<ClauseRef> {
        self.node(clause).next
    }
    pub fn prev(&self, clause: ClauseRef) -> Option<ClauseRef> {
        self.node(clause).prev
    }
    pub fn is_live(&self, clause: ClauseRef) -> bool {
        self.nodes[clause.as_offset()].live
    }
    pub fn last_input(&self) -> Option<ClauseRef> {
        self.last_input
    }
    /// Record that the clauses added so far make up the input formula.
    pub fn mark_end_of_input(&mut self) {
        self.last_input = self.tail;
    }
    /// Iterate over the clauses in proof order.
    pub fn iter(&self) -> ProofIterator {
        ProofIterator {
            proof: self,
            cursor: self.head,
        }
    }

    fn node(&self, clause: ClauseRef) -> &Node {
        let node = &self.nodes[clause.as_offset()];
        requires!(node.live, "clause {} was freed", clause);
        node
    }
    fn node_mut(&mut self, clause: ClauseRef) -> &mut Node {
        let node = &mut self.nodes[clause.as_offset()];
        requires!(node.live, "clause {} was freed", clause);
        node
    }
    /// Every parsed clause and every resolvent takes a fresh slot, bounded
    /// by the width of `ClauseRef`.
    fn allocate(&mut self, clause: ProofClause) -> ClauseRef {
        for literal in &clause.literals {
            self.maxvar = cmp::max(self.maxvar, literal.variable());
        }
        let handle = ClauseRef::new(self.nodes.len());
        self.nodes.push(Node {
            clause,
            prev: None,
            next: None,
            live: true,
        });
        handle
    }

    /// Append a clause, registering it for elimination if it is a RAT clause.
    pub fn push_back(&mut self, clause: ProofClause) -> ClauseRef {
        let is_rat = clause.rat_pivot().is_some();
        let handle = self.allocate(clause);
        match self.tail {
            None => self.head = Some(handle),
            Some(tail) => {
                self.node_mut(tail).next = Some(handle);
                self.node_mut(handle).prev = Some(tail);
            }
        }
        self.tail = Some(handle);
        self.live += 1;
        if is_rat {
            self.rat_clauses.push(handle);
        }
        handle
    }
    /// Insert a new clause directly after `anchor`.
    pub fn insert_after(&mut self, anchor: ClauseRef, clause: ProofClause) -> ClauseRef {
        let handle = self.allocate(clause);
        self.link_after(anchor, handle);
        handle
    }
    /// Take a clause out of the proof order, keeping its contents.
    pub fn unlink(&mut self, clause: ClauseRef) {
        let (prev, next) = {
            let node = self.node_mut(clause);
            (node.prev.take(), node.next.take())
        };
        match prev {
            None => self.head = next,
            Some(prev) => self.node_mut(prev).next = next,
        }
        match next {
            None => self.tail = prev,
            Some(next) => self.node_mut(next).prev = prev,
        }
        if self.last_input == Some(clause) {
            self.last_input = prev;
        }
        self.live -= 1;
    }
    /// Put an unlinked clause back into the proof, directly after `anchor`.
    pub fn link_after(&mut self, anchor: ClauseRef, clause: ClauseRef) {
        requires!(anchor != clause);
        let next = self.node(anchor).next;
        {
            let node = self.node_mut(clause);
            requires!(node.prev.is_none() && node.next.is_none());
            node.prev = Some(anchor);
            node.next = next;
        }
        self.node_mut(anchor).next = Some(clause);
        match next {
            None => self.tail = Some(clause),
            Some(next) => self.node_mut(next).prev = Some(clause),
        }
        self.live += 1;
    }
    /// Unlink a clause and release its literals and chain.
    pub fn free(&mut self, clause: ClauseRef) {
        self.unlink(clause);
        let node = self.node_mut(clause);
        node.live = false;
        node.clause.literals = Vector::new();
        node.clause.chain = Chain::default();
    }

    /// The RAT clauses that have not been eliminated, in proof order.
    pub fn rat_clauses(&self) -> &[ClauseRef] {
        &self.rat_clauses
    }
    /// Take the last RAT clause that is still to be eliminated.
    pub fn pop_rat(&mut self) -> Option<ClauseRef> {
        self.rat_clauses.pop()
    }

    /// Render a clause with its chain for diagnostics.
    ///
    /// Antecedents show their index, followed by the pivot in brackets where
    /// one is known.
    pub fn clause_to_string(&self, clause: ClauseRef) -> String {
        let clause = &self.nodes[clause.as_offset()].clause;
        let pivot = clause.rat_pivot();
        let mut result = format!("[{}]", clause.index);
        for literal in pivot.iter().chain(
            clause
                .literals
                .iter()
                .filter(|&&literal| Some(literal) != pivot),
        ) {
            result.push_str(&format!(" {}", literal));
        }
        result.push_str(" 0");
        for (position, link) in clause.chain.links.iter().enumerate() {
            let antecedent = &self.nodes[link.clause().as_offset()].clause;
            let sign = if link.is_negated() { "-" } else { "" };
            result.push_str(&format!(" {}{}", sign, antecedent.index));
            if let Some(pivot) = clause.chain.pivots.get(position) {
                result.push_str(&format!(" [{}]", pivot));
            }
        }
        result.push_str(" 0");
        result
    }
}

impl Index<ClauseRef> for Proof {
    type Output = ProofClause;
    fn index(&self, clause: ClauseRef) -> &ProofClause {
        &self.node(clause).clause
    }
}

impl IndexMut<ClauseRef> for Proof {
    fn index_mut(&mut self, clause: ClauseRef) -> &mut ProofClause {
        &mut self.node_mut(clause).clause
    }
}

/// Iterator over the clauses of a proof, in order.
pub struct ProofIterator<'a> {
    proof: &'a Proof,
    cursor: Option<ClauseRef>,
}

impl<'a> Iterator for ProofIterator<'a> {
    type Item = ClauseRef;
    fn next(&mut self) -> Option<ClauseRef> {
        let current = self.cursor?;
        self.cursor = self.proof.next(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clause::ClauseIndex, literal::Literal};

    fn unit(index: u64, value: i32) -> ProofClause {
        ProofClause::input(ClauseIndex(index), vector![Literal::from_dimacs(value)])
    }

    fn indices(proof: &Proof) -> Vec<u64> {
        proof.iter().map(|clause| proof[clause].index.0).collect()
    }

    #[test]
    fn list_editing() {
        let mut proof = Proof::new();
        let a = proof.push_back(unit(1, 1));
        let b = proof.push_back(unit(2, 2));
        proof.mark_end_of_input();
        let c = proof.push_back(unit(3, -3));
        assert_eq!(indices(&proof), vec![1, 2, 3]);
        assert_eq!(proof.maxvar(), Variable(2));
        assert_eq!(proof.last_input(), Some(b));

        let d = proof.insert_after(a, unit(4, 4));
        assert_eq!(indices(&proof), vec![1, 4, 2, 3]);
        proof.unlink(d);
        proof.link_after(c, d);
        assert_eq!(indices(&proof), vec![1, 2, 3, 4]);
        assert_eq!(proof.last(), Some(d));

        proof.free(a);
        assert_eq!(indices(&proof), vec![2, 3, 4]);
        assert_eq!(proof.first(), Some(b));
        assert!(!proof.is_live(a));
        assert_eq!(proof.len(), 3);
        assert_eq!(proof.slots(), 4);
    }

    #[test]
    fn freed_slots_stay_taken() {
        let mut proof = Proof::new();
        let first = proof.push_back(unit(1, 1));
        proof.free(first);
        assert!(proof.is_empty());
        let second = proof.push_back(unit(2, 2));
        assert_ne!(first, second);
        assert_eq!(second.as_offset(), 1);
        assert_eq!(ClauseRef::new(second.as_offset()), second);
        assert!(!proof.is_live(first));
        assert_eq!(indices(&proof), vec![2]);
        assert_eq!(proof.slots(), 2);
    }

    #[test]
    fn rat_clauses_are_popped_from_the_back() {
        let mut proof = Proof::new();
        let first = proof.push_back(ProofClause::rat(
            ClauseIndex(1),
            Literal::from_dimacs(1),
            vector![Literal::from_dimacs(1)],
            Vector::new(),
        ));
        proof.push_back(ProofClause::derived(
            ClauseIndex(2),
            vector![Literal::from_dimacs(1)],
            Chain::from_antecedents(vec![first]),
        ));
        let second = proof.push_back(ProofClause::rat(
            ClauseIndex(3),
            Literal::from_dimacs(-2),
            vector![Literal::from_dimacs(-2)],
            Vector::new(),
        ));
        assert_eq!(proof.rat_clauses(), &[first, second]);
        assert_eq!(proof.pop_rat(), Some(second));
        assert_eq!(proof.pop_rat(), Some(first));
        assert_eq!(proof.pop_rat(), None);
    }

    #[test]
    fn diagnostics() {
        let mut proof = Proof::new();
        let a = proof.push_back(unit(1, 1));
        let rat = proof.push_back(ProofClause::rat(
            ClauseIndex(2),
            Literal::from_dimacs(-2),
            vector![Literal::from_dimacs(1), Literal::from_dimacs(-2)],
            vector![crate::clause::ChainLink::Negated(a)],
        ));
        assert_eq!(proof.clause_to_string(rat), "[2] -2 1 0 -1 0");
    }
}
