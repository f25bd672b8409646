//! Compile-time constants

/// Add command line flag `-v`.
pub const ENABLE_LOGGING: bool = true;
/// Whether to do bounds checking when accessing array elements.
pub const ENABLE_BOUNDS_CHECKING: bool = cfg!(debug_assertions);
/// Check the `requires!()` assertions at runtime (cheap).
pub const CHECK_PRECONDITIONS: bool = true;
/// Check the `invariant!()` assertions at runtime (cheap).
pub const CHECK_INVARIANTS: bool = true;
/// Verify that every resolvent is sorted and tautology-free (linear in the clause size).
pub const CHECK_CLAUSE_INVARIANTS: bool = cfg!(debug_assertions);
/// Check that no live clause refers to a freed one after each round (very expensive).
pub const CHECK_LINK_INVARIANTS: bool = false;
/// Clauses up to this size are searched linearly instead of by bisection.
pub const LINEAR_SEARCH_THRESHOLD: usize = 8;
