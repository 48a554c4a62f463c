#![warn(missing_docs)]

//! This crate implements D. E. Knuth's _dancing links_ (DLX) technique
//! for the exact cover problem.
//!
//! Suppose we're given a collection of _options_, each of which is a set
//! of _items_; the _exact cover_ problem is to find a subcollection of
//! options such that each item occurs in exactly one of them. Knuth
//! described a method that achieves this goal in the paper "Dancing
//! Links", [arXiv:cs/0011047][dl] \[cs.DS\] (2000), whose title refers to
//! a clever yet simple technique for deleting and restoring the nodes of
//! a doubly linked list: a removed node keeps its own neighbor links, so
//! relinking it is a pair of symmetric writes and the whole structure
//! returns to its former shape on backtrack, with no copying. His
//! backtracking scheme, called _Algorithm X_, employs this waltzing of
//! links to visit all exact covers in a recursive, depth-first manner.
//! \[For further information, see Section 7.2.2.1 of [_The Art of
//! Computer Programming_ **4B** (2022)][taocp4b], Part 2, 65–70.\]
//!
//! A slight modification of Algorithm X handles items of two categories:
//! _primary_ items must be covered exactly once, while _secondary_ items
//! may be covered at most once and may also stay uncovered. This solver
//! supports both. At every level of the search it branches on the active
//! primary item with the fewest remaining options (the _minimum remaining
//! values_ heuristic), covers it, and tries each option in that item's
//! list in turn.
//!
//! The [`Solver`] is populated through two operations: [`add_item`]
//! declares the items to be covered (primary items first), and
//! [`add_option`] declares the options, each a nonempty duplicate-free
//! list of item identifiers. [`solve`] then walks the search tree and
//! calls a handler once per solution with a read-only [`Solution`] view;
//! the [`report`] module provides ready-made printing and discarding
//! handlers. A solver built with [`SolveMode::Exhaustive`] visits every
//! solution in a deterministic order; [`SolveMode::FirstOnly`] shuffles
//! the candidate options at each level and stops at the first solution
//! found, which yields a random sample of the solution space.
//!
//! # Example
//!
//! Knuth posed the following toy problem at the beginning of Section
//! 7.2.2.1 in [_TAOCP_ **4B**][taocp4b], Part 2, page 66: cover the
//! items $a,b,c,d,e$ using some of the options
//! \\[
//! \`c\\;e\\;f';\quad\`a\\;d\\;g';\quad\`b\\;c\\;f';\quad\`a\\;d';\quad\`b\\;g';\quad\`d\\;e\\;g',
//! \\]
//! where $f$ and $g$ are secondary. The unique solution consists of the
//! options `a d`, `c e f` and `b g`:
//!
//! ```
//! use std::ops::ControlFlow;
//! use quadrille::{ItemKind, SolveMode, Solver};
//!
//! let mut solver = Solver::new(SolveMode::Exhaustive);
//! let a = solver.add_item("A", ItemKind::Primary)?;
//! let b = solver.add_item("B", ItemKind::Primary)?;
//! let c = solver.add_item("C", ItemKind::Primary)?;
//! let d = solver.add_item("D", ItemKind::Primary)?;
//! let e = solver.add_item("E", ItemKind::Primary)?;
//! let f = solver.add_item("F", ItemKind::Secondary)?;
//! let g = solver.add_item("G", ItemKind::Secondary)?;
//!
//! solver.add_option(&[c, e, f])?;
//! solver.add_option(&[a, d, g])?;
//! solver.add_option(&[b, c, f])?;
//! solver.add_option(&[a, d])?;
//! solver.add_option(&[b, g])?;
//! solver.add_option(&[d, e, g])?;
//!
//! let mut found = Vec::new();
//! let stats = solver.solve(|solution| {
//!     for on in solution.options() {
//!         let names: Vec<_> = solution
//!             .option_of(on)
//!             .map(|id| solution.item_name(id))
//!             .collect();
//!         found.push(names.join(" "));
//!     }
//!     ControlFlow::Continue(())
//! })?;
//!
//! assert_eq!(stats.solutions_found, 1);
//! assert_eq!(found, ["C E F", "A D", "B G"]);
//! # Ok::<(), quadrille::BuildError>(())
//! ```
//!
//! [dl]: https://arxiv.org/pdf/cs/0011047.pdf
//! [taocp4b]: https://www-cs-faculty.stanford.edu/~knuth/taocp.html#vol4

mod error;
mod indices;
mod matrix;
pub mod report;
mod solver;

pub use error::BuildError;
pub use indices::{ItemId, NodeIndex};
pub use matrix::{ItemKind, MAX_ITEM_NAME_LEN};
pub use report::Solution;
pub use solver::{SolveMode, SolveStats, Solver};
