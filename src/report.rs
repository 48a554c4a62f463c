//! Delivery of solutions to the caller.
//!
//! The search engine hands every solution to a caller-supplied handler as
//! a [`Solution`] view: the choice stack plus read access to the matrix,
//! enough to reconstruct which options were chosen and which items each
//! one covers. Two ready-made handlers cover the common cases: [`printer`]
//! writes item names line by line, and [`silent`] discards everything
//! (useful when only the counters matter).

use std::io::Write;
use std::ops::ControlFlow;

use crate::indices::{ItemId, NodeIndex};
use crate::matrix::Matrix;

/// A read-only view of one solution, valid for the duration of the
/// handler call it is passed to.
///
/// The view exposes the choice stack, one option-node per recursion
/// level. To name the option a node belongs to, the view walks backward
/// from the node to the spacer that opens its option and then reads the
/// option forward, so the items come out in the order the caller declared
/// them.
pub struct Solution<'s> {
    matrix: &'s Matrix,
    choices: &'s [NodeIndex],
}

impl<'s> Solution<'s> {
    pub(crate) fn new(matrix: &'s Matrix, choices: &'s [NodeIndex]) -> Self {
        Self { matrix, choices }
    }

    /// The option-nodes hypothesized into the solution, one per recursion
    /// level, in the order the search selected them.
    pub fn choice_stack(&self) -> &'s [NodeIndex] {
        self.choices
    }

    /// The chosen options in their insertion order, which makes rendered
    /// output independent of the order the search happened to select
    /// them in.
    pub fn options(&self) -> impl Iterator<Item = NodeIndex> {
        let mut sorted = self.choices.to_vec();
        sorted.sort_unstable();
        sorted.into_iter()
    }

    /// The items of the option containing the option-node `on`, in
    /// declaration order.
    pub fn option_of(&self, on: NodeIndex) -> OptionItems<'s> {
        OptionItems {
            matrix: self.matrix,
            cur: self.matrix.opening_spacer(on).increment(),
        }
    }

    /// The display name of an item.
    pub fn item_name(&self, item: ItemId) -> &'s str {
        self.matrix.name(item)
    }

    /// The number of items in the problem.
    pub fn item_count(&self) -> usize {
        self.matrix.item_count()
    }
}

/// An iterator over the items of one option, in declaration order.
///
/// Returned by [`Solution::option_of`].
pub struct OptionItems<'s> {
    matrix: &'s Matrix,
    cur: NodeIndex,
}

impl Iterator for OptionItems<'_> {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        // The closing spacer ends the walk.
        let item = self.matrix.item_of(self.cur)?;
        self.cur = self.cur.increment();
        Some(item)
    }
}

/// Returns a handler that writes every solution to `out`: one line per
/// chosen option listing its item names, options in insertion order, and
/// a blank line after each solution.
///
/// A write failure cancels the search.
pub fn printer<W: Write>(mut out: W) -> impl FnMut(&Solution<'_>) -> ControlFlow<()> {
    move |solution| {
        for on in solution.options() {
            let mut sep = "";
            for item in solution.option_of(on) {
                if write!(out, "{sep}{}", solution.item_name(item)).is_err() {
                    return ControlFlow::Break(());
                }
                sep = " ";
            }
            if writeln!(out).is_err() {
                return ControlFlow::Break(());
            }
        }
        match writeln!(out) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    }
}

/// Returns a handler that ignores every solution.
pub fn silent() -> impl FnMut(&Solution<'_>) -> ControlFlow<()> {
    |_| ControlFlow::Continue(())
}
