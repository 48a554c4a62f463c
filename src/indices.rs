/// The position of an item in the solver's item table.
///
/// Identifiers are assigned densely, in declaration order, starting from
/// zero; [`add_item`] returns the identifier of each new item. The value
/// can also be computed arithmetically by callers that lay their items out
/// in fixed-size groups, which is the usual style for puzzle encoders.
/// Passing an identifier that was never assigned makes [`add_option`] fail
/// with [`UnknownItem`].
///
/// [`add_item`]: `crate::Solver::add_item`
/// [`add_option`]: `crate::Solver::add_option`
/// [`UnknownItem`]: `crate::BuildError::UnknownItem`
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash)]
#[repr(transparent)]
pub struct ItemId(usize);

impl ItemId {
    /// Creates an identifier from a raw table position.
    #[must_use]
    pub const fn new(ix: usize) -> Self {
        Self(ix)
    }

    /// Returns the table position as a primitive type.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// The position of a node in the flat node store.
///
/// The store begins with one header node per item, at the index equal to
/// the item's identifier; the options follow, bracketed by spacer nodes.
/// Because the nodes of an option occupy consecutive positions, stepping
/// an index by one moves to the adjacent member of the same option (or to
/// a spacer, whose links wrap the walk around; see the `cover` routine in
/// the matrix module).
///
/// Node positions appear in the public API only as the opaque contents of
/// a solution's [choice stack](`crate::Solution::choice_stack`).
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash)]
#[repr(transparent)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Creates a new index.
    #[must_use]
    pub(crate) const fn new(ix: usize) -> Self {
        Self(ix)
    }

    /// Returns the index value as a primitive type.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns the position of the previous record in the store.
    ///
    /// The result is meaningful only if `self` is positive, which holds
    /// for every option-node: the store places all item headers and one
    /// spacer before the first of them.
    #[must_use]
    pub(crate) fn decrement(self) -> Self {
        Self(self.0 - 1)
    }

    /// Returns the position of the next record in the store, if any.
    #[must_use]
    pub(crate) fn increment(self) -> Self {
        Self(self.0 + 1)
    }
}
