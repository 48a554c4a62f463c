use thiserror::Error;

use crate::matrix::MAX_ITEM_NAME_LEN;

/// Things that may go wrong while declaring the items and options of an
/// exact cover problem.
///
/// All of these are caller errors detected synchronously by the builder
/// operations. The first failure latches inside the [`Solver`]: every
/// later builder call and every [`solve`] call becomes a no-op that
/// returns the original error again. The search itself has no error
/// conditions; an infeasible problem simply produces zero solutions.
///
/// [`Solver`]: `crate::Solver`
/// [`solve`]: `crate::Solver::solve`
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum BuildError {
    /// An item's display name is longer than the solver accepts.
    #[error("item name `{name}` is longer than {max} bytes", max = MAX_ITEM_NAME_LEN)]
    ItemNameTooLong {
        /// The offending name.
        name: String,
    },

    /// A primary item was declared after a secondary item; the item table
    /// must hold all primary items first.
    #[error("primary item `{name}` declared after a secondary item")]
    SecondaryBeforePrimary {
        /// The name of the out-of-order primary item.
        name: String,
    },

    /// An option refers to an item identifier that was never declared.
    #[error("option refers to unknown item {id}")]
    UnknownItem {
        /// The undeclared identifier's raw value.
        id: usize,
    },

    /// An option with no items was added.
    #[error("option contains no items")]
    EmptyOption,

    /// An option refers to the same item more than once.
    #[error("item `{name}` appears more than once in an option")]
    DuplicateItemInOption {
        /// The name of the repeated item.
        name: String,
    },

    /// An item was declared after the first option; option declaration
    /// closes the item table.
    #[error("items cannot be declared once options have been added")]
    ItemsFinalized,
}
