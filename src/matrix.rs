use crate::error::BuildError;
use crate::indices::{ItemId, NodeIndex};

/// Longest permitted item name, in bytes.
///
/// Names are display aids only; the search identifies items by position.
/// Keeping them short keeps the item table compact and the printed
/// solutions legible.
pub const MAX_ITEM_NAME_LEN: usize = 16;

/// Whether an item must be covered exactly once or at most once.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ItemKind {
    /// The item must be covered by exactly one chosen option.
    Primary,
    /// The item may be covered by at most one chosen option, and may
    /// also stay uncovered.
    Secondary,
}

/// An item in an exact cover problem.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Item {
    /// The display name. This field corresponds to the `NAME` member in
    /// Knuth's data structure; the root sentinel's name is empty.
    name: String,
    /// Possibly the previous item in the horizontal list of active items,
    /// in cyclic order. The contents of this variable are preserved when
    /// the item is removed from the list, which is what makes the dancing
    /// links technique applicable to the list of active items.
    ///
    /// This field corresponds to the `LLINK` pointer in Knuth's data
    /// structure.
    left: ItemId,
    /// Possibly the next item in the horizontal list of active items,
    /// in cyclic order. (See `self.left` for details.)
    ///
    /// This field corresponds to the `RLINK` pointer in Knuth's data
    /// structure.
    right: ItemId,
    /// The number of option-nodes currently in the vertical list for this
    /// item, excluding the header. Mutated only by the cover and uncover
    /// routines once the search begins.
    ///
    /// This field corresponds to the `LEN` member in Knuth's data structure.
    len: usize,
}

/// A record in the flat node store: an item header, an option-node, or
/// a spacer between options.
///
/// All three roles share one representation so that the store is a single
/// dense arena of uniform records, and so that whole-store comparisons can
/// verify that a cover/uncover pair restored every link exactly.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Node {
    /// The previous node in the vertical list for `item`; for a spacer,
    /// the previous spacer in the store.
    ///
    /// This field corresponds to the `ULINK` pointer in Knuth's data
    /// structure.
    up: NodeIndex,
    /// The next node in the vertical list for `item`; for a spacer,
    /// the next spacer in the store.
    ///
    /// This field corresponds to the `DLINK` pointer in Knuth's data
    /// structure.
    down: NodeIndex,
    /// The owning item of a header or option-node, or [`None`] for
    /// a spacer.
    ///
    /// This field corresponds to the `TOP` member in Knuth's data
    /// structure, which marks spacers with a nonpositive value.
    item: Option<ItemId>,
}

/// The sparse boolean matrix of an exact cover problem, linked for
/// dancing.
///
/// Two arenas hold the whole structure. The item table stores one entry
/// per declared item plus a root sentinel at the end; its `left`/`right`
/// fields thread the circular list of active items, primary items first.
/// The node store opens with one header node per item, at the index equal
/// to the item's identifier, followed by the options in insertion order,
/// each bracketed by spacers. An option's nodes occupy consecutive
/// positions, so the search walks an option by stepping indices and wraps
/// around through the spacers' links; no per-option length field is
/// needed.
///
/// All storage is allocated while the problem is being declared. The
/// search mutates neighbor links in place and restores them exactly on
/// backtrack, so a solve pass performs no allocation and leaves the
/// matrix bit-for-bit as it found it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Matrix {
    /// The items, followed by the root sentinel once the table is frozen.
    items: Vec<Item>,
    /// The headers, spacers and option-nodes.
    nodes: Vec<Node>,
    /// The position of the first secondary item, if any has been declared.
    first_secondary: Option<usize>,
    /// The most recently appended spacer. [`None`] until the first option
    /// freezes the item table.
    last_spacer: Option<NodeIndex>,
}

impl Matrix {
    /// Creates an empty matrix with no items and no options.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            nodes: Vec::new(),
            first_secondary: None,
            last_spacer: None,
        }
    }

    // Building routines.

    /// Appends an item to the item table and returns its identifier.
    ///
    /// All primary items must be declared before the first secondary one,
    /// and all items before the first option.
    pub fn add_item(&mut self, name: &str, kind: ItemKind) -> Result<ItemId, BuildError> {
        if self.is_finalized() {
            return Err(BuildError::ItemsFinalized);
        }
        if name.len() > MAX_ITEM_NAME_LEN {
            return Err(BuildError::ItemNameTooLong { name: name.into() });
        }
        match kind {
            ItemKind::Primary if self.first_secondary.is_some() => {
                return Err(BuildError::SecondaryBeforePrimary { name: name.into() });
            }
            ItemKind::Secondary if self.first_secondary.is_none() => {
                self.first_secondary = Some(self.items.len());
            }
            _ => {}
        }
        let id = ItemId::new(self.items.len());
        self.items.push(Item {
            name: name.to_owned(),
            left: id,
            right: id,
            len: 0,
        });
        Ok(id)
    }

    /// Appends an option and splices one node per member item to the tail
    /// of that item's vertical list.
    ///
    /// The first call closes item declaration; see [`Self::finalize_items`].
    pub fn add_option(&mut self, option: &[ItemId]) -> Result<(), BuildError> {
        if option.is_empty() {
            return Err(BuildError::EmptyOption);
        }
        // Validate the whole option before touching either arena.
        for (ix, &id) in option.iter().enumerate() {
            if id.get() >= self.item_count() {
                return Err(BuildError::UnknownItem { id: id.get() });
            }
            // Options are short, so a pairwise scan beats building a set.
            if option[..ix].contains(&id) {
                return Err(BuildError::DuplicateItemInOption {
                    name: self.items[id.get()].name.clone(),
                });
            }
        }
        self.ensure_finalized();

        self.nodes.reserve(option.len() + 1);
        for &id in option {
            self.append_node(id);
        }
        // The closing spacer terminates this option and begins the next;
        // its up/down thread the separate list of spacers, which is what
        // lets an option walk wrap around in constant time.
        let prev_spacer = self.last_spacer.expect("store is finalized");
        let spacer = NodeIndex::new(self.nodes.len());
        self.nodes.push(Node {
            up: prev_spacer,
            down: spacer,
            item: None,
        });
        self.nodes[prev_spacer.get()].down = spacer;
        self.last_spacer = Some(spacer);
        Ok(())
    }

    /// Closes item declaration if it is still open.
    ///
    /// A solve pass on a problem with no options calls this too, so that
    /// the horizontal ring exists even when the node store holds nothing
    /// beyond the headers and the opening spacer.
    pub fn ensure_finalized(&mut self) {
        if !self.is_finalized() {
            self.finalize_items();
        }
    }

    /// Freezes the item table: appends the root sentinel, threads the
    /// horizontal ring through it in declaration order (primary items
    /// first, then secondary), and reserves one header node per item plus
    /// the spacer that precedes the first option.
    fn finalize_items(&mut self) {
        debug_assert!(!self.is_finalized());
        let n = self.items.len();
        self.items.push(Item {
            name: String::new(),
            left: ItemId::new(n),
            right: ItemId::new(n),
            len: 0,
        });
        for ix in 0..=n {
            self.items[ix].left = ItemId::new(if ix == 0 { n } else { ix - 1 });
            self.items[ix].right = ItemId::new(if ix == n { 0 } else { ix + 1 });
        }
        self.nodes.reserve(n + 1);
        for ix in 0..n {
            let header = NodeIndex::new(ix);
            self.nodes.push(Node {
                up: header,
                down: header,
                item: Some(ItemId::new(ix)),
            });
        }
        // The first spacer has no predecessor; its self-looped `up` is
        // never followed, because every option walk wraps through the
        // spacers that bracket that option.
        let spacer = NodeIndex::new(n);
        self.nodes.push(Node {
            up: spacer,
            down: spacer,
            item: None,
        });
        self.last_spacer = Some(spacer);
    }

    /// Appends one option-node for `item` at the end of the store and
    /// splices it to the tail of `item`'s vertical list.
    fn append_node(&mut self, item: ItemId) {
        let ix = NodeIndex::new(self.nodes.len());
        let header = NodeIndex::new(item.get());
        let tail = self.nodes[header.get()].up;
        self.nodes.push(Node {
            up: tail,
            down: header,
            item: Some(item),
        });
        self.nodes[tail.get()].down = ix;
        self.nodes[header.get()].up = ix;
        self.items[item.get()].len += 1;
    }

    // Dancing links routines.

    /// Marks an item as covered: deletes it from the horizontal list of
    /// items remaining to be covered, and hides every active option that
    /// contains it.
    pub fn cover(&mut self, item: ItemId) {
        let Item { left, right, .. } = self.items[item.get()];
        self.items[left.get()].right = right;
        self.items[right.get()].left = left;

        let header = NodeIndex::new(item.get());
        let mut on = self.nodes[header.get()].down;
        while on != header {
            self.hide(on);
            on = self.nodes[on.get()].down;
        }
    }

    /// Undoes the updates made by the paired [`Self::cover`] call.
    ///
    /// The walk retraces cover's downward order. That is sound because a
    /// hidden node keeps its own up/down fields while hidden: when it is
    /// restored, the store holds exactly the nodes that were present when
    /// it was removed, so the symmetric writes reattach it between its
    /// original neighbors.
    pub fn uncover(&mut self, item: ItemId) {
        let header = NodeIndex::new(item.get());
        let mut on = self.nodes[header.get()].down;
        while on != header {
            self.unhide(on);
            on = self.nodes[on.get()].down;
        }

        let Item { left, right, .. } = self.items[item.get()];
        self.items[left.get()].right = item;
        self.items[right.get()].left = item;
    }

    /// Removes from their vertical lists all nodes of `on`'s option except
    /// `on` itself, which stays linked so that the paired [`Self::unhide`]
    /// retraces the identical walk.
    ///
    /// The walk proceeds cyclically to the right: consecutive store
    /// positions are members of the same option until a spacer appears,
    /// and the spacer's `up` link names the spacer that opens the option,
    /// one position before its first node.
    fn hide(&mut self, on: NodeIndex) {
        let mut cur = on.increment();
        while cur != on {
            let Node { up, down, item } = self.nodes[cur.get()];
            match item {
                None => cur = up.increment(),
                Some(owner) => {
                    self.nodes[up.get()].down = down;
                    self.nodes[down.get()].up = up;
                    self.items[owner.get()].len -= 1;
                    cur = cur.increment();
                }
            }
        }
    }

    /// Undoes the updates made by the paired [`Self::hide`] call.
    fn unhide(&mut self, on: NodeIndex) {
        let mut cur = on.increment();
        while cur != on {
            let Node { up, down, item } = self.nodes[cur.get()];
            match item {
                None => cur = up.increment(),
                Some(owner) => {
                    self.nodes[up.get()].down = cur;
                    self.nodes[down.get()].up = cur;
                    self.items[owner.get()].len += 1;
                    cur = cur.increment();
                }
            }
        }
    }

    /// Covers every item of `on`'s option except the one whose vertical
    /// list `on` was selected from, cyclically from left to right.
    pub fn cover_option(&mut self, on: NodeIndex) {
        let mut cur = on.increment();
        while cur != on {
            match self.nodes[cur.get()].item {
                None => cur = self.nodes[cur.get()].up.increment(),
                Some(item) => {
                    self.cover(item);
                    cur = cur.increment();
                }
            }
        }
    }

    /// Exact inverse of [`Self::cover_option`]: uncovers the same items
    /// cyclically from right to left, so the uncover walk mirrors the
    /// cover walk. A spacer met going leftwards is the one that opens the
    /// option; its `down` link names the closing spacer, one position
    /// after the option's last node.
    pub fn uncover_option(&mut self, on: NodeIndex) {
        let mut cur = on.decrement();
        while cur != on {
            match self.nodes[cur.get()].item {
                None => cur = self.nodes[cur.get()].down.decrement(),
                Some(item) => {
                    self.uncover(item);
                    cur = cur.decrement();
                }
            }
        }
    }

    /// Finds the active primary item whose vertical list is shortest,
    /// breaking ties by position in the horizontal ring. Knuth found that
    /// this "minimum remaining values" heuristic usually gives the
    /// smallest branching factor; see Section 7.2.2.3 of _The Art of
    /// Computer Programming_, Pre-Fascicle 7A, for empirical results.
    ///
    /// An item with an empty vertical list wins immediately: the caller
    /// treats it as a dead end and prunes without covering anything.
    /// Returns [`None`] when no primary item remains active, which is the
    /// solution condition.
    pub fn choose_item(&self) -> Option<ItemId> {
        let root = self.root();
        let limit = self.primary_count();
        let mut best = None;
        let mut best_len = usize::MAX;
        let mut cur = self.items[root.get()].right;
        // Secondary items occupy the tail of the ring, so the primary
        // prefix ends at the first index past the boundary.
        while cur != root && cur.get() < limit {
            let len = self.items[cur.get()].len;
            if len < best_len {
                if len == 0 {
                    return Some(cur);
                }
                best_len = len;
                best = Some(cur);
            }
            cur = self.items[cur.get()].right;
        }
        best
    }

    // Accessors used by the search engine and the reporter.

    /// Returns whether item declaration has closed.
    pub fn is_finalized(&self) -> bool {
        self.last_spacer.is_some()
    }

    /// The number of declared items, excluding the root sentinel.
    pub fn item_count(&self) -> usize {
        self.items.len() - self.is_finalized() as usize
    }

    /// The number of primary items, which equals the position of the
    /// first secondary item.
    pub fn primary_count(&self) -> usize {
        self.first_secondary.unwrap_or_else(|| self.item_count())
    }

    /// The root sentinel of the horizontal ring.
    ///
    /// # Panics
    ///
    /// Meaningful only once the item table is frozen.
    fn root(&self) -> ItemId {
        debug_assert!(self.is_finalized());
        ItemId::new(self.items.len() - 1)
    }

    /// The display name of an item.
    pub fn name(&self, item: ItemId) -> &str {
        &self.items[item.get()].name
    }

    /// The number of active options in `item`'s vertical list.
    pub fn len_of(&self, item: ItemId) -> usize {
        self.items[item.get()].len
    }

    /// The header node of `item`'s vertical list.
    pub fn header(&self, item: ItemId) -> NodeIndex {
        NodeIndex::new(item.get())
    }

    /// The next node below `ix` in its vertical list.
    pub fn down(&self, ix: NodeIndex) -> NodeIndex {
        self.nodes[ix.get()].down
    }

    /// The owning item of a header or option-node, or [`None`] for
    /// a spacer.
    pub fn item_of(&self, ix: NodeIndex) -> Option<ItemId> {
        self.nodes[ix.get()].item
    }

    /// The spacer that opens the option containing the option-node `on`,
    /// found by stepping leftwards through the option's members.
    pub fn opening_spacer(&self, on: NodeIndex) -> NodeIndex {
        let mut cur = on;
        while self.nodes[cur.get()].item.is_some() {
            cur = cur.decrement();
        }
        cur
    }

    /// Snapshot of every item's option count, for validating that a
    /// search left the matrix as it found it.
    pub fn option_counts(&self) -> Vec<usize> {
        self.items.iter().map(|item| item.len).collect()
    }

    /// The capacity of the node store; fixed once building ends.
    #[cfg(test)]
    pub fn node_capacity(&self) -> usize {
        self.nodes.capacity()
    }
}
