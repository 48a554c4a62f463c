use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use log::debug;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::BuildError;
use crate::indices::{ItemId, NodeIndex};
use crate::matrix::{ItemKind, Matrix};
use crate::report::Solution;

/// How many option attempts pass between two progress records.
const PROGRESS_INTERVAL: u64 = 1 << 20;

/// Whether a search visits every solution or stops at the first one.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SolveMode {
    /// Enumerate all solutions, in a deterministic order fixed by the
    /// declaration order of items and options.
    Exhaustive,
    /// Return after delivering one solution. The candidate options at
    /// each level are visited in shuffled order, so a seeded solver
    /// draws a reproducible solution and an unseeded one a fresh sample
    /// per call.
    FirstOnly,
}

/// Counters describing one completed [`solve`](`Solver::solve`) pass.
#[derive(Debug, Default, Copy, Clone)]
pub struct SolveStats {
    /// How many solutions were delivered to the handler.
    pub solutions_found: u64,
    /// How many options were tried across the whole search tree.
    pub options_tried: u64,
    /// The deepest recursion level reached, which equals the peak length
    /// of the choice stack.
    pub max_depth: usize,
    /// Wall-clock duration of the pass.
    pub elapsed: Duration,
}

/// Finds all [solutions] to an exact cover problem with $N_1\geq 0$
/// primary items and $N_2\geq 0$ secondary items.
///
/// A solver is populated in two phases: declare every item with
/// [`Self::add_item`] (primary items first), then declare the options
/// with [`Self::add_option`]. The first builder error latches: all later
/// builder and solve calls return it unchanged, so a long declaration
/// loop only needs one check at the end. Once populated, [`Self::solve`]
/// walks the search tree and invokes a handler at every solution; the
/// matrix is restored exactly on backtrack, so `solve` may be called any
/// number of times.
///
/// See the [crate-level documentation](`crate`) for a worked example.
///
/// [solutions]: `Solution`
pub struct Solver {
    matrix: Matrix,
    mode: SolveMode,
    seed: Option<u64>,
    error: Option<BuildError>,
}

impl Solver {
    /// Creates an empty solver.
    ///
    /// In [`SolveMode::FirstOnly`] mode the shuffle source is seeded from
    /// process entropy; use [`Self::seeded`] for reproducible draws.
    pub fn new(mode: SolveMode) -> Self {
        Self {
            matrix: Matrix::new(),
            mode,
            seed: None,
            error: None,
        }
    }

    /// Creates an empty solver whose shuffle source is reseeded with
    /// `seed` at the start of every [`Self::solve`] call.
    pub fn seeded(mode: SolveMode, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(mode)
        }
    }

    /// Appends an item and returns its identifier.
    ///
    /// Items must be declared before any option, and all primary items
    /// before the first secondary one. Names are capped at
    /// [`MAX_ITEM_NAME_LEN`](`crate::MAX_ITEM_NAME_LEN`) bytes.
    pub fn add_item(&mut self, name: &str, kind: ItemKind) -> Result<ItemId, BuildError> {
        self.guard()?;
        self.matrix.add_item(name, kind).map_err(|e| self.latch(e))
    }

    /// Appends one option, given the identifiers of the items it covers.
    ///
    /// Options may repeat, but a single option must not name the same
    /// item twice. The option's position in insertion order doubles as
    /// its identity when solutions are rendered.
    pub fn add_option(&mut self, option: &[ItemId]) -> Result<(), BuildError> {
        self.guard()?;
        self.matrix.add_option(option).map_err(|e| self.latch(e))
    }

    /// The number of declared items.
    pub fn item_count(&self) -> usize {
        self.matrix.item_count()
    }

    /// Walks the search tree, calling `visit` once per solution found.
    ///
    /// The handler receives a read-only [`Solution`] view, valid for the
    /// duration of the call, and steers the search by its return value:
    /// [`ControlFlow::Break`] abandons the search after the current
    /// partial solution unwinds. In [`SolveMode::FirstOnly`] mode the
    /// search stops after the first delivery regardless.
    ///
    /// Infeasibility is not an error: a pass that never invokes the
    /// handler simply reports `solutions_found == 0`.
    pub fn solve<F>(&mut self, mut visit: F) -> Result<SolveStats, BuildError>
    where
        F: FnMut(&Solution<'_>) -> ControlFlow<()>,
    {
        self.guard()?;
        self.matrix.ensure_finalized();
        let counts = self.matrix.option_counts();
        let depth_bound = self.matrix.primary_count();
        let started = Instant::now();

        let mut search = Search {
            matrix: &mut self.matrix,
            visit: &mut visit,
            mode: self.mode,
            rng: match self.seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_entropy(),
            },
            choices: Vec::with_capacity(depth_bound),
            stats: SolveStats::default(),
            started,
            stopped: false,
        };
        search.search();
        let mut stats = search.stats;

        debug_assert_eq!(self.matrix.option_counts(), counts);
        stats.elapsed = started.elapsed();
        Ok(stats)
    }

    /// Surfaces the latched builder error, if any.
    fn guard(&self) -> Result<(), BuildError> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Latches the first builder error so later calls keep surfacing it.
    fn latch(&mut self, e: BuildError) -> BuildError {
        self.error.get_or_insert_with(|| e.clone());
        e
    }
}

/// The state of one solve pass.
///
/// Depth-first backtracking over the matrix: select an item, cover it,
/// try each option in its vertical list, recurse, and undo. Recursion
/// depth is bounded by the number of primary items, because every level
/// covers at least one of them.
struct Search<'s, F> {
    matrix: &'s mut Matrix,
    visit: &'s mut F,
    mode: SolveMode,
    rng: SmallRng,
    /// One option-node per recursion level, identifying the option that
    /// covers the item selected at that level.
    choices: Vec<NodeIndex>,
    stats: SolveStats,
    started: Instant,
    stopped: bool,
}

impl<F> Search<'_, F>
where
    F: FnMut(&Solution<'_>) -> ControlFlow<()>,
{
    fn search(&mut self) {
        let Some(item) = self.matrix.choose_item() else {
            // Every primary item is covered.
            self.deliver();
            return;
        };
        if self.matrix.len_of(item) == 0 {
            // An uncoverable item makes the whole subtree infeasible.
            return;
        }

        self.matrix.cover(item);
        match self.mode {
            SolveMode::Exhaustive => {
                let header = self.matrix.header(item);
                let mut on = self.matrix.down(header);
                while on != header && !self.stopped {
                    self.descend(on);
                    on = self.matrix.down(on);
                }
            }
            SolveMode::FirstOnly => {
                let mut candidates = self.collect_ring(item);
                candidates.shuffle(&mut self.rng);
                for on in candidates {
                    if self.stopped {
                        break;
                    }
                    self.descend(on);
                }
            }
        }
        self.matrix.uncover(item);
    }

    /// Hypothesizes that `on`'s option is in the solution, explores the
    /// subtree, and retreats. The items of the option are uncovered in
    /// the reverse of their covering order, so the walks mirror each
    /// other and the matrix returns to its pre-call state exactly.
    fn descend(&mut self, on: NodeIndex) {
        self.stats.options_tried += 1;
        if self.stats.options_tried % PROGRESS_INTERVAL == 0 {
            self.report_progress();
        }

        self.choices.push(on);
        self.stats.max_depth = self.stats.max_depth.max(self.choices.len());
        self.matrix.cover_option(on);
        self.search();
        self.matrix.uncover_option(on);
        self.choices.pop();
    }

    /// Delivers the current choice stack to the handler.
    fn deliver(&mut self) {
        self.stats.solutions_found += 1;
        let solution = Solution::new(self.matrix, &self.choices);
        if (self.visit)(&solution).is_break() {
            self.stopped = true;
        }
        if self.mode == SolveMode::FirstOnly {
            self.stopped = true;
        }
    }

    /// Copies an item's vertical list into a scratch buffer, so the
    /// candidate order can be shuffled without touching the links.
    fn collect_ring(&self, item: ItemId) -> Vec<NodeIndex> {
        let header = self.matrix.header(item);
        let mut ring = Vec::with_capacity(self.matrix.len_of(item));
        let mut on = self.matrix.down(header);
        while on != header {
            ring.push(on);
            on = self.matrix.down(on);
        }
        ring
    }

    /// Purely observational; never mutates the matrix.
    fn report_progress(&self) {
        debug!(
            "tried {} options in {:.2?}: {} solutions, depth {} (max {}), stack {:?}",
            self.stats.options_tried,
            self.started.elapsed(),
            self.stats.solutions_found,
            self.choices.len(),
            self.stats.max_depth,
            self.choices,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Solver {
        let mut solver = Solver::new(SolveMode::Exhaustive);
        let mut ids = Vec::new();
        for name in ["A", "B", "C", "D", "E"] {
            ids.push(solver.add_item(name, ItemKind::Primary).unwrap());
        }
        for name in ["F", "G"] {
            ids.push(solver.add_item(name, ItemKind::Secondary).unwrap());
        }
        let [a, b, c, d, e, f, g] = ids[..] else {
            unreachable!()
        };
        solver.add_option(&[c, e, f]).unwrap();
        solver.add_option(&[a, d, g]).unwrap();
        solver.add_option(&[b, c, f]).unwrap();
        solver.add_option(&[a, d]).unwrap();
        solver.add_option(&[b, g]).unwrap();
        solver.add_option(&[d, e, g]).unwrap();
        solver
    }

    /// Renders each delivered solution as its options' item names,
    /// options in insertion order.
    fn render(solver: &mut Solver) -> Vec<Vec<Vec<String>>> {
        let mut all = Vec::new();
        solver
            .solve(|solution| {
                let rendered = solution
                    .options()
                    .map(|on| {
                        solution
                            .option_of(on)
                            .map(|id| solution.item_name(id).to_owned())
                            .collect()
                    })
                    .collect();
                all.push(rendered);
                ControlFlow::Continue(())
            })
            .unwrap();
        all
    }

    #[test]
    fn toy_problem_has_unique_solution() {
        let mut solver = toy();
        let solutions = render(&mut solver);
        assert_eq!(
            solutions,
            [[
                vec!["C".to_owned(), "E".into(), "F".into()],
                vec!["A".into(), "D".into()],
                vec!["B".into(), "G".into()],
            ]]
        );
    }

    #[test]
    fn counters_reflect_the_search() {
        let mut solver = toy();
        let stats = solver.solve(crate::report::silent()).unwrap();
        assert_eq!(stats.solutions_found, 1);
        // Three options cover the five primary items.
        assert_eq!(stats.max_depth, 3);
        assert!(stats.options_tried >= 3);
    }

    #[test]
    fn repeated_solves_agree() {
        let mut solver = toy();
        let first = render(&mut solver);
        let second = render(&mut solver);
        assert_eq!(first, second);
    }

    #[test]
    fn infeasible_problem_is_not_an_error() {
        let mut solver = Solver::new(SolveMode::Exhaustive);
        let r = solver.add_item("r", ItemKind::Primary).unwrap();
        solver.add_item("s", ItemKind::Primary).unwrap();
        // No option ever covers s.
        solver.add_option(&[r]).unwrap();

        let stats = solver.solve(crate::report::silent()).unwrap();
        assert_eq!(stats.solutions_found, 0);
    }

    #[test]
    fn empty_problem_has_the_empty_solution() {
        let mut solver = Solver::new(SolveMode::Exhaustive);
        let mut depths = Vec::new();
        let stats = solver
            .solve(|solution| {
                depths.push(solution.choice_stack().len());
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(stats.solutions_found, 1);
        assert_eq!(depths, [0]);
        assert_eq!(stats.max_depth, 0);
    }

    #[test]
    fn first_only_mode_stops_after_one_delivery() {
        let mut solver = Solver::seeded(SolveMode::FirstOnly, 7);
        let mut ids = Vec::new();
        for name in ["a", "b", "c", "d"] {
            ids.push(solver.add_item(name, ItemKind::Primary).unwrap());
        }
        // Two distinct exact covers exist, each of two disjoint pairs.
        solver.add_option(&[ids[0], ids[1]]).unwrap();
        solver.add_option(&[ids[2], ids[3]]).unwrap();
        solver.add_option(&[ids[0], ids[2]]).unwrap();
        solver.add_option(&[ids[1], ids[3]]).unwrap();
        let stats = solver.solve(crate::report::silent()).unwrap();
        assert_eq!(stats.solutions_found, 1);
    }

    #[test]
    fn seeded_first_only_draws_are_reproducible() {
        let build = || {
            let mut solver = Solver::seeded(SolveMode::FirstOnly, 0xfeed);
            let ids: Vec<_> = (0..6)
                .map(|i| solver.add_item(&format!("i{i}"), ItemKind::Primary).unwrap())
                .collect();
            for pair in ids.chunks(2) {
                solver.add_option(pair).unwrap();
            }
            for pair in ids[1..5].chunks(2) {
                solver.add_option(pair).unwrap();
            }
            solver.add_option(&[ids[0], ids[5]]).unwrap();
            solver
        };
        let draw = |solver: &mut Solver| {
            let mut stacks = Vec::new();
            solver
                .solve(|solution| {
                    stacks.push(solution.choice_stack().to_vec());
                    ControlFlow::Continue(())
                })
                .unwrap();
            stacks
        };
        let mut a = build();
        let mut b = build();
        assert_eq!(draw(&mut a), draw(&mut b));
        // Reseeding happens per pass, so one solver repeats itself too.
        assert_eq!(draw(&mut a), draw(&mut a));
    }

    #[test]
    fn handler_break_cancels_the_search() {
        let mut solver = Solver::new(SolveMode::Exhaustive);
        let ids: Vec<_> = (0..4)
            .map(|i| solver.add_item(&format!("i{i}"), ItemKind::Primary).unwrap())
            .collect();
        solver.add_option(&[ids[0], ids[1]]).unwrap();
        solver.add_option(&[ids[2], ids[3]]).unwrap();
        solver.add_option(&[ids[0], ids[2]]).unwrap();
        solver.add_option(&[ids[1], ids[3]]).unwrap();
        solver.add_option(&[ids[0], ids[3]]).unwrap();
        solver.add_option(&[ids[1], ids[2]]).unwrap();

        let mut seen = 0;
        let stats = solver
            .solve(|_| {
                seen += 1;
                if seen == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(seen, 2);
        assert_eq!(stats.solutions_found, 2);
    }

    #[test]
    fn builder_errors_latch() {
        let mut solver = Solver::new(SolveMode::Exhaustive);
        let p = solver.add_item("p", ItemKind::Primary).unwrap();
        let err = solver.add_option(&[]).unwrap_err();
        assert_eq!(err, BuildError::EmptyOption);
        // Every later call surfaces the first failure unchanged.
        assert_eq!(solver.add_option(&[p]), Err(BuildError::EmptyOption));
        assert_eq!(
            solver.add_item("q", ItemKind::Primary),
            Err(BuildError::EmptyOption)
        );
        assert_eq!(
            solver.solve(crate::report::silent()).unwrap_err(),
            BuildError::EmptyOption
        );
    }

    #[test]
    fn solving_does_not_grow_the_node_store() {
        let mut solver = toy();
        solver.solve(crate::report::silent()).unwrap();
        let capacity = solver.matrix.node_capacity();
        solver.solve(crate::report::silent()).unwrap();
        assert_eq!(solver.matrix.node_capacity(), capacity);
    }
}
