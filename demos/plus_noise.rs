//! Fills a 5×5 grid with the values 0–4 so that every plus-shaped group
//! of five cells, wrapping around the edges, contains each value exactly
//! once. There are 25 such plus shapes, one centered on every cell, so
//! the items are 25 cell constraints plus 125 plus-holds-value
//! constraints; each of the 125 options places one value into one cell
//! and into the five plus shapes that cell belongs to.
//!
//! ```bash
//! cargo run --example plus_noise
//! ```

use std::ops::ControlFlow;

use quadrille::{BuildError, ItemId, ItemKind, SolveMode, Solver};

const GRID: usize = 5;
const VALUES: usize = 5;
const CELLS: usize = GRID * GRID;
const PLUSES_BEGIN: usize = CELLS;

/// The plus-holds-value item for the plus centered `dx, dy` away from
/// `cell`, wrapping around the grid.
fn plus_item(cell: usize, dx: isize, dy: isize, value: usize) -> ItemId {
    let x = ((cell % GRID) as isize + dx).rem_euclid(GRID as isize) as usize;
    let y = ((cell / GRID) as isize + dy).rem_euclid(GRID as isize) as usize;
    ItemId::new(PLUSES_BEGIN + (y * GRID + x) * VALUES + value)
}

fn main() -> Result<(), BuildError> {
    let mut solver = Solver::new(SolveMode::Exhaustive);
    for i in 0..CELLS {
        solver.add_item(&format!("C{}{}", i % GRID, i / GRID), ItemKind::Primary)?;
    }
    for i in 0..CELLS * VALUES {
        solver.add_item(
            &format!("P{}_{}", i / VALUES, i % VALUES),
            ItemKind::Primary,
        )?;
    }

    for cell in 0..CELLS {
        for value in 0..VALUES {
            solver.add_option(&[
                ItemId::new(cell),
                plus_item(cell, 0, 0, value),
                plus_item(cell, -1, 0, value),
                plus_item(cell, 1, 0, value),
                plus_item(cell, 0, -1, value),
                plus_item(cell, 0, 1, value),
            ])?;
        }
    }

    let mut shown = 0;
    let stats = solver.solve(|solution| {
        shown += 1;
        let mut board = [0usize; CELLS];
        for on in solution.options() {
            let ids: Vec<ItemId> = solution.option_of(on).collect();
            // The first item names the cell, the second the value placed
            // into the plus centered on it.
            let cell = ids[0].get();
            board[cell] = (ids[1].get() - PLUSES_BEGIN) % VALUES;
        }
        println!("solution #{shown}");
        for row in board.chunks(GRID) {
            let digits: String = row.iter().map(ToString::to_string).collect();
            println!("{digits}");
        }
        println!();
        if shown < 4 {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    })?;

    println!(
        "stopped after {} solutions, {} options tried in {:.2?}",
        stats.solutions_found, stats.options_tried, stats.elapsed
    );
    Ok(())
}
