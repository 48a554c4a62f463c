//! Searches for 9×9 grids in which every row, every column and every one
//! of the 81 overlapping 3×3 blocks — wrapping around the edges, not just
//! the nine aligned ones — contains the values 1–9. No givens; any grid
//! satisfying the constraints is reported.
//!
//! The items are 81 cell constraints, 81 row-holds-value, 81
//! column-holds-value and 729 block-holds-value constraints. Each of the
//! 729 options places one value into one cell, its row, its column and
//! the nine wrapped blocks covering that cell.
//!
//! ```bash
//! cargo run --release --example wrap_sudoku
//! ```

use std::ops::ControlFlow;

use quadrille::{BuildError, ItemId, ItemKind, SolveMode, Solver};

const ROWS_BEGIN: usize = 81;
const COLS_BEGIN: usize = ROWS_BEGIN + 81;
const BLOCKS_BEGIN: usize = COLS_BEGIN + 81;

/// The block-holds-value item for the 3×3 block centered `dx, dy` away
/// from `cell`, wrapping around the grid.
fn block_item(cell: usize, dx: isize, dy: isize, value: usize) -> ItemId {
    let x = ((cell % 9) as isize + dx).rem_euclid(9) as usize;
    let y = ((cell / 9) as isize + dy).rem_euclid(9) as usize;
    ItemId::new(BLOCKS_BEGIN + (y * 9 + x) * 9 + value)
}

fn main() -> Result<(), BuildError> {
    let mut solver = Solver::new(SolveMode::Exhaustive);
    for i in 0..81 {
        solver.add_item(&format!("Cell{}{}", i % 9, i / 9), ItemKind::Primary)?;
    }
    for i in 0..81 {
        solver.add_item(&format!("Row{}_{}", i / 9, i % 9), ItemKind::Primary)?;
    }
    for i in 0..81 {
        solver.add_item(&format!("Col{}_{}", i / 9, i % 9), ItemKind::Primary)?;
    }
    for i in 0..729 {
        solver.add_item(&format!("Blk{}_{}", i / 9, i % 9), ItemKind::Primary)?;
    }

    let mut option = Vec::with_capacity(12);
    for cell in 0..81 {
        for value in 0..9 {
            option.clear();
            option.push(ItemId::new(cell));
            option.push(ItemId::new(ROWS_BEGIN + (cell / 9) * 9 + value));
            option.push(ItemId::new(COLS_BEGIN + (cell % 9) * 9 + value));
            for offset in 0..9 {
                let dx = (offset % 3) as isize - 1;
                let dy = (offset / 3) as isize - 1;
                option.push(block_item(cell, dx, dy, value));
            }
            solver.add_option(&option)?;
        }
    }

    let mut shown = 0;
    let stats = solver.solve(|solution| {
        shown += 1;
        let mut board = [0usize; 81];
        for on in solution.options() {
            let ids: Vec<ItemId> = solution.option_of(on).collect();
            let cell = ids[0].get();
            board[cell] = (ids[1].get() - ROWS_BEGIN) % 9 + 1;
        }
        println!("solution #{shown}");
        for row in board.chunks(9) {
            let digits: String = row.iter().map(ToString::to_string).collect();
            println!("{digits}");
        }
        println!();
        if shown < 2 {
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
