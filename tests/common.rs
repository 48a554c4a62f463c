//! Shared puzzle encoders for the integration suites.
//!
//! Each encoder is an ordinary client of the solver: it lays its items
//! out in fixed-size groups, declares one option per elementary move, and
//! leaves the interpretation of the chosen options to the test that
//! called it.

use quadrille::{ItemId, ItemKind, SolveMode, Solution, Solver};

/// Places `n` non-attacking rooks on an `n`×`n` board: one item per rank
/// and file, one option per square.
#[allow(dead_code)]
pub fn n_rooks(n: usize, mode: SolveMode) -> Solver {
    let mut solver = Solver::new(mode);
    for i in 0..n {
        solver.add_item(&format!("X{i}"), ItemKind::Primary).unwrap();
    }
    for i in 0..n {
        solver.add_item(&format!("Y{i}"), ItemKind::Primary).unwrap();
    }
    for cell in 0..n * n {
        let x = cell % n;
        let y = cell / n;
        solver
            .add_option(&[ItemId::new(x), ItemId::new(n + y)])
            .unwrap();
    }
    solver
}

/// Places `n` non-attacking queens on an `n`×`n` board.
///
/// Ranks and files are primary; the two diagonal families are secondary,
/// since a solution may leave some diagonals unoccupied.
#[allow(dead_code)]
pub fn n_queens(n: usize, mode: SolveMode) -> Solver {
    let mut solver = Solver::new(mode);
    for i in 0..n {
        solver.add_item(&format!("X{i}"), ItemKind::Primary).unwrap();
    }
    for i in 0..n {
        solver.add_item(&format!("Y{i}"), ItemKind::Primary).unwrap();
    }
    for i in 0..2 * n - 1 {
        solver.add_item(&format!("DR{i}"), ItemKind::Secondary).unwrap();
    }
    for i in 0..2 * n - 1 {
        solver.add_item(&format!("DL{i}"), ItemKind::Secondary).unwrap();
    }

    let begin_y = n;
    let begin_dr = 2 * n;
    let begin_dl = begin_dr + 2 * n - 1;
    for cell in 0..n * n {
        let x = cell % n;
        let y = cell / n;
        let dr = x + y;
        let dl = (n - x - 1) + y;
        solver
            .add_option(&[
                ItemId::new(x),
                ItemId::new(begin_y + y),
                ItemId::new(begin_dr + dr),
                ItemId::new(begin_dl + dl),
            ])
            .unwrap();
    }
    solver
}

/// Item-group offsets of the standard Sudoku encoding.
#[allow(dead_code)]
pub const SUDOKU_ROWS_BEGIN: usize = 81;
#[allow(dead_code)]
pub const SUDOKU_COLS_BEGIN: usize = 162;
#[allow(dead_code)]
pub const SUDOKU_BLOCKS_BEGIN: usize = 243;

/// Encodes a standard 9×9 Sudoku from a row-major board of givens
/// (0 = empty).
///
/// Items: 81 cell-filled, 81 row-contains-value, 81 column-contains-value
/// and 81 block-contains-value constraints, plus one initial-state item.
/// The givens are folded into a single forcing option, the only one that
/// covers the initial-state item, so every solution must start from them;
/// each empty cell then contributes nine candidate options.
#[allow(dead_code)]
pub fn sudoku(board: &[u8; 81], mode: SolveMode) -> Solver {
    let mut solver = Solver::new(mode);
    for i in 0..81 {
        let x = i % 9;
        let y = i / 9;
        solver
            .add_item(&format!("Cell{x}{y}"), ItemKind::Primary)
            .unwrap();
    }
    for group in ["Row", "Col", "Blck"] {
        for i in 0..81 {
            let unit = i / 9;
            let value = i % 9;
            solver
                .add_item(&format!("{group}{unit}_{value}"), ItemKind::Primary)
                .unwrap();
        }
    }
    let init = solver.add_item("Init", ItemKind::Primary).unwrap();

    let cell_item = |cell: usize| ItemId::new(cell);
    let row_item = |y: usize, v: usize| ItemId::new(SUDOKU_ROWS_BEGIN + y * 9 + v);
    let col_item = |x: usize, v: usize| ItemId::new(SUDOKU_COLS_BEGIN + x * 9 + v);
    let block_item = |b: usize, v: usize| ItemId::new(SUDOKU_BLOCKS_BEGIN + b * 9 + v);
    let block_of = |cell: usize| {
        let x = cell % 9;
        let y = cell / 9;
        (y / 3) * 3 + x / 3
    };

    // The forcing option: all givens at once, then the initial-state item.
    let mut forced = Vec::new();
    for cell in 0..81 {
        if board[cell] == 0 {
            continue;
        }
        let v = usize::from(board[cell]) - 1;
        forced.push(cell_item(cell));
        forced.push(row_item(cell / 9, v));
        forced.push(col_item(cell % 9, v));
        forced.push(block_item(block_of(cell), v));
    }
    forced.push(init);
    solver.add_option(&forced).unwrap();

    for cell in 0..81 {
        if board[cell] != 0 {
            continue;
        }
        for v in 0..9 {
            solver
                .add_option(&[
                    cell_item(cell),
                    row_item(cell / 9, v),
                    col_item(cell % 9, v),
                    block_item(block_of(cell), v),
                ])
                .unwrap();
        }
    }
    solver
}

/// Reconstructs a solved Sudoku board from a delivered solution.
///
/// Every chosen option (the forcing one included) lists cell-filled items
/// followed by the row-contains-value item of the same placement, which
/// is enough to pin each cell's value.
#[allow(dead_code)]
pub fn sudoku_board(solution: &Solution<'_>) -> [u8; 81] {
    let mut board = [0u8; 81];
    for on in solution.options() {
        let mut cell = usize::MAX;
        for id in solution.option_of(on) {
            let ix = id.get();
            if ix < SUDOKU_ROWS_BEGIN {
                cell = ix;
            } else if ix < SUDOKU_COLS_BEGIN {
                board[cell] = ((ix - SUDOKU_ROWS_BEGIN) % 9) as u8 + 1;
            }
        }
    }
    board
}

/// Parses a row-major digit string (0 = empty) into a board.
#[allow(dead_code)]
pub fn parse_board(input: &str) -> [u8; 81] {
    let mut board = [0u8; 81];
    let digits: Vec<u8> = input
        .chars()
        .filter(char::is_ascii_digit)
        .map(|c| c as u8 - b'0')
        .collect();
    assert_eq!(digits.len(), 81, "board needs exactly 81 digits");
    board.copy_from_slice(&digits);
    board
}
