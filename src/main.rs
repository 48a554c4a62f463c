//! Reference command-line driver for the exact cover solver.
//!
//! Reads a problem description from standard input. The first non-blank
//! line lists the item names, separated by whitespace or commas, with an
//! optional `|` marking where the secondary items begin; every following
//! non-blank line is one option, naming the items it covers. Lines
//! starting with `#` are comments.
//!
//! ```text
//! $ quadrille <<'EOF'
//! A B C D E | F G
//! C E F
//! A D G
//! B C F
//! A D
//! B G
//! D E G
//! EOF
//! ```
//!
//! Solutions go to standard output through the printing reporter. The
//! exit code is 0 if at least one solution was found, 1 if none, and 2 on
//! malformed input. Pass `--first` to stop at one randomly drawn solution
//! (`--seed N` makes the draw reproducible), and set `RUST_LOG=debug` to
//! watch progress records on long searches.

use std::collections::HashMap;
use std::error::Error;
use std::io::{self, Read};
use std::process::ExitCode;

use quadrille::{report, ItemId, ItemKind, SolveMode, Solver};

struct Args {
    mode: SolveMode,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args {
        mode: SolveMode::Exhaustive,
        seed: None,
    };
    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--first" => args.mode = SolveMode::FirstOnly,
            "--seed" => {
                let value = argv.next().ok_or("--seed needs a value")?;
                args.seed = Some(value.parse()?);
            }
            other => return Err(format!("unrecognized argument `{other}`").into()),
        }
    }
    Ok(args)
}

/// Splits one input line into item names.
fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
}

fn read_problem(input: &str, args: &Args) -> Result<Solver, Box<dyn Error>> {
    let mut solver = match args.seed {
        Some(seed) => Solver::seeded(args.mode, seed),
        None => Solver::new(args.mode),
    };
    let mut lines = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let items = lines.next().ok_or("input names no items")?;
    let mut ids = HashMap::<String, ItemId>::new();
    let mut kind = ItemKind::Primary;
    for name in tokens(items) {
        if name == "|" {
            kind = ItemKind::Secondary;
            continue;
        }
        let id = solver.add_item(name, kind)?;
        if ids.insert(name.to_owned(), id).is_some() {
            return Err(format!("item `{name}` is declared twice").into());
        }
    }

    let mut option = Vec::new();
    for line in lines {
        option.clear();
        for name in tokens(line) {
            let &id = ids
                .get(name)
                .ok_or_else(|| format!("option names unknown item `{name}`"))?;
            option.push(id);
        }
        solver.add_option(&option)?;
    }
    Ok(solver)
}

fn run() -> Result<bool, Box<dyn Error>> {
    let args = parse_args()?;
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let mut solver = read_problem(&input, &args)?;
    let stdout = io::stdout().lock();
    let stats = solver.solve(report::printer(stdout))?;

    match stats.solutions_found {
        0 => println!("no solutions"),
        1 => println!("1 solution in {:.2?}", stats.elapsed),
        n => println!("{n} solutions in {:.2?}", stats.elapsed),
    }
    Ok(stats.solutions_found > 0)
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
