use std::env;
use std::process;

use text_io::read;

use burrow_board::{draw_burrow, Burrow};
use burrow_solver::heuristics::CheapestFirst;
use burrow_solver::{BestFirst, BranchBound, Solution, Solver};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|arg| arg == "-v");

    // the diagram: top wall through bottom wall
    let mut rows: Vec<String> = Vec::new();
    loop {
        let row: String = read!("{}\n");
        let done = !rows.is_empty() && row.trim().chars().all(|c| c == '#');
        rows.push(row);
        if done {
            break;
        }
    }

    let mut burrow = match Burrow::from_diagram(&rows) {
        Ok(burrow) => burrow,
        Err(error) => {
            eprintln!("invalid burrow diagram: {}", error);
            process::exit(1);
        }
    };

    if verbose {
        println!("{}", draw_burrow(&burrow));
    }

    let solution = if args.iter().any(|arg| arg == "astar") {
        BestFirst::new().solve(&mut burrow)
    } else {
        let mut solver = BranchBound::new().with_ordering(CheapestFirst);
        let solution = solver.solve(&mut burrow);
        if verbose {
            println!("{}", solver.stats());
        }
        solution
    };

    match solution {
        Some(solution) => report(&burrow, &solution, verbose),
        None => {
            eprintln!("the burrow cannot be sorted from this configuration");
            process::exit(2);
        }
    }
}

fn report(burrow: &Burrow, solution: &Solution, verbose: bool) {
    println!("{}", solution.energy());

    if verbose {
        for (move_n, mv) in solution.moves().iter().enumerate() {
            let family = burrow.pod(mv.pod()).family();
            let target = if mv.to_corridor() {
                format!("corridor cell {}", mv.to().offset())
            } else {
                format!("room {}", mv.room())
            };
            println!(
                " {:>2}  {:<8}{} -> {}",
                move_n + 1,
                family,
                mv.from().offset(),
                target
            );
        }
    }
}
