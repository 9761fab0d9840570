// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use caravan_model::graph::TspGraph;
use caravan_solver::solver::Solver;
use std::process::ExitCode;

struct Args {
    file: String,
    num_cities: i64,
    num_threads: i64,
    cutoff: usize,
}

fn parse_args() -> Option<Args> {
    let mut args = std::env::args().skip(1);
    let file = args.next()?;
    let num_cities: i64 = args.next()?.parse().ok()?;
    let num_threads: i64 = args.next()?.parse().ok()?;
    let cutoff: usize = match args.next() {
        Some(raw) => raw.parse().ok()?,
        None => 0,
    };
    Some(Args {
        file,
        num_cities,
        num_threads,
        cutoff,
    })
}

fn usage(program: &str) {
    eprintln!("Usage: {program} <file.tsp> <num_cities> <num_threads> [cutoff]");
    eprintln!("Example: {program} example.tsp 12 8 3");
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading TSP file: {}", args.file);
    let mut graph = TspGraph::<i32>::load(&args.file)?;
    if args.num_cities > 0 {
        graph.truncate(args.num_cities as usize);
    }
    let threads = if args.num_threads > 0 {
        args.num_threads as usize
    } else {
        0 // resolved to the hardware concurrency by the runner
    };

    println!("Graph size: {} cities", graph.len());
    println!("Cutoff: {}", args.cutoff);

    let solver = Solver::new(threads, args.cutoff);

    println!("\nRunning parallel search...");
    let parallel = solver.solve(&graph)?;
    let parallel_tour = parallel
        .result()
        .tour()
        .ok_or("parallel search ended without a tour")?;
    let parallel_time = parallel.report().duration.as_secs_f64();

    println!("\n=== PARALLEL RESULTS ===");
    println!("Best tour: {}", parallel_tour);
    println!("Best distance: {}", parallel_tour.cost());
    println!("Time: {:.3} seconds", parallel_time);
    println!("Threads: {}", parallel.report().num_threads);
    println!("Tasks processed: {}", parallel.report().tasks_processed);
    println!("Tasks created: {}", parallel.report().tasks_created);

    println!("\nRunning sequential search for comparison...");
    let sequential = solver.solve_sequential(&graph)?;
    let sequential_tour = sequential
        .result()
        .tour()
        .ok_or("sequential search ended without a tour")?;
    let sequential_time = sequential.report().duration.as_secs_f64();

    println!("\n=== SEQUENTIAL RESULTS ===");
    println!("Best distance: {}", sequential_tour.cost());
    println!("Time: {:.3} seconds", sequential_time);

    if parallel_tour.cost() == sequential_tour.cost() {
        println!("\nResults match; the parallel optimum is confirmed.");
    } else {
        println!("\nERROR: results do not match!");
        println!("Parallel: {}", parallel_tour.cost());
        println!("Sequential: {}", sequential_tour.cost());
    }

    if sequential_time > 0.0 && parallel_time > 0.0 {
        let speedup = sequential_time / parallel_time;
        let efficiency = speedup / parallel.report().num_threads as f64;
        println!("\n=== PERFORMANCE ===");
        println!("Speedup: {:.2}x", speedup);
        println!("Efficiency: {:.2}%", efficiency * 100.0);
    }

    Ok(())
}

fn main() -> ExitCode {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "caravan".to_string());
    let Some(args) = parse_args() else {
        usage(&program);
        return ExitCode::FAILURE;
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
