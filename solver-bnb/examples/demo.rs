//! Walk through the three reference problems and print their search trees.
//!
//! Run with: cargo run -p solver-bnb --example demo

use std::fmt::Debug;
use std::time::Instant;

use solver_bnb::{solve_ilp, solve_tsp, BnbSettings, IlpProblem, Knapsack, NodeRegistry, SearchResult, TspProblem};
use solver_lp::{Constraint, LinearProgram};

fn main() {
    println!("=== Branch-and-Bound Demo ===\n");

    // Test 1: single fractional variable
    test_single_variable();

    // Test 2: small knapsack
    test_small_knapsack();

    // Test 3: three-city tour
    test_three_cities();
}

/// max x  s.t.  x <= 2.5, x integer
fn test_single_variable() {
    println!("--- Test 1: Single Variable ---");
    println!("max x s.t. x <= 2.5, x integer");

    let lp = LinearProgram::maximize(vec![1.0]).with_constraint(Constraint::le(vec![1.0], 2.5));
    let prob = match IlpProblem::pure(lp) {
        Ok(p) => p,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    let start = Instant::now();
    match solve_ilp(&prob, &BnbSettings::default()) {
        Ok(result) => report(&result, |x| format!("{:?}", x)),
        Err(e) => println!("Error: {}", e),
    }
    println!("Time: {:.3}s\n", start.elapsed().as_secs_f64());
}

/// max 3x1 + 2x2 + 4x3  s.t.  2x1 + x2 + 3x3 <= 4, x binary
fn test_small_knapsack() {
    println!("--- Test 2: Small Knapsack ---");
    println!("max 3x1 + 2x2 + 4x3 s.t. 2x1 + x2 + 3x3 <= 4, x binary");

    let ks = Knapsack::new(vec![3.0, 2.0, 4.0], vec![2.0, 1.0, 3.0], 4.0);
    let settings = BnbSettings::default().with_solution_pool(3);

    let start = Instant::now();
    match ks.to_problem().and_then(|p| solve_ilp(&p, &settings)) {
        Ok(result) => {
            report(&result, |x| {
                let picked: Vec<String> = ks.selected_items(x).iter().map(|i| format!("x{}", i + 1)).collect();
                format!("picked {}", picked.join(", "))
            });
            for (rank, sol) in result.pool.iter().enumerate() {
                println!("  #{} value {:.1} at node {}", rank + 1, sol.objective, sol.node);
            }
        }
        Err(e) => println!("Error: {}", e),
    }
    println!("Time: {:.3}s\n", start.elapsed().as_secs_f64());
}

/// A-B = 1, B-C = 1, A-C = 5, start at A
fn test_three_cities() {
    println!("--- Test 3: Three Cities ---");
    println!("A-B = 1, B-C = 1, A-C = 5, start at A");

    let tsp = TspProblem::symmetric(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)], 0)
        .and_then(|t| t.with_city_names(vec!["A", "B", "C"]));
    let tsp = match tsp {
        Ok(t) => t,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };

    let start = Instant::now();
    match solve_tsp(&tsp, &BnbSettings::default()) {
        Ok(result) => report(&result, |tour| tsp.format_route(tour)),
        Err(e) => println!("Error: {}", e),
    }
    println!("Time: {:.3}s\n", start.elapsed().as_secs_f64());
}

fn report<R, C: Debug>(result: &SearchResult<R, C>, show: impl Fn(&C) -> String) {
    println!("Status: {:?}", result.status);
    if !result.has_solution() {
        println!("No solution");
    }
    if let (Some(sol), Some(obj)) = (&result.solution, result.objective) {
        println!("Objective: {:.6}", obj);
        println!("Solution: {}", show(sol));
    }
    println!("Nodes: {}, Pops: {}", result.nodes_explored, result.iterations);
    println!("Tree:");
    print_tree(&result.registry, 0, "", true);
}

fn print_tree<R, C>(registry: &NodeRegistry<R, C>, id: usize, prefix: &str, last: bool) {
    let Some(node) = registry.get(id) else { return };
    let connector = if node.is_root() {
        ""
    } else if last {
        "└── "
    } else {
        "├── "
    };
    let marker = if node.is_optimal { " *" } else { "" };
    println!(
        "  {}{}[{}] {} bound={:.2} {}{}",
        prefix,
        connector,
        node.id,
        node.label.as_deref().unwrap_or("root"),
        node.bound,
        node.status,
        marker
    );

    let child_prefix = if node.is_root() {
        String::new()
    } else if last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };
    for (k, &child) in node.children.iter().enumerate() {
        print_tree(registry, child, &child_prefix, k + 1 == node.children.len());
    }
}
