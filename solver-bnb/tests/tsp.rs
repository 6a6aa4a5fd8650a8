//! End-to-end branch-and-bound tests on travelling-salesman instances.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use solver_bnb::{
    solve_tsp, solve_tsp_with_monitor, BnbSettings, NodeRecorder, NodeStatus, SearchStatus, TspProblem, Visit,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn triangle() -> TspProblem {
    // A-B = 1, B-C = 1, A-C = 5
    TspProblem::symmetric(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)], 0)
        .unwrap()
        .with_city_names(vec!["A", "B", "C"])
        .unwrap()
}

/// Cheapest tour extending `prefix` (which starts at the start city), by
/// trying every ordering of the remaining cities.
fn best_completion(tsp: &TspProblem, prefix: &[usize]) -> Option<f64> {
    fn extend(tsp: &TspProblem, path: &mut Vec<usize>, best: &mut Option<f64>) {
        let n = tsp.num_cities();
        if path.len() == n {
            path.push(tsp.start());
            if let Some(cost) = tsp.tour_cost(path) {
                *best = Some(best.map_or(cost, |b: f64| b.min(cost)));
            }
            path.pop();
            return;
        }
        for c in 0..n {
            if !path.contains(&c) {
                path.push(c);
                extend(tsp, path, best);
                path.pop();
            }
        }
    }

    let mut best = None;
    extend(tsp, &mut prefix.to_vec(), &mut best);
    best
}

fn random_instance(rng: &mut ChaCha8Rng, n: usize, missing: f64) -> TspProblem {
    let matrix = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j || rng.gen_bool(missing) {
                        0.0
                    } else {
                        rng.gen_range(1..=20) as f64
                    }
                })
                .collect()
        })
        .collect();
    TspProblem::from_matrix(matrix, rng.gen_range(0..n)).unwrap()
}

#[test]
fn test_three_city_tour() {
    let tsp = triangle();
    let result = solve_tsp(&tsp, &BnbSettings::default()).unwrap();

    assert_eq!(result.status, SearchStatus::Optimal);
    assert_close(result.objective.unwrap(), 7.0);

    let tour = result.solution.clone().unwrap();
    assert_eq!(tour, vec![0, 1, 2, 0]);
    assert!(tsp.is_tour(&tour));
    assert_eq!(tsp.format_route(&tour), "A -> B -> C -> A");

    let reg = &result.registry;
    assert_eq!(result.nodes_explored, 5);
    assert_close(reg[0].bound, 3.0);
    assert_close(reg[1].bound, 7.0);
    assert_close(reg[2].bound, 7.0);
    assert_eq!(reg[1].label.as_deref(), Some("→ B"));
    assert_eq!(reg[3].status, NodeStatus::Integer);
    // The mirrored tour ties and is pruned when popped
    assert_eq!(reg[4].status, NodeStatus::Pruned);
    assert_eq!(reg[4].restrictions, vec![Visit(2), Visit(1)]);
    assert_eq!(result.optimal_path(), vec![0, 1, 3]);
}

#[test]
fn test_missing_return_edge() {
    // 2 -> 0 is missing, so only 0 -> 2 -> 1 -> 0 closes
    let tsp = TspProblem::new(
        vec![
            vec![None, Some(1.0), Some(2.0)],
            vec![Some(3.0), None, Some(1.0)],
            vec![None, Some(2.0), None],
        ],
        0,
    )
    .unwrap();
    let result = solve_tsp(&tsp, &BnbSettings::default()).unwrap();

    assert_eq!(result.status, SearchStatus::Optimal);
    assert_eq!(result.solution, Some(vec![0, 2, 1, 0]));
    assert_close(result.objective.unwrap(), 7.0);
    assert!(result.registry.count_status(NodeStatus::Infeasible) >= 1);
}

#[test]
fn test_no_hamiltonian_cycle() {
    // Star around city 0
    let tsp = TspProblem::symmetric(4, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)], 0).unwrap();
    let result = solve_tsp(&tsp, &BnbSettings::default()).unwrap();

    assert_eq!(result.status, SearchStatus::Infeasible);
    assert!(!result.has_solution());
    assert_eq!(result.registry[0].status, NodeStatus::Branched);
    assert_eq!(result.registry.count_status(NodeStatus::Infeasible), 3);
}

#[test]
fn test_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for _ in 0..20 {
        let n = rng.gen_range(4..=5);
        let tsp = random_instance(&mut rng, n, 0.0);
        let result = solve_tsp(&tsp, &BnbSettings::default()).unwrap();
        let expected = best_completion(&tsp, &[tsp.start()]).unwrap();

        assert_eq!(result.status, SearchStatus::Optimal);
        assert_close(result.objective.unwrap(), expected);
        let tour = result.solution.unwrap();
        assert!(tsp.is_tour(&tour));
        assert_close(tsp.tour_cost(&tour).unwrap(), expected);
    }
}

#[test]
fn test_sparse_instances_match_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(31);

    for _ in 0..30 {
        let n = rng.gen_range(4..=5);
        let tsp = random_instance(&mut rng, n, 0.35);
        let result = solve_tsp(&tsp, &BnbSettings::default()).unwrap();

        match best_completion(&tsp, &[tsp.start()]) {
            Some(expected) => {
                assert_eq!(result.status, SearchStatus::Optimal);
                assert_close(result.objective.unwrap(), expected);
            }
            None => {
                assert_eq!(result.status, SearchStatus::Infeasible);
                assert!(result.solution.is_none());
            }
        }
    }
}

#[test]
fn test_bounds_are_sound() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    for _ in 0..10 {
        let tsp = random_instance(&mut rng, 5, 0.2);
        let result = solve_tsp(&tsp, &BnbSettings::default()).unwrap();

        for node in result.registry.iter() {
            let prefix: Vec<usize> = std::iter::once(tsp.start())
                .chain(node.restrictions.iter().map(|v| v.0))
                .collect();
            let best = best_completion(&tsp, &prefix);

            if node.status == NodeStatus::Infeasible {
                assert!(best.is_none(), "infeasible node {} has completion {:?}", node.id, best);
            } else if let Some(best) = best {
                assert!(
                    node.bound <= best + 1e-9,
                    "node {} bound {} above best completion {}",
                    node.id,
                    node.bound,
                    best
                );
            }
        }
    }
}

#[test]
fn test_pruned_nodes_are_recorded_not_expanded() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut pruned_total = 0;

    for _ in 0..10 {
        let tsp = random_instance(&mut rng, 5, 0.0);
        let result = solve_tsp(&tsp, &BnbSettings::default()).unwrap();
        let best = result.objective.unwrap();

        for node in result.registry.iter().filter(|n| n.status == NodeStatus::Pruned) {
            pruned_total += 1;
            assert!(node.children.is_empty());
            assert!(!node.is_optimal);
            assert!(node.bound >= best - 1e-9);
        }
        assert_eq!(result.stats.nodes_pruned as usize, result.registry.count_status(NodeStatus::Pruned));
    }
    assert!(pruned_total > 0);
}

#[test]
fn test_determinism() {
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let tsp = random_instance(&mut rng, 5, 0.1);

    let a = solve_tsp(&tsp, &BnbSettings::default()).unwrap();
    let b = solve_tsp(&tsp, &BnbSettings::default()).unwrap();

    assert_eq!(a.solution, b.solution);
    assert_eq!(a.objective, b.objective);
    assert_eq!(a.optimal_path(), b.optimal_path());
}

#[test]
fn test_monitor_sees_every_settled_node() {
    let tsp = triangle();
    let mut recorder: NodeRecorder<Visit, Vec<usize>> = NodeRecorder::new();
    let result = solve_tsp_with_monitor(&tsp, &BnbSettings::default(), &mut recorder).unwrap();

    let order: Vec<_> = recorder.events.iter().map(|n| (n.id, n.status)).collect();
    assert_eq!(
        order,
        vec![
            (0, NodeStatus::Branched),
            (1, NodeStatus::Branched),
            (2, NodeStatus::Branched),
            (3, NodeStatus::Integer),
            (4, NodeStatus::Pruned),
        ]
    );
    assert_eq!(result.iterations, 5);
}

#[test]
fn test_non_default_start() {
    let tsp = TspProblem::symmetric(3, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)], 2).unwrap();
    let result = solve_tsp(&tsp, &BnbSettings::default()).unwrap();

    let tour = result.solution.unwrap();
    assert_eq!(tour.first(), Some(&2));
    assert_eq!(tour.last(), Some(&2));
    assert_close(result.objective.unwrap(), 7.0);
}
