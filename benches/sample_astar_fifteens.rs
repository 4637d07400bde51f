use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use astar::astar::AStarSearch;
use astar::problems::fifteens::TileCost;
use astar::problems::fifteens::TileHeuristicManhattan;
use astar::problems::fifteens::TileMove;
use astar::problems::fifteens::TileProblem;
use astar::problems::fifteens::TileSpace;
use astar::problems::fifteens::TileState;

fn solve(problem: TileProblem) -> usize {
    let mut search = AStarSearch::<
        TileProblem,
        TileHeuristicManhattan,
        TileSpace,
        TileState,
        TileMove,
        TileCost,
    >::new(problem);

    match search.find_first() {
        Some(path) => path.len(),
        None => 0,
    }
}

fn sample_fifteens(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fifteens A*");

    for scramble_moves in [8usize, 16, 24] {
        for seed in 0..3u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let problem = TileProblem::scrambled(4, scramble_moves, &mut rng);
            let instance_name = format!("scramble={scramble_moves}:{seed}");

            group.bench_with_input(
                BenchmarkId::from_parameter(&instance_name),
                &problem,
                |b, p| b.iter(|| solve(p.clone())),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, sample_fifteens);
criterion_main!(benches);
