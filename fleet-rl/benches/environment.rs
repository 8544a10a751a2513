use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fleet_rl::environment::{fleet::FleetEnvironmentConfig, Environment, Space};
use rand::{rngs::StdRng, SeedableRng};

pub fn environment_benchmark(c: &mut Criterion) {
    for (grid_size, num_vehicles) in [(5, 2), (16, 8)] {
        let config = FleetEnvironmentConfig::new()
            .with_grid_size(grid_size)
            .with_num_vehicles(num_vehicles)
            .with_num_passengers(num_vehicles + 1);
        let mut env = match config.init_seeded(0) {
            Ok(env) => env,
            Err(err) => panic!("invalid benchmark config: {err}"),
        };
        let mut rng = StdRng::seed_from_u64(0);
        let space = *env.action_space();

        c.bench_function(&format!("fleet step {grid_size}x{grid_size}"), |b| {
            b.iter(|| {
                let step = env.step(space.sample(&mut rng));
                if step.finished() {
                    env.reset(None);
                }
                black_box(step)
            })
        });
    }
}

criterion_group!(benches, environment_benchmark);
criterion_main!(benches);
