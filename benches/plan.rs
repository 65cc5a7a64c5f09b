use criterion::{criterion_group, criterion_main, Criterion};

use tollway::route::{RoutePlanner, SyntheticGeometry};
use tollway::toll::{TollDataset, TollLocator};
use tollway::{Coordinate, FuelType};

struct PlanScenario {
    name: &'static str,
    start: (f64, f64),
    end: (f64, f64),
    plazas: usize,
}

const PLAN_CASES: [PlanScenario; 3] = [
    PlanScenario {
        name: "DELHI_LOCAL",
        start: (28.6139, 77.2090),
        end: (28.7041, 77.1025),
        plazas: 0,
    },
    PlanScenario {
        name: "DELHI_JAIPUR",
        start: (28.6139, 77.2090),
        end: (26.9124, 75.7873),
        plazas: 8,
    },
    PlanScenario {
        name: "MUMBAI_BANGALORE",
        start: (19.0760, 72.8777),
        end: (12.9716, 77.5946),
        plazas: 64,
    },
];

fn plan_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");
    group.significance_level(0.1).sample_size(50);

    PLAN_CASES.into_iter().for_each(|sc| {
        let start = Coordinate::from_degree(sc.start.0, sc.start.1).expect("Start must be valid");
        let end = Coordinate::from_degree(sc.end.0, sc.end.1).expect("End must be valid");

        let tolls = TollDataset::seeded_plazas(&start, &end, sc.plazas, 7);
        let planner = RoutePlanner::new(SyntheticGeometry, TollLocator::new(tolls));

        group.bench_function(format!("calculate_routes: {}", sc.name), |b| {
            b.iter(|| {
                let plans = planner
                    .calculate_routes(&start, &end, FuelType::Diesel)
                    .expect("Routes must generate");

                assert_eq!(plans.len(), 3);
            })
        });
    });

    group.finish();
}

criterion_group!(benches, plan_benchmark);
criterion_main!(benches);
