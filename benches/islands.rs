use std::time::Duration;

use avian_islands::prelude::*;
use bevy::prelude::*;
use criterion::{Criterion, criterion_group, criterion_main};

struct Contact(u32, Entity, Entity);

impl SolverEquation for Contact {
    fn id(&self) -> EquationId {
        EquationId(self.0)
    }
    fn body1(&self) -> Entity {
        self.1
    }
    fn body2(&self) -> Entity {
        self.2
    }
}

/// A subsolver that does no numerical work, so only the island splitting is measured.
#[derive(Default)]
struct NoopSubsolver {
    equation_count: usize,
}

impl Subsolver<Contact> for NoopSubsolver {
    fn add_equation(&mut self, _equation: &Contact) {
        self.equation_count += 1;
    }

    fn remove_all_equations(&mut self) {
        self.equation_count = 0;
    }

    fn solve(&mut self, _delta_secs: Scalar, _bodies: &[Entity]) -> u32 {
        1
    }

    fn set_iterations(&mut self, _iterations: u32) {}

    fn set_tolerance(&mut self, _tolerance: Scalar) {}
}

/// Builds `stack_count` stacks of `height` boxes resting on a shared static ground.
fn stacks(stack_count: u32, height: u32) -> (Vec<(Entity, RigidBody)>, Vec<Contact>) {
    let ground = Entity::from_raw(0);
    let mut bodies = vec![(ground, RigidBody::Static)];
    let mut contacts = Vec::new();

    for stack in 0..stack_count {
        let mut below = ground;
        for level in 0..height {
            let body = Entity::from_raw(1 + stack * height + level);
            bodies.push((body, RigidBody::Dynamic));
            contacts.push(Contact(contacts.len() as u32, below, body));
            below = body;
        }
    }

    (bodies, contacts)
}

fn criterion_benchmark(c: &mut Criterion) {
    for (stack_count, height) in [(10, 10), (100, 10), (100, 50)] {
        let (bodies, contacts) = stacks(stack_count, height);

        for split_at_static_bodies in [false, true] {
            let config = IslandSolverConfig {
                split_at_static_bodies,
                ..default()
            };
            let mut solver = IslandSolver::with_config(NoopSubsolver::default(), config);
            let mode = if split_at_static_bodies { "split" } else { "bridged" };

            c.bench_function(
                &format!("{stack_count} stacks of {height} boxes ({mode})"),
                |b| {
                    b.iter(|| {
                        solver
                            .solve_equations(1.0 / 60.0, &bodies, &contacts)
                            .unwrap()
                    })
                },
            );
        }
    }
}

criterion_group!(
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = criterion_benchmark
);
criterion_main!(benches);
