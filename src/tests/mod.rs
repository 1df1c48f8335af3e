//! Tests for the whole per-step pipeline: broad phase pairs are fed to the [`PairTracker`],
//! its changes create and destroy contact equations, and the [`IslandSolver`] solves them.

use core::error::Error;

use bevy::prelude::*;

use crate::prelude::*;

#[derive(Clone, Debug)]
struct Contact {
    id: EquationId,
    body1: Entity,
    body2: Entity,
}

impl SolverEquation for Contact {
    fn id(&self) -> EquationId {
        self.id
    }
    fn body1(&self) -> Entity {
        self.body1
    }
    fn body2(&self) -> Entity {
        self.body2
    }
}

/// Logs the equation IDs of every solved island.
#[derive(Default)]
struct LoggingSubsolver {
    pending: Vec<EquationId>,
    log: Vec<Vec<EquationId>>,
}

impl Subsolver<Contact> for LoggingSubsolver {
    fn add_equation(&mut self, equation: &Contact) {
        self.pending.push(equation.id);
    }

    fn remove_all_equations(&mut self) {
        self.pending.clear();
    }

    fn solve(&mut self, _delta_secs: Scalar, _bodies: &[Entity]) -> u32 {
        self.log.push(self.pending.clone());
        1
    }

    fn set_iterations(&mut self, _iterations: u32) {}

    fn set_tolerance(&mut self, _tolerance: Scalar) {}
}

struct TestSimulation {
    bodies: Vec<(Entity, RigidBody)>,
    tracker: PairTracker,
    solver: IslandSolver<Contact, LoggingSubsolver>,
    next_contact_id: u32,
}

impl TestSimulation {
    fn new(types: &[RigidBody]) -> Self {
        Self {
            bodies: types
                .iter()
                .enumerate()
                .map(|(i, &rb)| (Entity::from_raw(i as u32), rb))
                .collect(),
            tracker: PairTracker::new(),
            solver: IslandSolver::new(LoggingSubsolver::default()),
            next_contact_id: 0,
        }
    }

    /// Runs one step with the given broad phase overlaps, returning the pair changes
    /// and the number of islands solved.
    fn step(&mut self, overlaps: &[(u32, u32)]) -> Result<(PairChanges, usize), Box<dyn Error>> {
        for &(i, j) in overlaps {
            self.tracker.record(i, j)?;
        }
        self.tracker.advance();
        let changes = self.tracker.diff();

        for &(i, j) in &changes.removals {
            let (body1, body2) = (self.bodies[i as usize].0, self.bodies[j as usize].0);
            let id = self
                .solver
                .equations()
                .iter()
                .find(|contact| contact.body1 == body1 && contact.body2 == body2)
                .map(|contact| contact.id)
                .ok_or("ended pair has no contact")?;
            self.solver.remove_equation(id);
        }

        for &(i, j) in &changes.additions {
            self.solver.add_equation(Contact {
                id: EquationId(self.next_contact_id),
                body1: self.bodies[i as usize].0,
                body2: self.bodies[j as usize].0,
            });
            self.next_contact_id += 1;
        }

        let island_count = self.solver.solve(1.0 / 60.0, &self.bodies)?;
        Ok((changes, island_count))
    }
}

#[test]
fn contacts_follow_pair_changes() -> Result<(), Box<dyn Error>> {
    // Body 0 is the ground.
    let mut sim = TestSimulation::new(&[
        RigidBody::Static,
        RigidBody::Dynamic,
        RigidBody::Dynamic,
        RigidBody::Dynamic,
        RigidBody::Dynamic,
    ]);

    let (changes, islands) = sim.step(&[(1, 0), (0, 2), (3, 4)])?;
    assert_eq!(changes.additions, vec![(0, 1), (0, 2), (3, 4)]);
    assert!(changes.removals.is_empty());
    // The ground joins bodies 1 and 2 into one island.
    assert_eq!(islands, 2);

    let (changes, islands) = sim.step(&[(0, 1), (3, 4), (2, 3), (4, 3)])?;
    assert_eq!(changes.additions, vec![(2, 3)]);
    assert_eq!(changes.removals, vec![(0, 2)]);
    assert_eq!(islands, 2);
    assert_eq!(sim.solver.equations().len(), 3);

    let (changes, islands) = sim.step(&[])?;
    assert!(changes.additions.is_empty());
    assert_eq!(changes.removals, vec![(0, 1), (2, 3), (3, 4)]);
    assert_eq!(islands, 0);
    assert!(sim.solver.equations().is_empty());

    Ok(())
}

#[test]
fn identical_runs_solve_identically() -> Result<(), Box<dyn Error>> {
    let types = [
        RigidBody::Static,
        RigidBody::Dynamic,
        RigidBody::Dynamic,
        RigidBody::Kinematic,
        RigidBody::Dynamic,
        RigidBody::Dynamic,
    ];
    let steps: [&[(u32, u32)]; 4] = [
        &[(0, 1), (1, 2), (4, 5)],
        &[(0, 1), (1, 2), (2, 3), (4, 5)],
        &[(2, 3), (3, 4), (4, 5), (5, 1)],
        &[(0, 5)],
    ];

    let mut first = TestSimulation::new(&types);
    let mut second = TestSimulation::new(&types);

    for overlaps in steps {
        first.step(overlaps)?;
        // Broad phase order must not matter.
        let reversed: Vec<_> = overlaps.iter().rev().map(|&(i, j)| (j, i)).collect();
        second.step(&reversed)?;
    }

    assert_eq!(first.solver.subsolver().log, second.solver.subsolver().log);
    for island in &first.solver.subsolver().log {
        assert!(island.windows(2).all(|w| w[0] > w[1]));
    }

    Ok(())
}

#[test]
fn out_of_range_pairs_are_rejected() {
    let mut sim = TestSimulation::new(&[RigidBody::Dynamic; 2]);
    assert!(sim.step(&[(0, 1 << 16)]).is_err());
}
