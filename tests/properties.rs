//! Property tests over randomly generated instances and solutions.

use std::sync::Arc;

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use u_fjsp::dispatching::{rules, DispatchEngine, DispatchingRule};
use u_fjsp::encoding::{EncodedSolution, NeighborOperator};
use u_fjsp::models::{Instance, Job, Operation, Time};
use u_fjsp::scheduler::{ScheduleKpi, ShopSimulator};
use u_fjsp::search::{
    AnnealingConfig, HillClimbing, HillClimbingConfig, LocalSearch, SimulatedAnnealing,
    TabuConfig, TabuSearch,
};

fn instance_strategy() -> impl Strategy<Value = Instance> {
    (1usize..=4)
        .prop_flat_map(|machines| {
            let alternative = (0..machines, 1 as Time..=9);
            let operation = prop::collection::vec(alternative, 1..=3);
            let job = prop::collection::vec(operation, 0..=4);
            (Just(machines), prop::collection::vec(job, 1..=4))
        })
        .prop_map(|(machines, jobs)| {
            let jobs = jobs
                .into_iter()
                .enumerate()
                .map(|(id, ops)| {
                    ops.into_iter().fold(Job::new(id), |job, alts| {
                        let op = alts
                            .into_iter()
                            .fold(Operation::new(), |op, (m, d)| op.with_alternative(m, d));
                        job.with_operation(op)
                    })
                })
                .collect();
            Instance::new(machines, jobs).unwrap()
        })
}

fn case_strategy() -> impl Strategy<Value = (Instance, EncodedSolution)> {
    (instance_strategy(), any::<u64>()).prop_map(|(instance, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        let solution = EncodedSolution::random(&instance, &mut rng);
        (instance, solution)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn makespan_is_deterministic_and_idempotent((instance, solution) in case_strategy()) {
        let mut sim = ShopSimulator::new(&instance);
        let first = sim.compute_makespan(&solution).unwrap();
        let schedule = sim.schedule().clone();

        sim.reset();
        let second = sim.compute_makespan(&solution).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(&schedule, sim.schedule());

        let mut fresh = ShopSimulator::new(&instance);
        prop_assert_eq!(fresh.compute_makespan(&solution).unwrap(), first);
    }

    #[test]
    fn makespan_respects_lower_bounds((instance, solution) in case_strategy()) {
        let mut sim = ShopSimulator::new(&instance);
        let makespan = sim.compute_makespan(&solution).unwrap();
        let kpi = ScheduleKpi::calculate(sim.schedule(), &instance);

        prop_assert!(makespan >= kpi.job_bound);
        prop_assert!(makespan >= kpi.machine_bound);
        prop_assert!(makespan >= kpi.instance_bound);
        let latest = sim.schedule().assignments.iter().map(|a| a.end).max().unwrap_or(0);
        prop_assert_eq!(makespan, latest);
    }

    #[test]
    fn schedules_keep_job_order_and_machine_exclusivity((instance, solution) in case_strategy()) {
        let mut sim = ShopSimulator::new(&instance);
        sim.compute_makespan(&solution).unwrap();
        let schedule = sim.schedule();

        prop_assert!(schedule.verify(&instance).is_empty());
        prop_assert_eq!(schedule.assignment_count(), instance.total_operations());
        for job in instance.jobs() {
            let placed = schedule.assignments_for_job(job.id);
            for pair in placed.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
            }
        }
        for machine in 0..instance.machine_count() {
            let timeline = schedule.machine_timeline(machine);
            for pair in timeline.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
            }
        }
    }

    #[test]
    fn neighbors_stay_valid((instance, solution) in case_strategy(), seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let op = NeighborOperator::default();
        let mut current = solution;
        for _ in 0..20 {
            let (next, _) = op.neighbor(&instance, &current, &mut rng);
            prop_assert!(next.is_valid(&instance));
            current = next;
        }
    }

    #[test]
    fn dispatching_rules_schedule_everything(instance in instance_strategy()) {
        let all: [Arc<dyn DispatchingRule>; 4] = [
            Arc::new(rules::Spt),
            Arc::new(rules::Lpt),
            Arc::new(rules::Mwr),
            Arc::new(rules::Lwr),
        ];
        for rule in all {
            let mut sim = ShopSimulator::new(&instance);
            let engine = DispatchEngine::from_shared(rule);
            let makespan = engine.run(&mut sim).unwrap();
            prop_assert!(sim.all_complete());
            prop_assert!(sim.schedule().verify(&instance).is_empty());
            prop_assert_eq!(makespan, sim.schedule().makespan());
        }
    }

    #[test]
    fn best_makespan_never_increases((instance, solution) in case_strategy(), seed in any::<u64>()) {
        let mut sim = ShopSimulator::new(&instance);
        let initial_makespan = sim.compute_makespan(&solution).unwrap();

        let sa = SimulatedAnnealing::new(AnnealingConfig::default().with_max_iterations(60));
        let hc = HillClimbing::new(HillClimbingConfig::default().with_max_iterations(60));
        let ts = TabuSearch::new(TabuConfig::default().with_max_iterations(15));

        let outcomes = [
            sa.search(&mut sim, &solution, &mut SmallRng::seed_from_u64(seed)).unwrap(),
            hc.search(&mut sim, &solution, &mut SmallRng::seed_from_u64(seed)).unwrap(),
            ts.search(&mut sim, &solution, &mut SmallRng::seed_from_u64(seed)).unwrap(),
        ];
        for outcome in outcomes {
            prop_assert!(outcome.trace.windows(2).all(|w| w[1] <= w[0]));
            prop_assert!(outcome.best_makespan <= initial_makespan);
            prop_assert_eq!(sim.compute_makespan(&outcome.best).unwrap(), outcome.best_makespan);
        }
    }
}
