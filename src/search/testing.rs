//! Shared fixtures for the driver tests.

use crate::models::{Instance, Job, Operation};

/// Three jobs, three machines, most operations flexible.
pub(crate) fn flexible_instance() -> Instance {
    Instance::new(
        3,
        vec![
            Job::new(0)
                .with_operation(Operation::new().with_alternative(0, 3).with_alternative(1, 5))
                .with_operation(Operation::new().with_alternative(1, 4).with_alternative(2, 2))
                .with_operation(Operation::single(2, 3)),
            Job::new(1)
                .with_operation(Operation::new().with_alternative(1, 2).with_alternative(2, 6))
                .with_operation(Operation::single(0, 4))
                .with_operation(Operation::new().with_alternative(0, 3).with_alternative(2, 2)),
            Job::new(2)
                .with_operation(Operation::single(2, 4))
                .with_operation(Operation::new().with_alternative(0, 2).with_alternative(1, 3))
                .with_operation(Operation::new().with_alternative(1, 5).with_alternative(2, 1)),
        ],
    )
    .unwrap()
}

/// One job, one operation, one machine: every neighbor is the identity.
pub(crate) fn frozen_instance() -> Instance {
    Instance::new(1, vec![Job::new(0).with_operation(Operation::single(0, 4))]).unwrap()
}

/// Best-makespan trace never goes up.
pub(crate) fn is_non_increasing(trace: &[crate::models::Time]) -> bool {
    trace.windows(2).all(|w| w[1] <= w[0])
}
