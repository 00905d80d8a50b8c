//! Flexible job-shop domain models.
//!
//! Provides the immutable problem description and the schedule produced
//! by the simulator.
//!
//! # Domain Mappings
//!
//! | u-fjsp | Manufacturing | Healthcare | Logistics |
//! |--------|--------------|------------|-----------|
//! | Job | Order | Patient Case | Shipment |
//! | Operation | Routing Step | Procedure | Transport Leg |
//! | Alternative | Eligible Machine | Eligible Room | Eligible Truck |
//! | Schedule | Production Plan | OR Schedule | Route Plan |

mod instance;
mod schedule;

pub use instance::{Alternative, Instance, InstanceData, Job, Operation, RemainingWork, Time};
pub use schedule::{Assignment, Booking, Schedule, Violation, ViolationType};
