//! Question distribution engine. Pure: no I/O, randomness passed in.

pub mod config;
pub mod filter;
pub mod planner;
pub mod quantity;
pub mod selector;

pub use config::AssignmentConfiguration;
pub use planner::{check_pool, AssignmentBatch, AssignmentPlanner, PlanRequest, PointsPolicy, PoolReport};
