pub mod bellman;
pub mod config;
pub mod error;
pub mod extraction;
pub mod ids;
pub mod mappings;
pub mod metrics;
pub mod model;
pub mod policy_iteration;
pub mod value_iteration;

#[cfg(test)]
mod tests;
