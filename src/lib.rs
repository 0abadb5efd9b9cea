pub mod classifier;
pub mod database;
pub mod defaults;
pub mod patterns;
pub mod report;
pub mod sample;
pub mod sampler;
