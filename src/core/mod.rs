pub mod alerts;
pub mod config;
pub mod feed;
pub mod geometry;
pub mod model;

#[cfg(test)]
mod sim_test;
