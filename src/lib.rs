// Library exports for the CLI and tests
pub mod cli;
pub mod config;
pub mod constants;
pub mod density;
pub mod favicon;
pub mod generator;
pub mod raster;
