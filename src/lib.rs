pub mod cli;
pub mod coingecko;
pub mod data_paths;
pub mod errors;
pub mod logging;
pub mod manifest;
pub mod portfolio;
