pub mod catalog;
pub mod cli;
pub mod codec;
pub mod data_paths;
pub mod errors;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod store;
