pub mod commands;
pub mod config;
pub mod errors;
pub mod external;
pub mod notes;
pub mod storage;
pub mod tags;
