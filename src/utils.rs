pub mod config;
pub mod errors;
pub mod fs_utils;
