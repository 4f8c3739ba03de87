pub mod bulletin_error;
pub mod clock;
pub mod config;
pub mod forecast;
pub mod input;
pub mod model;
pub mod parser;
pub mod summary;
pub mod utils;
