pub mod cms;
pub mod config;
pub mod content;
pub mod error;
pub mod submissions;
pub mod telemetry;
