pub mod generate;
pub mod init;
pub mod watch;

pub use generate::{generate_services, GenerateOptions, GenerateReport, GeneratedService};
pub use init::init_config;
pub use watch::watch_services;
