pub mod config;
pub mod games;
pub mod logger;

pub use config::GameConfig;
pub use games::SessionRng;
