mod runner;
mod shutdown;

#[cfg(test)]
mod tests;

pub use runner::{DbOptions, Runtime, RuntimeOptions, ShutdownOptions, bootstrap, run};
pub use shutdown::wait_for_shutdown;
