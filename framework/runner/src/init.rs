use clap::Parser;

/// Initialise logging and parse the command line for a scenario binary.
///
/// Call this first in `main`, with either [crate::cli::GustScenarioCli] or a scenario CLI
/// that flattens it.
pub fn init<T: Parser>() -> T {
    env_logger::init();

    T::parse()
}
