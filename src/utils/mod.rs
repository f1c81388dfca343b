pub mod logging;
pub mod units;

pub use logging::init_tracing;
pub use units::{dhms_to_seconds, fahrenheit_to_celsius};
