pub mod access_gate;
pub mod logging;

pub use access_gate::AccessGate;
pub use logging::RequestLogging;
