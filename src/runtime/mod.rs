pub mod options;
pub mod registry;

pub use options::RuntimeOptions;
pub use registry::{ExchangeEvents, Registration};
