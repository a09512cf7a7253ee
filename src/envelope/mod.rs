pub mod dispatch;
pub mod sink;
pub mod types;

pub use dispatch::{Dispatch, Dispatcher, EffectReport, TerminalEffect};
pub use sink::{EffectSink, LogSink, TOAST_EVENT};
pub use types::{EffectBundle, Envelope, ExchangeContext, Response};
