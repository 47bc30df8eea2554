//! Trading Engine
//!
//! Signal evaluation, order construction, and execution against the exchange.

pub mod evaluator;
pub mod executor;
pub mod order_builder;
pub mod store;

pub use evaluator::evaluate;
pub use executor::{ExecutionError, SignalExecutor, SignalOutcome};
pub use order_builder::build_order;
pub use store::{MemoryRelayStore, RelayStore};
