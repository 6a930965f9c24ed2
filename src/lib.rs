pub mod quantum;

pub use quantum::config::QuantumConfig;
pub use quantum::error::{QuantumError, Result};
pub use quantum::field::{CoherentField, FieldPattern, QuantumField};
pub use quantum::state::{EvolutionPattern, QuantumState};
pub use quantum::{QuantumSystem, StateHandle};
