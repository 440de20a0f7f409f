//! Consensus domain.

pub mod error;
pub mod registry;
pub mod selection;
pub mod validator;

pub use error::{RegistrationError, ValidatorError};
pub use registry::{NetworkStats, ValidatorRegistry};
pub use selection::{CoherenceSelection, ProposerSelection, StakeWeightedSelection};
pub use validator::{Validator, ValidatorId, ValidatorInfo, ValidatorStatus};
