pub mod conflict;
pub mod executor;
pub mod processor;
