//! Domain models
//!
//! Core types shared by actions, state, reducers and middleware.

mod build_stage;
mod build_target;
mod credentials;
pub mod guidance;

pub use build_stage::BuildStage;
pub use build_target::BuildTarget;
pub use credentials::Credentials;
