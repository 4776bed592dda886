//! Branch protection lifecycle: deciding what an event asks for and carrying
//! it out against GitHub.

pub mod errors;
pub mod gateway;
pub mod router;

pub use gateway::{ProtectionRuleGateway, RuleGateway};
pub use router::EventRouter;
