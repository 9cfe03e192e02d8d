//! Hook system: registry, setup, dispatcher, and typed hook definitions.

pub mod definitions;
pub mod dispatcher;
pub mod registry;
pub mod setup;

pub use definitions::{HookAction, HookPayload, HookResult, Phase, Requirement};
pub use dispatcher::{DispatchResult, HookDispatcher, HookFailure, HookInstance, HookState};
pub use registry::{Hook, HookFactory, HookRegistry, HookSpec};
pub use setup::setup_hooks;
