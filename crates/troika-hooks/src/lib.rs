//! # troika-hooks
//!
//! Hook framework for Troika. Provides:
//!
//! - A hook registry of named hook kinds, kept in registration order
//! - Module discovery over a static, ordered namespace of hook modules
//! - Per-site hook setup driven by the `sites` configuration
//! - A dispatcher that fires lifecycle phases with halt semantics
//! - Built-in hook modules (`notify`, `check_directives`, `trace`)

pub mod builtin;
pub mod discovery;
pub mod hooks;
pub mod macros;
pub mod prelude;
pub mod traits;

pub use discovery::{HookModule, discover_modules, load_modules};
pub use hooks::definitions::{HookAction, HookPayload, HookResult, Phase, Requirement};
pub use hooks::dispatcher::{DispatchResult, HookDispatcher, HookInstance, HookState};
pub use hooks::registry::{Hook, HookRegistry, HookSpec};
pub use hooks::setup::setup_hooks;
