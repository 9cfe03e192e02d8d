//! Prelude for hook modules.

pub use troika_core::error::{AppError, ErrorKind};
pub use troika_core::result::AppResult;

pub use crate::discovery::HookModule;
pub use crate::hooks::definitions::{HookAction, HookPayload, HookResult, Phase, Requirement};
pub use crate::hooks::registry::{Hook, HookFactory, HookRegistry, HookSpec};
pub use crate::traits::ClosureHook;

pub use crate::{hook_module, hook_payload};
