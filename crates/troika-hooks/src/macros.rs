//! Convenience macros for hook modules.

/// Declares a [`HookModule`](crate::discovery::HookModule) constant.
///
/// # Example
/// ```rust,ignore
/// hook_module!(MODULE, "notify", register);
/// ```
#[macro_export]
macro_rules! hook_module {
    ($ident:ident, $name:expr, $register:path) => {
        pub const $ident: $crate::discovery::HookModule =
            $crate::discovery::HookModule::new($name, $register);
    };
}

/// Macro for quickly building a `HookPayload`.
///
/// # Example
/// ```rust,ignore
/// let payload = hook_payload!(Phase::AtExit, "alpha", {
///     "job" => json!("fc-00z"),
///     "status" => json!(0),
/// });
/// ```
#[macro_export]
macro_rules! hook_payload {
    ($phase:expr, $site:expr) => {
        $crate::prelude::HookPayload::new($phase, $site)
    };
    ($phase:expr, $site:expr, { $($key:expr => $value:expr),* $(,)? }) => {{
        let mut payload = $crate::prelude::HookPayload::new($phase, $site);
        $(
            payload.data.insert($key.to_string(), $value);
        )*
        payload
    }};
}
