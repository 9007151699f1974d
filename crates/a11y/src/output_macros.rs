//! Output helper macros for reducing JSON boilerplate in main.rs

/// Output data as a JSON envelope or in a custom human-readable format.
///
/// # Examples
///
/// ```ignore
/// output_data!(ctx, "issue show", issue, {
///     println!("ID: {}", issue.id);
///     println!("Title: {}", issue.title);
/// });
/// ```
#[macro_export]
macro_rules! output_data {
    ($ctx:expr, $command:expr, $data:expr, $human_block:block) => {
        if $ctx.is_json() {
            $ctx.print_json($command, &$data)?;
        } else {
            $human_block
        }
    };
}

/// Output a one-line confirmation, JSON-wrapped as `{"message": ...}`
/// when `--json` is set.
///
/// # Examples
///
/// ```ignore
/// output_message!(ctx, "issue status", "Updated {} to {}", id, status);
/// ```
#[macro_export]
macro_rules! output_message {
    ($ctx:expr, $command:expr, $($arg:tt)*) => {
        let msg = format!($($arg)*);
        if $ctx.is_json() {
            $ctx.print_json($command, serde_json::json!({"message": msg}))?;
        } else {
            $ctx.print_success(&msg)?;
        }
    };
}
