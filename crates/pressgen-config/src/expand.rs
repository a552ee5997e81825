//! Environment variable expansion for configuration strings.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
///
/// An unset variable without a default is an error naming the config field.
/// Strings without `${` pass through untouched, as does bare `$VAR` syntax.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, env_lookup)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} is not set", e.var_name),
        })
}

/// Marker for a failed lookup; the variable name is reported by shellexpand.
struct Unset;

fn env_lookup(var: &str) -> Result<Option<String>, Unset> {
    std::env::var(var).map(Some).map_err(|_| Unset)
}
