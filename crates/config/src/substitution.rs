use anyhow::Result;
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const ENV_VAR_PATTERN: &str = r"\$\{(\w+)\}|\$(\w+)";

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(ENV_VAR_PATTERN)?;
    let mut missing_vars = Vec::new();

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let placeholder = &caps[0];
        let var_name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {} = \"{}\"", var_name, value);
                value
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                missing_vars.push(var_name.to_string());
                // Left in place; validate_config reports it
                placeholder.to_string()
            }
        }
    });

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may use defaults or fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result.into_owned())
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> Result<bool> {
    let re = Regex::new(ENV_VAR_PATTERN)?;
    Ok(re.is_match(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_set_variable() {
        env::set_var("CHAINSIM_TEST_SYMBOL", "BANKNIFTY");
        let out = substitute_env_vars("default_symbol: ${CHAINSIM_TEST_SYMBOL}").unwrap();
        assert_eq!(out, "default_symbol: BANKNIFTY");
    }

    #[test]
    fn test_keeps_missing_placeholder() {
        let out = substitute_env_vars("port: ${CHAINSIM_TEST_DEFINITELY_UNSET}").unwrap();
        assert_eq!(out, "port: ${CHAINSIM_TEST_DEFINITELY_UNSET}");
        assert!(has_unresolved_env_vars(&out).unwrap());
    }

    #[test]
    fn test_plain_text_untouched() {
        let out = substitute_env_vars("refresh:\n  interval_ms: 3000\n").unwrap();
        assert_eq!(out, "refresh:\n  interval_ms: 3000\n");
        assert!(!has_unresolved_env_vars(&out).unwrap());
    }
}
