use anyhow::{Context, Result};
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const PLACEHOLDER_PATTERN: &str = r"\$\{(\w+)\}|\$(\w+)";

fn placeholder_regex() -> Result<Regex> {
    Regex::new(PLACEHOLDER_PATTERN).context("Invalid placeholder pattern")
}

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = placeholder_regex()?;
    let mut result = content.to_string();
    let mut missing_vars = Vec::new();

    for caps in re.captures_iter(content) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1).or_else(|| caps.get(2))) else {
            continue;
        };
        let var_name = name.as_str();

        match env::var(var_name) {
            Ok(value) => {
                debug!(var = var_name, "Substituting environment variable");
                result = result.replace(whole.as_str(), &value);
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                // Placeholder stays; validation reports it
                missing_vars.push(var_name.to_string());
            }
        }
    }

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result)
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    placeholder_regex()
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}
