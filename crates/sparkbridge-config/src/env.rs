use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// `{{ env.VAR | default("fallback") }}` substitutes the fallback when the
/// variable is unset. Comment lines are left untouched so documented but
/// unused placeholders never fail the load.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
                .expect("must be valid regex")
        })
    }

    let expanded = input
        .split('\n')
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return Ok(line.to_owned());
            }

            let mut failure = None;
            let replaced = re().replace_all(line, |captures: &Captures<'_>| {
                resolve(captures).unwrap_or_else(|e| {
                    failure.get_or_insert(e);
                    String::new()
                })
            });

            match failure {
                Some(e) => Err(e),
                None => Ok(replaced.into_owned()),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(expanded.join("\n"))
}

/// Resolve a single placeholder match to its substituted value
fn resolve(captures: &Captures<'_>) -> Result<String, String> {
    let key = &captures[1];
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}
