use std::{collections::HashMap, env, fmt::Display, str::FromStr};

use log::*;
use thiserror::Error;

use crate::helpers::parse_boolean_flag;

#[derive(Debug, Clone, Error)]
#[error("Missing required environment variables: {}", .0.join(", "))]
pub struct MissingEnvVars(pub Vec<String>);

/// Returns the trimmed value of the environment variable, or `None` if it is unset or blank.
pub fn env_string(name: &str) -> Option<String> {
    env::var(name).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

type Lookup = Box<dyn Fn(&str) -> Option<String>>;

/// Reads configuration values and keeps track of every required variable that was missing, so that they can all be
/// reported in one go rather than one per run.
pub struct EnvReader {
    lookup: Lookup,
    missing: Vec<String>,
}

impl EnvReader {
    pub fn from_env() -> Self {
        Self { lookup: Box::new(env_string), missing: Vec::new() }
    }

    /// A reader backed by a fixed set of values instead of the process environment.
    pub fn from_map(values: HashMap<String, String>) -> Self {
        let lookup = move |name: &str| values.get(name).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self { lookup: Box::new(lookup), missing: Vec::new() }
    }

    pub fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
    }

    /// Returns the value, or an empty string after recording the variable as missing.
    pub fn required(&mut self, name: &str) -> String {
        self.optional(name).unwrap_or_else(|| {
            self.missing.push(name.to_string());
            String::default()
        })
    }

    /// Parses the value if present. Unparseable values are logged and treated as unset.
    pub fn parsed<T>(&self, name: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(name).and_then(|s| {
            s.parse::<T>()
                .map_err(|e| warn!("🪛️ Ignoring invalid value ({s}) for {name}. {e}"))
                .ok()
        })
    }

    pub fn flag(&self, name: &str, default: bool) -> bool {
        parse_boolean_flag(self.optional(name), default)
    }

    pub fn finish(self) -> Result<(), MissingEnvVars> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(MissingEnvVars(self.missing))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn reader(pairs: &[(&str, &str)]) -> EnvReader {
        EnvReader::from_map(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn collects_all_missing_variables() {
        let mut env = reader(&[("A", "1"), ("B", "   ")]);
        assert_eq!(env.required("A"), "1");
        assert_eq!(env.required("B"), "");
        assert_eq!(env.required("C"), "");
        let err = env.finish().expect_err("B and C are missing");
        assert_eq!(err.to_string(), "Missing required environment variables: B, C");
    }

    #[test]
    fn parsed_values() {
        let env = reader(&[("PORT", "8089"), ("BAD", "eighty"), ("FLAG", "yes")]);
        assert_eq!(env.parsed::<u16>("PORT"), Some(8089));
        assert_eq!(env.parsed::<u16>("BAD"), None);
        assert_eq!(env.parsed::<u16>("NOPE"), None);
        assert!(env.flag("FLAG", false));
        assert!(env.flag("NOPE", true));
        assert!(env.finish().is_ok());
    }
}
