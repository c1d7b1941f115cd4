//! Command-line arguments: a command, positionals and `--flag value` pairs.

use anyhow::{anyhow, bail, Result};
use std::str::FromStr;

/// Flags that stand alone.
const SWITCHES: &[&str] = &["--random", "--clear", "--help"];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub command: String,
    pub positional: Vec<String>,
    flags: Vec<(String, Option<String>)>,
}

impl Args {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = Args::default();
        let mut iter = args.iter();
        if let Some(command) = iter.next() {
            parsed.command = command.to_lowercase();
        }
        while let Some(arg) = iter.next() {
            if !arg.starts_with("--") {
                parsed.positional.push(arg.clone());
            } else if SWITCHES.contains(&arg.as_str()) {
                parsed.flags.push((arg.clone(), None));
            } else {
                let Some(value) = iter.next() else {
                    bail!("{arg} needs a value");
                };
                parsed.flags.push((arg.clone(), Some(value.clone())));
            }
        }
        Ok(parsed)
    }

    pub fn has(&self, flag: &str) -> bool {
        self.flags.iter().any(|(name, _)| name == flag)
    }

    /// Last value given for `flag`.
    pub fn value(&self, flag: &str) -> Option<&str> {
        self.flags
            .iter()
            .rev()
            .find(|(name, _)| name == flag)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Parses the value of `flag`, if present.
    pub fn parsed<T>(&self, flag: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(text) = self.value(flag) else {
            return Ok(None);
        };
        let value = text
            .parse::<T>()
            .map_err(|e| anyhow!("invalid value '{text}' for {flag}: {e}"))?;
        Ok(Some(value))
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod args_tests;
