use regex::Regex;

use crate::config::FilterSpec;
use crate::error::{Error, Result};

/// A compiled include or exclude rule.
#[derive(Debug, Clone)]
pub enum NameMatcher {
    Pattern(Regex),
    Names(Vec<String>),
}

impl NameMatcher {
    fn compile(spec: &FilterSpec, label: &str) -> Result<Self> {
        match spec {
            FilterSpec::Pattern(pattern) => Regex::new(pattern)
                .map(NameMatcher::Pattern)
                .map_err(|err| {
                    Error::Configuration(format!("invalid {label} pattern '{pattern}': {err}"))
                }),
            FilterSpec::Names(names) => Ok(NameMatcher::Names(names.clone())),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Pattern(regex) => regex.is_match(name),
            NameMatcher::Names(names) => names.iter().any(|item| item == name),
        }
    }
}

/// Relation filter; exclude is evaluated after include and always wins.
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    include: Option<NameMatcher>,
    exclude: Option<NameMatcher>,
}

impl TableFilter {
    pub fn new(include: Option<&FilterSpec>, exclude: Option<&FilterSpec>) -> Result<Self> {
        Ok(Self {
            include: include
                .map(|spec| NameMatcher::compile(spec, "include"))
                .transpose()?,
            exclude: exclude
                .map(|spec| NameMatcher::compile(spec, "exclude"))
                .transpose()?,
        })
    }

    pub fn allows(&self, name: &str) -> bool {
        let included = self
            .include
            .as_ref()
            .is_none_or(|matcher| matcher.matches(name));
        let excluded = self
            .exclude
            .as_ref()
            .is_some_and(|matcher| matcher.matches(name));
        included && !excluded
    }
}
