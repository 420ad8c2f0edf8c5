//! Argument-set validation: which supplied names has nobody declared?
use std::collections::HashSet;

use indexmap::IndexSet;
use serde::Deserialize;

// ------------------------------ Whitelist --------------------------------- //

/// Name rules that exempt arguments from the unexpected-argument check.
///
/// A name is whitelisted if any non-empty rule in any field accepts it.
/// Deserializes from `{startsWith, endsWith, includes, matches}` or from a
/// bare list of names, which is read as `matches`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "WhitelistRepr")]
pub struct WhitelistPolicy {
    pub starts_with: Vec<String>,
    pub ends_with: Vec<String>,
    pub includes: Vec<String>,
    /// Exact names.
    pub matches: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WhitelistRepr {
    Names(Vec<String>),
    Rules(WhitelistRules),
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
struct WhitelistRules {
    starts_with: Vec<String>,
    ends_with: Vec<String>,
    includes: Vec<String>,
    matches: Vec<String>,
}

impl From<WhitelistRepr> for WhitelistPolicy {
    fn from(repr: WhitelistRepr) -> Self {
        match repr {
            WhitelistRepr::Names(matches) => Self { matches, ..Self::default() },
            WhitelistRepr::Rules(r) => Self {
                starts_with: r.starts_with,
                ends_with: r.ends_with,
                includes: r.includes,
                matches: r.matches,
            },
        }
    }
}

impl WhitelistPolicy {
    pub fn is_empty(&self) -> bool {
        let rules = [&self.starts_with, &self.ends_with, &self.includes, &self.matches];
        rules.iter().all(|field| field.iter().all(String::is_empty))
    }

    pub fn is_whitelisted(&self, name: &str) -> bool {
        fn any_rule(rules: &[String], accept: impl Fn(&str) -> bool) -> bool {
            rules.iter().filter(|r| !r.is_empty()).any(|r| accept(r.as_str()))
        }
        any_rule(&self.starts_with, |r| name.starts_with(r))
            || any_rule(&self.ends_with, |r| name.ends_with(r))
            || any_rule(&self.includes, |r| name.contains(r))
            || any_rule(&self.matches, |r| name == r)
    }
}

// ------------------------------- Checks ----------------------------------- //

/// Supplied names that are neither declared nor whitelisted, in supplied
/// order.
pub fn check_unexpected<'a, S, D>(supplied: S, declared: D, whitelist: &WhitelistPolicy) -> IndexSet<String>
where
    S: IntoIterator<Item = &'a str>,
    D: IntoIterator<Item = &'a str>,
{
    let declared: HashSet<&str> = declared.into_iter().collect();
    supplied
        .into_iter()
        .filter(|name| !declared.contains(name))
        .filter(|name| !whitelist.is_whitelisted(name))
        .map(str::to_string)
        .collect()
}

/// Required names that were not supplied, in declaration order.
pub fn check_missing<'a, S, R>(supplied: S, required: R) -> IndexSet<String>
where
    S: IntoIterator<Item = &'a str>,
    R: IntoIterator<Item = &'a str>,
{
    let supplied: HashSet<&str> = supplied.into_iter().collect();
    required
        .into_iter()
        .filter(|name| !supplied.contains(name))
        .map(str::to_string)
        .collect()
}
