//! Item filtering rules.
//!
//! A connection configuration carries an ordered list of [`Filter`]s. Each filter holds
//! rules of the form `key = "<glob|regex>:<pattern>"` and an action. Connectors call
//! [`FilterConfiguration::whitelist_filter`] with the properties of a candidate item to
//! skip work for excluded items:
//!
//! ```toml
//! [[filters]]
//! id = "skip-temp-tables"
//! action = "REJECT"
//!
//! [filters.rules]
//! table = "glob:tmp_*"
//! ```

use crate::metrics::ConnectorMetrics;
use crate::{ConnectorError, ConnectorResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

/// Pattern language of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleType {
    Glob,
    Regex,
}

impl RuleType {
    fn parse(prefix: &str) -> Option<Self> {
        if prefix.eq_ignore_ascii_case("glob") {
            Some(RuleType::Glob)
        } else if prefix.eq_ignore_ascii_case("regex") {
            Some(RuleType::Regex)
        } else {
            None
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            RuleType::Glob => "glob",
            RuleType::Regex => "regex",
        }
    }
}

/// What to do with an item once a filter applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterAction {
    #[serde(rename = "ACCEPT", alias = "accept", alias = "Accept")]
    Accept,
    #[serde(rename = "REJECT", alias = "reject", alias = "Reject")]
    Reject,
}

/// A single matching rule on one item property.
///
/// The pattern is compiled once, when the rule is created, into an anchored regular
/// expression: both globs and regexes must match the whole property value.
#[derive(Debug, Clone)]
pub struct Rule {
    key: String,
    rule_type: RuleType,
    value: String,
    raw_value: String,
    matcher: Regex,
}

impl Rule {
    /// Parse a rule from its raw `"<type>:<pattern>"` form.
    ///
    /// The type prefix is case-insensitive and the string is split on the first colon,
    /// so patterns may themselves contain colons.
    pub fn parse(key: impl Into<String>, raw_value: impl Into<String>) -> ConnectorResult<Self> {
        let key = key.into();
        let raw_value = raw_value.into();

        let (prefix, pattern) = raw_value.split_once(':').ok_or_else(|| {
            ConnectorError::config(format!(
                "Rule for \"{}\" must have the form <glob|regex>:<pattern>, got \"{}\"",
                key, raw_value
            ))
        })?;
        let rule_type = RuleType::parse(prefix).ok_or_else(|| {
            ConnectorError::config(format!(
                "Unknown rule type \"{}\" for \"{}\" (expected glob or regex)",
                prefix, key
            ))
        })?;
        let value = pattern.to_string();
        let matcher = Self::compile(&key, rule_type, &value)?;

        Ok(Self {
            key,
            rule_type,
            value,
            raw_value,
            matcher,
        })
    }

    /// Create a rule from its parts
    pub fn new(
        key: impl Into<String>,
        rule_type: RuleType,
        value: impl Into<String>,
    ) -> ConnectorResult<Self> {
        let value = value.into();
        let raw_value = format!("{}:{}", rule_type.prefix(), value);
        Self::parse(key, raw_value)
    }

    fn compile(key: &str, rule_type: RuleType, pattern: &str) -> ConnectorResult<Regex> {
        let invalid = |e: regex::Error| {
            ConnectorError::config(format!("Invalid pattern for rule \"{}\": {}", key, e))
        };
        let anchored = match rule_type {
            RuleType::Glob => glob_to_regex(pattern),
            RuleType::Regex => {
                // A pattern that only parses once wrapped would escape the anchors.
                Regex::new(pattern).map_err(invalid)?;
                format!("^(?:{})$", pattern)
            }
        };
        Regex::new(&anchored).map_err(invalid)
    }

    /// Item property this rule applies to
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    /// The pattern, without its type prefix
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The rule as it was written, `"<type>:<pattern>"`
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Whether the whole of `value` matches the pattern.
    pub fn matches(&self, value: &str) -> bool {
        self.matcher.is_match(value)
    }

    /// Like [`Rule::matches`], treating an absent value as a non-match.
    pub fn matches_opt(&self, value: Option<&str>) -> bool {
        value.map_or(false, |v| self.matches(v))
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.raw_value == other.raw_value
    }
}

impl Eq for Rule {}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = \"{}\"", self.key, self.raw_value)
    }
}

/// Translate a glob into an anchored regex: `*` is any run of characters, `?` is
/// exactly one, everything else is literal.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push_str("^(?s:");
    let mut buf = [0u8; 4];
    for c in glob.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    out.push_str(")$");
    out
}

/// An ordered conjunction of rules with an action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawFilter")]
pub struct Filter {
    id: String,
    action: FilterAction,
    rules: Vec<Rule>,
}

impl Filter {
    pub fn new(id: impl Into<String>, action: FilterAction, rules: Vec<Rule>) -> Self {
        Self {
            id: id.into(),
            action,
            rules,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn action(&self) -> FilterAction {
        self.action
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether every rule matches its property. A filter without rules never applies,
    /// and a rule whose key is missing from `properties` does not match.
    pub fn applies_to(&self, properties: &HashMap<String, String>) -> bool {
        !self.rules.is_empty()
            && self
                .rules
                .iter()
                .all(|rule| rule.matches_opt(properties.get(rule.key()).map(String::as_str)))
    }
}

#[derive(Deserialize)]
struct RawFilter {
    id: String,
    action: FilterAction,
    #[serde(default)]
    rules: BTreeMap<String, String>,
}

impl TryFrom<RawFilter> for Filter {
    type Error = ConnectorError;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        let rules = raw
            .rules
            .into_iter()
            .map(|(key, value)| Rule::parse(key, value))
            .collect::<ConnectorResult<Vec<_>>>()?;
        Ok(Filter::new(raw.id, raw.action, rules))
    }
}

/// Outcome of evaluating a filter configuration against an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision<'a> {
    /// The named ACCEPT filter applied first.
    Accepted(&'a str),
    /// The named REJECT filter applied first.
    Rejected(&'a str),
    /// No filter applied; the item is let through.
    NoMatch,
}

impl FilterDecision<'_> {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, FilterDecision::Rejected(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterDecision::Accepted(_) => "accepted",
            FilterDecision::Rejected(_) => "rejected",
            FilterDecision::NoMatch => "no_match",
        }
    }
}

/// Ordered filters of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FilterConfiguration {
    filters: Vec<Filter>,
}

impl FilterConfiguration {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Find the first filter that applies to `properties`.
    pub fn evaluate<'a>(&'a self, properties: &HashMap<String, String>) -> FilterDecision<'a> {
        let decision = self
            .filters
            .iter()
            .find(|filter| filter.applies_to(properties))
            .map_or(FilterDecision::NoMatch, |filter| match filter.action {
                FilterAction::Accept => FilterDecision::Accepted(&filter.id),
                FilterAction::Reject => FilterDecision::Rejected(&filter.id),
            });
        debug!(?decision, "Evaluated item filters");
        decision
    }

    /// Whether an item with these properties should be kept.
    ///
    /// The first applying filter wins; when none applies (or none is configured) the
    /// item is kept.
    pub fn whitelist_filter(&self, properties: &HashMap<String, String>) -> bool {
        self.evaluate(properties).is_allowed()
    }

    /// Like [`FilterConfiguration::whitelist_filter`], counting the decision in `metrics`.
    pub fn whitelist_filter_with(
        &self,
        metrics: &ConnectorMetrics,
        properties: &HashMap<String, String>,
    ) -> bool {
        let decision = self.evaluate(properties);
        metrics.record_filter_decision(&decision);
        decision.is_allowed()
    }
}
