//! Grouping rule registry consulted while rearranging the element tree.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// How repeated same-name sibling elements are reshaped in the JSON output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupingRule {
    /// Collect every sibling of this name into one JSON array, in document
    /// order.
    AsArray,
    /// Collect siblings into one JSON object keyed by the value of the named
    /// attribute. The attribute is removed from each grouped element so it is
    /// not serialized twice.
    ByAttribute(String),
}

/// Registry mapping tag names to grouping rules.
///
/// Rules are global by name but applied locally: a rule for `item` affects
/// the direct children of every element that has `item` children, at any
/// depth, one parent at a time.
///
/// A tag name carries at most one rule. Registering a second, different rule
/// for the same tag fails with [`Error::RuleConflict`]; re-registering the
/// identical rule is a no-op. Once conversions begin the registry is treated
/// as read-only, so one `Config` may back any number of concurrent
/// conversions.
///
/// # Examples
///
/// ```
/// use xml2json::Config;
///
/// # fn main() -> xml2json::Result<()> {
/// let mut config = Config::new();
/// config.group_as_array("servlet")?;
/// config.group_by_attribute("test", "id")?;
/// config.group_by_id("book")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    rules: BTreeMap<String, GroupingRule>,
}

impl Config {
    /// Creates a registry with no grouping rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tag` so repeated siblings of that name become a JSON array.
    pub fn group_as_array(&mut self, tag: impl Into<String>) -> Result<&mut Self> {
        self.register(tag.into(), GroupingRule::AsArray)
    }

    /// Registers `tag` so siblings of that name become a JSON object keyed by
    /// the value of `attr` on each sibling.
    pub fn group_by_attribute(
        &mut self,
        tag: impl Into<String>,
        attr: impl Into<String>,
    ) -> Result<&mut Self> {
        self.register(tag.into(), GroupingRule::ByAttribute(attr.into()))
    }

    /// Shorthand for [`group_by_attribute`](Config::group_by_attribute) with
    /// the `id` attribute.
    pub fn group_by_id(&mut self, tag: impl Into<String>) -> Result<&mut Self> {
        self.group_by_attribute(tag, "id")
    }

    /// Returns the rule registered for `tag`, if any.
    pub fn rule(&self, tag: &str) -> Option<&GroupingRule> {
        self.rules.get(tag)
    }

    /// True when no rule has been registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn register(&mut self, tag: String, rule: GroupingRule) -> Result<&mut Self> {
        match self.rules.get(&tag) {
            Some(existing) if *existing != rule => Err(Error::RuleConflict { tag }),
            _ => {
                self.rules.insert(tag, rule);
                Ok(self)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_lookup() {
        let mut config = Config::new();
        config.group_as_array("item").unwrap();
        config.group_by_attribute("test", "name").unwrap();

        assert_eq!(config.rule("item"), Some(&GroupingRule::AsArray));
        assert_eq!(
            config.rule("test"),
            Some(&GroupingRule::ByAttribute("name".to_string()))
        );
        assert_eq!(config.rule("other"), None);
        assert!(!config.is_empty());
        assert!(Config::new().is_empty());
    }

    #[test]
    fn test_conflicting_rules_rejected() {
        let mut config = Config::new();
        config.group_as_array("item").unwrap();
        let err = config.group_by_id("item").unwrap_err();
        assert!(matches!(err, Error::RuleConflict { tag } if tag == "item"));

        let mut config = Config::new();
        config.group_by_attribute("item", "a").unwrap();
        assert!(config.group_by_attribute("item", "b").is_err());
        assert!(config.group_as_array("item").is_err());
    }

    #[test]
    fn test_reregistering_same_rule_is_allowed() {
        let mut config = Config::new();
        config.group_as_array("item").unwrap();
        config.group_as_array("item").unwrap();
        config.group_by_id("book").unwrap();
        config.group_by_attribute("book", "id").unwrap();
        assert_eq!(config.rule("item"), Some(&GroupingRule::AsArray));
    }

    #[test]
    fn test_chained_registration() -> Result<()> {
        let mut config = Config::new();
        config.group_as_array("servlet")?.group_by_id("test")?;
        assert!(config.rule("servlet").is_some());
        assert!(config.rule("test").is_some());
        Ok(())
    }
}
