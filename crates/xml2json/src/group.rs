//! Post-order grouping transform over the element tree.

use std::collections::BTreeMap;

use crate::config::{Config, GroupingRule};
use crate::tree::Node;

/// Applies the configured grouping rules to `node` and all of its
/// descendants, in place.
///
/// Children are fully arranged before their parent partitions them, so a
/// parent's grouping decisions never look past its direct children. Within
/// each group the original document order is preserved; groups themselves are
/// stored and later emitted in sorted name order.
pub fn arrange(node: &mut Node, config: &Config) {
    for child in &mut node.children {
        arrange(child, config);
    }
    if config.is_empty() {
        return;
    }

    let mut grouped: BTreeMap<String, (GroupingRule, Vec<Node>)> = BTreeMap::new();
    let mut plain = Vec::with_capacity(node.children.len());
    for child in std::mem::take(&mut node.children) {
        match config.rule(&child.name) {
            Some(rule) => {
                grouped
                    .entry(child.name.clone())
                    .or_insert_with(|| (rule.clone(), Vec::new()))
                    .1
                    .push(child);
            }
            None => plain.push(child),
        }
    }
    node.children = plain;

    for (name, (rule, members)) in grouped {
        match rule {
            GroupingRule::AsArray => {
                node.array_groups.insert(name, members);
            }
            GroupingRule::ByAttribute(attr) => {
                let mut keyed = Vec::with_capacity(members.len());
                for mut member in members {
                    let key = match member.attributes.remove(&attr) {
                        Some(key) => key,
                        None => {
                            tracing::warn!(
                                tag = %name,
                                attribute = %attr,
                                "grouping attribute missing, using empty key"
                            );
                            String::new()
                        }
                    };
                    keyed.push((key, member));
                }
                node.keyed_groups.insert(name, keyed);
            }
        }
    }
}
