use std::collections::HashMap;

use strsim::levenshtein;

use crate::cli::context::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

/// Commands in registration order, addressable by name or alias.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        let position = self.entries.len();
        for key in std::iter::once(entry.name).chain(entry.aliases.iter().copied()) {
            self.index.insert(key, position);
        }
        self.entries.push(entry);
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }

    /// Closest registered name within a small edit distance.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        self.index
            .keys()
            .map(|key| (levenshtein(key, input), *key))
            .filter(|(distance, _)| *distance <= 2)
            .min_by_key(|(distance, key)| (*distance, *key))
            .map(|(_, key)| self.get(key).map_or(key, |entry| entry.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry {
            name: "summary",
            aliases: &["sum"],
            description: "",
            usage: "summary",
            handler: noop,
        });
        registry.register(CommandEntry {
            name: "tags",
            aliases: &[],
            description: "",
            usage: "tags <remark>",
            handler: noop,
        });
        registry
    }

    #[test]
    fn aliases_resolve_to_the_command() {
        let registry = registry();
        assert_eq!(registry.get("sum").map(|entry| entry.name), Some("summary"));
        assert!(registry.get("unknown").is_none());
        assert_eq!(registry.names(), vec!["summary", "tags"]);
    }

    #[test]
    fn suggestions_use_edit_distance() {
        let registry = registry();
        assert_eq!(registry.suggest("sumary"), Some("summary"));
        assert_eq!(registry.suggest("tgas"), Some("tags"));
        assert_eq!(registry.suggest("completely-different"), None);
    }
}
