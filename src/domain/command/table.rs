//! Alias resolution over an immutable command table.
//!
//! The table is built once at startup. Resolution strips the trigger
//! character and picks the longest alias that is a case-insensitive prefix
//! of the remaining text; equal-length candidates fall back to declaration
//! order. The result never depends on the order aliases were registered in
//! when they nest (`t`, `t+`, `tutor`, `tutorplus`).

use std::collections::HashSet;
use thiserror::Error;

use super::definition::CommandDefinition;
use crate::domain::foundation::ValidationError;

/// Why an input did not resolve to a command.
///
/// Resolution failures are not user-facing errors; the dispatcher ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("input does not start with the trigger '{0}'")]
    MissingTrigger(char),

    #[error("no alias matches the input")]
    NoMatch,
}

/// A resolved command together with the user's query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCommand<'t, 'i> {
    /// Borrowed from the table.
    pub definition: &'t CommandDefinition,
    /// Text following the alias, trimmed; borrowed from the input.
    pub query: &'i str,
}

/// Immutable alias table with longest-prefix resolution.
#[derive(Debug, Clone)]
pub struct CommandTable {
    trigger: char,
    /// Definitions in declaration order.
    definitions: Vec<CommandDefinition>,
    /// Indices into `definitions`, longest alias first, stable on ties.
    match_order: Vec<usize>,
}

impl CommandTable {
    /// Builds a table from definitions in declaration order.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if two definitions share an alias
    /// - `EmptyField` if no definitions are given
    pub fn new(
        trigger: char,
        definitions: Vec<CommandDefinition>,
    ) -> Result<Self, ValidationError> {
        if definitions.is_empty() {
            return Err(ValidationError::empty_field("definitions"));
        }

        let mut seen = HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.alias()) {
                return Err(ValidationError::invalid_format(
                    "alias",
                    format!("duplicate alias '{}'", definition.alias()),
                ));
            }
        }

        let mut match_order: Vec<usize> = (0..definitions.len()).collect();
        // sort_by_key is stable, so declaration order breaks ties
        match_order.sort_by_key(|&index| std::cmp::Reverse(definitions[index].alias().len()));

        Ok(Self {
            trigger,
            definitions,
            match_order,
        })
    }

    pub fn trigger(&self) -> char {
        self.trigger
    }

    /// Definitions in declaration order.
    pub fn definitions(&self) -> &[CommandDefinition] {
        &self.definitions
    }

    /// Looks up a definition by exact alias (case-insensitive).
    pub fn by_alias(&self, alias: &str) -> Option<&CommandDefinition> {
        self.definitions
            .iter()
            .find(|definition| definition.alias().eq_ignore_ascii_case(alias))
    }

    /// Resolves raw input text to a command definition.
    pub fn resolve(&self, input: &str) -> Result<&CommandDefinition, ResolutionError> {
        self.parse(input).map(|parsed| parsed.definition)
    }

    /// Resolves raw input text and splits off the query.
    pub fn parse<'t, 'i>(&'t self, input: &'i str) -> Result<ParsedCommand<'t, 'i>, ResolutionError> {
        let rest = input
            .strip_prefix(self.trigger)
            .ok_or(ResolutionError::MissingTrigger(self.trigger))?;

        self.match_order
            .iter()
            .map(|&index| &self.definitions[index])
            .find_map(|definition| {
                let alias = definition.alias();
                let head = rest.get(..alias.len())?;
                if head.eq_ignore_ascii_case(alias) {
                    Some(ParsedCommand {
                        definition,
                        query: rest[alias.len()..].trim(),
                    })
                } else {
                    None
                }
            })
            .ok_or(ResolutionError::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::command::{CommandCategory, ConversationMode};
    use proptest::prelude::*;

    fn def(alias: &str, category: CommandCategory) -> CommandDefinition {
        CommandDefinition::new(alias, format!("model-{}", alias), ConversationMode::Tutor, category)
            .unwrap()
    }

    /// Nested aliases declared shortest-first, the order that misroutes a
    /// first-match scan.
    fn nested_table() -> CommandTable {
        CommandTable::new(
            '$',
            vec![
                def("t", CommandCategory::Normal),
                def("t+", CommandCategory::Plus),
                def("tutor", CommandCategory::Normal),
                def("tutorplus", CommandCategory::Plus),
            ],
        )
        .unwrap()
    }

    #[test]
    fn longest_alias_wins_over_declaration_order() {
        let table = nested_table();
        let resolved = table.resolve("$tutorplus hi").unwrap();
        assert_eq!(resolved.alias(), "tutorplus");
    }

    #[test]
    fn shorter_aliases_still_resolve() {
        let table = nested_table();
        assert_eq!(table.resolve("$t+ x").unwrap().alias(), "t+");
        assert_eq!(table.resolve("$tutor x").unwrap().alias(), "tutor");
        assert_eq!(table.resolve("$t x").unwrap().alias(), "t");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let table = nested_table();
        assert_eq!(table.resolve("$TUTORPlus hi").unwrap().alias(), "tutorplus");
    }

    #[test]
    fn query_is_text_after_alias_trimmed() {
        let table = nested_table();
        let parsed = table.parse("$tutorplus   what is 2+2?  ").unwrap();
        assert_eq!(parsed.query, "what is 2+2?");

        let parsed = table.parse("$tutor").unwrap();
        assert_eq!(parsed.query, "");
    }

    #[test]
    fn missing_trigger_is_reported() {
        let table = nested_table();
        assert_eq!(
            table.resolve("tutor hi"),
            Err(ResolutionError::MissingTrigger('$'))
        );
    }

    #[test]
    fn unknown_alias_is_no_match() {
        let table = nested_table();
        assert_eq!(table.resolve("$xyz"), Err(ResolutionError::NoMatch));
        assert_eq!(table.resolve("$"), Err(ResolutionError::NoMatch));
    }

    #[test]
    fn non_ascii_input_does_not_panic() {
        let table = nested_table();
        assert_eq!(table.resolve("$é"), Err(ResolutionError::NoMatch));
        assert_eq!(table.resolve("$tü").unwrap().alias(), "t");
    }

    #[test]
    fn duplicate_aliases_are_rejected() {
        let result = CommandTable::new(
            '$',
            vec![def("t", CommandCategory::Normal), def("T", CommandCategory::Plus)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn equal_length_aliases_keep_declaration_order() {
        let table = CommandTable::new(
            '$',
            vec![def("ab", CommandCategory::Normal), def("ac", CommandCategory::Plus)],
        )
        .unwrap();
        let order: Vec<&str> = table
            .match_order
            .iter()
            .map(|&i| table.definitions[i].alias())
            .collect();
        assert_eq!(order, vec!["ab", "ac"]);
    }

    #[test]
    fn resolved_definition_outlives_the_input() {
        let table = nested_table();
        let definition = {
            let input = String::from("$tutorplus temporary");
            table.resolve(&input).unwrap()
        };
        assert_eq!(definition.alias(), "tutorplus");
    }

    #[test]
    fn by_alias_finds_exact_alias() {
        let table = nested_table();
        assert_eq!(table.by_alias("TUTOR").unwrap().alias(), "tutor");
        assert!(table.by_alias("tut").is_none());
    }

    proptest! {
        #[test]
        fn resolution_is_deterministic_and_maximal(input in "\\$[a-zA-Z+ ]{0,16}") {
            let table = nested_table();
            let first = table.resolve(&input).map(|d| d.alias().to_string());
            let second = table.resolve(&input).map(|d| d.alias().to_string());
            prop_assert_eq!(&first, &second);

            if let Ok(alias) = first {
                let rest = input[1..].to_ascii_lowercase();
                for other in table.definitions() {
                    if rest.starts_with(other.alias()) {
                        prop_assert!(other.alias().len() <= alias.len());
                    }
                }
            }
        }
    }
}
