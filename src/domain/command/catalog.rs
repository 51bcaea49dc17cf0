//! Built-in command catalog.

use super::definition::{CommandCategory, CommandDefinition, ConversationMode};
use super::table::CommandTable;
use crate::domain::foundation::ValidationError;

/// Character every command starts with.
pub const COMMAND_TRIGGER: char = '$';

/// Alias the structured slash invocation always resolves to.
pub const SLASH_TUTOR_ALIAS: &str = "tutor";

const MODEL_FLASH_TUT: &str = "Gemini-2.5-Flash-Tut";
const MODEL_FLASH_LITE: &str = "Gemini-2.5-Flash-Lite";
const MODEL_KIMI: &str = "tester-kimi-k2-non";
const MODEL_IMAGE_MINI: &str = "GPT-Image-1-Mini";
const MODEL_FLUX: &str = "FLUX-schnell";

/// (alias, model, mode, category) in declaration order.
const CATALOG: &[(&str, &str, ConversationMode, CommandCategory)] = &[
    ("tutorplus", MODEL_FLASH_TUT, ConversationMode::Tutor, CommandCategory::Plus),
    ("tutorminus", MODEL_FLASH_LITE, ConversationMode::Tutor, CommandCategory::Minus),
    ("imageplus", MODEL_IMAGE_MINI, ConversationMode::Standard, CommandCategory::ImagePlus),
    ("standardplus", MODEL_FLASH_TUT, ConversationMode::Standard, CommandCategory::NonPlus),
    ("standardminus", MODEL_FLASH_LITE, ConversationMode::Standard, CommandCategory::NonMinus),
    ("tutor", MODEL_KIMI, ConversationMode::Tutor, CommandCategory::Normal),
    ("image", MODEL_FLUX, ConversationMode::Standard, CommandCategory::Image),
    ("standard", MODEL_KIMI, ConversationMode::Standard, CommandCategory::NonNormal),
    ("tut+", MODEL_FLASH_TUT, ConversationMode::Tutor, CommandCategory::Plus),
    ("tut-", MODEL_FLASH_LITE, ConversationMode::Tutor, CommandCategory::Minus),
    ("tut", MODEL_KIMI, ConversationMode::Tutor, CommandCategory::Normal),
    ("ti+", MODEL_IMAGE_MINI, ConversationMode::Standard, CommandCategory::ImagePlus),
    ("ti", MODEL_FLUX, ConversationMode::Standard, CommandCategory::Image),
    ("tn+", MODEL_FLASH_TUT, ConversationMode::Standard, CommandCategory::NonPlus),
    ("tn-", MODEL_FLASH_LITE, ConversationMode::Standard, CommandCategory::NonMinus),
    ("tn", MODEL_KIMI, ConversationMode::Standard, CommandCategory::NonNormal),
    ("t+", MODEL_FLASH_TUT, ConversationMode::Tutor, CommandCategory::Plus),
    ("t-", MODEL_FLASH_LITE, ConversationMode::Tutor, CommandCategory::Minus),
    ("t", MODEL_KIMI, ConversationMode::Tutor, CommandCategory::Normal),
];

/// Builds the default command table.
pub fn default_command_table() -> Result<CommandTable, ValidationError> {
    let definitions = CATALOG
        .iter()
        .map(|&(alias, model, mode, category)| CommandDefinition::new(alias, model, mode, category))
        .collect::<Result<Vec<_>, _>>()?;
    CommandTable::new(COMMAND_TRIGGER, definitions)
}

/// Default hourly limit for a category.
pub fn default_hourly_limit(category: CommandCategory) -> u32 {
    match category {
        CommandCategory::Normal | CommandCategory::NonNormal => 60,
        CommandCategory::Minus | CommandCategory::NonMinus => 40,
        CommandCategory::Plus | CommandCategory::NonPlus => 20,
        CommandCategory::Image => 10,
        CommandCategory::ImagePlus => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_builds() {
        let table = default_command_table().unwrap();
        assert_eq!(table.definitions().len(), CATALOG.len());
        assert_eq!(table.trigger(), '$');
    }

    #[test]
    fn slash_alias_is_a_tutor_command() {
        let table = default_command_table().unwrap();
        let def = table.by_alias(SLASH_TUTOR_ALIAS).unwrap();
        assert_eq!(def.mode(), ConversationMode::Tutor);
        assert_eq!(def.category(), CommandCategory::Normal);
    }

    #[test]
    fn nested_catalog_aliases_resolve_to_longest() {
        let table = default_command_table().unwrap();
        let cases = [
            ("$tutorplus hi", "tutorplus"),
            ("$tutorminus hi", "tutorminus"),
            ("$tutor hi", "tutor"),
            ("$tut+ hi", "tut+"),
            ("$tut hi", "tut"),
            ("$tn+ hi", "tn+"),
            ("$tn hi", "tn"),
            ("$ti+ cat", "ti+"),
            ("$t+ hi", "t+"),
            ("$t hi", "t"),
            ("$imageplus cat", "imageplus"),
            ("$standard hi", "standard"),
        ];
        for (input, expected) in cases {
            assert_eq!(table.resolve(input).unwrap().alias(), expected, "input {}", input);
        }
    }

    #[test]
    fn image_commands_are_image_categories() {
        let table = default_command_table().unwrap();
        for alias in ["image", "imageplus", "ti", "ti+"] {
            assert!(table.by_alias(alias).unwrap().is_image());
        }
    }

    #[test]
    fn plus_limits_are_tighter_than_normal() {
        assert!(default_hourly_limit(CommandCategory::Plus) < default_hourly_limit(CommandCategory::Normal));
        assert!(default_hourly_limit(CommandCategory::ImagePlus) < default_hourly_limit(CommandCategory::Image));
    }
}
