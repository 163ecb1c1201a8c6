//! Connector message card posted to chat webhooks.

use serde::{Deserialize, Serialize};

pub const CARD_CONTEXT: &str = "https://schema.org/extensions";
pub const CARD_TYPE: &str = "MessageCard";
pub const CARD_THEME_COLOR: &str = "0075FF";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCard {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub card_type: String,
    pub theme_color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<CardSection>,
    #[serde(default, rename = "potentialAction", skip_serializing_if = "Vec::is_empty")]
    pub potential_actions: Vec<CardAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSection {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default)]
    pub start_group: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_image: Option<CardImage>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub activity_title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub activity_subtitle: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub activity_text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hero_image: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<CardFact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<CardImage>,
    #[serde(default, rename = "potentialAction", skip_serializing_if = "Vec::is_empty")]
    pub potential_actions: Vec<CardAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFact {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

/// Placeholder for card actions; none are produced by the logger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAction {}

impl MessageCard {
    pub fn new(summary: impl Into<String>) -> Self {
        MessageCard {
            context: CARD_CONTEXT.to_string(),
            card_type: CARD_TYPE.to_string(),
            theme_color: CARD_THEME_COLOR.to_string(),
            title: String::new(),
            text: String::new(),
            summary: summary.into(),
            sections: Vec::new(),
            potential_actions: Vec::new(),
        }
    }

    pub fn add_section_with_text(
        &mut self,
        title: impl Into<String>,
        start_group: bool,
        text: impl Into<String>,
    ) -> &mut CardSection {
        self.push_section(CardSection {
            title: title.into(),
            start_group,
            text: text.into(),
            ..CardSection::default()
        })
    }

    /// Facts keep the order they are given in.
    pub fn add_section_with_facts<I, K, V>(
        &mut self,
        title: impl Into<String>,
        start_group: bool,
        facts: I,
    ) -> &mut CardSection
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.push_section(CardSection {
            title: title.into(),
            start_group,
            facts: facts
                .into_iter()
                .map(|(name, value)| CardFact {
                    name: name.into(),
                    value: value.into(),
                })
                .collect(),
            ..CardSection::default()
        })
    }

    fn push_section(&mut self, section: CardSection) -> &mut CardSection {
        self.sections.push(section);
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_connector_card_layout() {
        let mut card = MessageCard::new("db down");
        card.add_section_with_facts("", true, [("Application", "billing"), ("Files", "main.rs:3")]);
        card.add_section_with_text("", false, "db down");

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["@context"], CARD_CONTEXT);
        assert_eq!(json["@type"], "MessageCard");
        assert_eq!(json["themeColor"], "0075FF");
        assert_eq!(json["summary"], "db down");
        assert!(json.get("title").is_none());
        assert!(json.get("potentialAction").is_none());

        let sections = json["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0]["startGroup"], true);
        assert_eq!(sections[0]["facts"][0]["name"], "Application");
        assert_eq!(sections[0]["facts"][1]["value"], "main.rs:3");
        assert_eq!(sections[1]["startGroup"], false);
        assert_eq!(sections[1]["text"], "db down");
        assert!(sections[1].get("facts").is_none());
    }

    #[test]
    fn section_builders_return_the_new_section() {
        let mut card = MessageCard::new("s");
        card.add_section_with_text("first", false, "a").title = "renamed".into();
        assert_eq!(card.sections[0].title, "renamed");
    }
}
