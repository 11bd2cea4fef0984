//! The interactive capabilities commands need from the user interface.

use crate::error::RulesError;

/// One choice in a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub description: String,
    pub detail: Option<String>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Case-insensitive match against label, description and detail.
    pub fn matches(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let needle = filter.to_lowercase();
        self.label.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self
                .detail
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

/// A titled list of choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub items: Vec<MenuItem>,
}

/// A yes/no question with custom button labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub title: String,
    pub message: String,
    pub detail: Option<String>,
    pub accept: String,
    pub reject: String,
}

/// User interaction used by the selection flow and the writer.
pub trait Prompter {
    /// Index of the chosen item, or `None` when the menu was dismissed.
    fn pick(&mut self, menu: &Menu) -> Result<Option<usize>, RulesError>;

    /// `true` only when the accept button was chosen.
    fn confirm(&mut self, request: &Confirmation) -> Result<bool, RulesError>;
}
