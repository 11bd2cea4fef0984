//! Menu navigation from rule type down to a single template or role.

use tracing::{debug, info, warn};

use crate::catalog::{self, Category, Role, Template};
use crate::error::RulesError;
use crate::prompt::{Menu, MenuItem, Prompter};

const BACK_LABEL: &str = "← Back to categories";

/// A menu the flow is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    ChooseRuleType,
    ChooseCategory,
    ChooseTemplateInCategory {
        category: &'static Category,
        /// False when entered from a category shortcut.
        show_back: bool,
    },
    ChooseTemplateFlat,
    ChooseRole,
}

/// What the user ended up choosing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Template(&'static Template),
    Role(&'static Role),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Resolved(Selection),
    Cancelled,
}

/// Effect of choosing a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Next(FlowState),
    Done(Selection),
}

impl FlowState {
    /// Entry state for a category shortcut.
    pub fn category_shortcut(category: &'static Category) -> Self {
        Self::ChooseTemplateInCategory {
            category,
            show_back: false,
        }
    }

    /// The menu for this state and, index for index, what each item leads to.
    pub fn menu(&self) -> (Menu, Vec<Transition>) {
        match *self {
            Self::ChooseRuleType => (
                Menu {
                    title: "Select rule type".to_string(),
                    items: vec![
                        MenuItem::new(
                            "👤 User role rules",
                            "Pick the AI assistant's role and working style",
                        )
                        .with_detail("Defines expertise, working approach and communication style"),
                        MenuItem::new(
                            "📄 Project rules",
                            "Pick tech-stack rules for this project",
                        )
                        .with_detail("Coding standards and architecture guidance by project type"),
                    ],
                },
                vec![
                    Transition::Next(Self::ChooseRole),
                    Transition::Next(Self::ChooseCategory),
                ],
            ),
            Self::ChooseCategory => {
                let categories = catalog::categories();
                let total: usize = categories.iter().map(|c| c.templates.len()).sum();

                let mut items: Vec<MenuItem> = categories
                    .iter()
                    .map(|c| {
                        MenuItem::new(c.label(), c.description)
                            .with_detail(format!("{} templates", c.templates.len()))
                    })
                    .collect();
                let mut transitions: Vec<Transition> = categories
                    .iter()
                    .map(|category| {
                        Transition::Next(Self::ChooseTemplateInCategory {
                            category,
                            show_back: true,
                        })
                    })
                    .collect();

                items.push(
                    MenuItem::new("☰ View all templates", "Show every available rule template")
                        .with_detail(format!("{} templates", total)),
                );
                transitions.push(Transition::Next(Self::ChooseTemplateFlat));

                (
                    Menu {
                        title: "Select a category".to_string(),
                        items,
                    },
                    transitions,
                )
            }
            Self::ChooseTemplateInCategory {
                category,
                show_back,
            } => {
                let mut items = Vec::new();
                let mut transitions = Vec::new();

                if show_back {
                    items.push(
                        MenuItem::new(BACK_LABEL, "Return to the category menu")
                            .with_detail("Pick a template from another category"),
                    );
                    transitions.push(Transition::Next(Self::ChooseCategory));
                }

                for template in category.templates {
                    items.push(MenuItem::new(template.name, template.description));
                    transitions.push(Transition::Done(Selection::Template(template)));
                }

                (
                    Menu {
                        title: format!("Select a template in {}", category.name),
                        items,
                    },
                    transitions,
                )
            }
            Self::ChooseTemplateFlat => {
                let entries = catalog::flattened();
                let mut items = vec![
                    MenuItem::new(BACK_LABEL, "Return to the category menu")
                        .with_detail("Browse templates by category"),
                ];
                let mut transitions = vec![Transition::Next(Self::ChooseCategory)];

                for entry in &entries {
                    items.push(
                        MenuItem::new(entry.template.name, entry.template.description)
                            .with_detail(format!("Category: {}", entry.category.name)),
                    );
                    transitions.push(Transition::Done(Selection::Template(entry.template)));
                }

                (
                    Menu {
                        title: format!("Select a rule template ({} total)", entries.len()),
                        items,
                    },
                    transitions,
                )
            }
            Self::ChooseRole => {
                let roles = catalog::roles();
                (
                    Menu {
                        title: "Select an AI assistant role".to_string(),
                        items: roles
                            .iter()
                            .map(|r| {
                                MenuItem::new(r.label(), r.description)
                                    .with_detail("Use this role template")
                            })
                            .collect(),
                    },
                    roles
                        .iter()
                        .map(|role| Transition::Done(Selection::Role(role)))
                        .collect(),
                )
            }
        }
    }
}

/// Drive the menus from `start` until something is chosen or a menu is dismissed.
pub fn run(start: FlowState, prompter: &mut dyn Prompter) -> Result<FlowOutcome, RulesError> {
    let mut state = start;
    loop {
        let (menu, transitions) = state.menu();
        debug!(menu = %menu.title, items = menu.items.len(), "menu_shown");

        let Some(index) = prompter.pick(&menu)? else {
            info!(menu = %menu.title, "selection_cancelled");
            return Ok(FlowOutcome::Cancelled);
        };

        match transitions.get(index) {
            Some(Transition::Next(next)) => state = *next,
            Some(Transition::Done(selection)) => {
                info!(selection = ?selection, "selection_resolved");
                return Ok(FlowOutcome::Resolved(*selection));
            }
            None => {
                warn!(index, menu = %menu.title, "selection_out_of_range");
                return Ok(FlowOutcome::Cancelled);
            }
        }
    }
}
