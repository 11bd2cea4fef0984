//! Documents generated from catalog data: role rules and the template overview.

use serde::Serialize;

use crate::catalog::{self, CUSTOM_RULES_FILE, Category, Role, RoleBody};
use crate::error::RulesError;
use crate::templates::{ResolvedContent, TEMPLATE_EXTENSION, TemplateStore, resolve};

/// Turn a role into rules content. The custom role delegates to the bundled custom template.
pub fn render_role(role: &Role, store: &dyn TemplateStore) -> Result<ResolvedContent, RulesError> {
    match role.body {
        RoleBody::DelegateToFile => resolve(store, CUSTOM_RULES_FILE),
        RoleBody::Inline(body) => Ok(ResolvedContent {
            content: role_document(role, body),
            file_name: format!("{}-role.{}", role.id, TEMPLATE_EXTENSION),
        }),
    }
}

fn role_document(role: &Role, body: &str) -> String {
    format!(
        r#"# {name} - AI Assistant Role

{body}

## Usage

This configuration sets the AI assistant up as a {name}, focused on: {description}.

### Highlights
- Domain knowledge and experience for this role
- Targeted solutions to the problems you bring
- A communication style that fits the role
- Practical advice and best practices

### Customising
Adjust this file to fit your project:
1. Add the technologies your project uses
2. Tune the communication style to your team's culture
3. Add project-specific constraints
4. Specify output formats and coding conventions

### Tips
- State clearly what kind of help you need
- Provide enough context with each request
- Lean on the role's strengths for hard problems
- Refine this file based on how the assistant responds

---

Tip: run `cursor-rules add` again and pick "Custom role" for the complete customisation template.
"#,
        name = role.name,
        description = role.description,
        body = body,
    )
}

/// Markdown overview of every template, with the preset roles listed under the custom template.
pub fn rules_overview() -> String {
    let mut content = String::from("# Cursor Rules Templates\n\n");
    content.push_str("> Rule and role templates for the Cursor AI editor\n\n");

    for (index, entry) in catalog::flattened().iter().enumerate() {
        let template = entry.template;
        content.push_str(&format!("## {}. {}\n\n", index + 1, template.name));
        content.push_str(&format!("**Category**: {}\n\n", entry.category.name));
        content.push_str(&format!("**Description**: {}\n\n", template.description));
        content.push_str(&format!("**File**: `{}`\n\n", template.file_name));

        if template.file_name == CUSTOM_RULES_FILE {
            content.push_str("**Preset roles**: pick one with `cursor-rules add` → user role rules:\n");
            for role in catalog::roles().iter().filter(|r| !r.is_custom()) {
                content.push_str(&format!("- {}: {}\n", role.name, role.description));
            }
            content.push_str("- Fully custom: the complete role customisation template\n\n");
        }

        content.push_str("---\n\n");
    }

    content.push_str("## Usage\n\n");
    content.push_str("1. Run `cursor-rules add` inside your project (or pass `--workspace <dir>`)\n");
    content.push_str("2. Choose user role rules or project rules\n");
    content.push_str("3. Pick the template that fits your project\n");
    content.push_str("4. The rules file is written to `.cursor/rules/`\n\n");
    content.push_str("Shortcuts: `add-general`, `add-web`, `add-mobile` and `add-backend` jump straight to a category.\n\n");
    content.push_str("## Custom rules\n\n");
    content.push_str("Edit the generated files to add project-specific rules and conventions.\n\n");
    content.push_str("---\n\n");
    content.push_str("Tip: these rules help the assistant understand your code style and project requirements.\n");

    content
}

#[derive(Serialize)]
struct CatalogDocument {
    categories: &'static [Category],
    roles: &'static [Role],
}

/// The whole catalog as pretty-printed JSON.
pub fn catalog_json() -> Result<String, RulesError> {
    let document = CatalogDocument {
        categories: catalog::categories(),
        roles: catalog::roles(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{flattened, roles};
    use crate::templates::EmbeddedTemplates;

    fn role(id: &str) -> &'static Role {
        roles().iter().find(|r| r.id == id).unwrap()
    }

    #[test]
    fn test_render_inline_role() {
        let reviewer = role("code-reviewer");
        let resolved = render_role(reviewer, &EmbeddedTemplates).unwrap();

        assert_eq!(resolved.file_name, "code-reviewer-role.mdc");
        assert!(resolved.content.starts_with("# Code reviewer - AI Assistant Role\n"));
        assert!(resolved.content.contains(reviewer.description));
        let RoleBody::Inline(body) = reviewer.body else {
            panic!("code reviewer should have an inline body");
        };
        assert!(resolved.content.contains(body));
        assert!(resolved.content.contains("## Usage"));
    }

    #[test]
    fn test_render_custom_role_matches_custom_template() {
        let custom = role("custom-role");
        let rendered = render_role(custom, &EmbeddedTemplates).unwrap();
        let direct = resolve(&EmbeddedTemplates, CUSTOM_RULES_FILE).unwrap();

        assert_eq!(rendered, direct);
        assert_eq!(rendered.file_name, "custom-rules-rules.mdc");
    }

    #[test]
    fn test_every_inline_role_renders() {
        for role in roles().iter().filter(|r| !r.is_custom()) {
            let resolved = render_role(role, &EmbeddedTemplates).unwrap();
            assert_eq!(resolved.file_name, format!("{}-role.mdc", role.id));
        }
    }

    #[test]
    fn test_overview_lists_each_template_once_in_order() {
        let overview = rules_overview();
        let mut last_position = 0;

        for (index, entry) in flattened().iter().enumerate() {
            let heading = format!("## {}. {}\n", index + 1, entry.template.name);
            assert_eq!(
                overview.matches(heading.as_str()).count(),
                1,
                "{} should appear once",
                heading.trim()
            );
            let position = overview.find(heading.as_str()).unwrap();
            assert!(position > last_position, "{} out of order", heading.trim());
            last_position = position;
        }
    }

    #[test]
    fn test_overview_lists_preset_roles_only() {
        let overview = rules_overview();
        for role in roles() {
            let line = format!("- {}: {}\n", role.name, role.description);
            if role.is_custom() {
                assert!(!overview.contains(&line));
            } else {
                assert!(overview.contains(&line), "missing role {}", role.name);
            }
        }
    }

    #[test]
    fn test_catalog_json_shape() {
        let json = catalog_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let categories = value["categories"].as_array().unwrap();
        assert_eq!(categories.len(), catalog::categories().len());
        assert_eq!(categories[1]["key"], "web");
        assert_eq!(categories[1]["templates"][0]["file_name"], "react.mdc");

        let roles_json = value["roles"].as_array().unwrap();
        assert_eq!(roles_json.len(), roles().len());
        assert_eq!(roles_json[0]["body"]["kind"], "inline");
        assert_eq!(
            roles_json.last().unwrap()["body"]["kind"],
            "delegate_to_file"
        );
    }
}
