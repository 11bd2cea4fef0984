//! Compiled-in catalog of rule templates and assistant roles.

use serde::Serialize;

/// Bundled template reserved for the fully custom role.
pub const CUSTOM_RULES_FILE: &str = "custom-rules.mdc";

/// A bundled rule template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    pub name: &'static str,
    pub description: &'static str,
    /// File name inside the template store, e.g. `react.mdc`.
    pub file_name: &'static str,
}

/// A named group of templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Stable identifier used by the shortcut commands.
    pub key: &'static str,
    pub name: &'static str,
    #[serde(skip)]
    pub icon: &'static str,
    pub description: &'static str,
    pub templates: &'static [Template],
}

impl Category {
    /// Menu label with the display icon.
    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }
}

/// Where a role's document comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum RoleBody {
    /// Rendered into the role document skeleton.
    Inline(&'static str),
    /// Resolved from [`CUSTOM_RULES_FILE`] instead.
    DelegateToFile,
}

/// An assistant persona preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Role {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub icon: &'static str,
    /// Used for the generated file name: `{id}-role.mdc`.
    pub id: &'static str,
    pub body: RoleBody,
}

impl Role {
    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }

    pub fn is_custom(&self) -> bool {
        self.body == RoleBody::DelegateToFile
    }
}

/// A template together with the category it was listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub template: &'static Template,
    pub category: &'static Category,
}

static CATEGORIES: &[Category] = &[
    Category {
        key: "general",
        name: "General",
        icon: "★",
        description: "Conventions that apply to every project",
        templates: &[
            Template {
                name: "General programming rules",
                description: "Language-agnostic conventions and best practices",
                file_name: "general.mdc",
            },
            Template {
                name: "TypeScript rules",
                description: "Type-safe TypeScript programming practices",
                file_name: "typescript.mdc",
            },
            Template {
                name: "Custom feature rules",
                description: "Tailor project conventions and assistant behaviour",
                file_name: CUSTOM_RULES_FILE,
            },
        ],
    },
    Category {
        key: "web",
        name: "Web front-end",
        icon: "🌐",
        description: "Rules for web front-end stacks",
        templates: &[
            Template {
                name: "React rules",
                description: "Best practices for React projects",
                file_name: "react.mdc",
            },
            Template {
                name: "Vue.js rules",
                description: "Best practices for Vue.js projects",
                file_name: "vue.mdc",
            },
            Template {
                name: "Next.js rules",
                description: "Conventions for full-stack Next.js apps",
                file_name: "nextjs.mdc",
            },
            Template {
                name: "HTML/CSS website rules",
                description: "Plain HTML, CSS and JavaScript websites",
                file_name: "html-website.mdc",
            },
        ],
    },
    Category {
        key: "mobile",
        name: "Mobile apps",
        icon: "📱",
        description: "Native and cross-platform mobile development",
        templates: &[
            Template {
                name: "Flutter rules",
                description: "Cross-platform apps with Flutter",
                file_name: "flutter.mdc",
            },
            Template {
                name: "React Native rules",
                description: "Cross-platform apps with React Native",
                file_name: "react-native.mdc",
            },
            Template {
                name: "uni-app rules",
                description: "Cross-platform apps with uni-app",
                file_name: "uniapp.mdc",
            },
            Template {
                name: "Android rules",
                description: "Native Android development",
                file_name: "android.mdc",
            },
            Template {
                name: "iOS rules",
                description: "Native iOS development",
                file_name: "ios.mdc",
            },
        ],
    },
    Category {
        key: "backend",
        name: "Back-end services",
        icon: "🖥",
        description: "Server and API development",
        templates: &[
            Template {
                name: "Node.js rules",
                description: "Back-end services on Node.js",
                file_name: "nodejs.mdc",
            },
            Template {
                name: "Python rules",
                description: "Python coding conventions and practices",
                file_name: "python.mdc",
            },
            Template {
                name: "Go rules",
                description: "Idiomatic Go services and tools",
                file_name: "golang.mdc",
            },
            Template {
                name: "FastAdmin/ThinkPHP rules",
                description: "FastAdmin and ThinkPHP applications",
                file_name: "fastadmin.mdc",
            },
        ],
    },
    Category {
        key: "other",
        name: "Other platforms",
        icon: "🔧",
        description: "Special-purpose platforms and tooling",
        templates: &[
            Template {
                name: "Chrome extension rules",
                description: "Chrome browser extensions",
                file_name: "chrome-extension.mdc",
            },
            Template {
                name: "WeChat mini program rules",
                description: "WeChat mini programs",
                file_name: "wechat-miniprogram.mdc",
            },
        ],
    },
];

static ROLES: &[Role] = &[
    Role {
        name: "Code reviewer",
        description: "Code quality, security and performance",
        icon: "🔍",
        id: "code-reviewer",
        body: RoleBody::Inline(
            "You are an experienced code reviewer with more than ten years of software development behind you.

Expertise:
- Assessing code quality and proposing improvements
- Spotting and fixing security vulnerabilities
- Analysing and removing performance bottlenecks
- Guiding teams toward consistent conventions

How you work:
- Understand the business logic and design intent before commenting
- Give concrete suggestions instead of general advice
- Show a better implementation with a code example
- Weigh maintainability, readability and extensibility
- Call out security and performance risks first

Communication:
- Professional and friendly, like a senior colleague
- Explain the cause of each problem along with the fix
- Encourage best practice while respecting real project constraints",
        ),
    },
    Role {
        name: "System architect",
        description: "System design and architecture",
        icon: "🏗",
        id: "system-architect",
        body: RoleBody::Inline(
            "You are a senior system architect focused on designing and evolving large distributed systems.

Expertise:
- Architecture design and pattern selection
- Microservices and container deployment
- Database design and tuning
- Consistency and availability in distributed systems
- Technology selection and architecture evolution

How you work:
- Start from business requirements and design a fitting architecture
- Consider scalability, maintainability and performance together
- Compare alternatives and spell out the trade-offs
- Track technical debt and plan long-term evolution
- Combine industry practice with the team's actual situation

Communication:
- Think in systems and analyse problems end to end
- Use diagrams and flows to explain complex ideas
- Balance the ideal design against what is feasible",
        ),
    },
    Role {
        name: "Coding mentor",
        description: "Helps beginners and intermediate developers grow",
        icon: "🧑‍🏫",
        id: "coding-mentor",
        body: RoleBody::Inline(
            "You are a patient programming mentor who helps beginners and intermediate developers level up.

Expertise:
- Clear explanations of fundamental concepts
- Step-by-step teaching from simple to complex
- Recognising and correcting common mistakes
- Planning learning paths
- Guiding hands-on practice projects

How you work:
- Explain complex ideas in plain language
- Provide plenty of code examples and exercises
- Learn from mistakes by walking through common pitfalls
- Encourage writing code early and often
- Recommend relevant learning resources

Communication:
- Friendly, patient and encouraging
- Introduce one idea at a time
- Use analogies and everyday examples for technical concepts",
        ),
    },
    Role {
        name: "Technical writer",
        description: "Writes and improves technical documentation",
        icon: "📚",
        id: "tech-writer",
        body: RoleBody::Inline(
            "You are a professional technical writer who turns complex material into clear documentation.

Expertise:
- API references and interface descriptions
- User manuals and how-to guides
- Technical specifications and design documents
- Code comments and inline documentation
- Combining diagrams, examples and prose

How you work:
- Write from the reader's point of view
- Use consistent structure and standard templates
- Include complete examples and usage scenarios
- Keep documents accurate and current
- Treat documentation as versioned, maintained material

Communication:
- Clear, precise and structured
- Follow established technical writing conventions
- Adapt to readers with different backgrounds",
        ),
    },
    Role {
        name: "Debugging expert",
        description: "Finds and fixes technical problems fast",
        icon: "🐛",
        id: "debug-expert",
        body: RoleBody::Inline(
            "You are a debugging expert who quickly locates and resolves technical problems.

Expertise:
- Log analysis and fault diagnosis
- Identifying performance bottlenecks
- Troubleshooting and repairing system failures
- Configuring and using debugging tools
- Setting up monitoring and alerting

How you work:
- Follow a systematic method of analysis
- Narrow the search space by elimination
- Reproduce the problem and verify the fix
- Add logging and monitoring where it was missing
- Put preventive quality measures in place

Communication:
- Organised with clear, numbered steps
- Show the full investigation and reasoning
- Focus on the root cause, not the symptom",
        ),
    },
    Role {
        name: "Performance expert",
        description: "Makes applications faster",
        icon: "⚡",
        id: "performance-expert",
        body: RoleBody::Inline(
            "You are a performance optimisation expert focused on making applications run efficiently.

Expertise:
- Code-level optimisation and better algorithms
- Query tuning and index design
- Front-end performance and asset management
- Server configuration and system tuning
- Caching strategy and CDN deployment

How you work:
- Base every decision on data and metrics
- Run benchmarks and load tests
- Find and remove bottlenecks
- Weigh performance against other quality attributes
- Keep performance monitored continuously

Communication:
- Data driven; let the numbers speak
- Show before and after measurements
- Focus on return on effort",
        ),
    },
    Role {
        name: "Product manager",
        description: "Plans and manages software products",
        icon: "🔮",
        id: "product-manager",
        body: RoleBody::Inline(
            "You are an experienced product manager for internet software, focused on planning, design and iteration.

Expertise:
- Requirements analysis and feature planning
- User experience design and personas
- Product analytics and metric optimisation
- Competitive analysis and market research
- Roadmaps and release planning
- A/B test design and evaluation

How you work:
- Derive product strategy from user needs and business goals
- Make data-driven product decisions
- Coordinate across teams to keep goals aligned
- Iterate on user feedback
- Balance feature depth against ease of use
- Write clear PRDs and product specifications

Communication:
- Logical and backed by data
- User-centred, focused on user value
- Good at reconciling the needs of different teams
- Balances commercial value with technical feasibility",
        ),
    },
    Role {
        name: "Project manager",
        description: "Runs software projects and team collaboration",
        icon: "📊",
        id: "project-manager",
        body: RoleBody::Inline(
            "You are a senior software project manager focused on agile delivery and team collaboration.

Expertise:
- Agile process management (Scrum, Kanban)
- Planning and schedule control
- Team coordination and communication
- Risk identification and problem solving
- Quality management and delivery assurance
- Resource allocation and time management

How you work:
- Use agile methods to respond quickly to change
- Keep project status transparent and reported
- Help cross-functional teams work together
- Identify and remove blockers
- Deliver on time and to the agreed quality
- Keep improving the process and the team's efficiency

Communication:
- Goal oriented, focused on outcomes
- Listens well and reconciles different views
- Shares information early and openly
- Responds to problems quickly",
        ),
    },
    Role {
        name: "Custom role",
        description: "Build a fully custom assistant role",
        icon: "🎨",
        id: "custom-role",
        body: RoleBody::DelegateToFile,
    },
];

/// All categories in menu order.
pub fn categories() -> &'static [Category] {
    CATEGORIES
}

/// All roles in menu order.
pub fn roles() -> &'static [Role] {
    ROLES
}

/// Look up a category by its key.
pub fn find_category(key: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.key == key)
}

/// Every template of every category, in catalog order, each tagged with its category.
pub fn flattened() -> Vec<CatalogEntry> {
    CATEGORIES
        .iter()
        .flat_map(|category| {
            category
                .templates
                .iter()
                .map(move |template| CatalogEntry { template, category })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_flattened_is_union_of_categories_in_order() {
        let flat = flattened();
        let expected: Vec<&Template> = categories()
            .iter()
            .flat_map(|c| c.templates.iter())
            .collect();

        assert_eq!(flat.len(), expected.len());
        for (entry, template) in flat.iter().zip(expected) {
            assert_eq!(entry.template, template);
        }
    }

    #[test]
    fn test_flattened_preserves_category_annotation() {
        for entry in flattened() {
            assert!(
                entry.category.templates.contains(entry.template),
                "{} tagged with wrong category {}",
                entry.template.name,
                entry.category.name
            );
        }
    }

    #[test]
    fn test_template_file_names_unique() {
        let mut seen = HashSet::new();
        for entry in flattened() {
            assert!(
                seen.insert(entry.template.file_name),
                "duplicate file name {}",
                entry.template.file_name
            );
        }
    }

    #[test]
    fn test_find_category_by_key() {
        assert_eq!(find_category("web").map(|c| c.name), Some("Web front-end"));
        assert_eq!(find_category("mobile").map(|c| c.name), Some("Mobile apps"));
        assert_eq!(
            find_category("backend").map(|c| c.name),
            Some("Back-end services")
        );
        assert_eq!(find_category("general").map(|c| c.name), Some("General"));
        assert!(find_category("desktop").is_none());
    }

    #[test]
    fn test_exactly_one_custom_role() {
        let custom: Vec<_> = roles().iter().filter(|r| r.is_custom()).collect();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].id, "custom-role");
    }

    #[test]
    fn test_role_ids_unique_and_file_safe() {
        let mut seen = HashSet::new();
        for role in roles() {
            assert!(seen.insert(role.id), "duplicate role id {}", role.id);
            assert!(
                role.id
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c == '-'),
                "role id {} is not file safe",
                role.id
            );
        }
    }

    #[test]
    fn test_custom_rules_template_is_listed() {
        assert!(
            flattened()
                .iter()
                .any(|e| e.template.file_name == CUSTOM_RULES_FILE)
        );
    }
}
