//! Static option tables backing the guided Q&A wizard and the model picker.

pub const FRAMEWORK_OPTIONS: &[&str] = &[
    "Next.js 14 (App Router)",
    "Next.js 14 (Pages Router)",
    "React + Vite",
    "Remix",
    "Astro",
    "SvelteKit",
    "Nuxt 3",
    "Express.js",
    "Fastify",
    "Django",
    "Flask",
    "Rails",
    "Laravel",
    "Other",
];

pub const LANGUAGE_OPTIONS: &[&str] = &[
    "TypeScript",
    "JavaScript",
    "Python",
    "Ruby",
    "Go",
    "Rust",
    "PHP",
    "Other",
];

pub const STYLING_OPTIONS: &[&str] = &[
    "Tailwind CSS",
    "CSS Modules",
    "Styled Components",
    "Emotion",
    "Sass/SCSS",
    "Vanilla CSS",
    "None (API only)",
    "Other",
];

pub const DATABASE_OPTIONS: &[&str] = &[
    "PostgreSQL",
    "MySQL",
    "SQLite",
    "MongoDB",
    "Supabase",
    "Firebase",
    "PlanetScale",
    "Neon",
    "None",
    "Other",
];

pub const ORM_OPTIONS: &[&str] = &[
    "Prisma",
    "Drizzle",
    "TypeORM",
    "Sequelize",
    "Mongoose",
    "Knex",
    "SQLAlchemy",
    "None",
    "Other",
];

pub const AUTH_OPTIONS: &[&str] = &[
    "NextAuth / Auth.js",
    "Clerk",
    "Supabase Auth",
    "Firebase Auth",
    "Passport.js",
    "Custom JWT",
    "None",
    "Other",
];

pub const HOSTING_OPTIONS: &[&str] = &[
    "Vercel",
    "Netlify",
    "AWS",
    "Google Cloud",
    "Railway",
    "Fly.io",
    "DigitalOcean",
    "Self-hosted",
    "Undecided",
    "Other",
];

/// Input widget kind for a wizard field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Textarea,
    Select,
}

/// One field within a wizard step, keyed by the `ProjectSpecs` field it fills.
#[derive(Debug, Clone)]
pub struct QaField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: Option<&'static str>,
    pub options: Option<&'static [&'static str]>,
}

/// One step of the guided Q&A flow.
#[derive(Debug, Clone)]
pub struct QaStep {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [QaField],
}

pub const QA_STEPS: &[QaStep] = &[
    QaStep {
        id: "basics",
        title: "Project Basics",
        description: "What are you building?",
        fields: &[
            QaField {
                key: "projectName",
                label: "Project Name",
                kind: FieldKind::Text,
                placeholder: Some("my-awesome-app"),
                options: None,
            },
            QaField {
                key: "description",
                label: "Description",
                kind: FieldKind::Textarea,
                placeholder: Some(
                    "A brief description of what this project does and who it's for...",
                ),
                options: None,
            },
        ],
    },
    QaStep {
        id: "stack",
        title: "Tech Stack",
        description: "What technologies will you use?",
        fields: &[
            QaField {
                key: "framework",
                label: "Framework",
                kind: FieldKind::Select,
                placeholder: None,
                options: Some(FRAMEWORK_OPTIONS),
            },
            QaField {
                key: "language",
                label: "Language",
                kind: FieldKind::Select,
                placeholder: None,
                options: Some(LANGUAGE_OPTIONS),
            },
            QaField {
                key: "styling",
                label: "Styling",
                kind: FieldKind::Select,
                placeholder: None,
                options: Some(STYLING_OPTIONS),
            },
        ],
    },
    QaStep {
        id: "data",
        title: "Data Layer",
        description: "How will you store and manage data?",
        fields: &[
            QaField {
                key: "database",
                label: "Database",
                kind: FieldKind::Select,
                placeholder: None,
                options: Some(DATABASE_OPTIONS),
            },
            QaField {
                key: "orm",
                label: "ORM / Query Builder",
                kind: FieldKind::Select,
                placeholder: None,
                options: Some(ORM_OPTIONS),
            },
            QaField {
                key: "auth",
                label: "Authentication",
                kind: FieldKind::Select,
                placeholder: None,
                options: Some(AUTH_OPTIONS),
            },
        ],
    },
    QaStep {
        id: "features",
        title: "Key Features",
        description: "What are the core features? (comma-separated)",
        fields: &[QaField {
            key: "features",
            label: "Features",
            kind: FieldKind::Textarea,
            placeholder: Some("User login, Dashboard, API endpoints, File upload..."),
            options: None,
        }],
    },
    QaStep {
        id: "architecture",
        title: "Architecture",
        description: "Any architectural preferences or patterns?",
        fields: &[
            QaField {
                key: "architecture",
                label: "Architecture Notes",
                kind: FieldKind::Textarea,
                placeholder: Some("Monorepo, microservices, serverless, event-driven, etc."),
                options: None,
            },
            QaField {
                key: "hosting",
                label: "Hosting / Deployment",
                kind: FieldKind::Select,
                placeholder: None,
                options: Some(HOSTING_OPTIONS),
            },
        ],
    },
    QaStep {
        id: "constraints",
        title: "Constraints",
        description: "Any limitations or non-negotiables?",
        fields: &[QaField {
            key: "constraints",
            label: "Constraints",
            kind: FieldKind::Textarea,
            placeholder: Some(
                "Budget limits, timeline, accessibility requirements, browser support...",
            ),
            options: None,
        }],
    },
    QaStep {
        id: "ai-goals",
        title: "AI Usage & Goals",
        description: "How will AI agents help build this?",
        fields: &[
            QaField {
                key: "aiUsage",
                label: "AI Coding Approach",
                kind: FieldKind::Textarea,
                placeholder: Some("Using Claude Code CLI, Cursor, Copilot, etc."),
                options: None,
            },
            QaField {
                key: "goals",
                label: "Project Goals",
                kind: FieldKind::Textarea,
                placeholder: Some("MVP in 2 weeks, production-ready, learning project..."),
                options: None,
            },
        ],
    },
];

/// A selectable model with its display label.
#[derive(Debug, Clone)]
pub struct ModelOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const MODEL_OPTIONS: &[ModelOption] = &[
    ModelOption {
        value: "claude-sonnet-4-5-20250929",
        label: "Claude Sonnet 4.5 (Recommended)",
    },
    ModelOption {
        value: "claude-opus-4-6",
        label: "Claude Opus 4.6 (Most Capable)",
    },
    ModelOption {
        value: "claude-opus-4-5-20251101",
        label: "Claude Opus 4.5",
    },
    ModelOption {
        value: "claude-haiku-4-5-20251001",
        label: "Claude Haiku 4.5 (Fastest)",
    },
];

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
