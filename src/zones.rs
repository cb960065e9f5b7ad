use serde::{Deserialize, Serialize};

/// Zone descriptor as supplied by the content provider at startup. The
/// engine only reads the slug and the locked flag; question content never
/// enters this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDescriptor {
    pub slug: String,
    pub name: String,
    pub locked: bool,
}

impl ZoneDescriptor {
    pub fn new(slug: &str, name: &str, locked: bool) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            locked,
        }
    }
}

/// Built-in catalog used by the CLI when no content provider is wired up.
pub fn default_zones() -> Vec<ZoneDescriptor> {
    vec![
        ZoneDescriptor::new("foundations", "Foundations", false),
        ZoneDescriptor::new("core-concepts", "Core Concepts", false),
        ZoneDescriptor::new("applications", "Applications", true),
        ZoneDescriptor::new("mastery", "Mastery", true),
    ]
}
