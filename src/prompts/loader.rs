//! Prompt Loader
//!
//! Loads the companion prompt template from files or falls back to the
//! embedded default, then renders it with Handlebars.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::config::CompanionConfig;
use crate::domain::{Mood, TaskCategory};

/// Template name of the companion instruction prompt
pub const COMPANION_TEMPLATE: &str = "companion";

/// One `{id, label}` pair exposed to templates
#[derive(Debug, Clone, Serialize)]
pub struct NamedEntry {
    pub id: &'static str,
    pub label: &'static str,
}

/// Context for rendering the companion prompt
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Companion's display name
    pub name: String,
    pub categories: Vec<NamedEntry>,
    pub category_count: usize,
    pub moods: Vec<NamedEntry>,
}

impl PromptContext {
    pub fn new(name: impl Into<String>) -> Self {
        let categories: Vec<NamedEntry> = TaskCategory::ALL
            .iter()
            .map(|c| NamedEntry {
                id: c.id(),
                label: c.label(),
            })
            .collect();
        let moods = Mood::ALL
            .iter()
            .map(|m| NamedEntry {
                id: m.id(),
                label: m.label(),
            })
            .collect();

        Self {
            name: name.into(),
            category_count: categories.len(),
            categories,
            moods,
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Configured override directory (`companion.prompt-dir`)
    config_dir: Option<PathBuf>,
    /// Project-local override directory (`.heartgarden/prompts/`)
    local_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader for the given override directory and working directory
    pub fn new(prompt_dir: Option<&Path>, workdir: impl AsRef<Path>) -> Self {
        let local_dir = workdir.as_ref().join(".heartgarden/prompts");

        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);

        Self {
            hbs,
            config_dir: prompt_dir.filter(|d| d.exists()).map(Path::to_path_buf),
            local_dir: if local_dir.exists() { Some(local_dir) } else { None },
        }
    }

    /// Create a loader from configuration, rooted at the current directory
    pub fn from_config(config: &CompanionConfig) -> Self {
        debug!(prompt_dir = ?config.prompt_dir, "from_config: called");
        let workdir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(config.prompt_dir.as_deref(), workdir)
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        Self {
            hbs,
            config_dir: None,
            local_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Configured override: `{prompt-dir}/{name}.pmt`
    /// 2. Local override: `.heartgarden/prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        for dir in [&self.config_dir, &self.local_dir].into_iter().flatten() {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from override: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}' for companion {}", template_name, context.name);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the companion's system prompt
    pub fn companion_prompt(&self, name: &str) -> Result<String> {
        self.render(COMPANION_TEMPLATE, &PromptContext::new(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prompt_context_lists_all_choices() {
        let ctx = PromptContext::new("Aegis");
        assert_eq!(ctx.category_count, 5);
        assert_eq!(ctx.categories[2].id, "healthy-eating");
        assert_eq!(ctx.moods.len(), 5);
        assert_eq!(ctx.moods[0].id, "great");
    }

    #[test]
    fn test_embedded_companion_prompt_renders() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.companion_prompt("Aegis").unwrap();

        assert!(prompt.starts_with("You are Aegis,"));
        assert!(prompt.contains("great, good, okay, meh, bad"));
        assert!(prompt.contains("The 5 available task categories"));
        assert!(prompt.contains("- Exercise/Hobby (exercise)"));
        assert!(prompt.contains("- Healthy Eating (healthy-eating)"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_local_override_wins_over_embedded() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".heartgarden/prompts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("companion.pmt"), "Hi, I am {{name}}.").unwrap();

        let loader = PromptLoader::new(None, temp.path());
        assert_eq!(loader.companion_prompt("Bud").unwrap(), "Hi, I am Bud.");
    }

    #[test]
    fn test_config_dir_wins_over_local() {
        let temp = TempDir::new().unwrap();
        let local = temp.path().join(".heartgarden/prompts");
        std::fs::create_dir_all(&local).unwrap();
        std::fs::write(local.join("companion.pmt"), "local").unwrap();

        let configured = temp.path().join("custom");
        std::fs::create_dir_all(&configured).unwrap();
        std::fs::write(configured.join("companion.pmt"), "configured {{name}}").unwrap();

        let loader = PromptLoader::new(Some(configured.as_path()), temp.path());
        assert_eq!(loader.companion_prompt("Aegis").unwrap(), "configured Aegis");
    }

    #[test]
    fn test_missing_override_dirs_fall_back_to_embedded() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");

        let loader = PromptLoader::new(Some(missing.as_path()), temp.path());
        let prompt = loader.companion_prompt("Aegis").unwrap();
        assert!(prompt.contains("HeartGarden"));
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }

    #[test]
    fn test_malformed_template_is_an_error() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".heartgarden/prompts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("companion.pmt"), "{{#each moods}}unterminated").unwrap();

        let loader = PromptLoader::new(None, temp.path());
        assert!(loader.companion_prompt("Aegis").is_err());
    }
}
