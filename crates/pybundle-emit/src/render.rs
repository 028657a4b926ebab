//! Template rendering
//!
//! The emitter only talks to [`Render`]; [`HandlebarsRenderer`] is the
//! default implementation, backed by templates compiled into the binary.

use crate::errors::EmitError;
use handlebars::Handlebars;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Templates the emitter renders, one per unit kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateId {
    CargoManifest,
    Entry,
    Bootstrap,
    Command,
    CommandGroup,
}

impl TemplateId {
    pub const ALL: [TemplateId; 5] = [
        TemplateId::CargoManifest,
        TemplateId::Entry,
        TemplateId::Bootstrap,
        TemplateId::Command,
        TemplateId::CommandGroup,
    ];

    /// Registry name, also the override file stem
    pub fn name(self) -> &'static str {
        match self {
            TemplateId::CargoManifest => "cargo.toml",
            TemplateId::Entry => "main.rs",
            TemplateId::Bootstrap => "bootstrap.rs",
            TemplateId::Command => "command.rs",
            TemplateId::CommandGroup => "command_group.rs",
        }
    }

    /// File name looked up in an override directory
    pub fn file_name(self) -> String {
        format!("{}.hbs", self.name())
    }

    fn embedded(self) -> &'static str {
        match self {
            TemplateId::CargoManifest => include_str!("templates/cargo.toml.hbs"),
            TemplateId::Entry => include_str!("templates/main.rs.hbs"),
            TemplateId::Bootstrap => include_str!("templates/bootstrap.rs.hbs"),
            TemplateId::Command => include_str!("templates/command.rs.hbs"),
            TemplateId::CommandGroup => include_str!("templates/command_group.rs.hbs"),
        }
    }
}

/// Turn template data into text
pub trait Render {
    fn render(&self, template: TemplateId, data: &Value) -> Result<String, EmitError>;
}

pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Renderer using only the embedded templates
    pub fn new() -> Result<Self, EmitError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);

        let mut renderer = Self { registry };
        for template in TemplateId::ALL {
            renderer.register(template, template.embedded())?;
        }
        Ok(renderer)
    }

    /// Renderer where every `<name>.hbs` found in `dir` replaces the embedded template
    pub fn with_overrides(dir: &Path) -> Result<Self, EmitError> {
        let mut renderer = Self::new()?;
        for template in TemplateId::ALL {
            let path = dir.join(template.file_name());
            if !path.is_file() {
                continue;
            }
            let source = fs::read_to_string(&path).map_err(|source| EmitError::Override {
                path: path.clone(),
                source,
            })?;
            info!("Using template override {}", path.display());
            renderer.register(template, &source)?;
        }
        Ok(renderer)
    }

    fn register(&mut self, template: TemplateId, source: &str) -> Result<(), EmitError> {
        self.registry
            .register_template_string(template.name(), source)
            .map_err(|e| EmitError::Template {
                template: template.name().to_string(),
                message: e.to_string(),
            })
    }
}

impl Render for HandlebarsRenderer {
    fn render(&self, template: TemplateId, data: &Value) -> Result<String, EmitError> {
        debug!("Rendering template '{}'", template.name());
        self.registry
            .render(template.name(), data)
            .map_err(|e| EmitError::Render {
                template: template.name().to_string(),
                message: e.to_string(),
            })
    }
}
