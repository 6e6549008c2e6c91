//! Template registry and scaffold writer
//!
//! This module provides:
//! - Template registry types (TemplatePath, TemplateSpec, Layer, TemplateSet)
//! - Built-in per-stack catalogs (React, Flask, FastAPI)
//! - Request resolution into an ordered list of files and follow-up commands
//! - Writing resolved files under a project root

pub mod registry;
pub mod stacks;
pub mod writer;

pub use registry::{
    resolve_commands, resolve_templates, Layer, StackBlueprint, TemplateBody, TemplateFile,
    TemplatePath, TemplateSet, TemplateSpec,
};
pub use writer::{materialize, WriteReport};
