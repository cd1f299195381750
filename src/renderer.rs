//! Template rendering for nodebaker.
//! Substitutes `{{name}}` placeholders with resolved parameter values. The
//! substitution language is deliberately plain token replacement: no
//! expressions, filters or control flow.
use crate::catalog::TemplateDescriptor;
use crate::error::{Error, Result};
use crate::placeholder::{escape_for, scan, Segment, Syntax};
use crate::resolver::ParameterSet;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a descriptor's source with its resolved parameters.
    ///
    /// # Arguments
    /// * `descriptor` - Template to render
    /// * `parameters` - Parameters resolved for that template
    ///
    /// # Returns
    /// * `Result<String>` - Rendered file content
    fn render(&self, descriptor: &TemplateDescriptor, parameters: &ParameterSet) -> Result<String>;

    /// Renders an ad-hoc template string, e.g. an environment variable value.
    /// Values are inserted verbatim. `origin` names the string in error messages.
    fn render_str(&self, source: &str, parameters: &ParameterSet, origin: &str) -> Result<String>;
}

/// Single-pass placeholder substitution.
///
/// Values landing inside a string literal of the template's syntax are
/// escaped for that literal; everywhere else they are inserted verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    pub fn new() -> Self {
        PlaceholderRenderer
    }

    fn substitute(
        &self,
        source: &str,
        template: &str,
        syntax: Syntax,
        parameters: &ParameterSet,
        descriptor: &str,
    ) -> Result<String> {
        let mut out = String::with_capacity(source.len());
        for segment in scan(source, template, syntax)? {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder { name, quote, .. } => {
                    let value = parameters.get(name).ok_or_else(|| {
                        Error::UnresolvedPlaceholder {
                            placeholder: name.to_string(),
                            descriptor: descriptor.to_string(),
                        }
                    })?;
                    match quote {
                        Some(quote) => out.push_str(&escape_for(quote, value)),
                        None => out.push_str(value),
                    }
                }
            }
        }
        Ok(out)
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    /// # Errors
    /// * `Error::UnresolvedPlaceholder` if the source references a parameter
    ///   missing from `parameters`
    fn render(&self, descriptor: &TemplateDescriptor, parameters: &ParameterSet) -> Result<String> {
        self.substitute(
            descriptor.source(),
            descriptor.source_path(),
            descriptor.syntax(),
            parameters,
            &descriptor.id(),
        )
    }

    fn render_str(&self, source: &str, parameters: &ParameterSet, origin: &str) -> Result<String> {
        self.substitute(source, origin, Syntax::Plain, parameters, origin)
    }
}
