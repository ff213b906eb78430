use thiserror::Error;

/// Literal placeholder replaced by the derived resource name
pub const RESOURCE_PLACEHOLDER: &str = "RESOURCE";
/// Literal placeholder replaced by the attribute name
pub const ATTRIBUTE_PLACEHOLDER: &str = "ATTRIBUTE";

/// The kinds of addressable UI elements a selector template can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    /// Per-attribute container element (toggles the error class)
    Container,
    /// Per-attribute error-display element (receives the message text)
    Error,
    /// Form-level element (toggles the form class)
    Form,
    /// Submit element (toggles the disabled attribute)
    Submit,
}

impl SelectorKind {
    /// Whether templates of this kind must also carry the `ATTRIBUTE`
    /// placeholder. All kinds require `RESOURCE`.
    pub fn requires_attribute(&self) -> bool {
        matches!(self, SelectorKind::Container | SelectorKind::Error)
    }

    fn name(&self) -> &'static str {
        match self {
            SelectorKind::Container => "container",
            SelectorKind::Error => "error",
            SelectorKind::Form => "form",
            SelectorKind::Submit => "submit",
        }
    }
}

/// Errors that can occur while rendering a selector template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Required placeholder missing from the template string
    #[error("{kind} selector template {template:?} is missing the literal {placeholder:?} placeholder. Fix the template wherever this context was configured")]
    MissingPlaceholder {
        kind: &'static str,
        template: String,
        placeholder: &'static str,
    },
}

// SelectorTemplate

/// A configurable naming template for one kind of addressable UI element.
///
/// Rendering is a pure, literal substring substitution of
/// [`RESOURCE_PLACEHOLDER`] and [`ATTRIBUTE_PLACEHOLDER`]; every other
/// character passes through untouched. The first character of the template
/// is assumed to be a CSS selector prefix (`#`), kept when rendering a
/// selector and stripped when rendering a bare element identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorTemplate {
    kind: SelectorKind,
    template: String,
}

impl SelectorTemplate {
    pub fn new(kind: SelectorKind, template: &str) -> Self {
        Self {
            kind,
            template: template.to_string(),
        }
    }

    /// Template for per-attribute container elements
    pub fn container(template: &str) -> Self {
        Self::new(SelectorKind::Container, template)
    }

    /// Template for per-attribute error-display elements
    pub fn error(template: &str) -> Self {
        Self::new(SelectorKind::Error, template)
    }

    /// Template for the form-level element
    pub fn form(template: &str) -> Self {
        Self::new(SelectorKind::Form, template)
    }

    /// Template for the submit element
    pub fn submit(template: &str) -> Self {
        Self::new(SelectorKind::Submit, template)
    }

    pub fn kind(&self) -> SelectorKind {
        self.kind
    }

    /// Renders the full CSS selector (leading prefix kept)
    pub fn render_selector(
        &self,
        resource: &str,
        attribute: Option<&str>,
    ) -> Result<String, TemplateError> {
        if !self.template.contains(RESOURCE_PLACEHOLDER) {
            return Err(self.missing(RESOURCE_PLACEHOLDER));
        }
        if self.kind.requires_attribute() && !self.template.contains(ATTRIBUTE_PLACEHOLDER) {
            return Err(self.missing(ATTRIBUTE_PLACEHOLDER));
        }

        let mut rendered = self.template.replacen(RESOURCE_PLACEHOLDER, resource, 1);
        if let Some(attribute) = attribute {
            rendered = rendered.replacen(ATTRIBUTE_PLACEHOLDER, attribute, 1);
        }
        Ok(rendered)
    }

    /// Renders the bare element identifier (leading prefix stripped)
    pub fn render_id(
        &self,
        resource: &str,
        attribute: Option<&str>,
    ) -> Result<String, TemplateError> {
        let selector = self.render_selector(resource, attribute)?;
        let mut chars = selector.chars();
        chars.next();
        Ok(chars.as_str().to_string())
    }

    fn missing(&self, placeholder: &'static str) -> TemplateError {
        TemplateError::MissingPlaceholder {
            kind: self.kind.name(),
            template: self.template.clone(),
            placeholder,
        }
    }
}
