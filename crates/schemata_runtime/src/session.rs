//! Compile sessions.
//!
//! A [`Session`] is what a front end drives while it parses: each
//! declaration is applied to the document, and allocation errors are
//! recorded as diagnostics instead of stopping the parse. [`Session::finish`]
//! refuses to link a document that produced any diagnostic.

use std::fmt;

use schemata_foundation::{EntityId, Error, Result, RoleId};
use schemata_linker::{LinkConfig, LinkedConfig, Linker};
use schemata_model::{Config, Field, teardown};
use tracing::{debug, warn};

/// An error recorded against one declaration.
#[derive(Debug)]
pub struct Diagnostic {
    /// The source file being parsed, if one was set.
    pub file: Option<String>,
    /// What was being declared, e.g. `entity user` or `field user.email`.
    pub declaration: String,
    /// The error.
    pub error: Error,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{file}: ")?;
        }
        write!(f, "{}: {}", self.declaration, self.error)?;
        if let Some(context) = &self.error.context {
            write!(f, " ({context})")?;
        }
        Ok(())
    }
}

/// A compilation that did not produce a linked document.
#[derive(Debug, thiserror::Error)]
#[error("compilation failed with {} diagnostic(s)", .diagnostics.len())]
pub struct CompileError {
    /// Every diagnostic, in the order recorded.
    pub diagnostics: Vec<Diagnostic>,
}

/// One compilation: a document under construction plus its diagnostics.
#[derive(Debug, Default)]
pub struct Session {
    config: Config,
    options: LinkConfig,
    file: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Session {
    /// Creates a session with an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the link options used by [`Session::finish`].
    #[must_use]
    pub fn with_link_config(mut self, options: LinkConfig) -> Self {
        self.options = options;
        self
    }

    /// Returns the document built so far.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns true if any declaration failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Sets the source file subsequent declarations come from and records
    /// it in the document's file table.
    pub fn begin_file(&mut self, name: &str) {
        if self
            .declare(format!("file {name}"), |c| c.add_source_file(name))
            .is_some()
        {
            self.file = Some(name.to_string());
        }
    }

    /// Applies one declaration to the document. On failure the error is
    /// recorded and `None` is returned.
    pub fn declare<T>(
        &mut self,
        declaration: impl Into<String>,
        f: impl FnOnce(&mut Config) -> Result<T>,
    ) -> Option<T> {
        match f(&mut self.config) {
            Ok(value) => Some(value),
            Err(error) => {
                let declaration = declaration.into();
                warn!(%declaration, %error, "declaration rejected");
                self.diagnostics.push(Diagnostic {
                    file: self.file.clone(),
                    declaration,
                    error,
                });
                None
            }
        }
    }

    /// Declares an entity.
    pub fn entity(&mut self, name: &str) -> Option<EntityId> {
        self.declare(format!("entity {name}"), |c| c.allocate_entity(name))
    }

    /// Declares a field and lets `configure` set its type, flags, and links.
    ///
    /// A field whose configuration fails stays declared, so later
    /// declarations naming it still find it.
    pub fn field(
        &mut self,
        entity: EntityId,
        name: &str,
        configure: impl FnOnce(&mut Field) -> Result<()>,
    ) -> Option<()> {
        let label = match self.config.entity(entity) {
            Some(e) => format!("field {}.{name}", e.name()),
            None => format!("field {name}"),
        };
        self.declare(label, |c| {
            let owner = c.entity_mut(entity).ok_or_else(|| {
                Error::invalid_declaration(format!("no entity with handle {entity:?}"))
            })?;
            let field = owner.allocate_field(name)?;
            configure(field)
        })
    }

    /// Declares a role.
    pub fn role(&mut self, parent: Option<RoleId>, name: &str) -> Option<RoleId> {
        self.declare(format!("role {name}"), |c| c.allocate_role(parent, name))
    }

    /// Ends the session and links the document.
    ///
    /// # Errors
    ///
    /// If any declaration failed, the document is torn down without linking
    /// and every diagnostic is returned. A link failure is returned as a
    /// single diagnostic.
    pub fn finish(self) -> std::result::Result<LinkedConfig, CompileError> {
        let Self {
            config,
            options,
            file,
            mut diagnostics,
        } = self;

        if !diagnostics.is_empty() {
            debug!(
                count = diagnostics.len(),
                "refusing to link after declaration errors"
            );
            let released = teardown(Some(config));
            debug!(?released, "document released");
            return Err(CompileError { diagnostics });
        }

        Linker::new(options).link(config).map_err(|error| {
            diagnostics.push(Diagnostic {
                file,
                declaration: "link".to_string(),
                error,
            });
            CompileError { diagnostics }
        })
    }
}
