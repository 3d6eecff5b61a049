//! The link driver.

use schemata_foundation::{LinkPass, Result, RoleId};
use schemata_model::{Config, teardown};
use tracing::{debug, instrument, warn};

use crate::config::LinkConfig;
use crate::linked::LinkedConfig;
use crate::pass::{declarations, heights, references, rolemaps, roles, specs};

/// Resolves a [`Config`] into a [`LinkedConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Linker {
    config: LinkConfig,
}

impl Linker {
    /// Creates a linker with the given options.
    #[must_use]
    pub fn new(config: LinkConfig) -> Self {
        Self { config }
    }

    /// Returns the linker options.
    #[must_use]
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Links a document.
    ///
    /// The document is consumed. On failure it is torn down and only the
    /// error is returned; the error's context names the failing pass and,
    /// where known, the entity, field, and spec.
    ///
    /// # Errors
    ///
    /// Any link-time error kind, or an allocation-time kind found while
    /// re-checking declarations.
    #[instrument(skip_all, fields(entities = document.entities().len()))]
    pub fn link(&self, mut document: Config) -> Result<LinkedConfig> {
        match self.run(&mut document) {
            Ok(unused_roles) => Ok(LinkedConfig::new(document, unused_roles)),
            Err(err) => {
                debug!(error = %err, "link failed");
                let released = teardown(Some(document));
                debug!(?released, "document released after failed link");
                Err(err)
            }
        }
    }

    fn run(&self, document: &mut Config) -> Result<Vec<RoleId>> {
        run_pass(LinkPass::Declarations, || {
            declarations::check_handles(document)?;
            if self.config.recheck_declarations {
                declarations::check(document)?;
            }
            Ok(())
        })?;
        run_pass(LinkPass::References, || references::resolve(document))?;
        run_pass(LinkPass::Heights, || heights::compute(document))?;
        run_pass(LinkPass::Roles, || roles::check(document.roles()))?;
        let unused = run_pass(LinkPass::Rolemaps, || rolemaps::bind(document))?;
        run_pass(LinkPass::Specs, || specs::bind(document))?;

        if self.config.warn_unused_roles {
            for role in unused.iter().filter_map(|id| document.roles().get(*id)) {
                warn!(role = role.name(), "role is never granted");
            }
        }
        Ok(unused)
    }
}

fn run_pass<T>(pass: LinkPass, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let out = f().map_err(|e| e.in_pass(pass))?;
    debug!(%pass, "pass complete");
    Ok(out)
}

/// Links a document with the default options.
///
/// # Errors
///
/// See [`Linker::link`].
pub fn link(document: Config) -> Result<LinkedConfig> {
    Linker::default().link(document)
}
