// src/action.rs

//! Custom actions: user-supplied logic that stands in for a built-in
//! strategy or a hook command.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};

use crate::exec::CommandRunner;
use crate::exec::shell::quote_path;
use crate::types::BoxFuture;

/// What a custom action is called with.
///
/// `runner` lets the action run (and stream) its own commands the same way
/// the built-in strategies do.
#[derive(Clone, Copy)]
pub struct ActionContext<'a> {
    pub source: &'a Path,
    pub target: &'a Path,
    pub runner: &'a dyn CommandRunner,
}

/// A single "invoke" capability.
pub trait CustomAction: Send + Sync {
    fn invoke<'a>(&'a self, ctx: ActionContext<'a>) -> BoxFuture<'a, Result<()>>;
}

/// Cheaply cloneable handle to a custom action.
#[derive(Clone)]
pub struct Action(Arc<dyn CustomAction>);

impl Action {
    pub fn new(action: impl CustomAction + 'static) -> Self {
        Action(Arc::new(action))
    }

    /// Wrap a plain synchronous closure taking `(source, target)`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Path, &Path) -> Result<()> + Send + Sync + 'static,
    {
        Action::new(FnAction(f))
    }

    /// A shell command line with `{source}` and `{target}` placeholders.
    pub fn command_template(template: impl Into<String>) -> Self {
        Action::new(CommandTemplate::new(template))
    }

    pub fn invoke<'a>(&'a self, ctx: ActionContext<'a>) -> BoxFuture<'a, Result<()>> {
        self.0.invoke(ctx)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

struct FnAction<F>(F);

impl<F> CustomAction for FnAction<F>
where
    F: Fn(&Path, &Path) -> Result<()> + Send + Sync,
{
    fn invoke<'a>(&'a self, ctx: ActionContext<'a>) -> BoxFuture<'a, Result<()>> {
        let outcome = (self.0)(ctx.source, ctx.target);
        Box::pin(async move { outcome })
    }
}

/// Command line template, e.g. `rsync -a --delete {source}/ {target}`.
///
/// Placeholders are replaced by single-quoted paths. A non-zero exit of the
/// rendered command is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    template: String,
}

impl CommandTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, source: &Path, target: &Path) -> String {
        self.template
            .replace("{source}", &quote_path(source))
            .replace("{target}", &quote_path(target))
    }
}

impl CustomAction for CommandTemplate {
    fn invoke<'a>(&'a self, ctx: ActionContext<'a>) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let line = self.render(ctx.source, ctx.target);
            let status = ctx.runner.run(&line).await?;
            if !status.success() {
                bail!("`{line}` failed with {status}");
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_substitutes_quoted_paths() {
        let t = CommandTemplate::new("rsync -a {source}/ {target}");
        assert_eq!(
            t.render(Path::new("/srv/my site"), Path::new("/bk/site.2024-01-02.0300")),
            "rsync -a '/srv/my site'/ '/bk/site.2024-01-02.0300'"
        );
    }

    #[test]
    fn template_without_placeholders_is_left_alone() {
        let t = CommandTemplate::new("sync");
        assert_eq!(t.render(Path::new("/a"), Path::new("/b")), "sync");
    }
}
