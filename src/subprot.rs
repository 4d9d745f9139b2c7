//! Sub-protocols: per-field alternate renderers.
//!
//! A `SubProtocol` attached to a schema node may take over four steps of
//! that node's rendering. Each hook answers `Hook::Handled` when it wrote
//! the step itself, or `Hook::Fallback` to let the core do its default.
//! The core keeps the outer table/row/column bookkeeping either way.
//!
//! Row bracketing is scoped: `before_row` opens writer scopes through a
//! `ScopeStack`, `after_row` drains it. The core runs `after_row` exactly
//! once per `before_row`, even when the content in between fails, and
//! checks that every scope opened for the row is closed before returning
//! to the parent level.
use std::fmt;

use tracing::warn;

use crate::error::{RenderError, WriteError};
use crate::markup::{Attrs, DocumentWriter, NodeId, ScopeHandle};
use crate::render::Walker;
use crate::schema::Schema;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Handled,
    Fallback,
}

/// Where a hook is being invoked.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    /// Field (or top-level) name.
    pub name: &'a str,
    pub schema: &'a Schema,
    /// Dotted path, for messages.
    pub path: &'a str,
}

pub trait SubProtocol: fmt::Debug + Send + Sync {
    /// Replace the header cell(s) for this node.
    fn gen_header(&self, _out: &mut dyn DocumentWriter, _site: &Site<'_>) -> Result<Hook, RenderError> {
        Ok(Hook::Fallback)
    }

    /// Open this row's wrapper scopes. Push every scope onto `scopes`.
    fn before_row(
        &self,
        _out: &mut dyn DocumentWriter,
        _scopes: &mut ScopeStack,
        _site: &Site<'_>,
        _value: &Value,
    ) -> Result<Hook, RenderError> {
        Ok(Hook::Fallback)
    }

    /// Write `value` into the innermost open scope.
    fn to_parent(&self, _out: &mut dyn DocumentWriter, _site: &Site<'_>, _value: &Value) -> Result<Hook, RenderError> {
        Ok(Hook::Fallback)
    }

    /// Close what `before_row` opened. The fallback drains `scopes`.
    fn after_row(
        &self,
        _out: &mut dyn DocumentWriter,
        _scopes: &mut ScopeStack,
        _site: &Site<'_>,
    ) -> Result<Hook, RenderError> {
        Ok(Hook::Fallback)
    }
}

// ------------------------------- ScopeStack ------------------------------- //

/// Writer scopes opened for one row, closed LIFO.
#[derive(Debug, Default)]
pub struct ScopeStack {
    open: Vec<ScopeHandle>,
}

impl ScopeStack {
    pub fn new() -> Self { Self::default() }

    pub fn open(&mut self, out: &mut dyn DocumentWriter, tag: &str, attrs: &Attrs) -> Result<NodeId, WriteError> {
        let scope = out.open_scope(tag, attrs)?;
        let node = scope.node();
        self.open.push(scope);
        Ok(node)
    }

    pub fn push(&mut self, scope: ScopeHandle) { self.open.push(scope) }

    /// Innermost scope, for hooks that close scopes one at a time.
    pub fn pop(&mut self) -> Option<ScopeHandle> { self.open.pop() }

    /// Close every pushed scope, newest first. Returns how many closed.
    pub fn close_all(&mut self, out: &mut dyn DocumentWriter) -> Result<usize, WriteError> {
        let mut closed = 0;
        while let Some(scope) = self.open.pop() {
            out.close_scope(scope)?;
            closed += 1;
        }
        Ok(closed)
    }

    pub fn len(&self) -> usize { self.open.len() }

    pub fn is_empty(&self) -> bool { self.open.is_empty() }
}

// ----------------------------- Core side ---------------------------------- //

impl Walker<'_> {
    /// `gen_header`, or `default` when absent or declined.
    pub(crate) fn header(
        &mut self,
        prot: Option<&dyn SubProtocol>,
        site: &Site<'_>,
        default: impl FnOnce(&mut Self) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        if let Some(prot) = prot {
            if prot.gen_header(&mut *self.out, site)? == Hook::Handled {
                return Ok(());
            }
        }
        default(self)
    }

    /// `to_parent`, or `default` when absent or declined.
    pub(crate) fn content(
        &mut self,
        prot: Option<&dyn SubProtocol>,
        site: &Site<'_>,
        value: &Value,
        default: impl FnOnce(&mut Self) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        if let Some(prot) = prot {
            if prot.to_parent(&mut *self.out, site, value)? == Hook::Handled {
                return Ok(());
            }
        }
        default(self)
    }

    /// Bracket `body` with `before_row`/`after_row`.
    ///
    /// The fallback `before_row` opens `wrapper` (if any) on the row's
    /// stack. After `after_row` the stack must be empty and the writer back
    /// at its starting depth.
    pub(crate) fn row_frame(
        &mut self,
        prot: Option<&dyn SubProtocol>,
        site: &Site<'_>,
        value: &Value,
        wrapper: Option<(&str, Attrs)>,
        body: impl FnOnce(&mut Self) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        let base_depth = self.out.depth();
        let mut scopes = ScopeStack::new();

        // 1) acquire
        let before = match prot {
            Some(prot) => prot.before_row(&mut *self.out, &mut scopes, site, value),
            None => Ok(Hook::Fallback),
        };
        let opened = match before {
            Ok(Hook::Handled) => Ok(()),
            Ok(Hook::Fallback) => match &wrapper {
                Some((tag, attrs)) => scopes.open(&mut *self.out, tag, attrs).map(|_| ()).map_err(Into::into),
                None => Ok(()),
            },
            Err(err) => Err(err),
        };
        if let Err(err) = opened {
            if let Err(close_err) = scopes.close_all(&mut *self.out) {
                warn!(path = site.path, %close_err, "could not unwind row scopes");
            }
            return Err(err);
        }

        // 2) content
        let content = body(self);

        // 3) release, always
        let after = match prot {
            Some(prot) => prot.after_row(&mut *self.out, &mut scopes, site),
            None => Ok(Hook::Fallback),
        };
        let released = match after {
            Ok(Hook::Handled) => Ok(()),
            Ok(Hook::Fallback) => scopes.close_all(&mut *self.out).map(|_| ()).map_err(Into::into),
            Err(err) => Err(err),
        };

        content?;
        released.map_err(|err| match err {
            RenderError::Writer(write) => self.violation(site, format!("after_row could not close its scopes: {write}")),
            other => other,
        })?;

        // 4) balance
        if !scopes.is_empty() {
            return Err(self.violation(site, format!("after_row left {} scope(s) on the row stack", scopes.len())));
        }
        let depth = self.out.depth();
        if depth != base_depth {
            return Err(self.violation(
                site,
                format!("row hooks left the writer at depth {depth}, expected {base_depth}"),
            ));
        }
        Ok(())
    }

    fn violation(&self, site: &Site<'_>, detail: String) -> RenderError {
        warn!(path = site.path, %detail, "sub-protocol contract violation");
        RenderError::SubProtocolContractViolation { path: site.path.to_string(), detail }
    }
}
