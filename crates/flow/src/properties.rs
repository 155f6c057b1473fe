//! Style-bound property access.
//!
//! Full property resolution and inheritance live upstream; what reaches
//! this crate is a flat scope of already-cascaded declarations. Containers
//! keep hold of their scope only as long as a structural fix-up (row
//! synthesis) still needs it.

use crate::node::TextStr;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BindingError {
    #[error("invalid value '{value}' for property '{name}'")]
    InvalidValue { name: TextStr, value: TextStr },
    #[error("row synthesis requires the container's saved property scope, but it was already released")]
    ScopeReleased,
    #[error("table body mixes row and cell children")]
    MixedRowAndCellChildren,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritingMode {
    #[default]
    LrTb,
    RlTb,
    TbRl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

/// Break class a row may demand before or after itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakClass {
    #[default]
    Auto,
    Page,
    Column,
}

/// The flat, cascaded declarations one container sees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyScope {
    values: HashMap<TextStr, TextStr>,
}

impl PropertyScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: impl Into<TextStr>, value: impl Into<TextStr>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Derives the bound property set for a container in this scope. The
    /// writing mode is computed here so synthesized rows inherit it
    /// verbatim from their container.
    pub fn bind(&self) -> Result<BoundProperties, BindingError> {
        let writing_mode = match self.get("writing-mode") {
            None | Some("lr-tb") => WritingMode::LrTb,
            Some("rl-tb") => WritingMode::RlTb,
            Some("tb-rl") => WritingMode::TbRl,
            Some(other) => return Err(invalid("writing-mode", other)),
        };
        let visibility = match self.get("visibility") {
            None | Some("visible") => Visibility::Visible,
            Some("hidden") => Visibility::Hidden,
            Some("collapse") => Visibility::Collapse,
            Some(other) => return Err(invalid("visibility", other)),
        };
        let keep_together = match self.get("keep-together") {
            None | Some("auto") => false,
            Some("always") => true,
            Some(other) => return Err(invalid("keep-together", other)),
        };

        Ok(BoundProperties {
            writing_mode,
            visibility,
            keep_together,
            break_before: BreakClass::Auto,
        })
    }

    /// Row-level binding: rows additionally honor `break-before`, which
    /// container-level binding ignores.
    pub fn bind_row(&self) -> Result<BoundProperties, BindingError> {
        let mut bound = self.bind()?;
        bound.break_before = match self.get("break-before") {
            None | Some("auto") => BreakClass::Auto,
            Some("page") => BreakClass::Page,
            Some("column") => BreakClass::Column,
            Some(other) => return Err(invalid("break-before", other)),
        };
        Ok(bound)
    }
}

fn invalid(name: &str, value: &str) -> BindingError {
    BindingError::InvalidValue {
        name: name.into(),
        value: value.into(),
    }
}

/// The properties a flow node ends up bound to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundProperties {
    pub writing_mode: WritingMode,
    pub visibility: Visibility,
    pub keep_together: bool,
    pub break_before: BreakClass,
}
