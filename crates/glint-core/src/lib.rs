//! Shared foundation types for the glint front end.
//!
//! This crate holds the pieces every other glint crate depends on:
//! - [`Span`] - source locations carried by AST nodes and errors
//! - the error hierarchy ([`SemanticError`], [`InternalError`],
//!   [`TrapError`], [`ExecError`], [`GlintError`])
//! - runtime byte-buffer values ([`Value`], [`Storage`], [`Pointer`])
//!   used by synthesized struct accessor implementations

mod error;
mod span;
mod value;

pub use error::{ExecError, GlintError, InternalError, SemanticError, TrapError};
pub use span::Span;
pub use value::{Pointer, Storage, Value};
