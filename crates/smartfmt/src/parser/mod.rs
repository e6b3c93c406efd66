//! Template parser.
//!
//! This module turns template strings into a [`Format`] tree. The tree is
//! independent of any formatter instance and can be cached, inspected by
//! tooling, or evaluated many times.

pub mod ast;
pub mod error;
mod literal;
mod template;

pub use ast::*;
pub use error::{ParsingError, ParsingErrors, ParsingIssue};
pub use template::Parser;
