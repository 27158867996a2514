//! modcheck - Missing module and package checker for JavaScript/TypeScript projects
//!
//! This crate finds `import`/`require` references to files that do not
//! exist and to packages the nearest package.json does not declare, and
//! reports declared dependencies that nothing imports. Results can be
//! exported as text, JSON or Markdown along with the commands that fix
//! them.

pub mod analysis;
pub mod config;
pub mod diagnostic;
pub mod export;
pub mod parser;
pub mod remedy;
pub mod scan;
