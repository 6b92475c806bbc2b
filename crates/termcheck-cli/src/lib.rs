//! termcheck CLI - glossary checks over document files
//!
//! Drives the engine from the command line:
//! - `terms` lists approved terms, optionally per category
//! - `scan` highlights text layers that are not approved terms
//! - `mock` clones a template once per term
//! - `validate` checks one text and suggests replacements
//!
//! Documents are JSON files in the [`termcheck_document::NodeSpec`] shape.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::{build_cli, DocumentArgs, GlobalOptions, Invocation};
pub use commands::{CommandContext, Outcome};
pub use logging::init_tracing;

use std::io::Write;

/// Load the glossary and run one subcommand
///
/// # Errors
/// Any configuration, glossary, document or engine failure.
pub async fn run(
    globals: &GlobalOptions,
    invocation: Invocation,
    out: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    let ctx = CommandContext::load(globals).await?;
    run_with(&ctx, invocation, out).await
}

/// Run one subcommand against an already loaded context
///
/// # Errors
/// Any document or engine failure.
pub async fn run_with(
    ctx: &CommandContext,
    invocation: Invocation,
    out: &mut dyn Write,
) -> anyhow::Result<Outcome> {
    match invocation {
        Invocation::Terms { category } => commands::terms(ctx, category.as_deref(), out),
        Invocation::Scan(args) => commands::scan(ctx, &args, out).await,
        Invocation::Mock(args) => commands::mock(ctx, &args, out).await,
        Invocation::Validate { text, category } => {
            commands::validate(ctx, &text, category.as_deref(), out)
        }
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
