//! Subcommand implementations
//!
//! Every command works on a glossary loaded once per process and, for the
//! document commands, on a JSON document file read into a
//! [`MemoryDocument`]. Reports are written to the caller's writer so the
//! binary prints to stdout and tests capture a buffer.

use crate::cli::{DocumentArgs, GlobalOptions};
use anyhow::{bail, Context as _, Result};
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use termcheck_core::{
    ensure_scan_target, scan_for_invalid_terms, validate_selection, CancelFlag, MockGenerator,
    PreconditionError, TermcheckConfig,
};
use termcheck_document::{DocumentHost, DocumentTree, MemoryDocument, NodeId};
use termcheck_glossary::{AirtableSource, GlossaryCache, JsonFileSource};
use termcheck_model::{normalize_category, GlossaryView, SourceConfig};

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report
    Clean,
    /// Unapproved text was found
    Findings,
}

impl Outcome {
    /// Process exit code: `0` when clean, `1` on findings
    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Clean => ExitCode::SUCCESS,
            Self::Findings => ExitCode::from(1),
        }
    }
}

/// Configuration, active source and fetched glossary
#[derive(Debug)]
pub struct CommandContext {
    config: TermcheckConfig,
    source: SourceConfig,
    cache: GlossaryCache,
}

impl CommandContext {
    /// Load configuration and fetch the glossary
    ///
    /// With `--glossary` terms are read from a local export; otherwise the
    /// initial configured source is fetched over HTTP.
    ///
    /// # Errors
    /// Fails when the config is invalid, no source is available or the fetch
    /// fails.
    pub async fn load(globals: &GlobalOptions) -> Result<Self> {
        let config = match &globals.config {
            Some(path) => TermcheckConfig::load(path)?,
            None => TermcheckConfig::new(),
        };

        let source = match config.initial_source() {
            Some(id) => config.source(id)?.clone(),
            None if globals.glossary.is_some() => {
                SourceConfig::new("file", "local", "glossary").with_label("Local glossary")
            }
            None => bail!("no glossary source configured; pass --config or --glossary"),
        };

        let cache = GlossaryCache::new();
        match &globals.glossary {
            Some(path) => {
                cache.refresh(&JsonFileSource::new(path), &source).await?;
            }
            None => {
                cache.refresh(&AirtableSource::new(), &source).await?;
            }
        }
        tracing::info!(
            "Using glossary '{}' ({} terms)",
            source.display_label(),
            cache.snapshot().len()
        );

        Ok(Self {
            config,
            source,
            cache,
        })
    }

    /// Build from parts already in hand
    #[must_use]
    pub fn from_parts(config: TermcheckConfig, source: SourceConfig, cache: GlossaryCache) -> Self {
        Self {
            config,
            source,
            cache,
        }
    }

    /// Loaded configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TermcheckConfig {
        &self.config
    }

    /// Active source
    #[inline]
    #[must_use]
    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    /// Glossary cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &GlossaryCache {
        &self.cache
    }

    /// View restricted to `category`
    ///
    /// # Errors
    /// [`PreconditionError::UnknownCategory`] when no term carries it.
    pub fn view(&self, category: Option<&str>) -> Result<GlossaryView, PreconditionError> {
        let category = normalize_category(category);
        if let Some(category) = category {
            if !self.cache.categories().contains(category) {
                return Err(PreconditionError::UnknownCategory(category.to_string()));
            }
        }
        Ok(self.cache.view(category))
    }
}

/// Read a document file
///
/// # Errors
/// Fails when the file cannot be read or is not a document.
pub fn load_document(path: &Path) -> Result<MemoryDocument> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    MemoryDocument::from_json(&body)
        .with_context(|| format!("invalid document {}", path.display()))
}

/// Write a document file
///
/// # Errors
/// Fails when serialization or the write fails.
pub fn save_document(doc: &MemoryDocument, path: &Path) -> Result<()> {
    let body = doc.to_json().context("failed to serialize document")?;
    std::fs::write(path, body)
        .with_context(|| format!("failed to write document {}", path.display()))?;
    tracing::info!("Wrote document to {}", path.display());
    Ok(())
}

/// Resolve a node given as numeric id or layer name
///
/// # Errors
/// Fails when nothing matches.
pub fn resolve_node(doc: &MemoryDocument, target: &str) -> Result<NodeId> {
    if let Ok(raw) = target.parse::<u64>() {
        let id = NodeId(raw);
        if doc.contains(id) {
            return Ok(id);
        }
    }
    match doc.find_by_name(target) {
        Some(id) => Ok(id),
        None => bail!("no node '{target}' in document"),
    }
}

/// `terms`: list approved terms
///
/// # Errors
/// Unknown category or a failed write.
pub fn terms(ctx: &CommandContext, category: Option<&str>, out: &mut dyn Write) -> Result<Outcome> {
    let view = ctx.view(category)?;
    for term in view.terms() {
        match term.category() {
            Some(category) => writeln!(out, "{}\t[{}]", term.term, category)?,
            None => writeln!(out, "{}", term.term)?,
        }
        if let Some(explanation) = &term.explanation {
            writeln!(out, "    {explanation}")?;
        }
    }
    writeln!(out, "{} terms", view.len())?;
    Ok(Outcome::Clean)
}

/// `scan`: highlight unapproved text leaves
///
/// Without `--root` the whole document is scanned. A named root must be a
/// frame or group.
///
/// # Errors
/// Document, precondition or engine failures.
pub async fn scan(ctx: &CommandContext, args: &DocumentArgs, out: &mut dyn Write) -> Result<Outcome> {
    let view = ctx.view(args.category.as_deref())?;
    let doc = load_document(&args.document)?;
    let root = match &args.target {
        Some(target) => {
            let node = resolve_node(&doc, target)?;
            ensure_scan_target(&doc, &[node])?
        }
        None => doc.root(),
    };

    let result = scan_for_invalid_terms(
        &doc,
        root,
        &view,
        &ctx.config.scan,
        ctx.config.limits,
        &CancelFlag::new(),
    )
    .await?;

    for leaf in &result.invalid_leaves {
        writeln!(out, "{}\t{}", leaf.node, leaf.text)?;
    }
    writeln!(
        out,
        "Scanned {} text layers, found {} invalid terms",
        result.leaves_scanned,
        result.invalid_leaves.len()
    )?;

    if let Some(path) = &args.write {
        save_document(&doc, path)?;
    }

    Ok(if result.is_clean() {
        Outcome::Clean
    } else {
        Outcome::Findings
    })
}

/// `mock`: clone the template once per term
///
/// Clones made before a failure stay in the written document.
///
/// # Errors
/// Document, precondition or engine failures.
pub async fn mock(ctx: &CommandContext, args: &DocumentArgs, out: &mut dyn Write) -> Result<Outcome> {
    let view = ctx.view(args.category.as_deref())?;
    let doc = load_document(&args.document)?;
    let Some(target) = &args.target else {
        bail!("--template is required");
    };
    let template = resolve_node(&doc, target)?;
    let token = ctx.source.placeholder_token();

    let generated = MockGenerator::new(&doc, ctx.config.mock.clone())
        .with_limits(ctx.config.limits)
        .generate(template, &token, &view.to_vec())
        .await;

    let created = match generated {
        Ok(created) => created,
        Err(e) => {
            if let Some(path) = &args.write {
                if !e.created_nodes().is_empty() {
                    save_document(&doc, path)?;
                }
            }
            return Err(e.into());
        }
    };

    for node in &created {
        let name = doc.info(*node).map(|i| i.name).unwrap_or_default();
        writeln!(out, "{node}\t{name}")?;
    }
    writeln!(out, "Created {} mocks", created.len())?;

    if let Some(path) = &args.write {
        save_document(&doc, path)?;
    }
    Ok(Outcome::Clean)
}

/// `validate`: check one text and suggest replacements
///
/// # Errors
/// Unknown category or a failed write.
pub fn validate(
    ctx: &CommandContext,
    text: &str,
    category: Option<&str>,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let view = ctx.view(category)?;
    let outcome = validate_selection(text, &view, ctx.config.suggestion_limit);
    if let Some(term) = &outcome.term {
        writeln!(out, "\"{}\" is approved", term.term)?;
        return Ok(Outcome::Clean);
    }

    writeln!(out, "\"{text}\" is not an approved term")?;
    if outcome.suggestions.is_empty() {
        writeln!(out, "No similar approved terms")?;
    } else {
        writeln!(out, "Did you mean:")?;
        for suggestion in &outcome.suggestions {
            writeln!(out, "  {}", suggestion.term)?;
        }
    }
    Ok(Outcome::Findings)
}
