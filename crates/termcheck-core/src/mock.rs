//! Mock generation
//!
//! Clones a template once per term, substitutes the term into every
//! placeholder site of the clone and lays the clones out on a grid.
//!
//! # Workflow
//! 1. Check preconditions (placeholder sites, terms, attach point) without mutating
//! 2. Load every template font; substitute the fallback for the missing ones
//! 3. Per term: clone → rename → place → substitute → attach
//!
//! Mutations are not transactional. A failure after the first clone is
//! attached surfaces as [`CoreError::GenerationInterrupted`] carrying the
//! clones that remain in the document, including a partially filled one.

use crate::cancel::CancelFlag;
use crate::config::MockOptions;
use crate::error::{CoreError, CoreResult, PreconditionError};
use crate::layout::{grid_cell, grid_position};
use crate::placeholder::{find_placeholders, resolve};
use std::collections::HashSet;
use termcheck_document::{
    collect_fonts, DocumentError, DocumentHost, FontDescriptor, NodeId, NodeInfo, StructureError,
    TraversalLimits,
};
use termcheck_model::{PlaceholderToken, Term};

/// Generates one clone of a template per term
#[derive(Debug)]
pub struct MockGenerator<'h, H: ?Sized> {
    host: &'h H,
    options: MockOptions,
    limits: TraversalLimits,
    cancel: CancelFlag,
}

impl<'h, H> MockGenerator<'h, H>
where
    H: DocumentHost + ?Sized,
{
    /// Create generator for `host`
    #[must_use]
    pub fn new(host: &'h H, options: MockOptions) -> Self {
        Self {
            host,
            options,
            limits: TraversalLimits::default(),
            cancel: CancelFlag::new(),
        }
    }

    /// With traversal limits
    #[inline]
    #[must_use]
    pub fn with_limits(mut self, limits: TraversalLimits) -> Self {
        self.limits = limits;
        self
    }

    /// With cancellation flag
    #[inline]
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Clone `template` once per term and substitute `token`
    ///
    /// Returns the clones in term order.
    ///
    /// # Errors
    /// - [`PreconditionError::NoPlaceholders`] / [`PreconditionError::NoTerms`]
    ///   before any mutation
    /// - [`CoreError::FontUnavailable`] when the fallback font cannot be loaded
    /// - [`CoreError::GenerationInterrupted`] when a later step fails
    pub async fn generate(
        &self,
        template: NodeId,
        token: &PlaceholderToken,
        terms: &[Term],
    ) -> CoreResult<Vec<NodeId>> {
        let info = self
            .host
            .info(template)
            .ok_or(DocumentError::NodeNotFound(template))?;
        tracing::info!(
            "Generating {} mocks from template '{}' ({})",
            terms.len(),
            info.name,
            template
        );

        let sites = find_placeholders(self.host, template, token, self.limits)?;
        if sites.is_empty() {
            return Err(PreconditionError::NoPlaceholders {
                token: token.to_string(),
            }
            .into());
        }
        if terms.is_empty() {
            return Err(PreconditionError::NoTerms.into());
        }

        let parent = self.clone_parent(&info)?;
        let missing = self.prepare_fonts(template).await?;

        let mut created = Vec::with_capacity(terms.len());
        for (index, term) in terms.iter().enumerate() {
            let step = self
                .add_clone(&info, parent, token, term, index, terms.len(), &missing, &mut created)
                .await;
            if let Err(e) = step {
                tracing::warn!(
                    "Mock generation stopped at term {} of {}: {}",
                    index + 1,
                    terms.len(),
                    e
                );
                return Err(CoreError::interrupted(created, e));
            }
        }

        tracing::info!("Created {} mocks", created.len());
        Ok(created)
    }

    /// Load template fonts; returns those replaced by the fallback
    async fn prepare_fonts(&self, template: NodeId) -> CoreResult<HashSet<FontDescriptor>> {
        let mut missing = HashSet::new();
        for font in collect_fonts(self.host, template, self.limits)? {
            if let Err(e) = self.host.ensure_font_available(&font).await {
                tracing::warn!(
                    "Font {} unavailable ({}), falling back to {}",
                    font,
                    e,
                    self.options.fallback_font
                );
                missing.insert(font);
            }
        }

        if !missing.is_empty() {
            let fallback = &self.options.fallback_font;
            self.host
                .ensure_font_available(fallback)
                .await
                .map_err(|_| CoreError::FontUnavailable(fallback.clone()))?;
        }
        Ok(missing)
    }

    /// Parent of the template, or the root for a detached template
    ///
    /// Refuses a parent that lies inside the template: every clone would
    /// land in the subtree the next clone copies.
    fn clone_parent(&self, template: &NodeInfo) -> CoreResult<NodeId> {
        let parent = template.parent.unwrap_or_else(|| self.host.root());
        let mut cursor = Some(parent);
        let mut depth = 0;
        while let Some(node) = cursor {
            if node == template.id {
                return Err(PreconditionError::TemplateEnclosesParent.into());
            }
            depth += 1;
            if depth > self.limits.max_depth {
                return Err(StructureError::DepthExceeded {
                    limit: self.limits.max_depth,
                }
                .into());
            }
            cursor = self.host.info(node).and_then(|i| i.parent);
        }
        Ok(parent)
    }

    /// Clone, fill and attach one mock, recording it in `created`
    ///
    /// A clone that fails part way is still attached and recorded so it
    /// never lingers detached in the host.
    #[allow(clippy::too_many_arguments)]
    async fn add_clone(
        &self,
        template: &NodeInfo,
        parent: NodeId,
        token: &PlaceholderToken,
        term: &Term,
        index: usize,
        total: usize,
        missing: &HashSet<FontDescriptor>,
        created: &mut Vec<NodeId>,
    ) -> CoreResult<()> {
        self.cancel.check()?;
        let clone = self.host.clone_node(template.id).await?;
        match self
            .build_clone(clone, template, parent, token, term, index, total, missing)
            .await
        {
            Ok(()) => {
                created.push(clone);
                Ok(())
            }
            Err(e) => {
                if self.keep_partial(parent, clone).await {
                    created.push(clone);
                }
                Err(e)
            }
        }
    }

    /// Attach a partially built clone; false when it stays detached
    async fn keep_partial(&self, parent: NodeId, clone: NodeId) -> bool {
        if self.host.info(clone).is_some_and(|i| i.parent.is_some()) {
            return true;
        }
        match self.host.append_child(parent, clone).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Partial mock {} left detached: {}", clone, e);
                false
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn build_clone(
        &self,
        clone: NodeId,
        template: &NodeInfo,
        parent: NodeId,
        token: &PlaceholderToken,
        term: &Term,
        index: usize,
        total: usize,
        missing: &HashSet<FontDescriptor>,
    ) -> CoreResult<()> {
        self.host
            .set_name(clone, &format!("{} - {}", template.name, term.term))
            .await?;

        let cell = grid_cell(index, total);
        self.host
            .set_position(
                clone,
                grid_position(template.bounds, cell, self.options.spacing),
            )
            .await?;

        for site in find_placeholders(self.host, clone, token, self.limits)? {
            let uses_missing = self
                .host
                .text(site.node)
                .is_some_and(|facet| facet.fonts.iter().any(|f| missing.contains(f)));
            if uses_missing {
                self.host
                    .set_font(site.node, &self.options.fallback_font)
                    .await?;
            }
            self.host.set_text(site.node, &resolve(&site, term)).await?;
        }

        self.host.append_child(parent, clone).await?;
        tracing::debug!(
            "Mock {} of {} for '{}' at ({}, {})",
            index + 1,
            total,
            term.term,
            cell.col,
            cell.row
        );
        Ok(())
    }
}

/// Generate mocks with default limits and no cancellation
///
/// # Errors
/// See [`MockGenerator::generate`].
pub async fn generate_mocks<H>(
    host: &H,
    template: NodeId,
    terms: &[Term],
    token: &PlaceholderToken,
    options: &MockOptions,
) -> CoreResult<Vec<NodeId>>
where
    H: DocumentHost + ?Sized,
{
    MockGenerator::new(host, options.clone())
        .generate(template, token, terms)
        .await
}
