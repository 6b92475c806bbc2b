//! Interactive session
//!
//! Owns the glossary cache, the active source and category, and the
//! outbound event channel. Every inbound [`UiCommand`] is handled to
//! completion; failures become [`UiEvent::Error`] and leave the session
//! state as it was before the command.

use crate::cancel::CancelFlag;
use crate::config::TermcheckConfig;
use crate::error::{CoreError, CoreResult, PreconditionError};
use crate::events::{UiCommand, UiEvent};
use crate::mock::MockGenerator;
use crate::scan::{ensure_scan_target, scan_for_invalid_terms};
use crate::validator::validate_selection;
use termcheck_document::{DocumentHost, FontDescriptor, NodeId, NodeKind, Point};
use termcheck_glossary::{GlossaryCache, GlossarySource};
use termcheck_model::{normalize_category, GlossaryView};
use tokio::sync::mpsc;

/// Session state and command dispatch
pub struct Session<H, S> {
    host: H,
    source: S,
    config: TermcheckConfig,
    cache: GlossaryCache,
    active_source: Option<String>,
    active_category: Option<String>,
    events: mpsc::UnboundedSender<UiEvent>,
    cancel: CancelFlag,
}

impl<H, S> std::fmt::Debug for Session<H, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("active_source", &self.active_source)
            .field("active_category", &self.active_category)
            .field("terms", &self.cache.snapshot().len())
            .finish_non_exhaustive()
    }
}

impl<H, S> Session<H, S>
where
    H: DocumentHost,
    S: GlossarySource,
{
    /// Create session; events are delivered on the returned receiver
    pub fn new(
        host: H,
        source: S,
        config: TermcheckConfig,
    ) -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let active_source = config.initial_source().map(str::to_string);
        let session = Self {
            host,
            source,
            config,
            cache: GlossaryCache::new(),
            active_source,
            active_category: None,
            events,
            cancel: CancelFlag::new(),
        };
        (session, rx)
    }

    /// With a pre-populated cache
    #[must_use]
    pub fn with_cache(mut self, cache: GlossaryCache) -> Self {
        self.cache = cache;
        self
    }

    /// With cancellation flag shared with the caller
    ///
    /// Cancelling stops the scan or generation in progress. Each new pass
    /// clears the flag, so a request made while idle is dropped.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Host document
    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Glossary cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &GlossaryCache {
        &self.cache
    }

    /// Active source id
    #[inline]
    #[must_use]
    pub fn active_source(&self) -> Option<&str> {
        self.active_source.as_deref()
    }

    /// Active category, `None` for all
    #[inline]
    #[must_use]
    pub fn active_category(&self) -> Option<&str> {
        self.active_category.as_deref()
    }

    /// Pin the current glossary under the active category
    #[must_use]
    pub fn view(&self) -> GlossaryView {
        self.cache.view(self.active_category.as_deref())
    }

    /// Load the initial glossary
    pub async fn initialize(&mut self) {
        tracing::info!("Initializing session");
        self.handle(UiCommand::RefreshGlossary).await;
    }

    /// Handle commands until the sender side closes
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<UiCommand>) {
        self.initialize().await;
        while let Some(command) = commands.recv().await {
            self.handle(command).await;
        }
        tracing::info!("Command channel closed, session ending");
    }

    /// Handle one command, reporting failures as `error` events
    pub async fn handle(&mut self, command: UiCommand) {
        tracing::debug!("Handling command: {:?}", command);
        let result = match command {
            UiCommand::CategoryChanged { category } => self.change_category(&category),
            UiCommand::CreateMockOrSingle { text } => self.create_single(&text).await,
            UiCommand::ScanSelected => self.scan_selected().await,
            UiCommand::GenerateMocks { category } => self.generate(category.as_deref()).await,
            UiCommand::GlossarySourceChanged { source_id } => self.change_source(source_id).await,
            UiCommand::RefreshGlossary => self.refresh().await,
            UiCommand::SelectionChanged => self.selection_changed().await,
        };

        if let Err(e) = result {
            if e.is_user_facing() {
                tracing::warn!("{}", e);
            } else {
                tracing::error!("Command failed: {}", e);
            }
            self.emit(UiEvent::error(e.to_string()));
        }
    }

    fn emit(&self, event: UiEvent) {
        tracing::debug!("Emitting {}", event.kind());
        if self.events.send(event).is_err() {
            tracing::warn!("Event receiver dropped");
        }
    }

    fn emit_glossary(&self) {
        self.emit(UiEvent::GlossaryUpdated {
            terms: self
                .cache
                .filter_by_category(self.active_category.as_deref()),
        });
    }

    async fn refresh(&mut self) -> CoreResult<()> {
        let id = self
            .active_source
            .clone()
            .ok_or_else(|| CoreError::config("no glossary source configured"))?;
        let config = self.config.source(&id)?.clone();

        self.cache.refresh(&self.source, &config).await?;

        let index = self.cache.categories();
        if let Some(category) = &self.active_category {
            if !index.contains(category) {
                tracing::info!("Category '{}' no longer present, showing all", category);
                self.active_category = None;
            }
        }

        self.emit(UiEvent::CategoriesUpdated {
            categories: index.to_vec(),
            active_source_label: config.display_label().to_string(),
        });
        self.emit_glossary();
        Ok(())
    }

    async fn change_source(&mut self, source_id: String) -> CoreResult<()> {
        self.config.source(&source_id)?;
        let previous = self.active_source.replace(source_id);
        if let Err(e) = self.refresh().await {
            self.active_source = previous;
            return Err(e);
        }
        Ok(())
    }

    fn change_category(&mut self, category: &str) -> CoreResult<()> {
        let category = normalize_category(Some(category));
        if let Some(c) = category {
            if !self.cache.categories().contains(c) {
                return Err(PreconditionError::UnknownCategory(c.to_string()).into());
            }
        }
        self.active_category = category.map(str::to_string);
        self.emit_glossary();
        Ok(())
    }

    async fn create_single(&self, text: &str) -> CoreResult<()> {
        self.host
            .ensure_font_available(&FontDescriptor::inter_regular())
            .await?;
        let node = self.host.create_text_node(text).await?;

        let center = self.host.viewport_center().await;
        let bounds = self
            .host
            .info(node)
            .map(|i| i.bounds)
            .unwrap_or_default();
        self.host
            .set_position(
                node,
                Point::new(
                    center.x - bounds.width / 2.0,
                    center.y - bounds.height / 2.0,
                ),
            )
            .await?;
        self.host.set_selection(&[node]).await?;
        self.host.focus_view(&[node]).await?;

        self.emit(UiEvent::notice(format!("Added term: \"{text}\"")));
        Ok(())
    }

    async fn scan_selected(&self) -> CoreResult<()> {
        self.cancel.reset();
        let selection = self.host.current_selection().await;
        let root = ensure_scan_target(&self.host, &selection)?;
        let view = self.view();

        let result = scan_for_invalid_terms(
            &self.host,
            root,
            &view,
            &self.config.scan,
            self.config.limits,
            &self.cancel,
        )
        .await?;

        let invalid_texts = result.invalid_texts();
        let notice = if result.leaves_scanned == 0 {
            "No text layers found in the selected frame".to_string()
        } else if invalid_texts.is_empty() {
            "All terms in the frame are valid!".to_string()
        } else {
            let quoted: Vec<String> = invalid_texts.iter().map(|t| format!("\"{t}\"")).collect();
            format!(
                "Found {} invalid terms: {}",
                invalid_texts.len(),
                quoted.join(", ")
            )
        };
        self.emit(UiEvent::notice(notice));
        self.emit(UiEvent::ScanComplete { invalid_texts });
        Ok(())
    }

    async fn generate(&self, category: Option<&str>) -> CoreResult<()> {
        self.cancel.reset();
        let selection = self.host.current_selection().await;
        let template = match selection.as_slice() {
            [] => return Err(PreconditionError::EmptySelection.into()),
            [node] => *node,
            _ => {
                return Err(PreconditionError::MultipleSelection {
                    count: selection.len(),
                }
                .into())
            }
        };

        let category = match normalize_category(category) {
            Some(c) if !self.cache.categories().contains(c) => {
                return Err(PreconditionError::UnknownCategory(c.to_string()).into())
            }
            Some(c) => Some(c),
            None => self.active_category.as_deref(),
        };
        let view = self.cache.view(category);
        let terms = view.to_vec();

        let id = self
            .active_source
            .as_deref()
            .ok_or_else(|| CoreError::config("no glossary source configured"))?;
        let token = self.config.source(id)?.placeholder_token();

        let generated = MockGenerator::new(&self.host, self.config.mock.clone())
            .with_limits(self.config.limits)
            .with_cancel(self.cancel.clone())
            .generate(template, &token, &terms)
            .await;

        match generated {
            Ok(created) => {
                self.reveal(&created).await?;
                self.emit(UiEvent::MocksCreated {
                    count: created.len(),
                });
                Ok(())
            }
            Err(e) => {
                if let Err(reveal) = self.reveal(e.created_nodes()).await {
                    tracing::warn!("Could not select partial mocks: {}", reveal);
                }
                Err(e)
            }
        }
    }

    async fn reveal(&self, nodes: &[NodeId]) -> CoreResult<()> {
        if nodes.is_empty() {
            return Ok(());
        }
        self.host.set_selection(nodes).await?;
        self.host.focus_view(nodes).await?;
        Ok(())
    }

    async fn selection_changed(&self) -> CoreResult<()> {
        let selection = self.host.current_selection().await;
        let [node] = selection.as_slice() else {
            return Ok(());
        };
        let is_text = self
            .host
            .info(*node)
            .is_some_and(|i| i.kind == NodeKind::Text);
        let Some(facet) = self.host.text(*node).filter(|_| is_text) else {
            return Ok(());
        };

        let outcome = validate_selection(&facet.characters, &self.view(), self.config.suggestion_limit);
        self.emit(UiEvent::ValidationResult {
            matched: outcome.matched,
            suggestions: outcome.suggestions,
        });
        Ok(())
    }
}
