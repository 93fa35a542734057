use relative_path::RelativePath;

use super::{RunMode, RunningConfig, TemplaterError};
use crate::cursor::{CursorJump, jump_to_next_cursor_location};
use crate::io::DocumentStore;
use crate::models::DocumentRef;
use crate::render::Renderer;
use crate::surface::{EditableSurface, PreviewSurface, Workspace};

pub const DEFAULT_NEW_NOTE_NAME: &str = "Untitled";

/// What a run left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Output was merged into `document`, then cursor placement ran
    Written {
        document: DocumentRef,
        cursor: CursorJump,
    },
    /// Output for a read-only preview; nothing was persisted
    Preview(String),
}

/// Renders templates and merges the output into documents
///
/// Each entry point builds a [`RunningConfig`] and hands it to [`Templater::run`],
/// which decides per [`RunMode`] where the output goes and whether cursors are
/// placed afterwards.
pub struct Templater<D, R> {
    store: D,
    renderer: R,
    new_note_name: String,
}

impl<D: DocumentStore, R: Renderer> Templater<D, R> {
    pub fn new(store: D, renderer: R) -> Self {
        Self {
            store,
            renderer,
            new_note_name: DEFAULT_NEW_NOTE_NAME.to_string(),
        }
    }

    /// Base name for documents created from templates
    pub fn with_new_note_name(mut self, name: impl Into<String>) -> Self {
        self.new_note_name = name.into();
        self
    }

    pub fn create_running_config(
        &self,
        template: &DocumentRef,
        target: &DocumentRef,
        run_mode: RunMode,
    ) -> RunningConfig {
        RunningConfig {
            template_source: template.clone(),
            target_document: target.clone(),
            run_mode,
        }
    }

    /// Read the template source and render it for `config`.
    pub async fn read_and_render(&self, config: &RunningConfig) -> Result<String, TemplaterError> {
        let template = self.store.read(&config.template_source).await?;
        self.render_text(config, &template).await
    }

    async fn render_text(
        &self,
        config: &RunningConfig,
        text: &str,
    ) -> Result<String, TemplaterError> {
        self.renderer
            .render(text, config, config.run_mode.context_mode())
            .await
            .map_err(|source| TemplaterError::Render {
                template: config.template_source.clone(),
                source,
            })
    }

    /// Render `config.template_source` and merge the output according to
    /// `config.run_mode`.
    ///
    /// Modes that need the active editor fail with
    /// [`TemplaterError::NoActiveSurface`], or with
    /// [`TemplaterError::ActiveDocumentMismatch`] when the active editor shows
    /// another document, before anything is rendered or written.
    pub async fn run<W>(
        &self,
        config: &RunningConfig,
        workspace: &mut W,
    ) -> Result<RunOutcome, TemplaterError>
    where
        W: Workspace + ?Sized,
    {
        check_active_surface(config, workspace)?;
        let output = self.read_and_render(config).await?;
        self.merge(config, output, workspace).await
    }

    async fn merge<W>(
        &self,
        config: &RunningConfig,
        output: String,
        workspace: &mut W,
    ) -> Result<RunOutcome, TemplaterError>
    where
        W: Workspace + ?Sized,
    {
        let mode = config.run_mode;
        log::info!(
            "running {} into {} ({mode})",
            config.template_source,
            config.target_document
        );

        match mode {
            RunMode::CreateFromTemplate => {
                self.store.write(&config.target_document, &output).await?;
                workspace.open(&config.target_document).await?;
                self.finish_written(config.target_document.clone(), workspace)
                    .await
            }
            RunMode::AppendToActiveDocument => {
                let surface = workspace
                    .active_surface()
                    .ok_or(TemplaterError::NoActiveSurface { mode })?;
                surface.replace_selection(&output);
                self.finish_written(config.target_document.clone(), workspace)
                    .await
            }
            RunMode::OverwriteDocument => {
                self.store.write(&config.target_document, &output).await?;

                let is_active = workspace
                    .active_surface()
                    .is_some_and(|surface| surface.document() == &config.target_document);
                if is_active {
                    self.finish_written(config.target_document.clone(), workspace)
                        .await
                } else {
                    Ok(RunOutcome::Written {
                        document: config.target_document.clone(),
                        cursor: CursorJump::NotActive,
                    })
                }
            }
            RunMode::OverwriteActiveDocument => {
                self.store.write(&config.target_document, &output).await?;
                self.finish_written(config.target_document.clone(), workspace)
                    .await
            }
            RunMode::DynamicRender => Ok(RunOutcome::Preview(output)),
        }
    }

    async fn finish_written<W>(
        &self,
        document: DocumentRef,
        workspace: &mut W,
    ) -> Result<RunOutcome, TemplaterError>
    where
        W: Workspace + ?Sized,
    {
        let cursor = jump_to_next_cursor_location(&self.store, workspace).await?;
        Ok(RunOutcome::Written { document, cursor })
    }

    /// Create a new document in `folder` (the vault root by default) and fill
    /// it from `template`.
    ///
    /// If the template cannot be read or rendered the new, still empty
    /// document is removed again.
    pub async fn create_new_note_from_template<W>(
        &self,
        workspace: &mut W,
        template: &DocumentRef,
        folder: Option<&RelativePath>,
    ) -> Result<RunOutcome, TemplaterError>
    where
        W: Workspace + ?Sized,
    {
        let folder = folder.unwrap_or_else(|| RelativePath::new(""));
        let created = self.store.create(folder, &self.new_note_name).await?;
        let config = self.create_running_config(template, &created, RunMode::CreateFromTemplate);

        let output = match self.read_and_render(&config).await {
            Ok(output) => output,
            Err(err) => {
                if let Err(delete_err) = self.store.delete(&created).await {
                    log::warn!("Failed to remove {created} after failed run: {delete_err}");
                }
                return Err(err);
            }
        };
        self.merge(&config, output, workspace).await
    }

    /// Render `template` at the caret of the active document.
    pub async fn append_template<W>(
        &self,
        workspace: &mut W,
        template: &DocumentRef,
    ) -> Result<RunOutcome, TemplaterError>
    where
        W: Workspace + ?Sized,
    {
        let mode = RunMode::AppendToActiveDocument;
        let target = workspace
            .active_surface()
            .map(|surface| surface.document().clone())
            .ok_or(TemplaterError::NoActiveSurface { mode })?;
        let config = self.create_running_config(template, &target, mode);
        self.run(&config, workspace).await
    }

    /// Replace `file` with its own content rendered as a template.
    pub async fn overwrite_file_templates<W>(
        &self,
        workspace: &mut W,
        file: &DocumentRef,
    ) -> Result<RunOutcome, TemplaterError>
    where
        W: Workspace + ?Sized,
    {
        let config = self.create_running_config(file, file, RunMode::OverwriteDocument);
        self.run(&config, workspace).await
    }

    /// Replace the active document with its own content rendered as a
    /// template.
    pub async fn overwrite_active_file_templates<W>(
        &self,
        workspace: &mut W,
    ) -> Result<RunOutcome, TemplaterError>
    where
        W: Workspace + ?Sized,
    {
        let mode = RunMode::OverwriteActiveDocument;
        let file = workspace
            .active_surface()
            .map(|surface| surface.document().clone())
            .ok_or(TemplaterError::NoActiveSurface { mode })?;
        let config = self.create_running_config(&file, &file, mode);
        self.run(&config, workspace).await
    }

    /// Re-render the text of a preview block that uses `tp.dynamic`.
    ///
    /// Returns `false` when the block has no dynamic commands or `source` no
    /// longer exists. The preview text is replaced, storage is never touched.
    pub async fn process_dynamic_templates<P>(
        &self,
        preview: &mut P,
        source: &DocumentRef,
    ) -> Result<bool, TemplaterError>
    where
        P: PreviewSurface + ?Sized,
    {
        let content = preview.text().trim().to_string();
        if !content.contains("tp.dynamic") {
            return Ok(false);
        }
        if !self.store.exists(source).await {
            log::debug!("dynamic block source {source} not found");
            return Ok(false);
        }

        let config = self.create_running_config(source, source, RunMode::DynamicRender);
        let output = self.render_text(&config, &content).await?;
        preview.set_text(output);
        Ok(true)
    }
}

/// Fail unless modes bound to the active editor have it showing their target.
fn check_active_surface<W>(config: &RunningConfig, workspace: &mut W) -> Result<(), TemplaterError>
where
    W: Workspace + ?Sized,
{
    let mode = config.run_mode;
    if !mode.requires_active_surface() {
        return Ok(());
    }
    let surface = workspace
        .active_surface()
        .ok_or(TemplaterError::NoActiveSurface { mode })?;
    if surface.document() != &config.target_document {
        return Err(TemplaterError::ActiveDocumentMismatch {
            mode,
            target: config.target_document.clone(),
            active: surface.document().clone(),
        });
    }
    Ok(())
}
