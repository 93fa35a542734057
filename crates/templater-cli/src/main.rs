use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use relative_path::RelativePath;
use std::{env, path::PathBuf, process};
use templater_config::Config;
use templater_engine::{
    CaretTransaction, DocumentRef, DocumentStore, EditableSurface, FsDocumentStore,
    PassthroughRenderer, PreviewSurface, RunMode, RunOutcome, SurfaceError, Templater, Workspace,
    io,
};

const USAGE: &str = "Usage: templater-cli <create|append|overwrite|overwrite-active|dynamic> <template-or-document> [folder] [--active <document>] [--vault <path>] [--config <path>]";

/// Editor stand-in that edits a document buffer and reports carets on stdout
struct HeadlessSurface {
    document: DocumentRef,
    store: FsDocumentStore,
    buffer: String,
    dirty: bool,
}

#[async_trait]
impl EditableSurface for HeadlessSurface {
    fn document(&self) -> &DocumentRef {
        &self.document
    }

    async fn save(&mut self) -> Result<(), SurfaceError> {
        if self.dirty {
            self.store
                .write(&self.document, &self.buffer)
                .await
                .map_err(|e| SurfaceError::SaveFailed {
                    document: self.document.clone(),
                    reason: e.to_string(),
                })?;
            self.dirty = false;
        }
        Ok(())
    }

    fn replace_selection(&mut self, text: &str) {
        // The caret of a freshly opened headless view sits at the end
        self.buffer.push_str(text);
        self.dirty = true;
    }

    fn set_content(&mut self, content: &str) {
        self.buffer = content.to_string();
        self.dirty = false;
    }

    fn focus(&mut self) {}

    fn apply_transaction(&mut self, transaction: CaretTransaction) {
        for selection in transaction.selections {
            println!("cursor {}", selection.from);
        }
    }
}

struct HeadlessWorkspace {
    store: FsDocumentStore,
    active: Option<HeadlessSurface>,
}

#[async_trait]
impl Workspace for HeadlessWorkspace {
    type Surface = HeadlessSurface;

    fn active_surface(&mut self) -> Option<&mut HeadlessSurface> {
        self.active.as_mut()
    }

    async fn open(&mut self, document: &DocumentRef) -> Result<&mut HeadlessSurface, SurfaceError> {
        let buffer = self
            .store
            .read(document)
            .await
            .map_err(|_| SurfaceError::OpenFailed(document.clone()))?;
        log::debug!("opened {document}");
        Ok(self.active.insert(HeadlessSurface {
            document: document.clone(),
            store: self.store.clone(),
            buffer,
            dirty: false,
        }))
    }
}

struct StdoutPreview(String);

impl PreviewSurface for StdoutPreview {
    fn text(&self) -> &str {
        &self.0
    }

    fn set_text(&mut self, text: String) {
        self.0 = text;
    }
}

struct Args {
    mode: RunMode,
    name: String,
    folder: Option<String>,
    active: Option<String>,
    vault: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut positional = Vec::new();
    let mut active = None;
    let mut vault = None;
    let mut config = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--active" => active = Some(iter.next().context("--active needs a document")?.clone()),
            "--vault" => vault = Some(PathBuf::from(iter.next().context("--vault needs a path")?)),
            "--config" => {
                config = Some(PathBuf::from(iter.next().context("--config needs a path")?))
            }
            _ => positional.push(arg.clone()),
        }
    }

    let [mode, name, rest @ ..] = positional.as_slice() else {
        bail!("missing run mode or template");
    };
    if rest.len() > 1 {
        bail!("unexpected arguments: {}", rest[1..].join(" "));
    }

    Ok(Args {
        mode: mode.parse()?,
        name: name.clone(),
        folder: rest.first().cloned(),
        active,
        vault,
        config,
    })
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match (config, &args.vault) {
        (Some(mut config), Some(vault)) => {
            config.vault_path = vault.clone();
            Ok(config)
        }
        (Some(config), None) => Ok(config),
        (None, Some(vault)) => Ok(Config::new(vault.clone())),
        (None, None) => {
            let config_path = args.config.clone().unwrap_or_else(Config::config_path);
            bail!(
                "no --vault given and no config file found at {}",
                config_path.display()
            )
        }
    }
}

async fn run(args: Args, config: Config) -> Result<()> {
    io::validate_vault_dir(&config.vault_path)
        .with_context(|| format!("vault path '{}' is invalid", config.vault_path.display()))?;
    let store = FsDocumentStore::new(&config.vault_path)?;
    let templater = Templater::new(store.clone(), PassthroughRenderer)
        .with_new_note_name(config.new_note_name.clone());
    let mut workspace = HeadlessWorkspace {
        store: store.clone(),
        active: None,
    };

    if let Some(active) = &args.active {
        workspace.open(&DocumentRef::from(active.as_str())).await?;
    }

    let outcome = match args.mode {
        RunMode::CreateFromTemplate => {
            let template = DocumentRef::from(config.template_path(&args.name).as_str());
            let folder = args.folder.as_deref().map(RelativePath::new);
            templater
                .create_new_note_from_template(&mut workspace, &template, folder)
                .await?
        }
        RunMode::AppendToActiveDocument => {
            let template = DocumentRef::from(config.template_path(&args.name).as_str());
            templater.append_template(&mut workspace, &template).await?
        }
        RunMode::OverwriteDocument => {
            let document = DocumentRef::from(args.name.as_str());
            templater
                .overwrite_file_templates(&mut workspace, &document)
                .await?
        }
        RunMode::OverwriteActiveDocument => {
            let document = DocumentRef::from(args.name.as_str());
            workspace.open(&document).await?;
            templater
                .overwrite_active_file_templates(&mut workspace)
                .await?
        }
        RunMode::DynamicRender => {
            let document = DocumentRef::from(args.name.as_str());
            let mut preview = StdoutPreview(store.read(&document).await?);
            if !templater
                .process_dynamic_templates(&mut preview, &document)
                .await?
            {
                log::info!("no dynamic commands in {document}");
            }
            RunOutcome::Preview(preview.0)
        }
    };

    match outcome {
        RunOutcome::Written { document, cursor } => {
            log::info!("wrote {document} ({cursor:?})");
        }
        RunOutcome::Preview(text) => print!("{text}"),
    }
    Ok(())
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let result = load_config(&parsed).and_then(|config| pollster::block_on(run(parsed, config)));
    if let Err(e) = result {
        log::error!("{e:#}");
        process::exit(1);
    }
}
