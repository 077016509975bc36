//! src/main.rs
//! Line-oriented vault target chooser over the local disk.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use compact_str::CompactString;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};

use chooser_core::{
    Config, Logger,
    controller::{ChooserHandle, ChooserLoop, Intent},
    fs::{EntryKind, LocalGateway, SharedGateway},
    model::{ChooserItem, ChooserSnapshot, ItemKind, NoticeLevel},
};

const LISTING_WAIT: Duration = Duration::from_secs(10);

const HELP: &str = "\
commands:
  ls              show the current directory
  cd <name>       enter a directory
  up [n]          go to breadcrumb n (default: parent)
  pick <name>     select an existing file
  new             open the new vault prompt
  name <text>     type a filename into the prompt
  ok              submit the prompt
  close           close the prompt
  draft           select the new vault again
  cancel          discard the new vault
  reload          list the current directory again
  done            finish with the selected target
  quit            abort without a target";

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let config: Config = Config::load().await.unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {e}");
        Config::default()
    });

    let _guard = Logger::init_tracing(&config.logging).context("Failed to initialize logging")?;
    info!("Starting vault chooser");

    let root = config
        .resolved_root_dir()
        .context("Failed to determine chooser root directory")?;
    let local = LocalGateway::new(root, config.show_hidden);
    info!("Serving {} as /", local.base().display());

    let gateway: SharedGateway = Arc::new(local);
    let (chooser, handle) = ChooserLoop::new(gateway, &config);
    let session = tokio::spawn(chooser.run());

    dispatch(&handle, Intent::Initialize).await?;
    render(&handle.snapshot());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match run_command(&handle, line).await {
            Ok(Flow::Continue) => render(&handle.snapshot()),
            Ok(Flow::Finished) => break,
            Err(e) => {
                warn!("command {line:?} failed: {e}");
                println!("error: {e}");
            }
        }
    }

    // stdin closed without `done`/`quit`: dropping the handle aborts the session
    drop(handle);

    let chosen: Option<CompactString> = session.await.context("Chooser session panicked")?;

    match &chosen {
        Some(target) => println!("{target}"),
        None => println!("no target chosen"),
    }

    info!("Chooser exited cleanly");
    Ok(())
}

enum Flow {
    Continue,
    Finished,
}

async fn run_command(handle: &ChooserHandle, line: &str) -> Result<Flow> {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    let snapshot: ChooserSnapshot = handle.snapshot();

    let intent: Intent = match command {
        "ls" => return Ok(Flow::Continue),
        "help" | "?" => {
            println!("{HELP}");
            return Ok(Flow::Continue);
        }
        "cd" => {
            let entry = find_entry(&snapshot, arg, EntryKind::Directory)?;
            Intent::EnterDirectory(entry)
        }
        "up" => {
            let crumbs = snapshot.navigation.breadcrumbs();
            let Some(last) = crumbs.len().checked_sub(1) else {
                bail!("already at the root");
            };

            let index: usize = if arg.is_empty() {
                last
            } else {
                arg.parse().with_context(|| format!("not a breadcrumb index: {arg}"))?
            };

            let crumb = crumbs
                .get(index)
                .ok_or_else(|| anyhow!("no breadcrumb at {index}"))?;
            Intent::NavigateToBreadcrumb(crumb.clone())
        }
        "pick" => Intent::SelectFile(find_entry(&snapshot, arg, EntryKind::File)?),
        "new" => Intent::OpenPrompt,
        "name" => Intent::UpdateFilenameDraft(CompactString::from(arg)),
        "ok" => Intent::SubmitPrompt,
        "close" => Intent::ClosePrompt,
        "draft" => Intent::SelectDraft,
        "cancel" => Intent::CancelDraft,
        "reload" => Intent::Reload,
        "done" => Intent::Finish { confirmed: true },
        "quit" => Intent::Finish { confirmed: false },
        other => bail!("unknown command {other:?}, try `help`"),
    };

    if matches!(intent, Intent::Finish { .. }) {
        handle.send(intent)?;
        return Ok(Flow::Finished);
    }

    dispatch(handle, intent).await?;
    Ok(Flow::Continue)
}

fn find_entry(
    snapshot: &ChooserSnapshot,
    name: &str,
    kind: EntryKind,
) -> Result<chooser_core::fs::DirectoryEntry> {
    if name.is_empty() {
        bail!("missing entry name");
    }

    snapshot
        .navigation
        .entries()
        .iter()
        .find(|e| e.name == name && e.kind == kind)
        .cloned()
        .ok_or_else(|| anyhow!("no {kind:?} named {name:?} here"))
}

/// Send `intent` and wait until the session has published its effect,
/// including the listing it started.
async fn dispatch(handle: &ChooserHandle, intent: Intent) -> Result<()> {
    let navigates = intent.navigates();
    let mut rx = handle.subscribe();
    rx.mark_unchanged();

    handle.send(intent)?;

    let settled = tokio::time::timeout(LISTING_WAIT, async {
        // every intent publishes, rejected ones included
        rx.changed().await?;
        if navigates {
            rx.wait_for(|s| !s.navigation.is_loading()).await?;
        }
        Ok::<(), watch::error::RecvError>(())
    })
    .await;

    match settled {
        Ok(Ok(())) => Ok(()),
        Ok(Err(_)) => bail!("chooser session has ended"),
        Err(_) => {
            warn!("listing still pending after {LISTING_WAIT:?}");
            println!("(still loading)");
            Ok(())
        }
    }
}

fn render(snapshot: &ChooserSnapshot) {
    let trail: Vec<&str> = snapshot.crumbs.iter().map(|c| c.label.as_str()).collect();
    println!();
    println!("[{}]", trail.join(" > "));

    if snapshot.navigation.is_loading() {
        println!("  loading...");
    }

    for item in &snapshot.items {
        println!("{}", render_item(item));
    }

    if snapshot.composer.prompt_open() {
        let draft = snapshot.composer.filename_draft().unwrap_or_default();
        let hint = if snapshot.composer.can_submit() { "" } else { " (invalid)" };
        println!("  new vault name: {draft:?}{hint}");
    }

    if let Some(notice) = &snapshot.notice {
        let level = match notice.level {
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        println!("  {level}: {}", notice.message);
    }

    if let Some(target) = snapshot.navigation.selected_target() {
        println!("  selected: {target}");
    }
}

fn render_item(item: &ChooserItem) -> String {
    let marker = if item.selected { '*' } else { ' ' };
    let icon = match item.kind {
        ItemKind::Directory => "dir ",
        ItemKind::File if item.is_document => "vault",
        ItemKind::File => "file",
        ItemKind::Draft => "new ",
    };
    format!("{marker} {icon:5} {}", item.name)
}
