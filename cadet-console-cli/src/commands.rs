//! Command dispatch against the app state.

use std::path::Path;

use anyhow::{bail, Context};
use cadet_console_app::{AppState, AppStateBuilder, ConsoleConfig, FileTokenStore, ResourceKind};
use cadet_console_core::state::Modal;
use cadet_console_core::traits::describe_token;
use cadet_console_core::{Decision, Record, RecordId, ResourceController, TokenStore};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::render;
use crate::{Cli, Command, ListArgs, ResourceCommand, TokenCommand};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConsoleConfig::load(cli.config.as_deref())
        .await?
        .with_base_url_override(cli.base_url);

    match cli.command {
        Command::Token(cmd) => token(&config, cmd).await,
        Command::Schools(cmd) => resource(config, ResourceKind::Schools, cmd).await,
        Command::Cadets(cmd) => resource(config, ResourceKind::Cadets, cmd).await,
    }
}

async fn token(config: &ConsoleConfig, cmd: TokenCommand) -> anyhow::Result<()> {
    let path = match &config.token_file {
        Some(path) => path.clone(),
        None => FileTokenStore::default_path()?,
    };
    let store = FileTokenStore::new(path);

    match cmd {
        TokenCommand::Set { token } => {
            if token.trim().is_empty() {
                bail!("token must not be empty");
            }
            store.save(token.trim()).await?;
            println!("Token saved to {}", store.path().display());
        }
        TokenCommand::Clear => {
            store.clear().await?;
            println!("Token cleared");
        }
        TokenCommand::Show => {
            let token = store.load().await?;
            println!("{}", describe_token(token.as_deref()));
        }
    }
    Ok(())
}

async fn resource(
    config: ConsoleConfig,
    kind: ResourceKind,
    cmd: ResourceCommand,
) -> anyhow::Result<()> {
    let state = AppStateBuilder::new().config(config).build()?;
    let controller = state.controller(kind).clone();

    let result = match cmd {
        ResourceCommand::List(args) => list(&controller, args).await,
        ResourceCommand::Show { id } => show(&controller, &RecordId::new(id)).await,
        ResourceCommand::Create { file } => create(&controller, &file).await,
        ResourceCommand::Update { id, file } => {
            update(&controller, &RecordId::new(id), &file).await
        }
        ResourceCommand::Delete { id, yes } => delete(&controller, &RecordId::new(id), yes).await,
        ResourceCommand::Stats => stats(&controller).await,
    };

    // Failures carry their own message; only echo what succeeded.
    if result.is_ok() {
        flush_notification(&state).await;
    }
    result
}

async fn flush_notification(state: &AppState) {
    if let Some(note) = state.notifier.last().await {
        render::print_notification(&note);
    }
}

async fn list(controller: &ResourceController, args: ListArgs) -> anyhow::Result<()> {
    let list = controller.list();
    list.set_filters(args.filters).await?;
    if args.page > 1 {
        list.change_page(args.page).await?;
    }
    if let Some(search) = args.search {
        list.search(search).await;
    }

    let view = list.snapshot().await;
    let schema = controller.schema();
    println!("{}", render::table(schema, &view.cells(schema)));
    println!("{}", view.page.summary(&schema.plural.to_lowercase()));
    let pages = render::page_window(&view.page.window());
    if !pages.is_empty() {
        println!("{pages}");
    }
    Ok(())
}

async fn show(controller: &ResourceController, id: &RecordId) -> anyhow::Result<()> {
    controller.open_view(id).await?;
    let record = match controller.modal().await {
        Some(Modal::View {
            record: Some(record),
            ..
        }) => record,
        _ => bail!("{} {id} could not be shown", controller.schema().label),
    };
    controller.close_modal().await;
    print!("{}", render::detail(controller.schema(), &record));
    Ok(())
}

async fn read_record(path: &Path) -> anyhow::Result<Record> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    match Record::from_value(value) {
        Some(record) => Ok(record),
        None => bail!("{} must contain a JSON object", path.display()),
    }
}

async fn create(controller: &ResourceController, file: &Path) -> anyhow::Result<()> {
    let record = read_record(file).await?;
    controller.open_create().await;
    let binder = controller.binder();
    controller
        .with_form(|form| binder.populate(form, &record))
        .await?;
    save(controller).await
}

async fn update(controller: &ResourceController, id: &RecordId, file: &Path) -> anyhow::Result<()> {
    let record = read_record(file).await?;
    controller.open_edit(id).await?;
    let binder = controller.binder();
    controller
        .with_form(|form| binder.populate(form, &record))
        .await?;
    save(controller).await
}

async fn save(controller: &ResourceController) -> anyhow::Result<()> {
    let saved = controller.submit().await;
    controller.close_modal().await;
    let saved = saved?;
    if let Some(id) = saved.id() {
        println!("{} {id}", controller.schema().label);
    }
    Ok(())
}

async fn delete(controller: &ResourceController, id: &RecordId, yes: bool) -> anyhow::Result<()> {
    controller.request_delete(id).await;
    let decision = if yes {
        Decision::Confirm
    } else {
        match controller.pending_action().await {
            Some(action) => Decision::from(ask(&action.title, &action.prompt).await?),
            None => Decision::Cancel,
        }
    };

    if !controller.resolve_confirmation(decision).await? {
        println!("Cancelled");
    }
    Ok(())
}

async fn ask(title: &str, prompt: &str) -> anyhow::Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{title}\n{prompt} [y/N] ").as_bytes())
        .await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn stats(controller: &ResourceController) -> anyhow::Result<()> {
    let stats = controller.stats();
    if !stats.is_available() {
        bail!("{} have no summary counters", controller.schema().plural);
    }
    stats.refresh().await?;
    let view = stats.snapshot().await;
    print!("{}", render::pairs(&view.labeled(&controller.schema().stats)));
    Ok(())
}
