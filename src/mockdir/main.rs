use chrono::Utc;
use clap::Parser;
use colored::*;
use mockdir::commands::{self, CmdMessage, MessageLevel};
use mockdir::config::{ConfigSource, StoreConfig};
use mockdir::error::Result;
use mockdir::logging;
use mockdir::model::{EncodedPayload, MockEntry};
use mockdir::store::fs_backend::FsBackend;
use mockdir::store::mock_store::MockStore;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

mod args;
use args::{Cli, Commands};

const ROOT_ENV: &str = "MOCKDIR_ROOT";
const KEY_WIDTH: usize = 32;
const TIME_WIDTH: usize = 16;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        print_messages(&[CmdMessage::error(format!("Error: {}", e))]);
        std::process::exit(1);
    }
}

struct AppContext {
    store: MockStore<FsBackend>,
    json: bool,
}

fn run(cli: Cli) -> Result<()> {
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Put {
            service,
            identity,
            payload,
            file,
        } => handle_put(&ctx, &service, &identity, payload, file),
        Commands::Get { service, identity } => handle_get(&ctx, &service, &identity),
        Commands::Search { term } => handle_search(&ctx, &term),
        Commands::List { service } => handle_list(&ctx, service.as_deref()),
        Commands::Path { service, identity } => handle_path(&ctx, &service, &identity),
        Commands::Status => handle_status(&ctx),
        Commands::Config => handle_config(&ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let root = cli
        .root
        .clone()
        .or_else(|| std::env::var_os(ROOT_ENV).map(PathBuf::from));
    let config = StoreConfig::load_with_root(&config_source(cli), root.as_deref())?;

    Ok(AppContext {
        store: MockStore::<FsBackend>::open(config),
        json: cli.json,
    })
}

fn config_source(cli: &Cli) -> ConfigSource {
    match (&cli.config, &cli.config_dir, &cli.config_name) {
        (Some(file), _, _) => ConfigSource::File(file.clone()),
        (None, dir, Some(name)) => ConfigSource::Named {
            name: name.clone(),
            dir: dir.clone().unwrap_or_else(|| PathBuf::from(".")),
        },
        (None, Some(dir), None) => ConfigSource::Dir(dir.clone()),
        (None, None, None) => ConfigSource::Default,
    }
}

fn handle_put(
    ctx: &AppContext,
    service: &str,
    identity: &str,
    payload: Option<String>,
    file: Option<PathBuf>,
) -> Result<()> {
    let bytes = match (payload, file) {
        (_, Some(path)) => fs::read(path)?,
        (Some(text), None) if text != "-" => text.into_bytes(),
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let result = commands::put::run(&ctx.store, service, identity, &bytes)?;
    if ctx.json {
        print_json(&json!({ "path": result.paths.first() }))?;
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_get(ctx: &AppContext, service: &str, identity: &str) -> Result<()> {
    let result = commands::get::run(&ctx.store, service, identity)?;
    let payload = result.payload.unwrap_or_default();

    if ctx.json {
        let encoded = EncodedPayload::new(&payload);
        print_json(&json!({
            "path": result.paths.first(),
            "source": result.source,
            "encoding": encoded.encoding,
            "payload": encoded.data,
        }))?;
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&payload)?;
        stdout.flush()?;
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_search(ctx: &AppContext, term: &str) -> Result<()> {
    let result = commands::search::run(&ctx.store, term)?;
    if ctx.json {
        print_json(&result.paths)?;
    } else {
        for path in &result.paths {
            println!("{}", path.display());
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, service: Option<&str>) -> Result<()> {
    let result = commands::list::run(&ctx.store, service)?;
    if ctx.json {
        print_json(&result.entries)?;
    } else {
        print_entries(&result.entries);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_path(ctx: &AppContext, service: &str, identity: &str) -> Result<()> {
    let result = commands::paths::run(&ctx.store, service, identity)?;
    if ctx.json {
        print_json(&result.paths)?;
    } else {
        for path in &result.paths {
            println!("{}", path.display());
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_status(ctx: &AppContext) -> Result<()> {
    let result = commands::status::run(&ctx.store)?;
    if let Some(status) = &result.status {
        if ctx.json {
            print_json(status)?;
        } else {
            println!("root        {}", status.root.display());
            println!(
                "directories {} / {}",
                status.sub_dirs, status.max_entries
            );
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext) -> Result<()> {
    let result = commands::config::run(&ctx.store)?;
    if let Some(config) = &result.config {
        if ctx.json {
            print_json(config)?;
        } else {
            println!("mockFolderPath = {}", config.root_path.display());
            println!("mockFolderMaxEntries = {}", config.max_entries_per_dir);
            println!("fileExtension = {}", config.file_suffix);
            println!(
                "fallbackOnMissingIdentity = {}",
                config.fallback_on_missing_identity
            );
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Messages go to stderr so stdout carries only data.
fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => eprintln!("{}", message.content.dimmed()),
            MessageLevel::Success => eprintln!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

fn print_entries(entries: &[MockEntry]) {
    for entry in entries {
        let time_ago = entry
            .modified
            .map(format_time_ago)
            .unwrap_or_else(|| format!("{:>width$}", "-", width = TIME_WIDTH));
        println!(
            "{:<key_width$} {:>8} {} {}",
            entry.key.to_string().bold(),
            entry.size,
            time_ago.dimmed(),
            entry.path.display(),
            key_width = KEY_WIDTH
        );
    }
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
