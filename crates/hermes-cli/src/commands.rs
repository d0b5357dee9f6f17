use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use hermes_inbox::{InboxId, NotificationId, NotificationPage, NotificationRepository, TransportContext};
use hermes_server::{HermesServer, ServerConfig};
use hermes_store::{KeyValueStore, RedbKvStore};
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::CheckConfig(args) => cmd_check_config(args, &cli.format),
        Command::Inspect(args) => cmd_inspect(args, &cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(ServerConfig::default()),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(storage) = args.storage {
        config.storage_path = storage;
    }
    config.validate().context("invalid configuration")?;

    println!(
        "{} Hermes inbox server on {} (storage: {})",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        config.storage_path.display()
    );
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(HermesServer::new(config).serve())?;
    println!("{} Server stopped.", "✓".green());
    Ok(())
}

fn cmd_check_config(args: CheckConfigArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let resolver = config.validate().context("invalid configuration")?;

    let ctx = TransportContext::new(config.default_protocol, args.host);
    let inbox = InboxId::new("inbox1")?;
    let notification = NotificationId::parse("00000000-0000-4000-8000-000000000000")?;
    let inbox_iri = resolver.resolve_inbox_id(&inbox, &ctx)?;
    let notification_iri = resolver.resolve_notification_id(&inbox, &notification, &ctx)?;

    match format {
        OutputFormat::Json => {
            let report = json!({
                "valid": true,
                "bind_addr": config.bind_addr.to_string(),
                "storage_path": config.storage_path.display().to_string(),
                "inbox_template": resolver.inbox_template().as_str(),
                "notification_template": resolver.notification_template().as_str(),
                "sample_inbox": inbox_iri,
                "sample_notification": notification_iri,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("{} Configuration is valid", "✓".green().bold());
            println!("  Bind:         {}", config.bind_addr.to_string().bold());
            println!("  Storage:      {}", config.storage_path.display());
            println!("  Protocol:     {}", config.default_protocol.to_string().cyan());
            println!(
                "  Forwarded:    {}",
                if config.trust_forwarded_headers { "trusted" } else { "ignored" }
            );
            println!("  Page size:    {}", config.max_page_size);
            println!("  Inbox:        {}", inbox_iri.blue());
            println!("  Notification: {}", notification_iri.blue());
        }
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs, format: &OutputFormat) -> anyhow::Result<()> {
    if !args.storage.exists() {
        bail!("no database at {}", args.storage.display());
    }
    let store = RedbKvStore::open(&args.storage)
        .with_context(|| format!("opening {}", args.storage.display()))?;
    let total = store.len()?;
    let repository = NotificationRepository::new(Arc::new(store)).with_page_size(args.limit);

    let inbox = InboxId::new(args.inbox.as_str())?;
    let after = args.after.map(|id| NotificationId::parse(id)).transpose()?;
    let page = repository.list(&inbox, after.as_ref())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page_json(&page))?),
        OutputFormat::Text => print_page(&inbox, &page, total),
    }
    Ok(())
}

fn page_json(page: &NotificationPage) -> serde_json::Value {
    json!({
        "notifications": page.notifications,
        "next": page.next,
    })
}

fn print_page(inbox: &InboxId, page: &NotificationPage, total: u64) {
    if page.notifications.is_empty() {
        println!("Inbox {} has no notifications.", inbox.as_str().yellow());
        return;
    }
    println!(
        "Inbox {} ({} shown, {} records in store)",
        inbox.as_str().yellow().bold(),
        page.notifications.len(),
        total
    );
    for n in &page.notifications {
        println!("{}  {}", n.id.as_str().yellow(), n.updated.dimmed());
        println!("  actor:  {}", n.actor);
        println!("  object: {}", n.object);
        println!("  target: {}", n.target);
    }
    if let Some(next) = &page.next {
        println!("\nMore notifications follow; continue with {} {}", "--after".bold(), next);
    }
}
