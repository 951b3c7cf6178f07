use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use keystore::{Keystore, KeystoreConfig, KeystoreError, Platform};
use keystore_gate::Interlock;
use keystore_types::Value;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut store = open_store(&cli)?;
    match cli.command {
        Command::Show => cmd_show(&store),
        Command::Get(args) => cmd_get(&store, args),
        Command::Set(args) => cmd_set(&mut store, args),
        Command::Remove(args) => cmd_remove(&mut store, args),
    }
}

/// Build the configuration from the optional TOML file and the overrides on
/// the command line, then open the store under `--root`.
fn open_store(cli: &Cli) -> anyhow::Result<Keystore> {
    let mut config = match &cli.config {
        Some(path) => KeystoreConfig::from_toml_file(path)?,
        None => KeystoreConfig::new().with_diagnostics(true),
    };
    if cli.quiet {
        config.diagnostics = false;
    }
    if let Some(file) = &cli.file {
        config.path = file.clone();
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    for raw in &cli.defaults {
        let (key, value) = parse_assignment(raw)?;
        config.defaults.insert(key.to_string(), Value::from(value));
    }
    config.validate()?;
    debug!(root = %cli.root.display(), path = %config.path, format = %config.format, "opening keystore");

    let interlock = match cli.interlock {
        InterlockArg::None => Interlock::Unconfigured,
        InterlockArg::Disabled => Interlock::Disabled,
    };
    Ok(Keystore::new(config, interlock, Platform::host_dir(&cli.root)))
}

fn parse_assignment(raw: &str) -> anyhow::Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("expected KEY=VALUE, got {raw:?}"),
    }
}

/// Typed value for `key`: declared keys take their default's kind, transient
/// keys stay strings.
fn typed_value(store: &Keystore, key: &str, raw: &str) -> anyhow::Result<Value> {
    match store.defaults().get(key) {
        Some(default) => default
            .coerce_like(raw)
            .with_context(|| format!("invalid value for {key}")),
        None => Ok(Value::from(raw)),
    }
}

fn cmd_show(store: &Keystore) -> anyhow::Result<()> {
    println!("{} {}", "Filename:".bold(), store.path().full());
    for (key, value) in store.entries() {
        let marker = if store.defaults().contains_key(key) { "" } else { " (transient)" };
        println!("  {}: {}{}", key.cyan(), value, marker.dimmed());
    }
    if store.is_dirty() {
        println!("{}", "File is dirty".yellow());
    }
    if !store.is_persistent() {
        println!("{}", "Storage is not persistent".yellow());
    }
    Ok(())
}

fn cmd_get(store: &Keystore, args: GetArgs) -> anyhow::Result<()> {
    let value = store
        .get(&args.key)
        .ok_or_else(|| anyhow!("no value for {}; declare it with --default or in the config file", args.key))?;
    println!("{value}");
    Ok(())
}

fn cmd_set(store: &mut Keystore, args: SetArgs) -> anyhow::Result<()> {
    let mut entries = Vec::with_capacity(args.assignments.len());
    for raw in &args.assignments {
        let (key, value) = parse_assignment(raw)?;
        entries.push((key.to_string(), typed_value(store, key, value)?));
    }
    for (key, value) in &entries {
        if !store.defaults().contains_key(key) {
            println!("  {} {} is not declared and will not load back", "warning:".yellow(), key);
        }
        println!("  {} {} = {}", "set".green(), key.cyan(), value);
    }
    store.save_if_persistent(entries).map_err(report_save)?;
    println!("{} Saved {}", "✓".green().bold(), store.path().full().bold());
    Ok(())
}

fn cmd_remove(store: &mut Keystore, args: RemoveArgs) -> anyhow::Result<()> {
    for key in &args.keys {
        if store.contains_key(key) {
            println!("  {} {}", "removed".red(), key.cyan());
        }
    }
    store.remove(&args.keys);
    store
        .save_if_persistent(std::iter::empty::<(String, Value)>())
        .map_err(report_save)?;
    println!("{} Saved {}", "✓".green().bold(), store.path().full().bold());
    Ok(())
}

fn report_save(e: KeystoreError) -> anyhow::Error {
    match e {
        KeystoreError::NotPersistent { .. } => {
            anyhow!("{e}; run with --interlock disabled to write")
        }
        other => other.into(),
    }
}
