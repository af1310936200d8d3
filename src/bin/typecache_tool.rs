use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use typecache::{
    Codec, JsonCodec, MappingMetadata, MessagePackCodec, PersistentStore, TypeDescriptor,
    metadata::METADATA_FILE_PREFIX,
};

#[derive(Parser)]
#[command(name = "typecache-tool")]
#[command(about = "Inspect typecache record folders")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the records stored under a cache folder
    List {
        root: PathBuf,
    },
    /// Decode one record and print it as JSON
    Show {
        root: PathBuf,
        file: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::List { root } => list(root),
        Command::Show { root, file } => show(root, &file),
    }
}

fn open(root: PathBuf) -> Result<PersistentStore> {
    // inspection never creates folders
    if !root.is_dir() {
        return Err(anyhow!("Cache folder '{}' does not exist", root.display()));
    }
    PersistentStore::open(&root)
        .with_context(|| format!("Failed to open cache folder '{}'", root.display()))
}

fn list(root: PathBuf) -> Result<()> {
    let store = open(root)?;
    let keys = store.keys().context("Failed to list records")?;
    for key in &keys {
        println!("{}", key);
    }
    println!("{} record(s)", keys.len());
    Ok(())
}

fn show(root: PathBuf, file: &str) -> Result<()> {
    let store = open(root)?;
    let rendered = if file.starts_with(METADATA_FILE_PREFIX) && file.ends_with(JsonCodec.extension()) {
        let metadata: MappingMetadata = store
            .load(&JsonCodec, file)
            .with_context(|| format!("Failed to decode metadata record '{}'", file))?;
        serde_json::to_string_pretty(&metadata)?
    } else if file.ends_with(MessagePackCodec.extension()) {
        let descriptor: TypeDescriptor = store
            .load(&MessagePackCodec, file)
            .with_context(|| format!("Failed to decode descriptor record '{}'", file))?;
        serde_json::to_string_pretty(&descriptor)?
    } else if file.ends_with(JsonCodec.extension()) {
        let descriptor: TypeDescriptor = store
            .load(&JsonCodec, file)
            .with_context(|| format!("Failed to decode descriptor record '{}'", file))?;
        serde_json::to_string_pretty(&descriptor)?
    } else {
        return Err(anyhow!("Unrecognized record type '{}'", file));
    };
    println!("{}", rendered);
    Ok(())
}
