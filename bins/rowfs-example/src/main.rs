use std::sync::Arc;

use clap::Parser;

use rowfs_kv::KvStore;
use rowfs_kv_backends::MemStore;
use rowfs_logging::LogConfig;
use rowfs_namespace::{
    Block, CreateFlags, LocalBlockAgent, Namespace, NamespaceConfig, RowKeyCodec,
};

/// rowfs example application.
///
/// Builds a namespace over an in-memory sorted store and walks through the
/// core operations: mkdirs, create, block allocation, listing, rename, and
/// recursive delete.
#[derive(Parser, Debug)]
#[command(name = "rowfs-example", version, about)]
struct Args {
    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = rowfs_logging::init_logging(&LogConfig {
        level: args.log_level.clone(),
        ..LogConfig::default()
    });

    let store: Arc<dyn KvStore> = Arc::new(MemStore::new());
    let agent = Arc::new(LocalBlockAgent::new(store.clone(), RowKeyCodec::new()));
    let ns = Namespace::new(store, agent, NamespaceConfig::default());
    ns.format().await?;
    tracing::info!("namespace formatted");

    ns.mkdirs("/data/logs", 0o755, true).await?;

    let flags = CreateFlags {
        create_parent: true,
        ..CreateFlags::default()
    };
    ns.create("/data/logs/app.log", flags, 0o644, 2, 4 << 20).await?;
    let (block, locations) = ns.add_block("/data/logs/app.log", None).await?;
    tracing::info!(block_id = block.id, replicas = locations.len(), "allocated first block");

    let last = Block {
        num_bytes: 1024,
        ..block
    };
    ns.complete("/data/logs/app.log", Some(last)).await?;

    let listing = ns.get_listing("/data/logs", "", 100).await?;
    for entry in &listing.entries {
        tracing::info!(
            name = entry.file_name(),
            dir = entry.is_dir,
            length = entry.length,
            "entry"
        );
    }

    ns.rename("/data/logs", "/archive", false).await?;
    tracing::info!("renamed /data/logs to /archive");

    let summary = ns.get_content_summary("/archive").await?;
    tracing::info!(
        files = summary.file_count,
        dirs = summary.directory_count,
        bytes = summary.length,
        "content summary"
    );

    let deleted = ns.delete("/archive", true).await?;
    tracing::info!(deleted, "recursive delete finished");

    Ok(())
}
