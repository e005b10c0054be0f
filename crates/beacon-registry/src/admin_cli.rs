//! beacon-admin CLI tool
//!
//! Offline work against the topology record file: seeding at deployment,
//! inspection, geographic audits, and rendering per-node config bundles.
//!
//! Usage:
//!   beacon-admin seed <record.json>       Create the record from a seed document
//!   beacon-admin show                     Print the current record
//!   beacon-admin render <slot> [dir]      Write one slot's config bundle
//!   beacon-admin render-all [dir]         Write every slot's config bundle
//!   beacon-admin audit                    Report geographically misplaced slots

use beacon_assign::SlotAssigner;
use beacon_registry::{Error, ResolverConfig, Result};
use beacon_render::render_node_config;
use beacon_store::{FileStore, RecordStore};
use beacon_topology::{SlotId, TopologyRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_OUT_DIR: &str = "generated-configs";

fn print_usage() {
    eprintln!("beacon-admin - Manage the Beacon topology record");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  beacon-admin seed <record.json>   Create the record from a seed document");
    eprintln!("  beacon-admin show                 Print the current record");
    eprintln!("  beacon-admin render <slot> [dir]  Write one slot's config bundle");
    eprintln!("  beacon-admin render-all [dir]     Write every slot's config bundle");
    eprintln!("  beacon-admin audit                Report geographically misplaced slots");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  BEACON_RECORD_PATH       Record file (default: ./beacon-data/topology.json)");
    eprintln!("  BEACON_REGION_SOURCE     'inventory' (default) or 'static', for audit");
    eprintln!("  BEACON_INVENTORY_URL     Inventory API root, for audit");
    eprintln!("  BEACON_INVENTORY_TOKEN   Inventory API credential, for audit");
}

fn record_path() -> PathBuf {
    std::env::var("BEACON_RECORD_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./beacon-data/topology.json"))
}

fn seed(seed_file: &str) -> Result<()> {
    let raw = std::fs::read_to_string(seed_file)?;
    let record: TopologyRecord =
        serde_json::from_str(&raw).map_err(beacon_store::StoreError::Corrupt)?;

    let path = record_path();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    FileStore::seed(&path, record)?;
    println!("seeded topology record at {}", path.display());
    Ok(())
}

async fn show() -> Result<()> {
    let store = FileStore::open(record_path())?;
    let (record, version) = store.load().await?;

    eprintln!("# revision {}", version);
    println!(
        "{}",
        serde_json::to_string_pretty(&record).map_err(beacon_store::StoreError::Corrupt)?
    );
    Ok(())
}

fn write_bundle(record: &TopologyRecord, slot_id: &SlotId, out_dir: &Path) -> Result<()> {
    let config = render_node_config(record, slot_id)?;

    let node_dir = out_dir.join(slot_id.as_str());
    std::fs::create_dir_all(&node_dir)?;

    for file in config.file_set() {
        let path = node_dir.join(file.name);
        std::fs::write(&path, file.contents)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

async fn render(slot: &str, out_dir: &str) -> Result<()> {
    let store = FileStore::open(record_path())?;
    let (record, _) = store.load().await?;
    write_bundle(&record, &SlotId::new(slot), Path::new(out_dir))
}

async fn render_all(out_dir: &str) -> Result<()> {
    let store = FileStore::open(record_path())?;
    let (record, _) = store.load().await?;

    let slot_ids: Vec<SlotId> = record.slots.keys().cloned().collect();
    for slot_id in slot_ids {
        write_bundle(&record, &slot_id, Path::new(out_dir))?;
    }
    Ok(())
}

async fn audit() -> Result<()> {
    let store = Arc::new(FileStore::open(record_path())?);
    let resolver = ResolverConfig::from_env().build()?;
    let assigner = SlotAssigner::new(store, resolver);

    let corrections = assigner.audit().await.map_err(Error::Assign)?;
    if corrections.is_empty() {
        println!("(none)");
    } else {
        for c in corrections {
            println!(
                "{} is in slot {} but belongs in {}",
                c.endpoint, c.current_slot, c.correct_slot
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "seed" => {
            if args.len() < 3 {
                eprintln!("Error: seed requires a record.json argument");
                std::process::exit(1);
            }
            seed(&args[2])
        }
        "show" => show().await,
        "render" => {
            if args.len() < 3 {
                eprintln!("Error: render requires a slot argument");
                std::process::exit(1);
            }
            let out_dir = args.get(3).map(String::as_str).unwrap_or(DEFAULT_OUT_DIR);
            render(&args[2], out_dir).await
        }
        "render-all" => {
            let out_dir = args.get(2).map(String::as_str).unwrap_or(DEFAULT_OUT_DIR);
            render_all(out_dir).await
        }
        "audit" => audit().await,
        "-h" | "--help" | "help" => {
            print_usage();
            std::process::exit(0);
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
