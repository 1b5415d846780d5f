use catalog_assets::types::ProcessEvent;
use catalog_assets::{catalog, config, convert, output, process};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

fn version_string() -> &'static str {
    let on_tag = env!("CATALOG_ASSETS_ON_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("CATALOG_ASSETS_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "catalog-assets")]
#[command(about = "Product image renditions and catalog manifest for the storefront")]
#[command(long_about = "\
Product image renditions and catalog manifest for the storefront

Every folder under the product root is a product. Swatches named after their
color code attach colors; an optional info.json carries the rest.

Product structure:

  assets/productos/
  ├── colores/                 # Shared swatches (never a product)
  │   ├── C010.png
  │   └── C011.webp
  ├── Mesa Roble/              # Product \"Mesa Roble\"
  │   ├── info.json            # Metadata (found anywhere in the folder)
  │   ├── C001.png             # Swatch + original for renditions
  │   └── colores/
  │       └── C002.svg
  └── Silla/

Renditions are written next to each original as <name>-<width>.webp (and
.png for PNG originals). Widths larger than the original are skipped.

Run 'catalog-assets gen-config' to generate a documented assets.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Project root; configured paths are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file [default: <root>/assets.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate responsive renditions of every product image
    Responsive,
    /// Write the product catalog manifest
    Catalog,
    /// Give every original PNG a same-size WebP sibling
    ToWebp,
    /// Give every shared color WebP a PNG sibling
    ColorsToPng,
    /// Delete PNGs that already have a WebP sibling
    CleanPng,
    /// Run responsive, then catalog
    All,
    /// Print a stock assets.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let root = cli.root.as_path();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| root.join(config::CONFIG_FILENAME));
    let config = config::load_config(&config_path)?;

    match cli.command {
        Command::Responsive => run_responsive(&config, root)?,
        Command::Catalog => run_catalog(&config, root)?,
        Command::ToWebp => {
            let (tx, printer) = spawn_printer(root);
            let stats = convert::to_webp(&config, root, Some(tx))?;
            join_printer(printer);
            output::print_run_summary("to-webp", &stats);
        }
        Command::ColorsToPng => {
            let (tx, printer) = spawn_printer(root);
            let stats = convert::colors_to_png(&config, root, Some(tx))?;
            join_printer(printer);
            output::print_run_summary("colors-to-png", &stats);
        }
        Command::CleanPng => {
            let (tx, printer) = spawn_printer(root);
            let removed = convert::clean_png(&config, root, Some(tx));
            join_printer(printer);
            output::print_clean_summary(removed);
        }
        Command::All => {
            println!("==> Renditions");
            run_responsive(&config, root)?;
            println!("==> Catalog");
            run_catalog(&config, root)?;
        }
        Command::GenConfig => {}
    }

    Ok(())
}

fn run_responsive(config: &config::AssetConfig, root: &Path) -> Result<(), process::ProcessError> {
    let (tx, printer) = spawn_printer(root);
    let stats = process::process(
        &config.products_dir(root),
        &process::ProcessConfig::from_config(config),
        Some(tx),
    )?;
    join_printer(printer);
    output::print_run_summary("responsive", &stats);
    Ok(())
}

fn run_catalog(config: &config::AssetConfig, root: &Path) -> Result<(), catalog::CatalogError> {
    let report = catalog::generate(config, root)?;
    output::print_catalog_output(&report, root);
    Ok(())
}

/// Print progress events on a dedicated thread until the sender is dropped.
fn spawn_printer(root: &Path) -> (Sender<ProcessEvent>, JoinHandle<()>) {
    let (tx, rx) = std::sync::mpsc::channel();
    let root = root.to_path_buf();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event, &root) {
                println!("{}", line);
            }
        }
    });
    (tx, printer)
}

fn join_printer(printer: JoinHandle<()>) {
    // A panicked printer only loses progress lines.
    printer.join().ok();
}
