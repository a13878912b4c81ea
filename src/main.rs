use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;
use ragemap::io::{self, DocumentKind};
use ragemap::mlo::MloModel;
use ragemap_files::common::hash::joaat;
use ragemap_files::ytyp::types::Archetype;
use ragemap_files::AbortSignal;

#[derive(Parser, Debug)]
#[command(name = "ragemap", about = "Round-trip and validate asset XML documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a document and report integrity issues.
    Validate { file: PathBuf },
    /// Read a document and re-export it.
    Roundtrip { input: PathBuf, output: PathBuf },
    /// Print the 32-bit name hash of each argument.
    Hash { names: Vec<String> },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), anyhow::Error> {
    let abort = AbortSignal::new();
    match cli.command {
        Command::Validate { file } => {
            let kind = io::detect_kind(&file)
                .ok_or_else(|| anyhow::anyhow!("unrecognized document extension: {}", file.display()))?;
            match kind {
                DocumentKind::Types => {
                    let doc = io::load_types(&file, &abort)?;
                    let mut issues = 0usize;
                    for archetype in &doc.archetypes {
                        if let Archetype::Mlo(mlo) = archetype {
                            let model = MloModel::new(mlo.clone());
                            for issue in model.validate() {
                                println!("{}: {}", archetype.name(), issue);
                                issues += 1;
                            }
                        }
                    }
                    println!(
                        "{}: {} archetypes, {} issues",
                        doc.name,
                        doc.archetypes.len(),
                        issues
                    );
                    if issues > 0 {
                        anyhow::bail!("{} integrity issues", issues);
                    }
                }
                DocumentKind::Map => {
                    let doc = io::load_map(&file, &abort)?;
                    println!(
                        "{}: {} entities, {} occluders, {} car generators",
                        doc.name,
                        doc.entities.len(),
                        doc.occlude_models.len() + doc.box_occluders.len(),
                        doc.car_generators.len()
                    );
                }
                DocumentKind::Nav => {
                    let mesh = io::load_nav(&file, &abort)?;
                    println!(
                        "area {}: {} polygons, {} links, {} cover points",
                        mesh.area_id,
                        mesh.polygons.len(),
                        mesh.links.len(),
                        mesh.cover_points.len()
                    );
                    if !mesh.is_standalone() {
                        let stray: usize = mesh
                            .polygons_by_cell()
                            .iter()
                            .filter(|(cell, _)| **cell != mesh.area_id as u32)
                            .map(|(_, polygons)| polygons.len())
                            .sum();
                        if stray > 0 {
                            println!("{} polygons lie outside cell {}", stray, mesh.area_id);
                        }
                    }
                }
            }
        }
        Command::Roundtrip { input, output } => {
            let kind = io::detect_kind(&input)
                .ok_or_else(|| anyhow::anyhow!("unrecognized document extension: {}", input.display()))?;
            match kind {
                DocumentKind::Types => io::save_types(&io::load_types(&input, &abort)?, &output)?,
                DocumentKind::Map => io::save_map(&io::load_map(&input, &abort)?, &output)?,
                DocumentKind::Nav => io::save_nav(&io::load_nav(&input, &abort)?, &output)?,
            }
            println!("{} -> {}", input.display(), output.display());
        }
        Command::Hash { names } => {
            for name in names {
                println!("{} = 0x{:08X}", name, joaat(&name));
            }
        }
    }
    Ok(())
}
