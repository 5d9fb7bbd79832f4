//! Main executable for helix-cv

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use helix_cv::cv::alpha_rmsd::AlphaRmsdCV;
use helix_cv::cv::CollectiveVariable;
use helix_cv::io::read_pdb_positions;
use helix_cv::snapshot::SystemSnapshot;

/// Command-line arguments for the application
#[derive(Parser, Debug)]
#[clap(
    name = "helixcv",
    version = helix_cv::VERSION,
    about = "Alpha-helix character of a protein backbone segment"
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score the alpha-helix character of a residue range in a PDB structure
    Score {
        /// PDB file providing both the reference indices and the coordinates
        #[clap(long, value_parser)]
        pdb: PathBuf,

        /// Residue range to score, lower index first (e.g. 10,20)
        #[clap(long, value_parser, value_delimiter = ',')]
        residues: Vec<i32>,

        /// Emit the result as JSON (checkpoint record plus value)
        #[clap(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Parse command-line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            pdb,
            residues,
            json,
        } => {
            let mut cv = AlphaRmsdCV::new(&residues, &pdb)
                .with_context(|| format!("Invalid residue range {:?}", residues))?;

            info!("Loading structure: {}", pdb.display());
            let positions = read_pdb_positions(&pdb)
                .with_context(|| format!("Failed to read coordinates from {}", pdb.display()))?;
            let snapshot = SystemSnapshot::from_positions(positions);

            cv.initialize(&snapshot).with_context(|| {
                format!("Failed to resolve backbone atoms in {}", pdb.display())
            })?;
            info!(
                "Resolved {} backbone atoms over {} windows",
                cv.atom_ids().len(),
                cv.num_windows()
            );

            cv.evaluate(&snapshot)
                .context("Failed to evaluate alpha-helix character")?;

            if json {
                let mut record = cv.serialize();
                record["value"] = serde_json::json!(cv.value());
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("alpha-helix character: {:.6}", cv.value());
            }
        }
    }

    Ok(())
}
