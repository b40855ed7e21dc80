use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use molecule_gallery_generator::{generate_gallery, GalleryConfig};

#[derive(Parser)]
#[command(author, version, about = "XYZ batch to browsable molecule gallery")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates the static gallery and the interactive 3D viewer.
    Generate {
        /// Index table with a `name` column.
        #[arg(short, long, default_value = "lig_descriptor.csv")]
        index: PathBuf,

        /// Directory holding `<name>.xyz` files.
        #[arg(long, default_value = "Structure")]
        structure_dir: PathBuf,

        /// Static card-grid HTML output.
        #[arg(long, default_value = "molecule_viewer.html")]
        gallery_out: PathBuf,

        /// Interactive single-page HTML output.
        #[arg(long, default_value = "molecule_3d_viewer.html")]
        viewer_out: PathBuf,

        /// Augmented index table output (default: <index>_with_images.csv).
        #[arg(long)]
        augmented_out: Option<PathBuf>,

        /// Scan the structure directory for *.xyz instead of reading the
        /// index table.
        #[arg(long)]
        discover: bool,

        /// Keep original coordinates; do not run force-field refinement.
        #[arg(long)]
        skip_refine: bool,

        /// Export refined geometries as XYZ files into this directory.
        #[arg(long)]
        dump_xyz: Option<PathBuf>,

        /// Label every atom with its index in the depictions.
        #[arg(long)]
        atom_indices: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let start_time = Instant::now();

    match cli.command {
        Commands::Generate {
            index,
            structure_dir,
            gallery_out,
            viewer_out,
            augmented_out,
            discover,
            skip_refine,
            dump_xyz,
            atom_indices,
        } => {
            println!("--- Molecule Gallery Generator ---");
            if discover {
                println!("Discovering structures under {:?}...", structure_dir);
            } else {
                println!("Reading index from {:?}...", index);
            }

            let mut config = GalleryConfig::new();
            config.index_path = index;
            config.structure_dir = structure_dir;
            config.gallery_output = gallery_out.clone();
            config.viewer_output = viewer_out.clone();
            config.augmented_output = augmented_out;
            config.discover = discover;
            config.skip_refine = skip_refine;
            config.dump_xyz_dir = dump_xyz;
            config.style.atom_indices = atom_indices;

            let report = generate_gallery(&config)?;

            println!("\nSuccess!");
            println!("{}", report.describe());
            println!("Gallery written to {:?}", gallery_out);
            println!("Viewer written to {:?}", viewer_out);
            println!("Done in {:.2?}", start_time.elapsed());
        }
    }

    Ok(())
}
