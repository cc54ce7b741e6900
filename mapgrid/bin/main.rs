use std::path::PathBuf;

use clap::Parser;
use mapgrid::{Grid, GridParams, Outcome};

/// Generates a walkable/blocked JSON grid from a map image
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input map image (e.g. public/assets/maps/map.png)
    input: PathBuf,

    /// Output JSON file (e.g. public/assets/maps/map_grid.json)
    output: PathBuf,

    /// Grid size, produces an N x N grid
    #[arg(long, default_value_t = 128, value_parser = clap::value_parser!(u32).range(1..))]
    size: u32,

    /// Brightness threshold for walls (0-255)
    #[arg(long, default_value_t = 100)]
    threshold: u8,

    /// Expand walls by N iterations
    #[arg(long, default_value_t = 1)]
    dilate: u32,

    /// Gaussian blur radius applied before processing
    #[arg(long, default_value_t = 0)]
    blur: u32,

    /// Print the resulting grid to stdout
    #[arg(long, default_value_t = false)]
    print: bool,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = GridParams {
        size: args.size,
        threshold: args.threshold,
        dilate: args.dilate,
        blur: args.blur,
    };

    match mapgrid::run(&args.input, &args.output, &params)? {
        Outcome::MissingInput(path) => {
            eprintln!("Error: input file not found: {}", path.display());
        }
        Outcome::Written(stats) => {
            println!("Generated file: {}", args.output.display());
            println!("{}", stats);

            if args.print {
                let grid = Grid::load(&args.output)?;
                println!("{}", grid);
            }
        }
    }

    Ok(())
}
