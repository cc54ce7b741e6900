use std::path::{Path, PathBuf};

use anyhow::ensure;
use image::RgbaImage;
use log::info;

pub mod classify;
pub mod grid;
pub mod raster;
pub mod stats;

pub use grid::{Grid, Point};
pub use stats::GridStats;

/// Parameters controlling how a map image is turned into a grid
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GridParams {
    /// Edge length of the (square) output grid
    pub size: u32,
    /// Luminance below which a non-door pixel is a wall
    pub threshold: u8,
    /// Number of dilation iterations applied to blocked cells
    pub dilate: u32,
    /// Gaussian blur radius applied before resampling, 0 disables it
    pub blur: u32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            size: 128,
            threshold: 100,
            dilate: 1,
            blur: 0,
        }
    }
}

impl GridParams {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        ensure!(self.size > 0, "grid size must be at least 1");
        Ok(())
    }
}

/// What happened to a single invocation of [`run`]
#[derive(Debug)]
pub enum Outcome {
    /// The grid was generated and written
    Written(GridStats),
    /// The input image does not exist, nothing was written
    MissingInput(PathBuf),
}

/// Runs the in-memory part of the pipeline: blur, resample, classify, dilate
pub fn build_grid(image: &RgbaImage, params: &GridParams) -> Result<Grid, anyhow::Error> {
    params.validate()?;

    let blurred;
    let image = if params.blur > 0 {
        info!("applying gaussian blur (radius={})", params.blur);
        blurred = raster::blur(image, params.blur);
        &blurred
    } else {
        image
    };

    info!(
        "analysing map (size={}x{}, threshold={})",
        params.size, params.size, params.threshold
    );
    let small = raster::resize_bilinear(image, params.size, params.size);
    let grid = classify::classify(&small, params.threshold);

    if params.dilate > 0 {
        info!("expanding walls ({} iterations)", params.dilate);
        return Ok(grid.dilate(params.dilate as usize));
    }

    Ok(grid)
}

/// Reads `input`, generates the grid and writes it as JSON to `output`
pub fn run(input: &Path, output: &Path, params: &GridParams) -> Result<Outcome, anyhow::Error> {
    params.validate()?;

    info!("reading image: {}", input.display());
    let Some(image) = raster::open_rgba(input)? else {
        return Ok(Outcome::MissingInput(input.to_path_buf()));
    };

    let grid = build_grid(&image, params)?;

    info!("writing grid to {}", output.display());
    grid.save(output)?;

    Ok(Outcome::Written(GridStats::new(&grid, params)))
}
