use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use relief::{
    mesh::Heightmap,
    options::{Options, TerrainMode},
    ReliefError, Viewer,
};

/// Fly over a heightmap terrain.
#[derive(Parser, Debug)]
#[command(name = "relief", version, about)]
struct Cli {
    /// Heightmap image (PNG or JPEG). Enables the strip and patch modes.
    heightmap: Option<PathBuf>,

    /// Terrain mode shown at startup.
    #[arg(long, value_parser = clap::value_parser!(TerrainMode))]
    mode: Option<TerrainMode>,

    /// TOML options file. Missing sections use defaults.
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Directory holding the WGSL shaders.
    #[arg(long, value_name = "DIR")]
    shader_dir: Option<PathBuf>,
}

impl Cli {
    /// Options from the file (or defaults) with command-line overrides on
    /// top.
    fn resolve_options(&self) -> Result<Options, ReliefError> {
        let mut options = match &self.options {
            Some(path) => {
                log::info!("loading options from {}", path.display());
                Options::load(path)?
            }
            None => Options::default(),
        };
        if let Some(path) = &self.heightmap {
            options.terrain.heightmap = Some(path.clone());
        }
        if let Some(mode) = self.mode {
            options.terrain.mode = mode;
        } else if self.heightmap.is_none()
            && options.terrain.heightmap.is_none()
        {
            options.terrain.mode = TerrainMode::Plane;
        }
        if let Some(dir) = &self.shader_dir {
            options.terrain.shader_dir.clone_from(dir);
        }
        Ok(options)
    }
}

fn run(cli: &Cli) -> Result<(), ReliefError> {
    let options = cli.resolve_options()?;

    let heightmap = match &options.terrain.heightmap {
        Some(path) => Some(Heightmap::open(path)?),
        None => None,
    };
    if heightmap.is_none() && options.terrain.mode.needs_heightmap() {
        return Err(ReliefError::MissingHeightmap(options.terrain.mode));
    }

    let mut builder = Viewer::builder().with_options(options);
    if let Some(heightmap) = heightmap {
        builder = builder.with_heightmap(heightmap);
    }
    builder.build().run()
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("relief").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn no_heightmap_falls_back_to_plane() {
        let options = parse(&[]).resolve_options().unwrap();
        assert_eq!(options.terrain.mode, TerrainMode::Plane);
        assert_eq!(options.terrain.heightmap, None);
    }

    #[test]
    fn heightmap_keeps_default_strip_mode() {
        let options = parse(&["fjord.png"]).resolve_options().unwrap();
        assert_eq!(options.terrain.mode, TerrainMode::Strip);
        assert_eq!(options.terrain.heightmap, Some(PathBuf::from("fjord.png")));
    }

    #[test]
    fn flags_override_options() {
        let options = parse(&["--mode", "Patch", "--shader-dir", "shaders", "hm.png"])
            .resolve_options()
            .unwrap();
        assert_eq!(options.terrain.mode, TerrainMode::Patch);
        assert_eq!(options.terrain.shader_dir, PathBuf::from("shaders"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["relief", "--mode", "voxel"]).is_err());
    }
}
