use clap::ValueEnum;
use std::path::PathBuf;

/// Glint command line interface arguments.
#[derive(clap::Parser, Debug)]
#[clap(author, version, about = "Offline CPU path tracer for sphere scenes.")]
pub struct CliArgs {
    /// Built-in scene to render.
    #[clap(short, long, value_enum, default_value_t = ScenePreset::CheckeredSpheres)]
    pub scene: ScenePreset,

    /// Where to write the rendered image; the extension picks the format.
    #[clap(short, long, default_value = "out.tga")]
    pub output: PathBuf,

    /// Image width in pixels; the height follows the scene's aspect ratio.
    #[clap(long)]
    pub width: Option<u32>,

    /// Samples per pixel.
    #[clap(long)]
    pub samples: Option<u32>,

    /// Bounce budget per path.
    #[clap(long)]
    pub depth: Option<u32>,

    /// Seed for the render's random streams.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Path to a JSON file with `render` and `camera` sections.
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Render on the calling thread instead of the rayon pool.
    #[clap(long)]
    pub single_threaded: bool,

    /// Whether to print verbose information.
    #[clap(short, long, help = "Use verbose output (log level = debug)")]
    pub verbose: bool,

    /// Whether to print only warnings and errors.
    #[clap(short, long, conflicts_with = "verbose", help = "Only print warnings and errors")]
    pub quiet: bool,
}

impl CliArgs {
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        }
    }
}

/// Scenes built into the binary.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenePreset {
    /// Checker ground, three large spheres and a field of small moving ones.
    BouncingSpheres,
    /// Two large checkered spheres touching at the origin.
    CheckeredSpheres,
    /// 5x5x5 grid of diffuse spheres coloured by position.
    SimpleGrid,
    /// A single perfect mirror.
    Mirror,
    /// A single diffuse red sphere.
    WhiteSphere,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["glint"]);
        assert_eq!(args.scene, ScenePreset::CheckeredSpheres);
        assert_eq!(args.output, PathBuf::from("out.tga"));
        assert!(args.width.is_none());
        assert!(!args.single_threaded);
        assert_eq!(args.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::parse_from([
            "glint",
            "--scene",
            "bouncing-spheres",
            "-o",
            "render.png",
            "--width",
            "320",
            "--samples",
            "8",
            "--depth",
            "4",
            "--seed",
            "7",
            "--single-threaded",
            "-v",
        ]);
        assert_eq!(args.scene, ScenePreset::BouncingSpheres);
        assert_eq!(args.output, PathBuf::from("render.png"));
        assert_eq!(args.width, Some(320));
        assert_eq!(args.samples, Some(8));
        assert_eq!(args.depth, Some(4));
        assert_eq!(args.seed, Some(7));
        assert!(args.single_threaded);
        assert_eq!(args.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        assert!(CliArgs::try_parse_from(["glint", "-q", "-v"]).is_err());
        let args = CliArgs::parse_from(["glint", "-q"]);
        assert_eq!(args.log_level(), log::LevelFilter::Warn);
    }
}
