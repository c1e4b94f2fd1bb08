use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

pub mod assets;
pub mod core;
pub mod error;
pub mod export;

pub use assets::BundledAssets;
pub use crate::core::geometry;
pub use crate::core::{classify, Face, Mesh, ShapeKind, ShapeParameters, ShapeSettings, Vertex};
pub use error::{ExportError, MeshError, ValidationError};
pub use export::{
    CancellationToken, DiagnosticSink, ExportSummary, ExportTask, LogSink, ModelExportService,
    OutputFormat,
};

pub const DEFAULT_LOG_FILE: &str = "shapesmith.log";

#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    Export {
        description: String,
        output: PathBuf,
        format: OutputFormat,
        settings: ShapeSettings,
    },
    DefaultModel {
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub action: Option<CliAction>,
    pub log_file: PathBuf,
    pub verbose: bool,
}

pub fn create_clap_command() -> Command {
    Command::new("shapesmith")
        .about("Generate primitive meshes from a text description and export them as OBJ or STL")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("File that diagnostics are appended to")
                .global(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log pipeline steps, not just results and failures")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("export")
                .about("Build a mesh for the described shape and write it to a file")
                .arg(
                    Arg::new("description")
                        .short('d')
                        .long("description")
                        .value_name("TEXT")
                        .help("Free-text description; anything mentioning 'sphere' becomes a sphere, everything else a cube")
                        .default_value(""),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Destination file")
                        .required(true),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_name("FORMAT")
                        .help("Output format. If omitted it is taken from the output extension, falling back to obj")
                        .value_parser(["obj", "stl"]),
                )
                .arg(
                    Arg::new("size")
                        .long("size")
                        .value_name("SIZE")
                        .help("Cube edge length")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("radius")
                        .long("radius")
                        .value_name("RADIUS")
                        .help("Sphere radius")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("segments")
                        .long("segments")
                        .value_name("N")
                        .help("Sphere latitude/longitude segment count")
                        .value_parser(value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("default-model")
                .about("Extract the bundled default model and print its path")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .value_name("DIR")
                        .help("Directory to extract into (defaults to the system temp dir)")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
}

pub fn handle_clap_matches(matches: &clap::ArgMatches) -> CliOptions {
    let log_file = matches
        .get_one::<PathBuf>("log-file")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let verbose = matches.get_flag("verbose");

    let action = match matches.subcommand() {
        Some(("export", sub_matches)) => {
            let description = sub_matches
                .get_one::<String>("description")
                .cloned()
                .unwrap_or_default();
            let output = sub_matches
                .get_one::<String>("output")
                .map(PathBuf::from)
                .unwrap_or_default();
            let format = sub_matches
                .get_one::<String>("format")
                .and_then(|f| f.parse().ok())
                .or_else(|| OutputFormat::from_path(&output))
                .unwrap_or_default();

            let mut settings = ShapeSettings::default();
            if let Some(&size) = sub_matches.get_one::<f64>("size") {
                settings.cube_size = size;
            }
            if let Some(&radius) = sub_matches.get_one::<f64>("radius") {
                settings.sphere_radius = radius;
            }
            if let Some(&segments) = sub_matches.get_one::<u32>("segments") {
                settings.sphere_segments = segments;
            }

            Some(CliAction::Export {
                description,
                output,
                format,
                settings,
            })
        }
        Some(("default-model", sub_matches)) => Some(CliAction::DefaultModel {
            dir: sub_matches.get_one::<PathBuf>("dir").cloned(),
        }),
        _ => None,
    };

    CliOptions {
        action,
        log_file,
        verbose,
    }
}
