use std::{fs::OpenOptions, io, path::Path, process::ExitCode};

use log::{error, LevelFilter};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};
use shapesmith::{
    create_clap_command, handle_clap_matches, BundledAssets, CliAction, ModelExportService,
};

fn init_logging(log_file: &Path, verbose: bool) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let file_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Warn,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(file_level, Config::default(), file),
    ])
    .map_err(io::Error::other)
}

fn main() -> ExitCode {
    let mut command = create_clap_command();
    let matches = command.clone().get_matches();
    let opts = handle_clap_matches(&matches);

    let logging = init_logging(&opts.log_file, opts.verbose);
    if let Err(e) = &logging {
        eprintln!(
            "Failed to open log file {}: {}",
            opts.log_file.display(),
            e
        );
    }

    let Some(action) = opts.action else {
        let _ = command.print_help();
        return ExitCode::FAILURE;
    };

    match action {
        CliAction::Export {
            description,
            output,
            format,
            settings,
        } => {
            let service = ModelExportService::new().with_settings(settings);
            match service.export(&description, &output, format).wait() {
                Ok(summary) => {
                    println!("{summary}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    // the service already logged it, which reaches stderr when logging is up
                    if logging.is_err() {
                        eprintln!("export failed: {e}");
                    }
                    ExitCode::FAILURE
                }
            }
        }
        CliAction::DefaultModel { dir } => {
            let assets = dir.map(BundledAssets::new).unwrap_or_default();
            match assets.default_model() {
                Ok(path) => {
                    println!("{}", path.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("{e}");
                    if logging.is_err() {
                        eprintln!("{e}");
                    }
                    ExitCode::FAILURE
                }
            }
        }
    }
}
