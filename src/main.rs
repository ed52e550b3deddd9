use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gcodeobj::{commands, init_logging, Config, ExtractMode, BUILD_DATE, VERSION};
use tracing::debug;

/// gcodeobj command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "gcodeobj",
    version,
    about = "Embed OBJ meshes in gcode and serve them while printing"
)]
struct Cli {
    /// Path to a JSON or TOML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Log verbosity level, overrides RUST_LOG [default: info].
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append an OBJ file to a gcode file as tagged comment lines.
    Embed {
        #[arg(long, value_name = "FILE")]
        obj: PathBuf,
        #[arg(long, value_name = "FILE")]
        gcode: PathBuf,
    },
    /// Extract the embedded OBJ from a gcode file.
    Extract {
        gcode: PathBuf,
        /// Overrides the configured extraction mode.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Write the OBJ to this file instead.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Convert an STL file and inject it into a gcode file, prompting for missing paths.
    Inject {
        #[arg(long, value_name = "FILE")]
        stl: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        gcode: Option<PathBuf>,
    },
    /// Summarize the mesh in an OBJ file or embedded in a gcode file.
    Inspect { file: PathBuf },
    /// Serve the mesh of the job currently printing over HTTP.
    Serve {
        /// Overrides the configured bind address.
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum ModeArg {
    Inline,
    DerivedFile,
}

impl From<ModeArg> for ExtractMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Inline => ExtractMode::Inline,
            ModeArg::DerivedFile => ExtractMode::DerivedFile,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_level.map(Into::into))?;
    debug!("gcodeobj {} built {}", VERSION, BUILD_DATE);

    let config = Config::load_or_default(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Embed { obj, gcode } => {
            commands::embed(&config, &obj, &gcode, &mut stdout)?;
        }
        Command::Extract { gcode, mode, output } => {
            let mode = mode.map(ExtractMode::from).unwrap_or(config.extract.mode);
            commands::extract(&config, &gcode, mode, output.as_deref(), &mut stdout)?;
        }
        Command::Inject { stl, gcode } => {
            let mut stdin = io::stdin().lock();
            commands::inject(&config, stl, gcode, &mut stdin, &mut stdout)?;
        }
        Command::Inspect { file } => {
            commands::inspect(&config, &file, &mut stdout)?;
        }
        Command::Serve { bind } => {
            drop(stdout);
            commands::serve(&config, bind.as_deref()).await?;
        }
    }

    Ok(())
}
