use anyhow::{Context, Result};
use clap::{crate_description, crate_version, ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use namesurvey::defaults;

// -----------------------------------------------------------------------------
// command-line args
// -----------------------------------------------------------------------------
#[derive(Parser, Debug)]
#[command(
    author,   // retrieved from Cargo.toml `authors`
    version,  // retrieved from Cargo.toml `version`
    about,    // retrieved from Cargo.toml `description`

    long_version = concat!(
        crate_version!(),
    ),

    long_about = concat!(
        crate_description!(),
    ),
)]
#[deny(missing_docs)]
/// Sample equipment names from a database and classify their naming conventions
pub struct CommandLineArgs {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

impl CommandLineArgs {
    pub fn parse_args() -> Self {
        let mut s = Self::parse();

        // https://no-color.org/
        if std::env::var("NO_COLOR").is_ok() {
            s.global_args.color = Mode::Never
        }

        s
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sample names from database tables
    ///
    /// Each listed table that exists and has a `Name` column is sampled: up to the sample size
    /// number of rows with a non-empty name are drawn uniformly at random, along with their
    /// `Comments` column if the table has one.
    ///
    /// The samples are written as JSON (for the `analyze` command) and as plain text.
    /// Both files are overwritten on each run.
    #[command(display_order = 1)]
    Sample(SampleArgs),

    /// Classify sampled names by naming pattern
    ///
    /// Every sample is checked against a fixed set of independent patterns, such as NATO
    /// reporting names, Chinese and Russian designation styles, hull numbers, and year mentions
    /// in comments. A sample can match several patterns.
    ///
    /// The per-pattern matches are written as JSON, along with a plain-text report.
    /// Both files are overwritten on each run.
    #[command(display_order = 2, alias = "analyse")]
    Analyze(AnalyzeArgs),

    /// Summarize a previous pattern analysis
    #[command(display_order = 3, alias = "summarise")]
    Summarize(SummarizeArgs),
}

// -----------------------------------------------------------------------------
// global options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Global Options")]
pub struct GlobalArgs {
    /// Log more; repeat for debug (`-vv`) and trace (`-vvv`) output
    #[arg(global=true, long, short, action=ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output; "auto" colors only a terminal, and `NO_COLOR` forces "never"
    #[arg(global=true, long, default_value_t=Mode::Auto, value_name="MODE")]
    pub color: Mode,
}

impl GlobalArgs {
    pub fn use_color(&self) -> bool {
        match self.color {
            Mode::Never => false,
            Mode::Always => true,
            Mode::Auto => atty::is(atty::Stream::Stdout),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Auto,
    Never,
    Always,
}

// -----------------------------------------------------------------------------
// `sample` command
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Read from the specified database
    #[arg(
        long,
        short,
        value_name = "PATH",
        env("NAMESURVEY_DATABASE"),
        default_value = defaults::DEFAULT_DATABASE_PATH
    )]
    pub database: PathBuf,

    /// Write the sample files to the specified directory
    #[arg(long, short, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// The maximum number of rows to sample from each table
    #[arg(long, short = 'n', value_name = "N", default_value_t = defaults::DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Sample the specified table
    ///
    /// This option can be repeated. If it is not given, a built-in list of equipment tables is
    /// sampled.
    #[arg(long = "table", short, value_name = "NAME")]
    pub tables: Vec<String>,
}

impl SampleArgs {
    pub fn tables(&self) -> Vec<String> {
        if self.tables.is_empty() {
            defaults::default_tables()
        } else {
            self.tables.clone()
        }
    }
}

// -----------------------------------------------------------------------------
// `analyze` command
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Read samples from the specified JSON file, as written by the `sample` command
    #[arg(long, short, value_name = "PATH", default_value = defaults::SAMPLES_JSON_FILENAME)]
    pub input: PathBuf,

    /// Write the analysis files to the specified directory
    #[arg(long, short, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

// -----------------------------------------------------------------------------
// `summarize` command
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Read the analysis from the specified JSON file, as written by the `analyze` command
    #[arg(long, short, value_name = "PATH", default_value = defaults::ANALYSIS_JSON_FILENAME)]
    pub input: PathBuf,

    #[command(flatten)]
    pub output_args: OutputArgs,
}

// -----------------------------------------------------------------------------
// output options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Output Options")]
pub struct OutputArgs {
    /// Write output to the specified path instead of stdout
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write output in the specified format
    #[arg(long, short, value_name = "FORMAT", default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

impl OutputArgs {
    fn writer(&self) -> Result<Box<dyn std::io::Write>> {
        let writer: Box<dyn std::io::Write> = match &self.output {
            None => Box::new(BufWriter::new(std::io::stdout())),
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
        };
        Ok(writer)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// An aligned table
    Human,

    /// Pretty-printed JSON
    Json,
}

// -----------------------------------------------------------------------------
// report writer
// -----------------------------------------------------------------------------
/// Something `summarize`-like commands can render in each `OutputFormat`.
pub trait Reportable {
    fn human_format<W: std::io::Write>(&self, writer: W) -> Result<()>;
    fn json_format<W: std::io::Write>(&self, writer: W) -> Result<()>;

    fn report(&self, output_args: &OutputArgs) -> Result<()> {
        let writer = output_args.writer()?;
        let result = match output_args.format {
            OutputFormat::Human => self.human_format(writer),
            OutputFormat::Json => self.json_format(writer),
        };
        // a closed stdout (e.g. `| head`) is not an error
        let broken_pipe = |e: &anyhow::Error| {
            e.downcast_ref::<std::io::Error>()
                .map_or(false, |e| e.kind() == std::io::ErrorKind::BrokenPipe)
        };
        match result {
            Err(e) if !broken_pipe(&e) => Err(e),
            _ => Ok(()),
        }
    }
}
