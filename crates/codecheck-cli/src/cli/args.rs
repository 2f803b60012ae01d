use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "codecheck",
    version,
    about = "Validate CODECHECK certificates, manage their manifest files and render report sections"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate codecheck.yml
    Validate(ValidateArgs),
    /// Manifest file operations
    Manifest(ManifestArgs),
    /// Render a certificate section to stdout
    Render(RenderArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[arg(long, default_value = "codecheck.yml")]
    pub config: PathBuf,

    /// Directory containing codecheck/outputs (default: the config file's directory)
    #[arg(long)]
    pub base_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidateFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,

    /// Skip the check that manifest files exist in codecheck/outputs
    #[arg(long)]
    pub no_manifest: bool,

    /// Skip the register lookup
    #[arg(long)]
    pub no_register: bool,

    /// Register request timeout in seconds (default: CODECHECK_REGISTER_TIMEOUT or 10)
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(long, value_enum, default_value_t = ValidateFormat::Text)]
    pub format: ValidateFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ManifestFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Clone, Debug)]
pub struct ManifestArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(long, value_enum, default_value_t = ManifestFormat::Text, global = true)]
    pub format: ManifestFormat,

    #[command(subcommand)]
    pub cmd: ManifestSub,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ManifestSub {
    /// Check manifest files exist (in codecheck/outputs, or a source directory)
    Check {
        /// Check the source side instead of codecheck/outputs
        #[arg(long)]
        source: bool,

        /// Source directory (default: the base directory); implies --source
        #[arg(long)]
        source_dir: Option<PathBuf>,
    },
    /// Print actual file sizes
    Sizes {
        /// Read sizes from the base directory instead of codecheck/outputs
        #[arg(long)]
        source: bool,
    },
    /// Compare declared sizes with files in codecheck/outputs
    Compare,
    /// Copy manifest files into codecheck/outputs
    Copy {
        /// Source directory (default: the base directory)
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// Copy to the outputs root by file name instead of keeping directories
        #[arg(long)]
        flatten: bool,

        /// Keep destinations that already exist
        #[arg(long)]
        no_overwrite: bool,

        /// Report what would be copied without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// File counts, total size and extensions
    Summary,
    /// Flag paths that could escape codecheck/outputs
    Paths,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Title,
    SummaryTable,
    Files,
    Summary,
    Citation,
    About,
    ManifestSummary,
    Csv,
    LatexFigures,
    ValidationReport,
}

#[derive(Args, Clone, Debug)]
pub struct RenderArgs {
    #[arg(value_enum)]
    pub section: Section,

    #[arg(long, default_value = "codecheck.yml")]
    pub config: PathBuf,

    /// Show full manifest paths in the files table
    #[arg(long)]
    pub keep_dirname: bool,

    /// Figure extensions for latex-figures (lowercase, with dot)
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Validate before rendering
    #[arg(long)]
    pub validate: bool,

    /// Refuse to render when validation does not pass
    #[arg(long, requires = "validate")]
    pub strict: bool,
}
