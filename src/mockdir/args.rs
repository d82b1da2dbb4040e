use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "mockdir", bin_name = "mockdir", version = get_version())]
#[command(about = "Record and replay service responses from a directory tree", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Properties file to load (default: ./mockConfig.properties)
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        conflicts_with_all = ["config_dir", "config_name"]
    )]
    pub config: Option<PathBuf>,

    /// Directory holding the properties file
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Properties file name without extension, looked up in --config-dir
    #[arg(long, global = true, value_name = "NAME")]
    pub config_name: Option<String>,

    /// Mock root, overriding mockFolderPath (also: MOCKDIR_ROOT)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a mock, replacing any earlier one for the same key
    #[command(alias = "p")]
    Put {
        service: String,
        identity: String,

        /// Payload text; read from stdin when omitted or "-"
        #[arg(conflicts_with = "file")]
        payload: Option<String>,

        /// Read the payload from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print a mock, falling back to any mock of the same service
    #[command(alias = "g")]
    Get { service: String, identity: String },

    /// Find mock files whose name contains a term
    #[command(alias = "s")]
    Search { term: String },

    /// List recorded mocks
    #[command(alias = "ls")]
    List {
        /// Only mocks of this service
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Show where a key is (or would be) stored
    Path { service: String, identity: String },

    /// Show how full the mock root is
    Status,

    /// Show the effective configuration
    Config,
}
