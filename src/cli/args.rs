use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "distropkg",
    about = "One package-manager interface for apt, dnf, yum, pacman and zypper",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug, Default)]
pub struct GlobalFlags {
    /// Verbose output (shows every executed command)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Settings file to use instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Skip distribution detection (debian, rhel, arch, suse)
    #[arg(long, value_name = "FAMILY", global = true)]
    pub family: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Seconds allowed for the whole run (0 disables the deadline)
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the detected distribution and the backend it maps to
    Detect,

    /// Install packages
    Install {
        #[arg(required = true)]
        packages: Vec<String>,

        /// Reinstall packages that are already installed
        #[arg(long)]
        reinstall: bool,

        /// Let the backend override conflicts
        #[arg(short = 'f', long)]
        force: bool,

        /// Skip signature verification
        #[arg(long)]
        skip_verify: bool,

        /// Download without installing
        #[arg(long)]
        download_only: bool,

        /// Permit installing an older version
        #[arg(long)]
        allow_downgrade: bool,
    },

    /// Remove packages, one at a time
    Remove {
        #[arg(required = true)]
        packages: Vec<String>,

        /// Also remove configuration files
        #[arg(long)]
        purge: bool,

        /// Also remove dependencies nothing else needs
        #[arg(long)]
        autoremove: bool,

        /// Remove even when other packages depend on it
        #[arg(short = 'f', long)]
        force: bool,
    },

    /// Refresh package metadata
    Update {
        #[arg(long)]
        skip_verify: bool,
    },

    /// Upgrade installed packages (all when none are named)
    Upgrade {
        packages: Vec<String>,

        #[arg(long)]
        skip_verify: bool,

        #[arg(long)]
        download_only: bool,
    },

    /// Search available packages
    Search {
        query: String,

        /// Only show packages named exactly QUERY
        #[arg(long)]
        exact: bool,

        /// Check installed status of each result
        #[arg(long)]
        installed: bool,

        /// Maximum results (0 or 'all' for unlimited)
        #[arg(long, value_name = "N")]
        limit: Option<String>,
    },

    /// Show details for one package
    Info { package: String },

    /// List installed packages
    List {
        /// List packages with pending upgrades instead
        #[arg(long)]
        upgradable: bool,
    },

    /// Check whether a package is installed (exit status 1 when not)
    Installed { package: String },

    /// Verify an installed package's files
    Verify { package: String },

    /// Remove cached package files
    Clean,

    /// Remove dependencies nothing needs anymore
    Autoremove,

    /// Manage package repositories
    Repo {
        #[command(subcommand)]
        command: RepoCommand,
    },

    /// Show effective settings
    Settings,
}

#[derive(Subcommand, Debug)]
pub enum RepoCommand {
    /// List configured repositories
    List,

    /// Add a repository
    Add {
        name: String,
        url: String,

        /// Signing key (URL, path or key id, per backend)
        #[arg(long, value_name = "KEY")]
        key: Option<String>,

        /// Suite for apt sources (flat repository when omitted)
        #[arg(long, value_name = "SUITE")]
        distribution: Option<String>,

        /// Components for apt sources
        #[arg(long = "component", value_name = "COMPONENT")]
        components: Vec<String>,

        #[arg(long, default_value_t = 0)]
        priority: i32,

        /// Add the repository disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Remove a repository
    Remove { name: String },

    /// Enable a repository
    Enable { name: String },

    /// Disable a repository
    Disable { name: String },

    /// Refresh repository metadata
    Refresh,
}
