// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use nodelink::gateway::LinkMode;
use nodelink::output::OutputMode;
use nodelink::types::{InterfaceId, LinkId, SubnetId, SystemId};

#[derive(Parser)]
#[command(name = "nodelink")]
#[command(about = "Lifecycle-aware interface link management, simulated against an inventory file")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Normal)]
    pub output: OutputFormat,

    /// Config file (defaults to nodelink.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Normal,
    Quiet,
    Json,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Normal => OutputMode::Normal,
            OutputFormat::Quiet => OutputMode::Quiet,
            OutputFormat::Json => OutputMode::Json,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new nodelink.yml configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show how a machine status is handled when removing a link
    Classify {
        /// Status name or numeric code
        status: String,
    },

    /// Replace the links on an interface with a new one
    Create {
        #[command(flatten)]
        target: InterfaceTarget,

        /// Subnet ID to link to
        #[arg(long)]
        subnet: SubnetId,

        /// Link mode (AUTO, DHCP, STATIC, LINK_UP)
        #[arg(long)]
        mode: Option<LinkMode>,

        /// Static IP address (STATIC mode only)
        #[arg(long)]
        ip_address: Option<IpAddr>,

        /// Use this link's subnet gateway as the default route
        #[arg(long)]
        default_gateway: bool,
    },

    /// Show a link
    Read {
        #[command(flatten)]
        target: InterfaceTarget,

        #[arg(long)]
        link: LinkId,
    },

    /// Set or clear a link's default-gateway role
    Update {
        #[command(flatten)]
        target: InterfaceTarget,

        #[arg(long)]
        link: LinkId,

        /// Make this link the default gateway (omit to clear)
        #[arg(long)]
        default_gateway: bool,
    },

    /// Remove a link, aborting or releasing the machine as needed
    Delete {
        #[command(flatten)]
        target: InterfaceTarget,

        #[arg(long)]
        link: LinkId,
    },
}

#[derive(Args)]
pub struct InterfaceTarget {
    /// Inventory file describing machines and their interfaces
    #[arg(short, long)]
    pub inventory: PathBuf,

    /// Write the resulting inventory back to the file
    #[arg(long)]
    pub write: bool,

    /// Machine system ID
    #[arg(long)]
    pub machine: SystemId,

    /// Network interface ID
    #[arg(long)]
    pub interface: InterfaceId,
}
