//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vfsconn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Print the XML result payload
    #[arg(short = 'x', long, global = true, conflicts_with = "json")]
    pub xml: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// FTP connection settings, used whenever a location is an `ftp://` URI.
#[derive(clap::Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Connect and data timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Use active instead of passive FTP mode
    #[arg(long, global = true)]
    pub active: bool,

    /// Socket read timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub so_timeout: Option<u64>,

    /// Resolve FTP paths relative to the login directory
    #[arg(long, global = true)]
    pub user_dir_is_root: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a file or folder exists
    Exists(LocationArgs),
    /// Create a file or folder
    Create(CreateArgs),
    /// Append content to a file, creating it if needed
    Append(AppendArgs),
    /// Print the content of a file
    Read(ReadArgs),
    /// Copy files or folders
    Copy(TransferArgs),
    /// Move files or folders
    Move(TransferArgs),
    /// Delete files or folders
    Delete(DeleteArgs),
    /// Find files whose names match a pattern
    Search(SearchArgs),
    /// Pack a file or folder into a ZIP archive
    Archive(ArchiveArgs),
    /// Unpack a ZIP archive into a folder
    Unzip(UnzipArgs),
    /// List the file entries of a ZIP archive
    ListZip(ListZipArgs),
    /// Write a payload to a file
    Send(SendArgs),
    /// Upload a payload over FTP, optionally through an HTTP proxy
    FtpProxy(FtpProxyArgs),
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct LocationArgs {
    /// Local path, file:// or ftp:// URI
    #[arg(value_name = "LOCATION")]
    pub location: String,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// File or folder to create; a trailing '/' or no extension means a folder
    #[arg(value_name = "LOCATION")]
    pub location: String,

    /// Initial file content
    #[arg(short, long)]
    pub content: Option<String>,

    /// Encoding used to write the content (default: UTF-8)
    #[arg(short, long)]
    pub encoding: Option<String>,
}

#[derive(clap::Args)]
pub struct AppendArgs {
    /// File to append to
    #[arg(value_name = "LOCATION")]
    pub location: String,

    /// Content to append
    #[arg(value_name = "CONTENT")]
    pub content: String,

    /// Encoding used to write the content (default: UTF-8)
    #[arg(short, long)]
    pub encoding: Option<String>,
}

#[derive(clap::Args)]
pub struct ReadArgs {
    /// File, or folder whose first matching file is read
    #[arg(value_name = "LOCATION")]
    pub location: String,

    /// Regular expression the file name must fully match
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Content type to report instead of the inferred one
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(clap::Args)]
pub struct TransferArgs {
    /// Source file or folder
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Destination file or folder
    #[arg(value_name = "DESTINATION")]
    pub destination: String,

    /// Only transfer files whose names fully match this regular expression
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Keep the source folder itself under the destination
    #[arg(long)]
    pub include_parent: bool,
}

#[derive(clap::Args)]
pub struct DeleteArgs {
    /// File or folder to delete
    #[arg(value_name = "LOCATION")]
    pub location: String,

    /// Only delete direct children whose names fully match this pattern
    #[arg(short, long)]
    pub pattern: Option<String>,
}

#[derive(clap::Args)]
pub struct SearchArgs {
    /// Folder to search
    #[arg(value_name = "LOCATION")]
    pub location: String,

    /// Regular expression the file name must fully match
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Descend into subfolders
    #[arg(short, long)]
    pub recursive: bool,
}

#[derive(clap::Args)]
pub struct ArchiveArgs {
    /// File or folder to pack
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Archive file to write
    #[arg(value_name = "ARCHIVE")]
    pub archive: String,
}

#[derive(clap::Args)]
pub struct UnzipArgs {
    /// Archive to unpack
    #[arg(value_name = "ARCHIVE")]
    pub archive: String,

    /// Destination folder, created if missing
    #[arg(value_name = "DESTINATION")]
    pub destination: String,
}

#[derive(clap::Args)]
pub struct ListZipArgs {
    /// Archive to list
    #[arg(value_name = "ARCHIVE")]
    pub archive: String,
}

/// Where a payload comes from: inline text, a file, or standard input.
#[derive(clap::Args, Debug)]
pub struct PayloadArgs {
    /// Payload text
    #[arg(short, long, conflicts_with = "input")]
    pub content: Option<String>,

    /// Read the payload from a file (default: standard input)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SendArgs {
    /// Target file, or folder that receives response.xml
    #[arg(value_name = "DESTINATION")]
    pub destination: String,

    #[command(flatten)]
    pub payload: PayloadArgs,

    /// Append instead of overwriting
    #[arg(short, long)]
    pub append: bool,
}

#[derive(clap::Args)]
pub struct FtpProxyArgs {
    /// FTP server host
    #[arg(long)]
    pub server: String,

    /// FTP server port
    #[arg(long, default_value = "21")]
    pub port: u16,

    /// FTP user name (default: anonymous)
    #[arg(long)]
    pub user: Option<String>,

    /// FTP password
    #[arg(long)]
    pub password: Option<String>,

    /// HTTP proxy host
    #[arg(long, requires_all = ["proxy_port", "proxy_user", "proxy_password"])]
    pub proxy_host: Option<String>,

    /// HTTP proxy port
    #[arg(long)]
    pub proxy_port: Option<u16>,

    /// HTTP proxy user name
    #[arg(long)]
    pub proxy_user: Option<String>,

    /// HTTP proxy password
    #[arg(long)]
    pub proxy_password: Option<String>,

    /// Control connection keep-alive timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub keep_alive_timeout: Option<u64>,

    /// Keep-alive reply timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub reply_timeout: Option<u64>,

    /// Remote folder to change into before storing
    #[arg(long, requires = "target_file")]
    pub target_path: Option<String>,

    /// Remote file name for the payload
    #[arg(long)]
    pub target_file: Option<String>,

    /// Transfer type: BINARY, ASCII, EBCDIC or LOCAL
    #[arg(long, default_value = "ASCII")]
    pub file_type: String,

    #[command(flatten)]
    pub payload: PayloadArgs,
}
