use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "taskdeck", version, about = "Interactive file-backed task board")]
pub struct Cli {
    /// Board file to load (prompted for when omitted)
    pub board: Option<String>,

    /// Remote storage endpoint, e.g. http://localhost:8420
    #[arg(long)]
    pub remote_url: Option<String>,

    /// Password for the remote storage endpoint
    #[arg(long, requires = "remote_url")]
    pub remote_password: Option<String>,
}
