#![forbid(unsafe_code)]

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "bubbles")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Precedence graphs of activity bubbles, rendered with graphviz")]
pub struct Config {
    /// Address the HTTP server binds to.
    #[arg(long, env = "BUBBLES_LISTEN", default_value = "0.0.0.0:5466")]
    pub listen: SocketAddr,

    /// Directory holding bubbles.db.
    #[arg(long, env = "BUBBLES_STORAGE_DIR", default_value = ".")]
    pub storage_dir: PathBuf,

    /// Graphviz binary used to render graphs.
    #[arg(long, env = "BUBBLES_DOT_BIN", default_value = "dot")]
    pub dot_bin: String,
}
