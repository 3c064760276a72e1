use clap::Parser;

/// Flags left unset fall back to the environment, then to built-in defaults.
#[derive(Parser, Debug, Default, Clone, PartialEq, Eq)]
#[command(name = "urlqr", version, about = "Generate a QR code PNG for a URL")]
pub struct Cli {
    /// Target URL, must start with http:// or https:// [env: DEFAULT_URL]
    #[arg(short, long)]
    pub url: Option<String>,

    /// Output filename, ".png" is appended when missing [env: FILENAME]
    #[arg(short, long)]
    pub filename: Option<String>,

    /// Pixels per module [env: QR_BOX_SIZE]
    #[arg(long, value_name = "N")]
    pub box_size: Option<u32>,

    /// Quiet zone width in modules [env: QR_BORDER]
    #[arg(long, value_name = "N")]
    pub border: Option<u32>,

    /// Error correction level: L, M, Q or H [env: QR_ERROR_CORRECTION]
    #[arg(long, value_name = "LEVEL")]
    pub ec_level: Option<String>,

    /// Suppress stdout, logs are still written
    #[arg(long)]
    pub silent: bool,
}
