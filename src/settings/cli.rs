use super::Parser;

#[derive(Parser, Debug)]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    /// Optional path to request once after restoration, as a liveness probe.
    #[arg(long)]
    pub probe: Option<String>,
}
