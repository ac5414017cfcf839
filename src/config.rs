use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "blog-server")]
#[command(about = "Blog post API with per-client write throttling")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Max write requests allowed per client per window
    #[arg(long, default_value_t = 10)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_window: u64,

    // How often expired rate-limit entries are swept, in seconds
    #[arg(long, default_value_t = 30)]
    pub sweep_interval: u64,

    // Max distinct clients tracked by the throttle at once
    #[arg(long, default_value_t = 100_000)]
    pub max_tracked_clients: usize,
}
