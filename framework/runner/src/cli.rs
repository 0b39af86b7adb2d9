use clap::Parser;

/// Command line arguments shared by every Gust scenario binary.
///
/// A scenario with flags of its own should `#[command(flatten)]` this struct into its own
/// parser and pass the inner value to the run config builder.
#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
pub struct GustScenarioCli {
    /// Base URL of the service under test
    #[clap(short, long, default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Uniformly scale every scenario duration and start offset.
    ///
    /// Useful for rehearsing a long run quickly, for example `--duration-scale 0.1` turns a
    /// five minute ramp into thirty seconds.
    #[clap(long, default_value_t = 1.0)]
    pub duration_scale: f64,

    /// Per-request timeout for the HTTP client, in seconds.
    ///
    /// This is the only bound on a hung call, the runner itself never cancels an in-flight
    /// request.
    #[clap(long, default_value_t = 30)]
    pub request_timeout: u64,

    /// Do not show a progress bar on the CLI.
    ///
    /// Recommended for CI environments where the bar just adds noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,
}
