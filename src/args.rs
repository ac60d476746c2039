use clap::Parser;

use linelog::Level;

#[derive(Parser, Debug)]
#[command(version)]
#[command(about = "Filter a wire-format log stream from stdin by severity.", long_about = None)]
pub struct Args {
    #[arg(
        short,
        long,
        default_value = "debug",
        help = "Least severe level to pass through: emergency, alert, critical, error, warning, notice, info or debug."
    )]
    pub level: Level,

    #[arg(
        long,
        value_name = "FORMAT",
        help = "chrono format of the timestamp between the brackets. Must match whatever produced the stream."
    )]
    pub datetime_format: Option<String>,

    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        help = "Write verbose messages to stderr for debugging.",
        display_order = 999
    )]
    pub verbose: u8,
}

impl Args {
    /// Threshold for the tool's own stderr diagnostics. Quiet by default,
    /// each -v opens one more band.
    pub fn diagnostic_level(&self) -> Level {
        match self.verbose {
            0 => Level::Error,
            1 => Level::Warning,
            2 => Level::Notice,
            3 => Level::Info,
            4..=u8::MAX => Level::Debug,
        }
    }
}
