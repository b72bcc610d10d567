use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Read the whole result set and write it as JSON lines
    Read {
        #[arg(long, help = "Settings file path")]
        config: String,

        #[arg(
            long,
            help = "If specified, writes records to this file instead of stdout"
        )]
        output: Option<String>,

        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Overrides the maximum number of records to read"
        )]
        limit: Option<i64>,
    },
    /// Print the open-scroll request the settings produce, without contacting the cluster
    Plan {
        #[arg(long, help = "Settings file path")]
        config: String,
    },
}
