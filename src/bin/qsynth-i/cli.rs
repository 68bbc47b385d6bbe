#[derive(clap::Parser, Debug)]
#[clap(name = "qsynth-i", author, version, about, long_about = None)]
pub struct CliArgs {
    #[clap(short, long, help = "Run commands from FILE before dropping to the prompt (or, with --quit, instead of it)")]
    pub input: Option<String>,
    #[clap(long, help = "Exit after running --input instead of entering the interactive prompt")]
    pub quit: bool,
    #[clap(short = 's', long, help = "History file path", default_value = ".qsynth_history")]
    pub history: String,
}

impl CliArgs {
    pub fn new() -> Self {
        <Self as clap::Parser>::parse()
    }
}
