use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Batch file of grammars and test strings
    #[arg(default_value = "input.txt")]
    pub file: PathBuf,

    /// Where to write the report, `-` for stdout
    #[arg(short, long, value_name = "FILE", default_value = "output.txt")]
    pub output: PathBuf,

    /// Start symbol of every grammar
    #[arg(short, long, value_name = "SYMBOL", default_value_t = 'S')]
    pub start: char,

    /// Generate this many sentences per grammar instead of testing strings
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub amount: Option<u32>,
}
