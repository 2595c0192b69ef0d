mod cli;
mod error_handling;
mod generator;
mod grammar;
mod parser;
mod recognizer;
mod report;

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use cli::Cli;

fn open_output(path: &Path) -> std::io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        Ok(Box::new(BufWriter::new(std::io::stdout().lock())))
    } else {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }
}

fn to_strings<T: Display>(errors: Vec<T>) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

fn run(cli: &Cli) -> Result<(), Vec<String>> {
    let batch = parser::parse_file(&cli.file, cli.start).map_err(to_strings)?;

    let mut out = open_output(&cli.output)
        .map_err(|e| vec![format!("Could not create {}: {}", cli.output.display(), e)])?;

    let written = match cli.amount {
        Some(amount) => report::write_samples(&mut out, &batch, cli.start, amount, &mut rand::thread_rng()),
        None => report::write_verdicts(&mut out, &batch, cli.start),
    };

    // Flush even when generation failed part way, so finished grammars are kept
    let flushed = out.flush();
    written.map_err(|e| vec![e.to_string()])?;
    flushed.map_err(|e| vec![format!("Could not write report: {}", e)])?;

    info!("Wrote report to {}", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            ExitCode::FAILURE
        }
    }
}
