mod body;
mod err;
mod http;
mod opt;
mod serve;
mod tcp;

use clap::error::ErrorKind;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() -> Result<(), err::DisplayError> {
    let opt::Options {
        verbose,
        port,
        directory,
    } = match opt::Options::try_parse() {
        Ok(options) => options,
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            // Wrapper scripts match this line verbatim; keep it stable.
            println!("Usage: python serve_dir.py <port> <directory>");
            process::exit(1);
        }
        Err(e) => e.exit(),
    };

    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    // Lexical resolution only: the error message below must echo the absolute
    // form even when the path doesn't exist.
    let root = std::path::absolute(&directory).unwrap_or(directory);
    if !root.is_dir() {
        println!("Error: '{}' is not a valid directory", root.display());
        process::exit(1);
    }

    serve::main(port, root).await?;

    Ok(())
}
