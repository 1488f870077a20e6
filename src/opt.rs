use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Options {
    /// Logging verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Port to listen on
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Directory to serve
    pub directory: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Options::command().debug_assert();
    }

    #[test]
    fn rejects_port_zero() {
        assert!(Options::try_parse_from(["serve-dir", "0", "."]).is_err());
    }

    #[test]
    fn parses_port_and_directory() {
        let options = Options::try_parse_from(["serve-dir", "8080", "/tmp/site"]).unwrap();
        assert_eq!(options.port, 8080);
        assert_eq!(options.directory, PathBuf::from("/tmp/site"));
    }
}
