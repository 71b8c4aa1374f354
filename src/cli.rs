use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "crime-rank",
    about = "Fetch city crime data, rank cities by risk, and write public/data/crime.json",
    long_about = "Fetch city crime data, rank cities by risk, and write public/data/crime.json.\n\n\
                  The source location is read from SHEET_CSV_URL (or SOURCE_URL). \
                  Locations ending in .json are read as a JSON array of rows; \
                  anything else is read as comma-separated text with a header row.",
    version
)]
pub struct Cli {
    /// Site root; the artifact is written to <PATH>/public/data/crime.json
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Summary format printed after the artifact is written
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Show the full ranking (not just the top and bottom ten)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["crime-rank"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("."));
        assert!(matches!(cli.report, ReportFormat::Terminal));
        assert!(!cli.verbose && !cli.quiet);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from(["crime-rank", "site", "--report", "json", "-q"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("site"));
        assert!(matches!(cli.report, ReportFormat::Json));
        assert!(cli.quiet);
    }
}
