use crate::batch::{run_shortlist, ShortlistArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cv_shortlist::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "cv-shortlist",
    about = "Screen CV files for English grades, experience and skills, and export a shortlist",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Screen local CV files and print the shortlist table
    Shortlist(ShortlistArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Shortlist(args) => run_shortlist(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_shortlist::screening::ExportFormat;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["cv-shortlist"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn shortlist_parses_overrides() {
        let cli = Cli::try_parse_from([
            "cv-shortlist",
            "shortlist",
            "a.pdf",
            "b.docx",
            "--min-ol",
            "b",
            "--require-experience",
            "--format",
            "csv",
        ])
        .expect("parses");

        let Some(Command::Shortlist(args)) = cli.command else {
            panic!("expected shortlist command");
        };
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.min_ol.map(|grade| grade.code()), Some('B'));
        assert!(args.min_al.is_none());
        assert_eq!(args.require_experience, Some(true));
        assert_eq!(args.format, ExportFormat::Csv);
    }

    #[test]
    fn experience_requirement_accepts_explicit_value() {
        let parse = |flags: &[&str]| {
            let argv = ["cv-shortlist", "shortlist", "a.pdf"]
                .into_iter()
                .chain(flags.iter().copied());
            match Cli::try_parse_from(argv).expect("parses").command {
                Some(Command::Shortlist(args)) => args.require_experience,
                _ => panic!("expected shortlist command"),
            }
        };

        assert_eq!(parse(&[]), None);
        assert_eq!(parse(&["--require-experience=no"]), Some(false));
        assert_eq!(parse(&["--require-experience=true"]), Some(true));
        assert!(Cli::try_parse_from([
            "cv-shortlist",
            "shortlist",
            "a.pdf",
            "--require-experience=maybe"
        ])
        .is_err());
    }

    #[test]
    fn shortlist_requires_files_and_valid_grades() {
        assert!(Cli::try_parse_from(["cv-shortlist", "shortlist"]).is_err());
        assert!(
            Cli::try_parse_from(["cv-shortlist", "shortlist", "a.pdf", "--min-al", "F"]).is_err()
        );
    }
}
