use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use scriptview::{CompilePhase, LabelMapping, Session};
use tracing_subscriber::{fmt, EnvFilter};

/// Show the AST of a script as the compiler sees it at a given phase.
#[derive(Parser)]
#[command(name = "scriptview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the script
    file: PathBuf,

    /// Phase to compile up to, by name (`semantic-analysis`) or number (`4`)
    #[arg(short, long, default_value = "class-generation", value_parser = parse_phase)]
    phase: CompilePhase,

    /// Label template file to use instead of `~/.scriptview/labels.toml`
    #[arg(short, long)]
    labels: Option<PathBuf>,

    /// Also print the property table of every node
    #[arg(long)]
    properties: bool,
}

fn parse_phase(text: &str) -> Result<CompilePhase, String> {
    CompilePhase::parse(text).map_err(|error| error.to_string())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let file_path = cli.file.to_string_lossy().into_owned();

    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Unable to load file at `{file_path}`: {error}");
            return ExitCode::FAILURE;
        }
    };

    let labels = match &cli.labels {
        Some(path) => match LabelMapping::load_from(path) {
            Ok(labels) => labels,
            Err(error) => {
                eprintln!("{error}");
                return ExitCode::FAILURE;
            }
        },
        None => LabelMapping::global().clone(),
    };

    match Session::with_labels(&labels).compile(&source, cli.phase) {
        Ok(tree) => {
            print!("{}", tree.render(cli.properties));
            ExitCode::SUCCESS
        }
        Err(error) => {
            error_report::display(&file_path, &source, error);
            ExitCode::FAILURE
        }
    }
}

mod error_report {
    use ariadne::{Label, Report, ReportKind, Source};
    use scriptview::{common::ast::Span, Error};

    pub fn display(file_path: &str, file_content: &str, error: Error) {
        match error {
            Error::Parse(errors) => {
                for error in errors {
                    report(
                        file_path,
                        file_content,
                        "Parser error",
                        error.span(),
                        error.label().map_or_else(|| error.to_string(), ToOwned::to_owned),
                    );
                }
            }
            Error::Compilation(error) => report(
                file_path,
                file_content,
                &format!("{} error", error.phase),
                error.span,
                error.message,
            ),
            error => eprintln!("{error}"),
        }
    }

    fn report(file_path: &str, file_content: &str, title: &str, span: Span, message: String) {
        Report::build(ReportKind::Error, file_path, span.start)
            .with_message(title)
            .with_label(Label::new((file_path, span)).with_message(message))
            .finish()
            .eprint((file_path, Source::from(file_content)))
            .unwrap_or_else(|error| eprintln!("unable to display error report: {error}"));
    }
}
