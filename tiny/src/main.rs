use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use tiny::ir::print::render_tree;
use tiny::parser::lexer::tokenize;
use tiny::session::TraceOptions;

#[derive(Parser)]
#[command(name = "tiny")]
#[command(about = "Фронтенд учебного языка TINY", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Разобрать и проверить программу, вывести листинг и ошибки
    Check {
        /// Исходник (без расширения добавляется ".tny")
        input: PathBuf,

        #[command(flatten)]
        trace: TraceArgs,
    },

    /// Показать токены и дерево разбора без анализа
    Parse {
        /// Исходник
        input: PathBuf,
    },

    /// Вывести таблицу символов программы
    Symbols {
        /// Исходник
        input: PathBuf,
    },
}

#[derive(Args)]
struct TraceArgs {
    /// Печатать строки исходника по мере чтения
    #[arg(long)]
    echo_source: bool,

    /// Печатать каждый токен
    #[arg(long)]
    trace_scan: bool,

    /// Печатать дерево разбора
    #[arg(long)]
    trace_parse: bool,

    /// Печатать таблицу символов и ход проверки типов
    #[arg(long)]
    trace_analyze: bool,
}

impl From<TraceArgs> for TraceOptions {
    fn from(args: TraceArgs) -> Self {
        Self {
            echo_source: args.echo_source,
            trace_scan: args.trace_scan,
            trace_parse: args.trace_parse,
            trace_analyze: args.trace_analyze,
        }
    }
}

/// Добавляет расширение по умолчанию к имени без расширения.
fn source_path(input: PathBuf) -> PathBuf {
    if input.extension().is_some() {
        input
    } else {
        input.with_extension("tny")
    }
}

/// Невалидный UTF-8 заменяется на U+FFFD и сканируется как ошибочный токен.
fn read_source(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { input, trace } => {
            let path = source_path(input);
            println!("TINY COMPILATION: {}", path.display());

            let file = fs::File::open(&path)?;
            let compilation = tiny::compile(BufReader::new(file), trace.into())?;

            for line in compilation.listing() {
                println!("{}", line);
            }
            for error in compilation.diagnostics() {
                eprintln!("{}: {}", path.display(), error);
            }

            if compilation.has_errors() {
                eprintln!("{} error(s), no code generated", compilation.diagnostics().len());
                return Ok(ExitCode::FAILURE);
            }
            println!("No errors");
        }
        Commands::Parse { input } => {
            let path = source_path(input);
            println!("Parsing {}...", path.display());

            let source = read_source(&path)?;

            println!("=== SOURCE ===");
            println!("{}", source);
            println!("=== TOKENS ===");
            for token in tokenize(&source) {
                println!("{:4}: {}", token.line, token);
            }

            let compilation = tiny::compile_str(&source, TraceOptions::default())?;
            println!("=== AST ===");
            print!("{}", render_tree(&compilation.program));
            for error in compilation.diagnostics() {
                eprintln!("Error: {}", error);
            }
        }
        Commands::Symbols { input } => {
            let path = source_path(input);
            let source = read_source(&path)?;
            let compilation = tiny::compile_str(&source, TraceOptions::default())?;

            match &compilation.symbols {
                Some(symbols) => print!("{}", symbols),
                None => {
                    for error in compilation.diagnostics() {
                        eprintln!("Error: {}", error);
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
