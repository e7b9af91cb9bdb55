use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use j2lua::config::Config;
use j2lua::diagnostics::{CompileError, format_diagnostic, render_error};
use j2lua::span::LineIndex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "j2lua",
    version,
    about = "Translate a single-class Java program into a Lua script",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,

    /// Render diagnostics with a source excerpt
    #[arg(long, global = true)]
    pretty: bool,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Args)]
struct TranslateArgs {
    /// Java source file
    #[arg(required = true)]
    file: Option<PathBuf>,
    /// Output path (defaults to <stem>.lua in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Write the Lua chunk to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,
    /// Config file (defaults to the nearest j2lua.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Lex, parse and resolve a file without generating code
    Check {
        file: PathBuf,
    },
    /// Print the parsed class back as formatted Java
    Fmt {
        file: PathBuf,
    },
    /// Print the parsed AST as JSON
    DumpAst {
        file: PathBuf,
    },
    /// Print the token stream, one JSON object per line
    Tokens {
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("J2LUA_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

/// Report `err` on stderr and exit with status 1.
fn fail(file: &Path, source: &str, err: &CompileError, pretty: bool) -> ! {
    let filename = file.to_string_lossy();
    if pretty {
        render_error(source, &filename, err);
    } else {
        eprintln!("{}", format_diagnostic(&filename, source, err));
    }
    std::process::exit(1);
}

fn read_or_fail(file: &Path, pretty: bool) -> String {
    match j2lua::read_source(file) {
        Ok(source) => source,
        Err(err) => fail(file, "", &err, pretty),
    }
}

fn load_config(args: &TranslateArgs, file: &Path) -> Result<Config, CompileError> {
    match &args.config {
        Some(path) => Config::load(path),
        None => {
            let dir = file.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
            Config::discover(dir)
        }
    }
}

fn is_java_source(file: &Path) -> bool {
    file.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("java"))
}

fn run_translate(args: &TranslateArgs, file: &Path, pretty: bool) {
    if !is_java_source(file) {
        let err = CompileError::io(
            format!("unsupported input type {}: expected a .java file", file.display()),
            file.to_path_buf(),
        );
        fail(file, "", &err, pretty);
    }
    let source = read_or_fail(file, pretty);
    let config = load_config(args, file).unwrap_or_else(|err| fail(file, &source, &err, pretty));
    let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let lua = j2lua::translate_with_options(&source, &name, &config.translate)
        .unwrap_or_else(|err| fail(file, &source, &err, pretty));

    if args.stdout {
        print!("{lua}");
        return;
    }
    let output = args.output.clone().unwrap_or_else(|| {
        let stem = file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "out".into());
        PathBuf::from(format!("{stem}.lua"))
    });
    if let Err(e) = std::fs::write(&output, lua) {
        let err = CompileError::io(format!("failed to write {}: {e}", output.display()), output.clone());
        fail(file, &source, &err, pretty);
    }
    tracing::info!(output = %output.display(), "wrote lua chunk");
    println!("Lua script generated: {}", output.display());
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Check { file }) => {
            let source = read_or_fail(&file, cli.pretty);
            if let Err(err) = j2lua::check(&source) {
                fail(&file, &source, &err, cli.pretty);
            }
        }
        Some(Commands::Fmt { file }) => {
            let source = read_or_fail(&file, cli.pretty);
            match j2lua::parse_unit(&source) {
                Ok(class) => print!("{}", j2lua::pretty::pretty_print(&class)),
                Err(err) => fail(&file, &source, &err, cli.pretty),
            }
        }
        Some(Commands::DumpAst { file }) => {
            let source = read_or_fail(&file, cli.pretty);
            let class = j2lua::parse_unit(&source).unwrap_or_else(|err| fail(&file, &source, &err, cli.pretty));
            match serde_json::to_string_pretty(&class) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: failed to serialize AST: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Tokens { file }) => {
            let source = read_or_fail(&file, cli.pretty);
            let tokens = j2lua::lexer::lex(&source).unwrap_or_else(|err| fail(&file, &source, &err, cli.pretty));
            let index = LineIndex::new(&source);
            for tok in &tokens {
                let pos = index.position(tok.span.start);
                let line = serde_json::json!({
                    "kind": tok.node.kind(),
                    "lexeme": &source[tok.span.start..tok.span.end],
                    "line": pos.line,
                    "col": pos.col,
                });
                println!("{line}");
            }
        }
        None => {
            let Some(file) = cli.translate.file.clone() else {
                eprintln!("error: no input file");
                std::process::exit(1);
            };
            run_translate(&cli.translate, &file, cli.pretty);
        }
    }
}
