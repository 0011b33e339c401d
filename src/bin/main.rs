use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jmmc::{Compilation, Config};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "jmmc")]
#[command(about = "Java-- to Jasmin compiler")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a .jmm file, or every .jmm file under a directory, to .j files
    Compile {
        #[arg(value_name = "PATH")]
        input: PathBuf,

        /// Output directory for .j files
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Value of `.limit stack`
        #[arg(long)]
        limit_stack: Option<u16>,

        /// Minimum value of `.limit locals`
        #[arg(long)]
        limit_locals: Option<u16>,
    },

    /// Run semantic review only and print diagnostics
    Check {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Also print the symbol table
        #[arg(short, long)]
        symbols: bool,
    },

    /// Print the intermediate representation
    Ir {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Parse a .jmm file and show the AST
    Parse {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show detailed AST information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Lexically analyze a .jmm file
    Lex {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show token locations
        #[arg(short, long)]
        locations: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env().filter_level(level).init();

    match &cli.command {
        Commands::Compile { input, output, limit_stack, limit_locals } => {
            let mut config = Config::from_env()?;
            if let Some(stack) = limit_stack {
                config.limit_stack = *stack;
            }
            if let Some(locals) = limit_locals {
                config.limit_locals = *locals;
            }
            compile(input, output, &config)
        }
        Commands::Check { input, symbols } => check(input, *symbols),
        Commands::Ir { input } => show_ir(input),
        Commands::Parse { input, detailed } => {
            parse_file(input, *detailed)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Lex { input, locations } => {
            lex_file(input, *locations)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("cannot read {}", input.display()))
}

fn report(input: &Path, compilation: &Compilation) {
    for diagnostic in &compilation.diagnostics {
        eprintln!("{}:{}", input.display(), diagnostic);
    }
}

fn compile(input: &Path, output: &Path, config: &Config) -> Result<ExitCode> {
    let results = jmmc::compile_path(input, output, config)?;
    let mut failed = 0;
    for (path, compilation) in &results {
        report(path, compilation);
        if compilation.is_ok() {
            println!("{} -> {}", path.display(), output.join(format!("{}.j", compilation.class_name())).display());
        } else {
            failed += 1;
        }
    }
    if failed > 0 {
        eprintln!("{} of {} file(s) rejected", failed, results.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn check(input: &Path, symbols: bool) -> Result<ExitCode> {
    let program = jmmc::parser::parse_jmm(&read(input)?)?;
    let table = jmmc::symtab::build(&program);
    if symbols {
        print!("{}", table);
    }
    let analysis = jmmc::review::review(&program, &table);
    for diagnostic in &analysis.diagnostics {
        eprintln!("{}:{}", input.display(), diagnostic);
    }
    if analysis.is_ok() {
        println!("{}: ok", input.display());
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn show_ir(input: &Path) -> Result<ExitCode> {
    let compilation = jmmc::compile(&read(input)?, &Config::default())?;
    report(input, &compilation);
    match &compilation.ir {
        Some(unit) => {
            print!("{}", unit);
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

fn parse_file(input: &Path, detailed: bool) -> Result<()> {
    let program = jmmc::parser::parse_jmm(&read(input)?)?;

    if detailed {
        println!("{:#?}", program);
    } else {
        println!("{}", program);
    }

    Ok(())
}

fn lex_file(input: &Path, locations: bool) -> Result<()> {
    let source = read(input)?;
    let lexer = jmmc::parser::Lexer::new(&source);
    let tokens = lexer.tokenize().with_context(|| format!("cannot tokenize {}", input.display()))?;

    for token in tokens {
        if locations {
            println!("{:?} at {}:{}", token.token_type(), token.location().line, token.location().column);
        } else {
            println!("{:?}: '{}'", token.token_type(), token.lexeme());
        }
    }

    Ok(())
}
