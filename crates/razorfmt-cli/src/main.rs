use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use razorfmt_config::Config;
use razorfmt_engine::format_text;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Formatted source
    Formatted,
    /// Parsed node tree
    Ast,
}

/// Canonical formatter for Razor templates
#[derive(Debug, Parser)]
#[command(name = "razorfmt", author, version, about)]
struct Cli {
    /// Files to format. Reads stdin when none are given.
    files: Vec<PathBuf>,

    /// Rewrite files in place
    #[arg(long, conflicts_with = "check")]
    write: bool,

    /// List files whose formatting would change and exit with status 1 if any
    #[arg(long)]
    check: bool,

    /// Config file to use instead of discovering razorfmt.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Spaces per indentation level
    #[arg(long, value_name = "N")]
    indent_width: Option<usize>,

    /// Target line width
    #[arg(long, value_name = "N")]
    print_width: Option<usize>,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Formatted)]
    emit: Emit,
}

impl Cli {
    /// Loads the config file and applies command-line overrides on top.
    fn config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref()).context("Failed to load config")?;
        if let Some(indent_width) = self.indent_width {
            config.indent_width = indent_width;
        }
        if let Some(print_width) = self.print_width {
            config.print_width = print_width;
        }
        config.validate()?;
        Ok(config)
    }
}

fn render(source: &str, config: &Config, emit: Emit) -> String {
    match emit {
        Emit::Formatted => format_text(source, &config.format_options()),
        Emit::Ast => {
            let parser = razorfmt_syntax::Parser::with_options(&config.parse_options());
            format!("{:#?}\n", parser.parse(source))
        }
    }
}

fn run_stdin(cli: &Cli, config: &Config) -> Result<bool> {
    if cli.write {
        bail!("--write needs at least one file");
    }

    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("Failed to read stdin")?;
    let output = render(&source, config, cli.emit);

    if cli.check {
        let changed = output != source;
        if changed {
            println!("<stdin>");
        }
        return Ok(changed);
    }

    io::stdout()
        .write_all(output.as_bytes())
        .context("Failed to write stdout")?;
    Ok(false)
}

/// Formats one file. Returns whether its formatting differs from the source.
fn run_file(path: &Path, cli: &Cli, config: &Config) -> Result<bool> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let output = render(&source, config, cli.emit);
    let changed = output != source;

    if cli.check {
        if changed {
            println!("{}", path.display());
        }
    } else if cli.write {
        if changed {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("formatted {}", path.display());
        } else {
            log::debug!("unchanged {}", path.display());
        }
    } else {
        print!("{output}");
    }

    Ok(changed)
}

/// Runs the command. Returns whether `--check` found files to reformat.
fn run(cli: &Cli) -> Result<bool> {
    if cli.emit == Emit::Ast && (cli.write || cli.check) {
        bail!("--emit ast cannot be combined with --write or --check");
    }

    let config = cli.config()?;
    log::debug!("{config:?}");

    if cli.files.is_empty() {
        return run_stdin(cli, &config);
    }

    let mut any_changed = false;
    for path in &cli.files {
        any_changed |= run_file(path, cli, &config)?;
    }
    Ok(cli.check && any_changed)
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(false) => {}
        Ok(true) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}
