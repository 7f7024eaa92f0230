//! wren command-line front end
//!
//! Parses markup from a file, stdin or the command line, then prints the
//! node tree, the elements matching a selector, or JSON.

mod output;

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use wren::Document;
use wren_common::logging::{LogConfig, init_logging};

use output::{Painter, elements_json, node_json, write_tree};

/// Parse forgiving HTML-like markup and query it with CSS selectors
#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the node tree of a file
    wren page.html

    # Parse inline markup
    wren --html '<ul><li>one</li><li>two</li></ul>'

    # Print the markup of every matching element
    wren page.html -s 'ul > li:nth-child(odd)'

    # Read stdin and dump matches as JSON
    cat page.html | wren - -s 'a[href^="https"]' --json

    # Show what the parser does
    wren -vv --html '<p>hi</p>'
"#)]
struct Cli {
    /// Markup file to parse, or `-` for stdin
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this markup instead of a file
    #[arg(long, value_name = "MARKUP", conflicts_with = "path")]
    html: Option<String>,

    /// Only print elements matching this selector list
    #[arg(short, long, value_name = "SELECTOR")]
    select: Option<String>,

    /// Print JSON
    #[arg(long, conflicts_with = "tree")]
    json: bool,

    /// Print selected elements as indented trees instead of markup
    #[arg(long)]
    tree: bool,

    /// When to color tree output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Log filter directives, e.g. `wren_html=trace`; overrides RUST_LOG
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl Cli {
    fn log_config(&self) -> LogConfig {
        let config = match self.verbose {
            0 => LogConfig::default(),
            1 => LogConfig::debug(),
            _ => LogConfig::trace(),
        };
        match &self.log_filter {
            Some(filter) => config.with_filter(filter.clone()),
            None => config,
        }
    }

    fn painter(&self) -> Painter {
        Painter::new(match self.color {
            ColorChoice::Auto => io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_config());

    let markup = read_markup(&cli)?;
    let doc = Document::parse(&markup);
    let tree = doc.tree();
    let painter = cli.painter();
    let mut out = io::stdout().lock();

    let Some(selector) = &cli.select else {
        if cli.json {
            writeln!(out, "{}", node_json(tree, doc.root())?)?;
        } else {
            write_tree(&mut out, tree, doc.root(), &painter)?;
        }
        return Ok(());
    };

    let selected: Vec<_> = doc
        .query_selector_all(selector)?
        .iter()
        .map(wren::ElementRef::id)
        .collect();

    if cli.json {
        writeln!(out, "{}", elements_json(tree, &selected)?)?;
    } else {
        for &id in &selected {
            if cli.tree {
                write_tree(&mut out, tree, id, &painter)?;
            } else if let Some(element) = doc.element(id) {
                writeln!(out, "{}", element.outer_html())?;
            }
        }
    }
    Ok(())
}

/// Markup from `--html`, stdin (`-`) or a file.
fn read_markup(cli: &Cli) -> Result<String> {
    if let Some(html) = &cli.html {
        return Ok(html.clone());
    }
    match cli.path.as_deref() {
        Some(path) if path == Path::new("-") => {
            let mut markup = String::new();
            let _ = io::stdin()
                .read_to_string(&mut markup)
                .context("failed to read markup from stdin")?;
            Ok(markup)
        }
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display())),
        None => bail!("no input: pass a FILE, `-` for stdin, or --html"),
    }
}
