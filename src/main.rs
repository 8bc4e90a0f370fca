use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use complete_tree::{BinaryTree, CompleteTree, TreeConfig, TreeError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Token standing for an absent element in scripts and arguments
const ABSENT: &str = "null";

#[derive(Parser, Debug)]
#[command(name = "complete-tree", about = "Complete binary tree with O(1) amortized insertion")]
struct Cli {
    /// Validate the whole tree after every insert and remove.
    #[arg(long, global = true)]
    check_invariants: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert elements in order, then print the tree level by level.
    Build {
        /// Elements to insert (`null` is rejected as an absent element).
        elements: Vec<String>,
    },
    /// Execute a command script against an initially empty tree.
    Run {
        /// Script file, one command per line:
        /// `insert X`, `remove X`, `search X`, `at N`, `len`, `print`, `clear`.
        script: PathBuf,
        /// Report failing commands and continue instead of stopping.
        #[arg(long)]
        keep_going: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Insert(Option<String>),
    Remove(Option<String>),
    Search(String),
    At(usize),
    Len,
    Print,
    Clear,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TreeConfig::default().with_invariant_checks(cli.check_invariants);

    match cli.command {
        Commands::Build { elements } => run_build(config, elements)?,
        Commands::Run { script, keep_going } => run_script(config, script, keep_going)?,
    }

    Ok(())
}

fn run_build(config: TreeConfig, elements: Vec<String>) -> Result<()> {
    let mut tree = CompleteTree::with_config(config.with_capacity(elements.len()));
    for (idx, element) in elements.into_iter().enumerate() {
        tree.insert_nullable(parse_element(&element))
            .with_context(|| format!("failed to insert argument {}", idx + 1))?;
    }

    println!("{}", tree);
    println!("order: {}", join(tree.iter()));
    println!("size={} height={}", tree.len(), tree.height());
    Ok(())
}

fn run_script(config: TreeConfig, script_path: PathBuf, keep_going: bool) -> Result<()> {
    let reader = BufReader::new(File::open(&script_path).with_context(|| {
        format!("failed to open script {}", script_path.display())
    })?);

    let mut tree = CompleteTree::with_config(config);
    let mut failures = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let command = match parse_command(&line)
            .with_context(|| format!("invalid command on line {}", line_no + 1))?
        {
            Some(command) => command,
            None => continue,
        };

        match execute(&mut tree, &command) {
            Ok(output) => println!("{}", output),
            Err(err) if keep_going => {
                warn!(line = line_no + 1, %err, "command failed");
                println!("error: {}", err);
                failures += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("command on line {} failed: {}", line_no + 1, line.trim())
                })
            }
        }
    }

    info!(size = tree.len(), failures, "script finished");
    if failures > 0 {
        bail!("{} command(s) failed", failures);
    }
    Ok(())
}

fn parse_element(token: &str) -> Option<String> {
    (token != ABSENT).then(|| token.to_string())
}

fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let verb = fields.next().unwrap_or_default();
    let arg = fields.next();
    if let Some(extra) = fields.next() {
        bail!("unexpected trailing argument '{}'", extra);
    }

    let require = |what: &str| arg.ok_or_else(|| anyhow::anyhow!("'{}' needs {}", verb, what));

    let command = match verb {
        "insert" => Command::Insert(parse_element(require("an element")?)),
        "remove" => Command::Remove(parse_element(require("an element")?)),
        "search" => Command::Search(require("an element")?.to_string()),
        "at" => {
            let index = require("an index")?;
            Command::At(
                index
                    .parse()
                    .with_context(|| format!("invalid index '{}'", index))?,
            )
        }
        "len" => Command::Len,
        "print" => Command::Print,
        "clear" => Command::Clear,
        other => bail!("unknown command '{}'", other),
    };
    Ok(Some(command))
}

fn execute(tree: &mut CompleteTree<String>, command: &Command) -> Result<String, TreeError> {
    let output = match command {
        Command::Insert(element) => {
            tree.insert_nullable(element.clone())?;
            format!("inserted (size={})", tree.len())
        }
        Command::Remove(element) => match tree.remove_nullable(element.as_ref())? {
            Some(removed) => format!("removed {} (size={})", removed, tree.len()),
            None => format!("not found (size={})", tree.len()),
        },
        Command::Search(element) => tree.search(element).to_string(),
        Command::At(index) => tree.element_at(*index)?.clone(),
        Command::Len => tree.len().to_string(),
        Command::Print => join(tree.iter()),
        Command::Clear => {
            tree.clear();
            "cleared".to_string()
        }
    };
    Ok(output)
}

fn join<'a>(elements: impl Iterator<Item = &'a String>) -> String {
    elements.map(String::as_str).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("insert 5").unwrap(),
            Some(Command::Insert(Some("5".into())))
        );
        assert_eq!(
            parse_command("  remove null ").unwrap(),
            Some(Command::Remove(None))
        );
        assert_eq!(parse_command("at 3").unwrap(), Some(Command::At(3)));
        assert_eq!(parse_command("# comment").unwrap(), None);
        assert_eq!(parse_command("").unwrap(), None);
        assert!(parse_command("at x").is_err());
        assert!(parse_command("insert").is_err());
        assert!(parse_command("insert 1 2").is_err());
        assert!(parse_command("rotate 1").is_err());
    }

    #[test]
    fn test_execute_script_flow() {
        let mut tree = CompleteTree::new();
        for v in ["a", "b", "c"] {
            execute(&mut tree, &Command::Insert(Some(v.into()))).unwrap();
        }
        assert_eq!(execute(&mut tree, &Command::Print).unwrap(), "a b c");
        assert_eq!(execute(&mut tree, &Command::At(1)).unwrap(), "b");
        assert_eq!(
            execute(&mut tree, &Command::Remove(Some("a".into()))).unwrap(),
            "removed a (size=2)"
        );
        assert_eq!(execute(&mut tree, &Command::Print).unwrap(), "c b");
        assert_eq!(
            execute(&mut tree, &Command::Remove(Some("z".into()))).unwrap(),
            "not found (size=2)"
        );
        assert_eq!(
            execute(&mut tree, &Command::Search("z".into())).unwrap(),
            "false"
        );
    }

    #[test]
    fn test_execute_errors_leave_tree_untouched() {
        let mut tree = CompleteTree::new();
        assert!(matches!(
            execute(&mut tree, &Command::Remove(Some("x".into()))),
            Err(TreeError::EmptyCollection)
        ));
        assert!(matches!(
            execute(&mut tree, &Command::Insert(None)),
            Err(TreeError::InvalidArgument(_))
        ));
        assert!(matches!(
            execute(&mut tree, &Command::At(0)),
            Err(TreeError::IndexOutOfRange { index: 0, len: 0 })
        ));
        assert_eq!(tree.len(), 0);
    }
}
