mod command;

use crate::command::{Command, ParseCommandError, HELP};
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use ordered_tree::red_black_tree::OrderedTree;
use serde_derive::{Deserialize, Serialize};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::error;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::result;

const DEFAULT_INPUT: &str = "input.txt";
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug)]
enum ShellError {
    IOError(io::Error),
    SerdeError(bincode::Error),
    SnapshotVersion(u32),
}

impl From<io::Error> for ShellError {
    fn from(err: io::Error) -> ShellError {
        ShellError::IOError(err)
    }
}

impl From<bincode::Error> for ShellError {
    fn from(err: bincode::Error) -> ShellError {
        ShellError::SerdeError(err)
    }
}

impl error::Error for ShellError {}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::IOError(error) => write!(f, "{}", error),
            ShellError::SerdeError(error) => write!(f, "{}", error),
            ShellError::SnapshotVersion(version) => write!(
                f,
                "snapshot version {} is not supported (expected {})",
                version, SNAPSHOT_VERSION,
            ),
        }
    }
}

type Result<T> = result::Result<T, ShellError>;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    tree: &'a OrderedTree<i64>,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    tree: OrderedTree<i64>,
}

/// Interactive shell over an ordered tree of integers.
#[derive(Debug, Parser)]
#[command(name = "ordered-tree", after_help = HELP)]
struct Options {
    /// File of whitespace-separated integers loaded at startup
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// Log tree operations at debug level
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Options {
    fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}

fn load_keys(path: &Path) -> Result<Vec<i64>> {
    let contents = fs::read_to_string(path)?;
    let mut keys = Vec::new();
    for token in contents.split_whitespace() {
        match token.parse() {
            Ok(key) => keys.push(key),
            Err(_) => warn!("skipping `{}` in {}: not an integer", token, path.display()),
        }
    }
    Ok(keys)
}

fn save_snapshot(tree: &OrderedTree<i64>, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        tree,
    };
    bincode::serialize_into(&mut writer, &snapshot)?;
    writer.flush()?;
    Ok(())
}

fn load_snapshot(path: &Path) -> Result<OrderedTree<i64>> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: Snapshot = bincode::deserialize_from(reader)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(ShellError::SnapshotVersion(snapshot.version));
    }
    Ok(snapshot.tree)
}

fn execute<W>(tree: &mut OrderedTree<i64>, command: Command, output: &mut W) -> Result<()>
where
    W: Write,
{
    match command {
        Command::Insert(key) => {
            if tree.insert(key).is_some() {
                writeln!(output, "{} is already present", key)?;
            } else {
                writeln!(output, "Inserted {}", key)?;
            }
        },
        Command::Delete(key) => match tree.delete(&key) {
            Ok(_) => writeln!(output, "Deleted {} from tree", key)?,
            Err(_) => writeln!(output, "Key {} not found in tree", key)?,
        },
        Command::Search(key) => {
            let status = if tree.search(&key) { "found" } else { "not found" };
            writeln!(output, "Number {} {}", key, status)?;
        },
        Command::Successor(key) => match tree.successor(&key) {
            Ok(Some(next)) => writeln!(output, "Successor of {}: {}", key, next)?,
            Ok(None) => writeln!(output, "No successor found for {}", key)?,
            Err(_) => writeln!(output, "Number {} not found", key)?,
        },
        Command::Predecessor(key) => match tree.predecessor(&key) {
            Ok(Some(prev)) => writeln!(output, "Predecessor of {}: {}", key, prev)?,
            Ok(None) => writeln!(output, "No predecessor found for {}", key)?,
            Err(_) => writeln!(output, "Number {} not found", key)?,
        },
        Command::Sort => {
            let keys = tree.sorted_sequence().collect::<Vec<&i64>>();
            writeln!(output, "Sorted numbers: {:?}", keys)?;
        },
        Command::Min => match tree.minimum() {
            Ok(key) => writeln!(output, "Minimum value: {}", key)?,
            Err(_) => writeln!(output, "Tree is empty")?,
        },
        Command::Max => match tree.maximum() {
            Ok(key) => writeln!(output, "Maximum value: {}", key)?,
            Err(_) => writeln!(output, "Tree is empty")?,
        },
        Command::Height => {},
        Command::Len => writeln!(output, "Tree holds {} keys", tree.len())?,
        Command::Save(path) => {
            save_snapshot(tree, &path)?;
            info!("saved {} keys to {}", tree.len(), path.display());
            writeln!(output, "Saved {} keys to {}", tree.len(), path.display())?;
        },
        Command::Load(path) => {
            *tree = load_snapshot(&path)?;
            info!("loaded {} keys from {}", tree.len(), path.display());
            writeln!(output, "Loaded {} keys from {}", tree.len(), path.display())?;
        },
        Command::Help => writeln!(output, "{}", HELP)?,
        Command::Exit => return Ok(()),
    }
    writeln!(output, "Current tree height: {}", tree.height())?;
    Ok(())
}

fn run<R, W>(tree: &mut OrderedTree<i64>, input: R, output: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", HELP)?;
    write!(output, "\nEnter command: ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        match line.parse::<Command>() {
            Ok(Command::Exit) => return Ok(()),
            Ok(command) => {
                if let Err(err) = execute(tree, command, output) {
                    error!("{}", err);
                    writeln!(output, "Command failed: {}", err)?;
                }
            },
            Err(ParseCommandError::Empty) => {},
            Err(err) => {
                warn!("{}", err);
                writeln!(output, "Invalid command")?;
            },
        }
        write!(output, "\nEnter command: ")?;
        output.flush()?;
    }
    Ok(())
}

fn main() {
    let options = Options::parse();

    if let Err(err) = TermLogger::init(
        options.level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to initialize logging: {}", err);
    }

    let mut tree = OrderedTree::new();
    match load_keys(&options.input) {
        Ok(keys) => {
            info!("read {} numbers from {}", keys.len(), options.input.display());
            tree.extend(keys);
            info!("initial tree holds {} keys, height {}", tree.len(), tree.height());
        },
        Err(ShellError::IOError(ref err)) if err.kind() == io::ErrorKind::NotFound => {
            warn!("{} not found, starting with an empty tree", options.input.display());
        },
        Err(err) => {
            error!("failed to read {}: {}", options.input.display(), err);
            process::exit(1);
        },
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = run(&mut tree, stdin.lock(), &mut stdout.lock()) {
        error!("{}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{load_snapshot, run, save_snapshot, Options, ShellError, Snapshot, SnapshotRef};
    use clap::Parser;
    use log::LevelFilter;
    use ordered_tree::red_black_tree::OrderedTree;
    use std::env;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn run_script(tree: &mut OrderedTree<i64>, script: &str) -> String {
        let mut output = Vec::new();
        run(tree, Cursor::new(script), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_options_defaults() {
        let options = Options::try_parse_from(&["ordered-tree"]).unwrap();
        assert_eq!(options.input, PathBuf::from("input.txt"));
        assert_eq!(options.level(), LevelFilter::Info);
    }

    #[test]
    fn test_options_flags() {
        let options = Options::try_parse_from(&["ordered-tree", "-v", "numbers.txt"]).unwrap();
        assert_eq!(options.input, PathBuf::from("numbers.txt"));
        assert_eq!(options.level(), LevelFilter::Debug);

        let options = Options::try_parse_from(&["ordered-tree", "--quiet"]).unwrap();
        assert_eq!(options.level(), LevelFilter::Warn);

        assert!(Options::try_parse_from(&["ordered-tree", "--bogus"]).is_err());
        assert!(Options::try_parse_from(&["ordered-tree", "a", "b"]).is_err());
        assert!(Options::try_parse_from(&["ordered-tree", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_run_queries() {
        let mut tree: OrderedTree<i64> = vec![10, 20, 30].into_iter().collect();
        let output = run_script(
            &mut tree,
            "search 20\nsuccessor 30\npredecessor 20\ndelete 25\nsort\nmin\nexit\ninsert 1\n",
        );

        assert!(output.contains("Number 20 found"));
        assert!(output.contains("No successor found for 30"));
        assert!(output.contains("Predecessor of 20: 10"));
        assert!(output.contains("Key 25 not found in tree"));
        assert!(output.contains("Sorted numbers: [10, 20, 30]"));
        assert!(output.contains("Minimum value: 10"));
        assert!(!output.contains("Inserted 1"));
        assert!(!tree.search(&1));
    }

    #[test]
    fn test_run_invalid_command() {
        let mut tree = OrderedTree::new();
        let output = run_script(&mut tree, "insert x\nmax\n");
        assert!(output.contains("Invalid command"));
        assert!(output.contains("Tree is empty"));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let tree: OrderedTree<i64> = vec![5, -2, 9].into_iter().collect();
        let path = env::temp_dir().join(format!("ordered-tree-{}.bin", std::process::id()));

        save_snapshot(&tree, &path).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded, tree);
    }

    #[test]
    fn test_snapshot_version_mismatch() {
        let tree: OrderedTree<i64> = vec![1].into_iter().collect();
        let bytes = bincode::serialize(&SnapshotRef {
            version: 2,
            tree: &tree,
        })
        .unwrap();
        let snapshot: Snapshot = bincode::deserialize(&bytes).unwrap();
        assert_eq!(snapshot.version, 2);

        let path = env::temp_dir().join(format!("ordered-tree-v2-{}.bin", std::process::id()));
        fs::write(&path, &bytes).unwrap();
        let result = load_snapshot(&path);
        fs::remove_file(&path).unwrap();

        match result {
            Err(ShellError::SnapshotVersion(2)) => {},
            _ => panic!("expected a version mismatch"),
        }
    }
}
