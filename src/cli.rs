//! Command-line argument definitions

use std::path::PathBuf;
use std::time::Duration;

use algotrace::config::EngineConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "algotrace",
    version,
    about = "Step through algorithms and data structures in the terminal",
    long_about = "Run an algorithm or a script of data-structure operations, recording \
                  every step.\n\n\
                  By default the run is shown live in a terminal UI where the recorded \
                  history can be replayed. With --headless the steps are printed instead."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Pause after each step, in milliseconds (default 500, 0 with --headless).
    #[arg(long = "delay-ms", value_name = "MS", global = true)]
    pub delay_ms: Option<u64>,

    /// Seed for randomly generated arrays.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Print the step stream to stdout instead of opening the UI.
    #[arg(long, global = true)]
    pub headless: bool,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to a file. Without it the UI logs nothing and headless runs log to stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.delay = match (self.delay_ms, self.headless) {
            (Some(ms), _) => Duration::from_millis(ms),
            (None, true) => Duration::ZERO,
            (None, false) => config.delay,
        };
        config.seed = self.seed;
        config
    }

    /// Default filter directive when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Sort an array with one of the sorting algorithms.
    Sort(SortArgs),

    /// Longest increasing subsequence.
    Lis {
        #[arg(value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
        values: Vec<i64>,
    },

    /// 0/1 knapsack.
    Knapsack {
        #[arg(long, value_delimiter = ',', required = true)]
        weights: Vec<usize>,
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        values: Vec<i64>,
        #[arg(long)]
        capacity: usize,
    },

    /// Levenshtein distance between two words.
    EditDistance { word1: String, word2: String },

    /// Every ordering of the given values.
    Permutations {
        #[arg(value_delimiter = ',', num_args = 1.., allow_negative_numbers = true)]
        values: Vec<i64>,
    },

    /// Every placement of N non-attacking queens.
    Queens { n: usize },

    /// Solve a 9x9 Sudoku.
    Sudoku {
        /// 81 cells in row order; 0 or . marks a blank
        board: String,
    },

    /// Naive recursive Fibonacci.
    Fibonacci { n: u32 },

    /// Recursive factorial.
    Factorial { n: u32 },

    /// Towers of Hanoi.
    Hanoi {
        disks: u32,
        #[arg(long, default_value_t = 'A')]
        from: char,
        #[arg(long, default_value_t = 'C')]
        to: char,
        #[arg(long, default_value_t = 'B')]
        via: char,
    },

    /// Greedy coin change.
    Change {
        amount: u64,
        #[arg(long, value_delimiter = ',', default_value = "25,10,5,1")]
        coins: Vec<u64>,
    },

    /// Greedy activity selection.
    Activities {
        /// Activities as START-END, e.g. 1-4,3-5,0-6
        #[arg(value_delimiter = ',', num_args = 1..)]
        activities: Vec<String>,
    },

    /// Run a script of array operations.
    Array(StructureArgs),

    /// Run a script of stack operations.
    Stack(StructureArgs),

    /// Run a script of queue operations.
    Queue(StructureArgs),

    /// Run a script of linked list operations.
    List(StructureArgs),

    /// Run a script of binary search tree operations.
    Tree(StructureArgs),

    /// Run a script of hash table operations.
    Hash(StructureArgs),

    /// Run a script of graph operations.
    Graph(StructureArgs),
}

#[derive(Args)]
pub struct SortArgs {
    #[arg(value_enum)]
    pub algorithm: SortAlgorithm,

    /// Values to sort.
    #[arg(
        value_delimiter = ',',
        allow_negative_numbers = true,
        conflicts_with = "random"
    )]
    pub values: Vec<i64>,

    /// Sort N random values instead.
    #[arg(long, value_name = "N")]
    pub random: Option<usize>,

    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub min: i64,

    #[arg(long, default_value_t = 99, allow_negative_numbers = true)]
    pub max: i64,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortAlgorithm {
    Bubble,
    Selection,
    Insertion,
    Shell,
    Quick,
    Merge,
    Heap,
    Counting,
    Bucket,
    Radix,
}

#[derive(Args)]
pub struct StructureArgs {
    /// Initial contents, where the structure takes them.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub initial: Vec<i64>,

    /// Operations separated by ';', e.g. "push 3; pop; peek".
    #[arg(long, default_value = "")]
    pub ops: String,
}

/// One scripted operation: a name and its whitespace-separated arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOp {
    pub name: String,
    pub args: Vec<String>,
}

impl StructureArgs {
    pub fn script(&self) -> Vec<ScriptOp> {
        self.ops
            .split(';')
            .filter_map(|entry| {
                let mut words = entry.split_whitespace();
                let name = words.next()?.to_ascii_lowercase();
                Some(ScriptOp {
                    name,
                    args: words.map(str::to_string).collect(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_parsing() {
        let args = StructureArgs {
            initial: Vec::new(),
            ops: "push 3;  POP ; ;add-edge a b 4".to_string(),
        };
        let script = args.script();
        assert_eq!(script.len(), 3);
        assert_eq!(script[0].args, vec!["3"]);
        assert_eq!(script[1].name, "pop");
        assert_eq!(script[2].args, vec!["a", "b", "4"]);
    }

    #[test]
    fn test_headless_defaults_to_no_delay() {
        let cli = Cli::parse_from(["algotrace", "--headless", "fibonacci", "4"]);
        assert_eq!(cli.engine_config().delay, Duration::ZERO);

        let cli = Cli::parse_from(["algotrace", "fibonacci", "4", "--delay-ms", "20", "-vv"]);
        assert_eq!(cli.engine_config().delay, Duration::from_millis(20));
        assert_eq!(cli.log_level(), "trace");
    }

    #[test]
    fn test_sort_values() {
        let cli = Cli::parse_from(["algotrace", "sort", "quick", "5,-2,9"]);
        let Command::Sort(args) = cli.command else {
            panic!("expected sort");
        };
        assert_eq!(args.values, vec![5, -2, 9]);
    }
}
