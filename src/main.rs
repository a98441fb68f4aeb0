// algotrace: step-recording algorithm visualizer

mod cli;

use std::error::Error;
use std::fs::File;
use std::future::Future;
use std::io;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use algotrace::algorithms::{
    Activity, BacktrackingDriver, DynamicProgrammingDriver, GreedyDriver, RecursionDriver,
    SortingDriver,
};
use algotrace::config::EngineConfig;
use algotrace::engine::{self, Driver, EngineError};
use algotrace::structures::{
    ArrayDriver, BinaryTreeDriver, GraphDriver, HashTableDriver, LinkedListDriver, QueueDriver,
    StackDriver,
};
use algotrace::ui::headless::format_outcome;
use algotrace::ui::{App, HeadlessLog, Scene};

use cli::{Cli, Command, ScriptOp, SortAlgorithm, StructureArgs};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = cli.engine_config();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run(cli.command, config, cli.headless))
}

fn init_logging(cli: &Cli) -> io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    if let Some(path) = &cli.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else if cli.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    // The UI owns the terminal, so it gets no log output unless a file is given
    Ok(())
}

/// Where a run's steps go while it executes
enum Frontend<V: Scene> {
    Tui(App<V>),
    Headless(HeadlessLog),
}

impl<V: Scene> Frontend<V> {
    fn attach<D: Driver<Family = V>>(driver: &D, headless: bool) -> Self {
        if headless {
            Frontend::Headless(HeadlessLog::attach(driver, io::stdout()))
        } else {
            Frontend::Tui(App::attach(driver))
        }
    }

    /// Run `work` to completion, or until the user quits the UI
    async fn drive<F, T>(self, work: F) -> Result<Option<engine::Result<T>>, Box<dyn Error>>
    where
        F: Future<Output = engine::Result<T>>,
    {
        match self {
            Frontend::Headless(_log) => Ok(Some(work.await)),
            Frontend::Tui(mut app) => {
                enable_raw_mode()?;
                let mut stdout = io::stdout();
                execute!(stdout, EnterAlternateScreen)?;
                let backend = CrosstermBackend::new(stdout);
                let mut terminal = Terminal::new(backend)?;

                let res = app.run(&mut terminal, work).await;

                // Restore terminal
                disable_raw_mode()?;
                execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
                terminal.show_cursor()?;

                Ok(res?)
            }
        }
    }
}

/// Attach a frontend to `$driver`, drive `$work`, then report the outcome
macro_rules! present {
    ($driver:ident, $headless:expr, $work:expr) => {{
        let frontend = Frontend::attach(&$driver, $headless);
        let outcome = frontend.drive($work).await?;
        report(&$driver, outcome)
    }};
}

async fn run(command: Command, config: EngineConfig, headless: bool) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Sort(args) => {
            let mut driver = SortingDriver::with_config(&config);
            match args.random {
                Some(size) => {
                    driver.generate_random_array(size, args.min, args.max)?;
                }
                None => driver.set_array(&args.values),
            }
            tracing::info!(values = ?driver.values(), "sorting");
            present!(driver, headless, sort(&mut driver, args.algorithm))
        }
        Command::Lis { values } => {
            let mut driver = DynamicProgrammingDriver::with_config(&config);
            present!(
                driver,
                headless,
                driver.longest_increasing_subsequence(&values)
            )
        }
        Command::Knapsack {
            weights,
            values,
            capacity,
        } => {
            let mut driver = DynamicProgrammingDriver::with_config(&config);
            present!(
                driver,
                headless,
                driver.knapsack(&weights, &values, capacity)
            )
        }
        Command::EditDistance { word1, word2 } => {
            let mut driver = DynamicProgrammingDriver::with_config(&config);
            present!(driver, headless, driver.edit_distance(&word1, &word2))
        }
        Command::Permutations { values } => {
            let mut driver = BacktrackingDriver::with_config(&config);
            present!(driver, headless, driver.permutations(&values))
        }
        Command::Queens { n } => {
            let mut driver = BacktrackingDriver::with_config(&config);
            present!(driver, headless, driver.n_queens(n))
        }
        Command::Sudoku { board } => {
            let board = parse_board(&board)?;
            let mut driver = BacktrackingDriver::with_config(&config);
            present!(driver, headless, driver.sudoku(&board))
        }
        Command::Fibonacci { n } => {
            let mut driver = RecursionDriver::with_config(&config);
            present!(driver, headless, driver.fibonacci(n))
        }
        Command::Factorial { n } => {
            let mut driver = RecursionDriver::with_config(&config);
            present!(driver, headless, driver.factorial(n))
        }
        Command::Hanoi {
            disks,
            from,
            to,
            via,
        } => {
            let mut driver = RecursionDriver::with_config(&config);
            present!(driver, headless, driver.hanoi(disks, from, to, via))
        }
        Command::Change { amount, coins } => {
            let mut driver = GreedyDriver::with_config(&config);
            present!(driver, headless, driver.make_change(amount, &coins))
        }
        Command::Activities { activities } => {
            let activities = parse_activities(&activities)?;
            let mut driver = GreedyDriver::with_config(&config);
            present!(driver, headless, driver.select_activities(&activities))
        }
        Command::Array(args) => {
            let mut driver = ArrayDriver::with_config(&args.initial, &config);
            present!(driver, headless, array_script(&mut driver, args.script()))
        }
        Command::Stack(args) => {
            let mut driver = StackDriver::with_config(&args.initial, &config);
            present!(driver, headless, stack_script(&mut driver, args.script()))
        }
        Command::Queue(args) => {
            let mut driver = QueueDriver::with_config(&config);
            let script = seeded(&args, "enqueue");
            present!(driver, headless, queue_script(&mut driver, script))
        }
        Command::List(args) => {
            let mut driver = LinkedListDriver::with_config(&args.initial, &config);
            present!(driver, headless, list_script(&mut driver, args.script()))
        }
        Command::Tree(args) => {
            let mut driver = BinaryTreeDriver::with_config(&args.initial, &config);
            present!(driver, headless, tree_script(&mut driver, args.script()))
        }
        Command::Hash(args) => {
            let mut driver = HashTableDriver::with_config(&config);
            present!(driver, headless, hash_script(&mut driver, args.script()))
        }
        Command::Graph(args) => {
            let mut driver = GraphDriver::with_config(&config);
            present!(driver, headless, graph_script(&mut driver, args.script()))
        }
    }
}

fn report<D, T>(driver: &D, outcome: Option<engine::Result<T>>) -> Result<(), Box<dyn Error>>
where
    D: Driver,
    D::Family: Scene,
{
    match outcome {
        None => {
            println!("Run interrupted");
            Ok(())
        }
        Some(Err(e)) if e.is_cancelled() => {
            println!("{}", e);
            Ok(())
        }
        Some(Err(e)) => Err(e.into()),
        Some(Ok(_)) => {
            println!("{}", format_outcome(&driver.get_state()));
            Ok(())
        }
    }
}

async fn sort(driver: &mut SortingDriver, algorithm: SortAlgorithm) -> engine::Result<()> {
    match algorithm {
        SortAlgorithm::Bubble => driver.bubble_sort().await,
        SortAlgorithm::Selection => driver.selection_sort().await,
        SortAlgorithm::Insertion => driver.insertion_sort().await,
        SortAlgorithm::Shell => driver.shell_sort().await,
        SortAlgorithm::Quick => driver.quick_sort().await,
        SortAlgorithm::Merge => driver.merge_sort().await,
        SortAlgorithm::Heap => driver.heap_sort().await,
        SortAlgorithm::Counting => driver.counting_sort().await,
        SortAlgorithm::Bucket => driver.bucket_sort().await,
        SortAlgorithm::Radix => driver.radix_sort().await,
    }
}

fn parse_board(board: &str) -> Result<Vec<Vec<u8>>, EngineError> {
    let cells: Vec<u8> = board
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '.' => Ok(0),
            _ => c
                .to_digit(10)
                .map(|d| d as u8)
                .ok_or_else(|| EngineError::invalid(format!("bad sudoku cell '{}'", c))),
        })
        .collect::<Result<_, _>>()?;
    if cells.len() != 81 {
        return Err(EngineError::invalid(format!(
            "sudoku board needs 81 cells, got {}",
            cells.len()
        )));
    }
    Ok(cells.chunks(9).map(<[u8]>::to_vec).collect())
}

fn parse_activities(specs: &[String]) -> Result<Vec<Activity>, EngineError> {
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let (start, end) = spec
                .split_once('-')
                .ok_or_else(|| EngineError::invalid(format!("expected START-END, got {}", spec)))?;
            Ok(Activity {
                id: i as u32 + 1,
                start: number(start.trim())?,
                end: number(end.trim())?,
            })
        })
        .collect()
}

fn number<T: std::str::FromStr>(text: &str) -> Result<T, EngineError> {
    text.parse()
        .map_err(|_| EngineError::invalid(format!("not a number: {}", text)))
}

fn arg<T: std::str::FromStr>(op: &ScriptOp, index: usize) -> Result<T, EngineError> {
    let text = op
        .args
        .get(index)
        .ok_or_else(|| EngineError::invalid(format!("{} needs argument {}", op.name, index + 1)))?;
    number(text)
}

fn text<'a>(op: &'a ScriptOp, index: usize) -> Result<&'a str, EngineError> {
    op.args
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| EngineError::invalid(format!("{} needs argument {}", op.name, index + 1)))
}

fn unknown(op: &ScriptOp) -> EngineError {
    EngineError::invalid(format!("unknown operation '{}'", op.name))
}

/// Prefix the script with one `op` per initial value
fn seeded(args: &StructureArgs, op: &str) -> Vec<ScriptOp> {
    args.initial
        .iter()
        .map(|value| ScriptOp {
            name: op.to_string(),
            args: vec![value.to_string()],
        })
        .chain(args.script())
        .collect()
}

async fn array_script(driver: &mut ArrayDriver, script: Vec<ScriptOp>) -> engine::Result<()> {
    for op in &script {
        match op.name.as_str() {
            "insert" => {
                let index = op.args.get(1).map(|i| number(i)).transpose()?;
                driver.insert(arg(op, 0)?, index).await?;
            }
            "delete" => {
                driver.delete(arg(op, 0)?).await?;
            }
            "search" => {
                driver.search(arg(op, 0)?).await?;
            }
            "sort" => driver.sort().await?,
            "reverse" => driver.reverse().await?,
            _ => return Err(unknown(op)),
        }
    }
    Ok(())
}

async fn stack_script(driver: &mut StackDriver, script: Vec<ScriptOp>) -> engine::Result<()> {
    for op in &script {
        match op.name.as_str() {
            "push" => {
                driver.push(arg(op, 0)?).await?;
            }
            "pop" => {
                driver.pop().await?;
            }
            "peek" => {
                driver.peek().await?;
            }
            _ => return Err(unknown(op)),
        }
    }
    Ok(())
}

async fn queue_script(driver: &mut QueueDriver, script: Vec<ScriptOp>) -> engine::Result<()> {
    for op in &script {
        match op.name.as_str() {
            "enqueue" => {
                driver.enqueue(arg(op, 0)?).await?;
            }
            "dequeue" => {
                driver.dequeue().await?;
            }
            "peek" => {
                driver.peek().await?;
            }
            _ => return Err(unknown(op)),
        }
    }
    Ok(())
}

async fn list_script(driver: &mut LinkedListDriver, script: Vec<ScriptOp>) -> engine::Result<()> {
    for op in &script {
        match op.name.as_str() {
            "prepend" => driver.prepend(arg(op, 0)?).await?,
            "append" => driver.append(arg(op, 0)?).await?,
            "insert" => {
                driver.insert(arg(op, 0)?, arg(op, 1)?).await?;
            }
            "delete" => {
                driver.delete(arg(op, 0)?).await?;
            }
            "search" => {
                driver.search(arg(op, 0)?).await?;
            }
            _ => return Err(unknown(op)),
        }
    }
    Ok(())
}

async fn tree_script(driver: &mut BinaryTreeDriver, script: Vec<ScriptOp>) -> engine::Result<()> {
    for op in &script {
        match op.name.as_str() {
            "insert" => driver.insert(arg(op, 0)?).await?,
            "delete" => {
                driver.delete(arg(op, 0)?).await?;
            }
            "search" => {
                driver.search(arg(op, 0)?).await?;
            }
            _ => return Err(unknown(op)),
        }
    }
    Ok(())
}

async fn hash_script(driver: &mut HashTableDriver, script: Vec<ScriptOp>) -> engine::Result<()> {
    for op in &script {
        match op.name.as_str() {
            "set" => {
                driver.set(text(op, 0)?, text(op, 1)?).await?;
            }
            "get" => {
                driver.get(text(op, 0)?).await?;
            }
            "delete" => {
                driver.delete(text(op, 0)?).await?;
            }
            "clear" => driver.clear(),
            _ => return Err(unknown(op)),
        }
    }
    Ok(())
}

async fn graph_script(driver: &mut GraphDriver, script: Vec<ScriptOp>) -> engine::Result<()> {
    for op in &script {
        match op.name.as_str() {
            "add-node" => {
                let id = text(op, 0)?;
                let label = op.args.get(1).map_or(id, String::as_str);
                driver.add_node(id, label).await?;
            }
            "add-edge" => {
                let weight = op.args.get(2).map(|w| number(w)).transpose()?;
                driver.add_edge(text(op, 0)?, text(op, 1)?, weight).await?;
            }
            "remove-node" => {
                driver.remove_node(text(op, 0)?).await?;
            }
            "remove-edge" => {
                driver.remove_edge(text(op, 0)?, text(op, 1)?).await?;
            }
            "dfs" => {
                driver.dfs(text(op, 0)?).await?;
            }
            "bfs" => {
                driver.bfs(text(op, 0)?).await?;
            }
            _ => return Err(unknown(op)),
        }
    }
    Ok(())
}
