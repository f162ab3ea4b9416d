use clap::{Parser as ClapParser, Subcommand};
use tracing_subscriber::EnvFilter;
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};
use stream_expr::{
    CandidateCategory, CandidateFilter, Coordinate,
    cli::{self, CandidateOptions, CheckResult, CliError, RenderOptions},
};

#[derive(ClapParser)]
#[command(name = "stream-expr")]
#[command(about = "stream-expr - Inspect expression trees from the visual mapping editor")]
#[command(version)]
struct Cli {
    /// Builder configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an expression tree
    Check {
        /// Expression JSON file (reads from stdin if not provided)
        expression: Option<PathBuf>,
    },

    /// Render an expression tree as markup or query text
    Render {
        /// Expression JSON file (reads from stdin if not provided)
        expression: Option<PathBuf>,

        /// Root child to mark as selected (item-N or param-N)
        #[arg(long)]
        highlight: Option<Coordinate>,

        /// Emit query text instead of markup
        #[arg(short, long)]
        plain: bool,
    },

    /// List the tokens that may follow a position in an expression
    Candidates {
        /// Expression JSON file (reads from stdin if not provided)
        expression: Option<PathBuf>,

        /// Function metadata JSON
        #[arg(short, long)]
        metadata: PathBuf,

        /// Input attributes JSON
        #[arg(short, long)]
        inputs: PathBuf,

        /// Drill-down path, e.g. item-2,param-0
        #[arg(long, value_delimiter = ',')]
        path: Vec<Coordinate>,

        /// Category the search text applies to
        #[arg(long, requires = "search")]
        category: Option<Category>,

        /// Case-insensitive search text
        #[arg(long, requires = "category")]
        search: Option<String>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// List the configured operator table
    Operators,

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'stream-expr docs' to list categories)
        category: String,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Category {
    Attribute,
    Function,
    Operator,
}

impl From<Category> for CandidateCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::Attribute => CandidateCategory::Attribute,
            Category::Function => CandidateCategory::Function,
            Category::Operator => CandidateCategory::Operator,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(cli::log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { expression } => run_check(expression.as_deref()),
        Commands::Render {
            expression,
            highlight,
            plain,
        } => read_expression(expression.as_deref()).and_then(|expression| {
            let output = cli::execute_render(&RenderOptions {
                expression,
                highlight,
                plain,
            })?;
            println!("{}", output);
            Ok(())
        }),
        Commands::Candidates {
            expression,
            metadata,
            inputs,
            path,
            category,
            search,
            pretty,
        } => run_candidates(
            cli.config.as_deref(),
            expression.as_deref(),
            &metadata,
            &inputs,
            path,
            category.zip(search),
            pretty,
        ),
        Commands::Operators => cli::load_config(cli.config.as_deref())
            .and_then(|config| cli::get_doc_category("operators", &config.operators))
            .map(|content| print!("{}", content)),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::load_config(cli.config.as_deref())
            .and_then(|config| cli::get_doc_category(&category, &config.operators))
            .map(|content| print!("{}", content)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_expression(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run_check(path: Option<&Path>) -> Result<(), CliError> {
    let expression = read_expression(path)?;

    match cli::execute_check(&expression)? {
        CheckResult::Complete(text) => {
            println!("Expression is complete: {}", text);
            Ok(())
        }
        CheckResult::Incomplete(issues) => {
            for issue in &issues {
                println!("{}", issue);
            }
            std::process::exit(1);
        }
    }
}

fn run_candidates(
    config: Option<&Path>,
    expression: Option<&Path>,
    metadata: &Path,
    inputs: &Path,
    path: Vec<Coordinate>,
    filter: Option<(Category, String)>,
    pretty: bool,
) -> Result<(), CliError> {
    let options = CandidateOptions {
        expression: read_expression(expression)?,
        metadata: fs::read_to_string(metadata)?,
        inputs: fs::read_to_string(inputs)?,
        path,
        filter: filter.map(|(category, search)| CandidateFilter::new(category.into(), search)),
        config: cli::load_config(config)?,
    };

    let candidates = cli::execute_candidates(&options)?;
    let json = if pretty {
        serde_json::to_string_pretty(&candidates)
    } else {
        serde_json::to_string(&candidates)
    }?;
    println!("{}", json);
    Ok(())
}
