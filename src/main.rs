use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use orderdesk::{
    errors::Error,
    io,
    ops::find_orders_by_date,
    types::{MemoryCatalog, ProductCatalog},
};
use tracing_subscriber::EnvFilter;

/// Loads a product catalog and its purchase orders, then lists the orders placed on one day.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Product feed: declared count, then `kind;name;price;tax[;dd/mm/yyyy]` lines
    #[arg(default_value = "dadosProdutos.csv")]
    products: PathBuf,
    /// Order feed: declared count, then `dd/mm/yyyy;payment;item;item;...` lines
    #[arg(default_value = "dadosPedidos.csv")]
    orders: PathBuf,
    /// Date to search for (dd/mm/yyyy); prompted for when absent
    #[arg(long)]
    date: Option<String>,
    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Csv,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn open(path: &Path) -> Result<BufReader<File>, Error> {
    Ok(BufReader::new(File::open(path)?))
}

fn prompt_for_date() -> Result<String, Error> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "Enter a date to search for (dd/mm/yyyy): ")?;
    stdout.flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer)
}

fn run(args: &Args) -> Result<(), Error> {
    let catalog = io::load_products_from_csv::<_, MemoryCatalog>(&mut open(&args.products)?)?;
    for warning in &catalog.warnings {
        tracing::warn!("{warning}");
    }
    let catalog = catalog.value;
    let orders = io::load_orders_from_csv(&mut open(&args.orders)?, &catalog)?;
    for warning in &orders.warnings {
        tracing::warn!("{warning}");
    }
    let orders = orders.value;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Product file: {}", args.products.display())?;
    writeln!(stdout, "Order file:   {}", args.orders.display())?;
    writeln!(stdout, "Products in catalog: {}", catalog.len())?;
    writeln!(stdout, "Orders loaded:       {}", orders.len())?;
    writeln!(stdout)?;
    drop(stdout);

    let answer = match &args.date {
        Some(date) => date.clone(),
        None => prompt_for_date()?,
    };
    let date = io::parse_query_date(&answer)?;
    let found = find_orders_by_date(&orders, date);
    tracing::debug!(%date, matches = found.len(), "searched orders");

    let mut stdout = std::io::stdout().lock();
    match args.format {
        Format::Text => {
            writeln!(stdout)?;
            io::write_orders_report(&mut stdout, date, &found)
        }
        Format::Csv => io::write_orders_to_csv(&mut stdout, &found),
    }
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
