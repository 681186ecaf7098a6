use clap::Parser;
use day_14::{FormulaTable, FUEL};

type Error = Box<dyn std::error::Error>;
type Result<T, E = Error> = std::result::Result<T, E>;

/// Minimum ORE needed to produce a chemical
#[derive(Debug, Parser)]
struct Cli {
    #[command(flatten)]
    common: util::Common,

    /// Chemical to produce
    #[arg(short, long, default_value = FUEL)]
    target: String,

    /// Units of the target to produce
    #[arg(short, long, default_value_t = 1)]
    quantity: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.common.init_logging()?;

    let table: FormulaTable = cli.common.read_input()?.parse()?;
    log::info!("Formulas for {} chemicals", table.len());

    let ore = table.minimum_ore(&cli.target, cli.quantity)?;
    log::info!("{} {} needs {} ORE", cli.quantity, cli.target, ore);

    println!("{}", ore);
    Ok(())
}
