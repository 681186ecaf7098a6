use clap::Parser;
use std::num::ParseIntError;
use thiserror::Error;

type Error = Box<dyn std::error::Error>;
type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
enum FuelError {
    #[error("line {line}: {text:?} is not a module mass")]
    InvalidMass {
        line: usize,
        text: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum Mode {
    /// `mass / 3 - 2`, negative for tiny modules
    Raw,
    /// `mass / 3 - 2`, never below zero
    Floored,
    /// Also fuel the fuel, until it needs none
    Recursive,
}

impl Mode {
    fn fuel(self, mass: u32) -> i64 {
        match self {
            Mode::Raw => mass_to_fuel_raw(mass),
            Mode::Floored => mass_to_fuel(mass).into(),
            Mode::Recursive => mass_to_fuel_recursive(mass).into(),
        }
    }
}

/// Sum the fuel needed to launch every module
#[derive(Debug, Parser)]
struct Cli {
    #[command(flatten)]
    common: util::Common,

    #[arg(short, long, value_enum, default_value_t = Mode::Floored)]
    mode: Mode,
}

fn mass_to_fuel_raw(mass: u32) -> i64 {
    i64::from(mass / 3) - 2
}

fn mass_to_fuel(mass: u32) -> u32 {
    (mass / 3).saturating_sub(2)
}

#[test]
fn known_masses() {
    assert_eq!(mass_to_fuel(12), 2);
    assert_eq!(mass_to_fuel(14), 2);
    assert_eq!(mass_to_fuel(1969), 654);
    assert_eq!(mass_to_fuel(100756), 33583);
}

#[test]
fn raw_can_go_negative() {
    assert_eq!(mass_to_fuel_raw(1), -2);
    assert_eq!(mass_to_fuel_raw(6), 0);
    assert_eq!(mass_to_fuel_raw(1969), 654);
    assert_eq!(mass_to_fuel(1), 0);
}

fn mass_to_fuel_recursive(mass: u32) -> u32 {
    std::iter::successors(Some(mass), |&mass| {
        let f = mass_to_fuel(mass);
        if f > 0 {
            Some(f)
        } else {
            None
        }
    })
    .skip(1) // Ignore the initial mass
    .sum()
}

#[test]
fn known_masses_recursive() {
    assert_eq!(mass_to_fuel_recursive(14), 2);
    assert_eq!(mass_to_fuel_recursive(1969), 966);
    assert_eq!(mass_to_fuel_recursive(100756), 50346);
    assert_eq!(mass_to_fuel_recursive(0), 0);
}

fn masses(input: &str) -> Result<Vec<u32>, FuelError> {
    util::data_lines(input)
        .map(|(line, l)| {
            l.parse().map_err(|source| FuelError::InvalidMass {
                line,
                text: l.into(),
                source,
            })
        })
        .collect()
}

fn total_fuel(masses: &[u32], mode: Mode) -> i64 {
    masses.iter().map(|&m| mode.fuel(m)).sum()
}

#[test]
fn trailing_blank_line_is_ignored() -> Result<()> {
    let masses = masses("12\n14\n1969\n100756\n")?;
    assert_eq!(masses, [12, 14, 1969, 100756]);
    assert_eq!(total_fuel(&masses, Mode::Floored), 2 + 2 + 654 + 33583);
    assert_eq!(total_fuel(&masses, Mode::Recursive), 2 + 2 + 966 + 50346);
    Ok(())
}

#[test]
fn raw_total_keeps_negative_terms() -> Result<()> {
    let masses = masses("1\n14\n")?;
    assert_eq!(total_fuel(&masses, Mode::Raw), -2 + 2);
    assert_eq!(total_fuel(&masses, Mode::Floored), 2);
    Ok(())
}

#[test]
fn bad_mass_names_its_line() {
    match masses("12\n\nabc\n") {
        Err(FuelError::InvalidMass { line, text, .. }) => {
            assert_eq!(line, 3);
            assert_eq!(text, "abc");
        }
        other => panic!("expected an invalid mass, got {:?}", other),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.common.init_logging()?;

    let input = cli.common.read_input()?;
    let masses = masses(&input)?;
    log::info!("Fueling {} modules ({:?})", masses.len(), cli.mode);

    println!("{}", total_fuel(&masses, cli.mode));
    Ok(())
}
