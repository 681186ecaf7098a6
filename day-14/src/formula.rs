use itertools::Itertools;
use std::{collections::HashMap, convert::TryFrom, fmt, num::ParseIntError, str::FromStr};
use thiserror::Error;

pub const ORE: &str = "ORE";
pub const FUEL: &str = "FUEL";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: missing `=>` in {text:?}")]
    MissingSeparator { line: usize, text: String },

    #[error("line {line}: {token:?} is not `<amount> <chemical>`")]
    InvalidQuantity { line: usize, token: String },

    #[error("line {line}: {token:?} has an invalid amount")]
    InvalidAmount {
        line: usize,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("line {line}: unusable formula")]
    Unusable {
        line: usize,
        #[source]
        source: FormulaError,
    },
}

/// A formula that no table may hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("formula produces zero {0}")]
    ZeroOutput(String),

    #[error("ORE is raw and cannot be produced")]
    ProducesBase,

    #[error("formula for {chemical} filed under {key}")]
    Misfiled { key: String, chemical: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantity {
    pub amount: u64,
    pub chemical: String,
}

impl Quantity {
    pub fn new(amount: u64, chemical: impl Into<String>) -> Self {
        Quantity {
            amount,
            chemical: chemical.into(),
        }
    }

    fn parse(line: usize, token: &str) -> Result<Self, ParseError> {
        let token = token.trim();
        let (amount, chemical) =
            token
                .split_whitespace()
                .collect_tuple()
                .ok_or_else(|| ParseError::InvalidQuantity {
                    line,
                    token: token.into(),
                })?;
        let amount = amount.parse().map_err(|source| ParseError::InvalidAmount {
            line,
            token: token.into(),
            source,
        })?;

        Ok(Quantity::new(amount, chemical))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.chemical)
    }
}

/// One reaction: consumes every input to make `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub output: Quantity,
    pub inputs: Vec<Quantity>,
}

impl Formula {
    fn parse(line: usize, text: &str) -> Result<Self, ParseError> {
        let mut parts = text.splitn(2, "=>");
        let inputs = parts.next().unwrap_or_default();
        let output = parts.next().ok_or_else(|| ParseError::MissingSeparator {
            line,
            text: text.into(),
        })?;

        let inputs = inputs
            .split(',')
            .map(|token| Quantity::parse(line, token))
            .collect::<Result<_, _>>()?;
        let output = Quantity::parse(line, output)?;

        let formula = Formula { output, inputs };
        formula
            .validate()
            .map_err(|source| ParseError::Unusable { line, source })?;
        Ok(formula)
    }

    pub fn validate(&self) -> Result<(), FormulaError> {
        if self.output.chemical == ORE {
            return Err(FormulaError::ProducesBase);
        }
        if self.output.amount == 0 {
            return Err(FormulaError::ZeroOutput(self.output.chemical.clone()));
        }
        Ok(())
    }
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(1, s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.inputs.iter().join(", "), self.output)
    }
}

/// Every formula, keyed by the chemical it produces, in file order.
#[derive(Debug, Clone, Default)]
pub struct FormulaTable(HashMap<String, Vec<Formula>>);

impl FormulaTable {
    pub fn insert(&mut self, formula: Formula) -> Result<(), FormulaError> {
        formula.validate()?;
        self.0
            .entry(formula.output.chemical.clone())
            .or_insert_with(Vec::new)
            .push(formula);
        Ok(())
    }

    pub fn producing(&self, chemical: &str) -> Option<&[Formula]> {
        self.0.get(chemical).map(|v| &**v)
    }

    /// Number of distinct chemicals that have an entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<HashMap<String, Vec<Formula>>> for FormulaTable {
    type Error = FormulaError;

    fn try_from(map: HashMap<String, Vec<Formula>>) -> Result<Self, Self::Error> {
        for (key, formulas) in &map {
            if key == ORE {
                return Err(FormulaError::ProducesBase);
            }
            for formula in formulas {
                formula.validate()?;
                if formula.output.chemical != *key {
                    return Err(FormulaError::Misfiled {
                        key: key.clone(),
                        chemical: formula.output.chemical.clone(),
                    });
                }
            }
        }
        Ok(FormulaTable(map))
    }
}

impl FromStr for FormulaTable {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut table = FormulaTable::default();

        for (line, text) in util::data_lines(s) {
            let formula = Formula::parse(line, text)?;
            table
                .insert(formula)
                .map_err(|source| ParseError::Unusable { line, source })?;
        }

        Ok(table)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    type Error = Box<dyn std::error::Error>;
    type Result<T, E = Error> = std::result::Result<T, E>;

    #[test]
    fn parses_a_formula() -> Result<()> {
        let formula: Formula = "7 A, 1 B => 1 C".parse()?;
        assert_eq!(formula.output, Quantity::new(1, "C"));
        assert_eq!(formula.inputs, [Quantity::new(7, "A"), Quantity::new(1, "B")]);
        Ok(())
    }

    #[test]
    fn round_trips_despite_whitespace() -> Result<()> {
        let messy: Formula = "  12   HKGWZ ,1  GPVTF,   8 PSHF=>9    QDVJ  ".parse()?;
        let text = messy.to_string();
        assert_eq!(text, "12 HKGWZ, 1 GPVTF, 8 PSHF => 9 QDVJ");
        assert_eq!(text.parse::<Formula>()?, messy);
        Ok(())
    }

    #[test]
    fn groups_by_output_in_file_order() -> Result<()> {
        let table: FormulaTable = r#"
            10 ORE => 10 A

            3 ORE => 1 A
            1 A => 1 B
        "#
        .parse()?;

        assert_eq!(table.len(), 2);
        let a = table.producing("A").ok_or("A missing")?;
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].inputs, [Quantity::new(10, ORE)]);
        assert_eq!(a[1].inputs, [Quantity::new(3, ORE)]);
        assert!(table.producing(ORE).is_none());
        Ok(())
    }

    #[test]
    fn trailing_newline_is_tolerated() -> Result<()> {
        let table: FormulaTable = "1 ORE => 1 FUEL\n".parse()?;
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn missing_separator() {
        let err = "1 ORE => 1 A\n1 ORE -> 1 B".parse::<FormulaTable>().unwrap_err();
        match err {
            ParseError::MissingSeparator { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "1 ORE -> 1 B");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn malformed_quantities() {
        assert!(matches!(
            "7A, 1 B => 1 C".parse::<Formula>(),
            Err(ParseError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            "1 B => 1 C D".parse::<Formula>(),
            Err(ParseError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            " => 1 C".parse::<Formula>(),
            Err(ParseError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            "x B => 1 C".parse::<Formula>(),
            Err(ParseError::InvalidAmount { .. })
        ));
        assert!(matches!(
            "-1 B => 1 C".parse::<Formula>(),
            Err(ParseError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn rejects_unusable_outputs() {
        match "1 A => 0 B".parse::<Formula>() {
            Err(ParseError::Unusable { line: 1, source }) => {
                assert_eq!(source, FormulaError::ZeroOutput("B".into()))
            }
            other => panic!("unexpected {:?}", other),
        }
        match "1 ORE => 1 A\n1 A => 5 ORE".parse::<FormulaTable>() {
            Err(ParseError::Unusable { line: 2, source }) => {
                assert_eq!(source, FormulaError::ProducesBase)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn hand_built_formulas_are_checked_on_insert() {
        let mut table = FormulaTable::default();
        let zero = Formula {
            output: Quantity::new(0, FUEL),
            inputs: vec![Quantity::new(1, ORE)],
        };
        assert_eq!(
            table.insert(zero),
            Err(FormulaError::ZeroOutput(FUEL.into()))
        );
        let ore = Formula {
            output: Quantity::new(1, ORE),
            inputs: vec![Quantity::new(1, "A")],
        };
        assert_eq!(table.insert(ore), Err(FormulaError::ProducesBase));
        assert!(table.is_empty());
        assert!(table.producing(ORE).is_none());
    }

    #[test]
    fn hand_built_maps_are_checked() {
        let formula = |amount, chemical: &str| Formula {
            output: Quantity::new(amount, chemical),
            inputs: vec![Quantity::new(1, ORE)],
        };
        let table = |key: &str, formulas: Vec<Formula>| {
            let mut map = HashMap::new();
            map.insert(key.to_string(), formulas);
            FormulaTable::try_from(map)
        };

        assert_eq!(
            table(FUEL, vec![formula(0, FUEL)]).unwrap_err(),
            FormulaError::ZeroOutput(FUEL.into())
        );
        assert_eq!(
            table(ORE, vec![]).unwrap_err(),
            FormulaError::ProducesBase
        );
        assert_eq!(
            table(FUEL, vec![formula(1, "A")]).unwrap_err(),
            FormulaError::Misfiled {
                key: FUEL.into(),
                chemical: "A".into(),
            }
        );
        assert!(table(FUEL, vec![formula(2, FUEL)]).is_ok());
    }
}
