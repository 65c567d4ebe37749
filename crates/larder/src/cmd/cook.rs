//! `larder cook`: record a consumption, costed by FIFO.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use larder_core::{Quantity, Unit, UnitMatrix};
use larder_ledger::{Ledger, UsageRequest};
use rust_decimal::Decimal;

/// Record a consumption, costed by FIFO.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Ingredient name
    pub ingredient: String,

    /// Amount in the entered unit
    #[arg(long)]
    pub amount: Decimal,

    /// Kitchen unit (tbsp, cup, tsp) or a standard unit; the ingredient's
    /// standard unit when omitted
    #[arg(long)]
    pub unit: Option<String>,

    /// Usage date (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Meal label ("breakfast", "dinner", ...)
    #[arg(long, default_value = "snack")]
    pub meal: String,
}

/// Convert the entered amount to the ingredient's standard unit.
///
/// The unit matrix is consulted for kitchen units; a standard unit name must
/// match the ingredient's own unit.
fn to_standard(amount: Decimal, entered_unit: Option<&str>, standard: Unit) -> Result<Quantity> {
    let Some(name) = entered_unit else {
        return Ok(Quantity::new(amount, standard));
    };
    if let Ok(unit) = name.parse::<Unit>() {
        if unit != standard {
            bail!("this ingredient is kept in {standard}, not {unit}");
        }
        return Ok(Quantity::new(amount, standard));
    }
    UnitMatrix::standard()
        .convert(name, amount, standard)
        .with_context(|| format!("unknown unit '{name}' (try tbsp, cup, tsp or {standard})"))
}

/// Run the cook command.
pub fn run(ledger: &mut Ledger, args: &Args) -> Result<()> {
    let ingredient = ledger
        .find_ingredient(&args.ingredient)
        .with_context(|| format!("no ingredient named '{}'", args.ingredient))?;
    let id = ingredient.id;
    let standard = ingredient.unit;

    let quantity = to_standard(args.amount, args.unit.as_deref(), standard)?;
    let entered = match &args.unit {
        Some(unit) => format!("{} {unit}", args.amount),
        None => format!("{} {standard}", args.amount),
    };

    let allocation = ledger.allocate(
        id,
        UsageRequest {
            date: args.date.unwrap_or_else(super::today),
            meal: args.meal.clone(),
            entered,
            quantity,
        },
    )?;

    println!(
        "usage {}: {} {} = {} for {}",
        allocation.usage, args.ingredient, quantity, allocation.cost, args.meal
    );
    if !allocation.shortfall.is_zero() {
        println!(
            "warning: only {} {} in stock; {} {} uncosted",
            allocation.allocated, standard, allocation.shortfall, standard
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_standard_defaults_to_ingredient_unit() {
        let q = to_standard(dec!(150), None, Unit::Gram).unwrap();
        assert_eq!(q, Quantity::new(dec!(150), Unit::Gram));
    }

    #[test]
    fn test_to_standard_converts_kitchen_units() {
        let q = to_standard(dec!(2), Some("tbsp"), Unit::Millilitre).unwrap();
        assert_eq!(q, Quantity::new(dec!(30), Unit::Millilitre));
    }

    #[test]
    fn test_to_standard_accepts_matching_standard_unit() {
        let q = to_standard(dec!(3), Some("count"), Unit::Count).unwrap();
        assert_eq!(q, Quantity::new(dec!(3), Unit::Count));
    }

    #[test]
    fn test_to_standard_rejects_wrong_standard_unit() {
        assert!(to_standard(dec!(3), Some("g"), Unit::Count).is_err());
    }

    #[test]
    fn test_to_standard_rejects_unknown_units() {
        assert!(to_standard(dec!(3), Some("firkin"), Unit::Gram).is_err());
    }
}
