//! Price command implementation.
//!
//! Simulates the configured model on a flat forward curve and values a
//! standard set of products laid out on the configuration's tenor grid.

use serde::Serialize;
use tenor_core::market_data::curves::{FlatForwardCurve, YieldCurve};
use tenor_pricing::mc::{Simulation, SimulationConfig};
use tenor_pricing::products::{
    BermudanSwaption, Bond, Caplet, EuropeanSwaption, MonteCarloProduct, Product, Swap, SwapSchedule,
};
use tracing::info;

use crate::{CliError, Result};

/// Output format of the price table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// JSON array of rows
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown format: {other}. Supported: table, json"
            ))),
        }
    }
}

/// One valued product.
#[derive(Clone, Debug, Serialize)]
pub struct PriceRow {
    /// Product kind
    pub product: &'static str,
    /// Dates and strike
    pub description: String,
    /// Monte Carlo price at time 0
    pub price: f64,
    /// Standard error of the price
    pub standard_error: f64,
    /// Curve value, where one exists without a volatility model
    pub reference: Option<f64>,
}

/// Products spanning the tenor grid: bonds, a par swap, an at-the-money
/// caplet and European and Bermudan swaptions on the par swap.
pub fn standard_products(
    config: &SimulationConfig,
    curve: &FlatForwardCurve,
) -> Result<Vec<(Product, String, Option<f64>)>> {
    let period = config.tenor_period;
    let horizon = config.tenor_horizon;
    let n_periods = (horizon / period).round() as usize;
    let mut products = Vec::new();

    for quarter in 1..=4 {
        let maturity = (n_periods * quarter).div_ceil(4) as f64 * period;
        let reference = curve.discount_factor(maturity)?;
        products.push((Bond::new(maturity)?.into(), format!("T = {maturity}"), Some(reference)));
    }
    products.dedup_by(|a, b| a.1 == b.1);

    if n_periods < 3 {
        return Ok(products);
    }
    let start = period;
    let schedule = SwapSchedule::regular(start, horizon, period)?;
    let par = schedule.par_rate(curve)?;
    let swap = Swap::with_fixed_rate(schedule.clone(), par, 1.0)?;
    let swap_label = format!("[{start}, {horizon}] @ {par:.6}");

    products.push((swap.clone().into(), swap_label.clone(), Some(0.0)));
    let caplet_fixing = (n_periods / 2) as f64 * period;
    products.push((
        Caplet::new(caplet_fixing, period, curve.forward_rate(caplet_fixing, caplet_fixing + period)?)?.into(),
        format!("{caplet_fixing} x {period}, at the money"),
        None,
    ));
    products.push((EuropeanSwaption::on_swap(start, &swap)?.into(), swap_label.clone(), None));
    products.push((
        BermudanSwaption::on_fixing_dates(schedule, par, 1.0)?.into(),
        swap_label,
        None,
    ));
    Ok(products)
}

/// Value every product on `simulation`.
pub fn price_products(
    products: &[(Product, String, Option<f64>)],
    simulation: &Simulation,
) -> Result<Vec<PriceRow>> {
    products
        .iter()
        .map(|(product, description, reference)| {
            let value = product.value(0.0, simulation)?;
            info!(product = product.name(), %description, price = value.average(), "valued");
            Ok(PriceRow {
                product: product.name(),
                description: description.clone(),
                price: value.average(),
                standard_error: value.standard_error(),
                reference: *reference,
            })
        })
        .collect()
}

/// Run the price command.
pub fn run(
    config: &SimulationConfig,
    forward: f64,
    curve_period: f64,
    n_paths: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(n) = n_paths {
        config.n_paths = n;
        config.validate()?;
    }
    let curve = FlatForwardCurve::new(forward, curve_period)?;
    info!(forward, curve_period, n_paths = config.n_paths, "Starting pricing");

    let simulation = config.simulate(&curve)?;
    let rows = price_products(&standard_products(&config, &curve)?, &simulation)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => print_table(&rows),
    }
    info!("Pricing complete");
    Ok(())
}

fn print_table(rows: &[PriceRow]) {
    println!(
        "{:<18} {:<32} {:>12} {:>10} {:>12}",
        "Product", "Description", "Price", "Std err", "Curve"
    );
    println!("{}", "-".repeat(88));
    for row in rows {
        let reference = row.reference.map_or_else(|| "-".to_string(), |r| format!("{r:.6}"));
        println!(
            "{:<18} {:<32} {:>12.6} {:>10.6} {:>12}",
            row.product, row.description, row.price, row.standard_error, reference
        );
    }
}
