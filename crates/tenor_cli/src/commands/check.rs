//! Check command implementation.

use tenor_core::market_data::curves::FlatForwardCurve;
use tenor_models::models::TermStructureModel;
use tenor_pricing::mc::SimulationConfig;
use tracing::info;

use crate::Result;

/// Build the configured model on a flat curve and print its dimensions.
pub fn run(config: &SimulationConfig, forward: f64, curve_period: f64) -> Result<()> {
    info!("Checking simulation configuration");
    config.validate()?;
    let curve = FlatForwardCurve::new(forward, curve_period)?;
    let model = config.build_model(&curve)?;

    let time = model.time_grid();
    let tenor = model.tenor_grid();
    println!("Model:          {}", model.model_name());
    println!("Paths:          {}", config.n_paths);
    println!("Seed:           {}", config.seed);
    println!("Scheme:         {:?}", config.scheme);
    println!("Time steps:     {} up to {}", time.n_steps(), time.last_time());
    println!("Tenor periods:  {} up to {}", tenor.n_periods(), tenor.last_date());
    println!("Components:     {}", model.n_components());
    println!("Factors:        {}", model.n_factors());

    info!(model = model.model_name(), n_factors = model.n_factors(), "Configuration OK");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_accepts_valid_config() {
        let config = SimulationConfig::from_toml_str(
            r#"
            n_paths = 10
            time_step = 0.5
            time_horizon = 2.0
            tenor_period = 0.5
            tenor_horizon = 2.0

            [model]
            type = "lmm"

            [model.volatility]
            form = "constant"
            sigma = 0.2
            "#,
        )
        .unwrap();
        assert!(run(&config, 0.03, 0.5).is_ok());
    }

    #[test]
    fn test_check_rejects_bad_curve() {
        let config = SimulationConfig::from_toml_str(
            r#"
            n_paths = 10
            time_step = 0.5
            time_horizon = 2.0
            tenor_period = 0.5
            tenor_horizon = 2.0

            [model]
            type = "hull-white"
            mean_reversion = 0.1
            volatilities = [0.01]
            "#,
        )
        .unwrap();
        assert!(run(&config, -3.0, 0.5).is_err());
    }
}
