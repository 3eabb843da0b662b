use std::error::Error;

use salreg::traits::Predict;
use salreg::SplitPolicy;
use salreg_linear::RegressionEngine;

fn main() -> Result<(), Box<dyn Error>> {
    // load Salary dataset
    let dataset = salreg_datasets::salary()?;

    let engine = RegressionEngine::new(dataset, &SplitPolicy::default())?;
    let summary = engine.summary();
    let metrics = engine.metrics();

    println!("Model: {}", engine.equation()?);
    println!(
        "Samples: {} ({} train, {} test)",
        summary.n_total, summary.n_train, summary.n_test
    );
    println!("MAE:  {:.2}", metrics.mae);
    println!("MSE:  {:.2}", metrics.mse);
    println!("RMSE: {:.2}", metrics.rmse);
    println!("R2:   {:.4}", metrics.r2);

    for years in &[1.0, 3.0, 5.0, 8.0, 10.0, 12.0, 15.0] {
        println!("{:>4} years -> {:.2}", years, engine.predict(*years)?);
    }

    Ok(())
}
