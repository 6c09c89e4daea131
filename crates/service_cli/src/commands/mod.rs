//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod calibrate;
pub mod demo;
pub mod price;

use pricer_models::models::HestonParams;
use pricer_optimiser::bayesian::PosteriorSummary;

/// Prints the posterior summary as a table, with the generating value when
/// known.
pub(crate) fn print_summary(summary: &PosteriorSummary, truth: Option<&HestonParams>) {
    let truth_values = truth.map(HestonParams::to_array);
    println!("\n┌──────────┬────────────┬────────────┬────────────┬────────────┬────────────┐");
    println!("│ Param    │ Mean       │ Median     │ P05        │ P95        │ True       │");
    println!("├──────────┼────────────┼────────────┼────────────┼────────────┼────────────┤");
    for (i, (name, s)) in summary.iter().enumerate() {
        let true_col = truth_values
            .map(|t| format!("{:>10.4}", t[i]))
            .unwrap_or_else(|| format!("{:>10}", "-"));
        println!(
            "│ {:<8} │ {:>10.4} │ {:>10.4} │ {:>10.4} │ {:>10.4} │ {} │",
            name, s.mean, s.median, s.p05, s.p95, true_col
        );
    }
    println!("└──────────┴────────────┴────────────┴────────────┴────────────┴────────────┘");
}
