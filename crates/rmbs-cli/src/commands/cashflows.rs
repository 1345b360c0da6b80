use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use rmbs_core::analysis::{self, PoolAnalysisInput};
use rmbs_core::pool::PoolParameters;

use crate::input;

/// Arguments for pool cash flow projection.
///
/// The flags take the units of a data-entry form (pool size in $ millions,
/// rate and PSA in percent). `--input` takes engine units instead.
#[derive(Args)]
pub struct CashflowArgs {
    /// Path to a JSON or YAML pool analysis file (engine units)
    #[arg(long)]
    pub input: Option<String>,

    /// Pool size in $ millions
    #[arg(long, default_value = "100")]
    pub pool_size: Decimal,

    /// Annual interest rate in percent (e.g. 4 for 4%)
    #[arg(long, default_value = "4")]
    pub rate: Decimal,

    /// Term in months
    #[arg(long, default_value = "360")]
    pub term: Decimal,

    /// PSA prepayment speed in percent (100 = 100% PSA)
    #[arg(long, default_value = "100")]
    pub psa: Decimal,

    /// Senior share of each month's cash flow (0 to 1)
    #[arg(long)]
    pub senior_share: Option<Decimal>,
}

pub fn run_cashflows(args: CashflowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut pool_input: PoolAnalysisInput = if let Some(ref path) = args.input {
        debug!(path = %path, "reading pool input from file");
        input::file::read_structured(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        debug!("reading pool input from stdin");
        piped
    } else {
        debug!(
            pool_size_mm = %args.pool_size,
            rate_pct = %args.rate,
            term = %args.term,
            psa_pct = %args.psa,
            "building pool input from flags"
        );
        PoolAnalysisInput {
            pool: PoolParameters::from_display_units(
                args.pool_size,
                args.rate,
                args.term,
                args.psa,
            )?,
            senior_share: None,
        }
    };
    if args.senior_share.is_some() {
        pool_input.senior_share = args.senior_share;
    }

    let result = analysis::analyze_pool(&pool_input)?;
    Ok(serde_json::to_value(result)?)
}
