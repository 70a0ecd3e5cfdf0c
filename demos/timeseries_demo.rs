use anyhow::{Context, Result, bail};
use cdfapi::Client;
use cdfapi::dto::{
    Aggregate, DataPointsQuery, DataPointsQueryItem, DatapointType, TimeSeriesFilter,
    TimeSeriesFilterRequest, TimeSeriesListParams,
};
use cdfapi::plot::{ChartSpec, write_svg};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Lists time series, retrieves datapoints and optionally charts hourly averages.
///
/// Credentials come from the environment (a `.env` file is loaded first) or `.cdfapirc`.
#[derive(Debug, Parser)]
struct Args {
    /// Time series to retrieve datapoints for.
    #[arg(long, default_value = "EVE-TI-FORNEBU-01-2")]
    external_id: String,

    /// Start of the retrieval window (relative, e.g. `300d-ago`).
    #[arg(long, default_value = "300d-ago")]
    start: String,

    /// Unit quantity used for the filter example.
    #[arg(long, default_value = "Pressure")]
    unit_quantity: String,

    /// Write an SVG chart of the hourly averages here.
    #[arg(long)]
    plot: Option<PathBuf>,

    /// -v for debug, -vv for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn,cdfapi=info",
        1 => "info,cdfapi=debug",
        _ => "debug,cdfapi=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    init_logging(args.verbose);

    let client = Client::from_env()?.with_progress(true);

    println!("### Testing fetching some time series");
    let ts_list = client
        .time_series()
        .list(&TimeSeriesListParams {
            include_metadata: Some(false),
            ..TimeSeriesListParams::with_limit(100)
        })?;
    println!("Time Series Count: {}", ts_list.items.len());

    let filtered = client.time_series().filter(&TimeSeriesFilterRequest {
        filter: Some(TimeSeriesFilter {
            unit_quantity: Some(args.unit_quantity.clone()),
            ..TimeSeriesFilter::default()
        }),
        limit: Some(100),
        ..TimeSeriesFilterRequest::default()
    })?;
    println!("Filtered Time Series Count: {}", filtered.items.len());

    println!("\n### Data Points (performance test)");
    let query = DataPointsQuery::new(vec![DataPointsQueryItem {
        start: Some(args.start.as_str().into()),
        end: Some("now".into()),
        limit: Some(100_000),
        ..DataPointsQueryItem::external_id(&args.external_id)
    }]);
    let started = Instant::now();
    let response = client.time_series().retrieve_data(&query)?;
    let elapsed = started.elapsed();

    let dps = response
        .items
        .first()
        .with_context(|| format!("no datapoints returned for {}", args.external_id))?;
    println!("Data Points External ID: {}", dps.external_id);
    println!("Data Points Unit: {}", dps.unit_external_id);
    match dps.datapoints()? {
        DatapointType::NumericDatapoints(d) => println!("Data Points Count: {}", d.datapoints.len()),
        DatapointType::StringDatapoints(d) => println!("Data Points Count: {}", d.datapoints.len()),
        DatapointType::AggregateDatapoints(d) => {
            println!("Data Points Count: {}", d.datapoints.len())
        }
    }
    println!("Time taken: {:?}", elapsed);

    if !dps.unit_external_id.is_empty() {
        let units = client.units().retrieve(&[dps.unit_external_id.as_str()])?;
        if let Some(unit) = units.items.first() {
            println!("Unit: {} ({}), quantity {}", unit.long_name, unit.symbol, unit.quantity);
        }
    }

    println!("\n### Data Points (for plotting)");
    let query = DataPointsQuery::new(vec![DataPointsQueryItem {
        start: Some(args.start.as_str().into()),
        end: Some("now".into()),
        aggregates: vec![Aggregate::Average],
        granularity: Some("1h".into()),
        limit: Some(10_000),
        ..DataPointsQueryItem::external_id(&args.external_id)
    }]);
    let started = Instant::now();
    let response = client.time_series().retrieve_data(&query)?;
    let elapsed = started.elapsed();

    let Some(dps) = response.items.first() else {
        bail!("no aggregates returned for {}", args.external_id);
    };
    let series = dps.numeric_series(Aggregate::Average)?;
    println!("Data Points Count: {}", series.len());
    println!("Time taken: {:?}", elapsed);

    if let Some(path) = &args.plot {
        let spec = ChartSpec::new(format!(
            "Fetched {} data points - hourly aggregates",
            series.len()
        ))
        .with_y_label(dps.unit.as_str())
        .with_series_name(dps.external_id.as_str());
        write_svg(path, &spec, &series)?;
        println!("Chart written to {}", path.display());
    }

    Ok(())
}
