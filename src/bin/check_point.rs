use clap::Parser;

use weather_likelihood_service::climatology::{exceedance_probability, extract_daily_series};
use weather_likelihood_service::config::Config;
use weather_likelihood_service::power::PowerClient;
use weather_likelihood_service::services::likelihood_service::{
    DEFAULT_HEAT_PARAM, DEFAULT_HEAT_THRESHOLD_C, DEFAULT_RAIN_PARAM, DEFAULT_RAIN_THRESHOLD_MM,
};

#[derive(Parser)]
#[command(name = "check-point")]
#[command(about = "Fetch the POWER record for a point and print exceedance probabilities", long_about = None)]
struct Cli {
    /// Latitude in decimal degrees
    lat: f64,

    /// Longitude in decimal degrees
    lon: f64,

    /// Month to evaluate (1-12); all twelve when omitted
    #[arg(long)]
    month: Option<u32>,

    /// POWER parameter code for the heat variable
    #[arg(long, default_value = DEFAULT_HEAT_PARAM)]
    heat_param: String,

    /// Heat threshold (deg C for T2M)
    #[arg(long, default_value_t = DEFAULT_HEAT_THRESHOLD_C)]
    heat_thresh: f64,

    /// POWER parameter code for the rain variable
    #[arg(long, default_value = DEFAULT_RAIN_PARAM)]
    rain_param: String,

    /// Rain threshold (mm/day for PRECTOTCORR)
    #[arg(long, default_value_t = DEFAULT_RAIN_THRESHOLD_MM)]
    rain_thresh: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = Config::from_env();
    let client = PowerClient::new(&config);

    let parameters = if cli.heat_param == cli.rain_param {
        cli.heat_param.clone()
    } else {
        format!("{},{}", cli.heat_param, cli.rain_param)
    };

    println!(
        "Fetching POWER record for ({}, {}), parameters {}...\n",
        cli.lat, cli.lon, parameters
    );

    let series = client
        .fetch_daily_point(cli.lat, cli.lon, &parameters)
        .await?;

    let heat_readings = extract_daily_series(&series, &cli.heat_param)?;
    let rain_readings = extract_daily_series(&series, &cli.rain_param)?;

    println!(
        "Record {} - {}: {} {} readings, {} {} readings\n",
        client.record_start(),
        client.record_end(),
        heat_readings.len(),
        cli.heat_param,
        rain_readings.len(),
        cli.rain_param
    );

    let months: Vec<u32> = match cli.month {
        Some(month) => vec![month],
        None => (1..=12).collect(),
    };

    println!(
        "Month | P({} > {}) | P({} > {})",
        cli.heat_param, cli.heat_thresh, cli.rain_param, cli.rain_thresh
    );
    for month in months {
        let heat = exceedance_probability(&heat_readings, month, cli.heat_thresh)?;
        let rain = exceedance_probability(&rain_readings, month, cli.rain_thresh)?;
        println!(
            "{:>5} | {:>12} | {:>12}",
            month,
            format_probability(heat),
            format_probability(rain)
        );
    }

    Ok(())
}

fn format_probability(p: Option<f64>) -> String {
    match p {
        Some(p) => format!("{:.1}%", p * 100.0),
        None => "n/a".to_string(),
    }
}
