use clap::{Arg, Command};
use log::LevelFilter;
use proxyguard::geolocate::GeolocationClient;
use proxyguard::{Config, IpRecord, ProxyVpnDetector};
use std::process;

#[tokio::main]
async fn main() {
    let matches = Command::new("proxyguard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Proxy/VPN detection engine aggregating IP risk signals")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/proxyguard.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration validity")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Analyze an IP record from a JSON file (ipstack shape)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("ip")
                .long("ip")
                .value_name("ADDR")
                .help("Fetch geolocation data for an IP and analyze it")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        let config = Config::default();
        match config.to_file(generate_path) {
            Ok(()) => {
                println!("Default configuration written to: {generate_path}");
                return;
            }
            Err(e) => {
                eprintln!("Failed to write configuration: {e}");
                process::exit(1);
            }
        }
    }

    let config_path = matches.get_one::<String>("config").unwrap();
    let config = if std::path::Path::new(config_path).exists() {
        match Config::from_file(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration from {config_path}: {e}");
                process::exit(1);
            }
        }
    } else {
        log::info!("Configuration file {config_path} not found, using defaults");
        Config::default()
    };

    if matches.get_flag("test-config") {
        match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
                return;
            }
            Err(e) => {
                eprintln!("Configuration is invalid: {e}");
                process::exit(1);
            }
        }
    }

    let record = if let Some(input_path) = matches.get_one::<String>("input") {
        match load_record(input_path) {
            Ok(record) => record,
            Err(e) => {
                eprintln!("Failed to read IP record from {input_path}: {e}");
                process::exit(1);
            }
        }
    } else if let Some(ip) = matches.get_one::<String>("ip") {
        match fetch_record(&config, ip).await {
            Ok(record) => record,
            Err(e) => {
                eprintln!("Failed to fetch geolocation data for {ip}: {e}");
                process::exit(1);
            }
        }
    } else {
        eprintln!("Nothing to analyze: pass --input <FILE> or --ip <ADDR>");
        process::exit(1);
    };

    let detector = match ProxyVpnDetector::new(config) {
        Ok(detector) => detector,
        Err(e) => {
            eprintln!("Failed to initialize detector: {e}");
            process::exit(1);
        }
    };

    match detector.analyze(&record).await {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize report: {e}");
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Analysis failed: {e}");
            process::exit(1);
        }
    }
}

fn load_record(path: &str) -> anyhow::Result<IpRecord> {
    let content = std::fs::read_to_string(path)?;
    let record: IpRecord = serde_json::from_str(&content)?;
    Ok(record)
}

async fn fetch_record(config: &Config, ip: &str) -> anyhow::Result<IpRecord> {
    let client = GeolocationClient::new(&config.geolocation)?;
    client.lookup(ip).await
}
