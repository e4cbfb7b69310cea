pub mod config;
pub mod detector;
pub mod errors;
pub mod geolocate;
pub mod record;
pub mod scoring;
pub mod signals;

pub use config::Config;
pub use detector::{AnalysisReport, ProxyVpnDetector};
pub use errors::DetectorError;
pub use record::IpRecord;
pub use scoring::RecommendedAction;
