pub mod args;
pub mod classify;
pub mod config;
pub mod dedup;
pub mod grouping;
pub mod input;
pub mod lookup;
pub mod output;
pub mod pipeline;
pub mod stats;
pub mod utils;

pub use args::Args;
pub use classify::classify;
pub use config::Config;
pub use dedup::unique;
pub use grouping::{ClassifiedIps, Grouping, UNKNOWN};
pub use input::InputSource;
pub use lookup::{AddressFamily, Endpoints, GeoLookup, HttpGeoLookup, LookupResult};
pub use output::{OutputFormat, Sink};
pub use pipeline::run;
pub use stats::ClassificationStats;
