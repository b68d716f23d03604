use crate::record::{Header, PLACEHOLDER};
use serde::Deserialize;
use std::time::Duration;

/// Query endpoint of the BEDCA food composition database
pub const DEFAULT_ENDPOINT_URL: &str = "http://www.bedca.net/bdpub/procquery.php";

/// Robots policy published next to the endpoint
pub const DEFAULT_ROBOTS_URL: &str = "http://www.bedca.net/robots.txt";

/// Output file written when no path is configured
pub const DEFAULT_CSV_PATH: &str = "nutritional-info.csv";

/// Identification columns, looked up as top-level tags of a detail response
pub const DEFAULT_PRIMARY_FIELDS: &[&str] = &[
    "f_id",
    "f_ori_name",
    "f_eng_name",
    "sci_name",
    "edible_portion",
];

/// Nutrient columns, keyed by the component name (`c_ori_name`) the service reports
pub const DEFAULT_DETAIL_FIELDS: &[&str] = &[
    "alcohol (etanol)",
    "energía, total",
    "grasa, total (lipidos totales)",
    "proteina, total",
    "agua (humedad)",
    "carbohidratos",
    "fibra, dietetica total",
    "ácido graso 22:6 n-3 (ácido docosahexaenóico)",
    "ácido graso 20:5 (ácido eicosapentaenóico)",
    "ácido graso 12:0 (láurico)",
    "ácido graso 14:0 (ácido mirístico)",
    "ácido graso 16:0 (ácido palmítico)",
    "ácido graso 18:0 (ácido esteárico)",
    "ácido graso 18:1 n-9 cis (ácido oléico)",
    "ácido graso 18:2",
    "ácido graso 18:3",
    "ácido graso 20:4 n-6  (ácido araquidónico)",
    "ácidos grasos, monoinsaturados totales",
    "ácidos grasos, poliinsaturados totales",
    "ácidos grasos saturados totales",
    "ácidos grasos, trans totales",
    "colesterol",
    "Vitamina A equivalentes de retinol de actividades de retinos y carotenoides",
    "Vitamina D",
    "Viamina E equivalentes de alfa tocoferol de actividades de vitámeros E",
    "folato, total",
    "equivalentes de niacina, totales",
    "riboflavina",
    "tiamina",
    "Vitamina B-12",
    "Vitamina B-6, Total",
    "Vitamina C (ácido ascórbico)",
    "calcio",
    "hierro, total",
    "potasio",
    "magnesio",
    "sodio",
    "fósforo",
    "ioduro",
    "selenio, total",
    "zinc (cinc)",
];

/// Main configuration structure for GastroMiner
///
/// Every section is optional in the TOML file; anything left out falls back
/// to the BEDCA defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub agent: AgentConfig,
    pub engine: EngineConfig,
    pub output: OutputConfig,
    pub schema: SchemaConfig,
}

impl Config {
    /// Full `User-Agent` string, e.g. `GastroMiner-Bot/2.2 (Educational Research)`
    pub fn user_agent(&self) -> String {
        self.agent.to_string()
    }

    /// The CSV header: primary fields followed by detail fields
    pub fn header(&self) -> Header {
        Header::new(&self.schema.primary_fields, &self.schema.detail_fields)
    }

    /// Fixed delay applied before every outbound request
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.engine.throttle_ms)
    }
}

/// Remote service endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// URL every XML query is POSTed to
    pub url: String,

    /// URL of the robots.txt policy checked before the run
    #[serde(rename = "robots-url")]
    pub robots_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT_URL.to_string(),
            robots_url: DEFAULT_ROBOTS_URL.to_string(),
        }
    }
}

/// Agent identification sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Product token, also used when matching robots.txt groups
    pub name: String,

    pub version: String,

    /// Free-form comment appended in parentheses
    pub comment: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "GastroMiner-Bot".to_string(),
            version: "2.2".to_string(),
            comment: "Educational Research".to_string(),
        }
    }
}

impl std::fmt::Display for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.version)?;
        if !self.comment.is_empty() {
            write!(f, " ({})", self.comment)?;
        }
        Ok(())
    }
}

/// Worker pool and request tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of extraction tasks allowed in flight at once
    pub workers: u32,

    /// Delay before each request (milliseconds)
    #[serde(rename = "throttle-ms")]
    pub throttle_ms: u64,

    /// Total per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            throttle_ms: 100,
            timeout_secs: 30,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV file (truncated at the start of every run)
    #[serde(rename = "csv-path")]
    pub csv_path: String,

    /// Value written for any missing field
    pub placeholder: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: DEFAULT_CSV_PATH.to_string(),
            placeholder: PLACEHOLDER.to_string(),
        }
    }
}

/// Column lists making up the header
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    #[serde(rename = "primary-fields")]
    pub primary_fields: Vec<String>,

    #[serde(rename = "detail-fields")]
    pub detail_fields: Vec<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            primary_fields: DEFAULT_PRIMARY_FIELDS.iter().map(|s| s.to_string()).collect(),
            detail_fields: DEFAULT_DETAIL_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
