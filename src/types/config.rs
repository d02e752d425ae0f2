//! Configuration structures for the yard access monitor
//!
//! This module contains the monitor configuration, the CLI argument structure,
//! the partial configuration file format and the validation logic that guards
//! alert thresholds and simulation feed parameters.

use super::OutputFormat;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default alert thresholds observed on the yard dashboard
pub mod thresholds {
    /// Minutes an en-route vehicle may go without reaching the next checkpoint
    pub const STUCK_IN_TRANSIT_MINUTES: i64 = 5;

    /// Average speed (km/h) below which an en-route vehicle is flagged
    pub const LOW_SPEED_KMH: f64 = 30.0;

    /// Seconds between two alert evaluations
    pub const ALERT_INTERVAL_SECS: u64 = 10;
}

/// What the store does when an update or delete names an unknown id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotFoundPolicy {
    /// Return a `NotFound` error to the caller
    #[default]
    Report,
    /// Treat the operation as a silent no-op
    Ignore,
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "yard-access-monitor",
    version = "0.1.0",
    about = "Yard Access Monitor - Tracks trucks through screening, PC1 and terminal checkpoints",
    long_about = "Runs the yard checkpoint core against a simulated traffic feed, then prints vehicle counts, dwell-time reports and active alerts.

EXAMPLES:
    # Simulate one hour of traffic with default settings
    yard-access-monitor

    # Use a configuration file
    yard-access-monitor --config yard.json

    # Deterministic two-hour run with a text report
    yard-access-monitor --duration-minutes 120 --seed 7 --output-format text

    # Generate configuration template
    yard-access-monitor --print-config > yard.json

    # Validate configuration without running
    yard-access-monitor --config yard.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Length of the simulated run in minutes
    #[arg(long, help = "Length of the simulated run in minutes")]
    pub duration_minutes: Option<u64>,

    /// Seconds between two synthesized arrivals
    #[arg(long, help = "Seconds between synthesized arrivals")]
    pub arrival_interval_secs: Option<u64>,

    /// Seconds between two progression ticks
    #[arg(long, help = "Seconds between progression ticks")]
    pub progression_interval_secs: Option<u64>,

    /// Seconds between two alert evaluations
    #[arg(long, help = "Seconds between alert evaluations")]
    pub alert_interval_secs: Option<u64>,

    /// Chance that a record advances on a progression tick (0.0-1.0)
    #[arg(long, help = "Per-tick advance probability (0.0-1.0)")]
    pub progression_probability: Option<f64>,

    /// Stuck-in-transit threshold in minutes
    #[arg(long, help = "Stuck-in-transit threshold in minutes")]
    pub stuck_threshold_minutes: Option<i64>,

    /// Low average speed threshold in km/h
    #[arg(long, help = "Low average speed threshold in km/h")]
    pub low_speed_kmh: Option<f64>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Output format for the report
    #[arg(
        long,
        help = "Output format (json or text)",
        long_help = "Output format for the final dashboard report. Supported formats: json, text. Default: json"
    )]
    pub output_format: Option<String>,

    /// Output path for the record snapshot (JSON lines)
    #[arg(long, help = "Write every access record as JSON lines to this path")]
    pub records_output: Option<String>,

    /// Silently ignore updates and deletes for unknown ids
    #[arg(long, help = "Ignore updates/deletes that name unknown ids instead of failing")]
    pub ignore_missing: bool,

    /// Pace the feed against the wall clock instead of simulated time
    #[arg(long, help = "Run the feed in real time")]
    pub realtime: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running the feed
    #[arg(long, help = "Validate configuration without running the feed")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Stuck-in-transit threshold in minutes
    pub stuck_in_transit_minutes: Option<i64>,
    /// Low average speed threshold in km/h
    pub low_speed_threshold_kmh: Option<f64>,
    /// Seconds between alert evaluations
    pub alert_interval_secs: Option<u64>,
    /// Seconds between synthesized arrivals
    pub arrival_interval_secs: Option<u64>,
    /// Seconds between progression ticks
    pub progression_interval_secs: Option<u64>,
    /// Per-tick advance probability
    pub progression_probability: Option<f64>,
    /// Share of Normal vehicles among arrivals
    pub normal_vehicle_weight: Option<f64>,
    /// Share of service vehicles among arrivals
    pub service_vehicle_weight: Option<f64>,
    /// Share of car-carriers among arrivals
    pub cegonha_vehicle_weight: Option<f64>,
    /// Spread of synthesized appointments around now, in minutes
    pub appointment_jitter_minutes: Option<i64>,
    /// Half-width of the appointment tolerance window, in minutes
    pub appointment_tolerance_minutes: Option<i64>,
    /// Share of arrivals linked to the external Pegasus system
    pub pegasus_link_probability: Option<f64>,
    /// Behavior for updates/deletes that name unknown ids
    pub not_found_policy: Option<NotFoundPolicy>,
    /// Length of the simulated run in minutes
    pub duration_minutes: Option<u64>,
    /// Pace the feed in real time
    pub realtime: Option<bool>,
    /// Random seed
    pub seed: Option<u64>,
    /// Report output format
    pub output_format: Option<String>,
    /// Record snapshot output path
    pub records_output: Option<String>,
}

/// Configuration for the yard access monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YardConfig {
    /// Stuck-in-transit threshold in minutes
    pub stuck_in_transit_minutes: i64,

    /// Low average speed threshold in km/h
    pub low_speed_threshold_kmh: f64,

    /// Seconds between alert evaluations
    pub alert_interval_secs: u64,

    /// Seconds between synthesized arrivals
    pub arrival_interval_secs: u64,

    /// Seconds between progression ticks
    pub progression_interval_secs: u64,

    /// Chance that a record advances on a progression tick (0.0-1.0)
    pub progression_probability: f64,

    /// Share of Normal vehicles among arrivals (0.0-1.0)
    pub normal_vehicle_weight: f64,

    /// Share of service vehicles among arrivals (0.0-1.0)
    pub service_vehicle_weight: f64,

    /// Share of car-carriers among arrivals (0.0-1.0)
    pub cegonha_vehicle_weight: f64,

    /// Spread of synthesized appointments around now, in minutes
    pub appointment_jitter_minutes: i64,

    /// Half-width of the appointment tolerance window, in minutes
    pub appointment_tolerance_minutes: i64,

    /// Share of arrivals linked to the external Pegasus system (0.0-1.0)
    pub pegasus_link_probability: f64,

    /// Behavior for updates/deletes that name unknown ids
    pub not_found_policy: NotFoundPolicy,

    /// Length of the simulated run in minutes
    pub duration_minutes: u64,

    /// Pace the feed in real time
    pub realtime: bool,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Report output format
    pub output_format: String,

    /// Record snapshot output path (JSON lines)
    pub records_output: Option<String>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for the monitor configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// A periodic interval is zero
    #[error("Interval {field} must be greater than 0 seconds")]
    InvalidInterval {
        /// Name of the interval field
        field: String,
    },

    /// Run duration is zero
    #[error("Duration must be greater than 0 minutes, got {0}")]
    InvalidDuration(u64),

    /// A threshold is not positive
    #[error("Invalid threshold for {field}: {value} (must be greater than 0)")]
    InvalidThreshold {
        /// Name of the threshold field
        field: String,
        /// The invalid value
        value: f64,
    },

    /// Percentage value is out of range
    #[error("Invalid percentage for {field}: {value} (must be between 0.0 and 1.0)")]
    InvalidPercentage {
        /// Name of the field with invalid percentage
        field: String,
        /// The invalid percentage value
        value: f64,
    },

    /// Vehicle type weights don't sum to 1.0
    #[error("Vehicle type weights must sum to 1.0, got {sum}")]
    InvalidWeightSum {
        /// The actual sum of the weights
        sum: f64,
    },

    /// Output format is not recognized
    #[error("Unknown output format: {0}")]
    UnknownOutputFormat(String),
}

impl Default for YardConfig {
    fn default() -> Self {
        Self {
            stuck_in_transit_minutes: thresholds::STUCK_IN_TRANSIT_MINUTES,
            low_speed_threshold_kmh: thresholds::LOW_SPEED_KMH,
            alert_interval_secs: thresholds::ALERT_INTERVAL_SECS,
            arrival_interval_secs: 5,
            progression_interval_secs: 7,
            progression_probability: 0.5,
            normal_vehicle_weight: 0.7,
            service_vehicle_weight: 0.2,
            cegonha_vehicle_weight: 0.1,
            appointment_jitter_minutes: 30,
            appointment_tolerance_minutes: 15,
            pegasus_link_probability: 0.8,
            not_found_policy: NotFoundPolicy::Report,
            duration_minutes: 60,
            realtime: false,
            seed: None,
            output_format: "json".to_string(),
            records_output: None,
        }
    }
}

impl YardConfig {
    /// Create a new configuration from command line arguments and optional config file
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::from_cli_args(args)
    }

    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            stuck_in_transit_minutes: file
                .stuck_in_transit_minutes
                .unwrap_or(defaults.stuck_in_transit_minutes),
            low_speed_threshold_kmh: file
                .low_speed_threshold_kmh
                .unwrap_or(defaults.low_speed_threshold_kmh),
            alert_interval_secs: file.alert_interval_secs.unwrap_or(defaults.alert_interval_secs),
            arrival_interval_secs: file
                .arrival_interval_secs
                .unwrap_or(defaults.arrival_interval_secs),
            progression_interval_secs: file
                .progression_interval_secs
                .unwrap_or(defaults.progression_interval_secs),
            progression_probability: file
                .progression_probability
                .unwrap_or(defaults.progression_probability),
            normal_vehicle_weight: file
                .normal_vehicle_weight
                .unwrap_or(defaults.normal_vehicle_weight),
            service_vehicle_weight: file
                .service_vehicle_weight
                .unwrap_or(defaults.service_vehicle_weight),
            cegonha_vehicle_weight: file
                .cegonha_vehicle_weight
                .unwrap_or(defaults.cegonha_vehicle_weight),
            appointment_jitter_minutes: file
                .appointment_jitter_minutes
                .unwrap_or(defaults.appointment_jitter_minutes),
            appointment_tolerance_minutes: file
                .appointment_tolerance_minutes
                .unwrap_or(defaults.appointment_tolerance_minutes),
            pegasus_link_probability: file
                .pegasus_link_probability
                .unwrap_or(defaults.pegasus_link_probability),
            not_found_policy: file.not_found_policy.unwrap_or(defaults.not_found_policy),
            duration_minutes: file.duration_minutes.unwrap_or(defaults.duration_minutes),
            realtime: file.realtime.unwrap_or(defaults.realtime),
            seed: file.seed.or(defaults.seed),
            output_format: file.output_format.unwrap_or(defaults.output_format),
            records_output: file.records_output.or(defaults.records_output),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.duration_minutes {
            config.duration_minutes = value;
        }
        if let Some(value) = args.arrival_interval_secs {
            config.arrival_interval_secs = value;
        }
        if let Some(value) = args.progression_interval_secs {
            config.progression_interval_secs = value;
        }
        if let Some(value) = args.alert_interval_secs {
            config.alert_interval_secs = value;
        }
        if let Some(value) = args.progression_probability {
            config.progression_probability = value;
        }
        if let Some(value) = args.stuck_threshold_minutes {
            config.stuck_in_transit_minutes = value;
        }
        if let Some(value) = args.low_speed_kmh {
            config.low_speed_threshold_kmh = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(value) = args.output_format {
            config.output_format = value;
        }
        if let Some(value) = args.records_output {
            config.records_output = Some(value);
        }

        // Flags only ever switch behavior on
        if args.ignore_missing {
            config.not_found_policy = NotFoundPolicy::Ignore;
        }
        if args.realtime {
            config.realtime = true;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.duration_minutes == 0 {
            return Err(ConfigValidationError::InvalidDuration(self.duration_minutes));
        }

        for (field, value) in [
            ("alert_interval_secs", self.alert_interval_secs),
            ("arrival_interval_secs", self.arrival_interval_secs),
            ("progression_interval_secs", self.progression_interval_secs),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::InvalidInterval { field: field.to_string() });
            }
        }

        if self.stuck_in_transit_minutes <= 0 {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "stuck_in_transit_minutes".to_string(),
                value: self.stuck_in_transit_minutes as f64,
            });
        }
        if !(self.low_speed_threshold_kmh > 0.0) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "low_speed_threshold_kmh".to_string(),
                value: self.low_speed_threshold_kmh,
            });
        }
        if self.appointment_tolerance_minutes < 0 || self.appointment_jitter_minutes < 0 {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "appointment_window".to_string(),
                value: self.appointment_tolerance_minutes.min(self.appointment_jitter_minutes)
                    as f64,
            });
        }

        self.validate_percentage("progression_probability", self.progression_probability)?;
        self.validate_percentage("normal_vehicle_weight", self.normal_vehicle_weight)?;
        self.validate_percentage("service_vehicle_weight", self.service_vehicle_weight)?;
        self.validate_percentage("cegonha_vehicle_weight", self.cegonha_vehicle_weight)?;
        self.validate_percentage("pegasus_link_probability", self.pegasus_link_probability)?;

        let weight_sum =
            self.normal_vehicle_weight + self.service_vehicle_weight + self.cegonha_vehicle_weight;
        if (weight_sum - 1.0).abs() > 0.01 {
            return Err(ConfigValidationError::InvalidWeightSum { sum: weight_sum });
        }

        self.get_output_format().map_err(|_| {
            ConfigValidationError::UnknownOutputFormat(self.output_format.clone())
        })?;

        Ok(())
    }

    /// Helper method to validate percentage values
    fn validate_percentage(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigValidationError::InvalidPercentage {
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }

    /// Get the output format as an enum value
    pub fn get_output_format(&self) -> Result<OutputFormat, String> {
        self.output_format.parse()
    }

    /// Stuck-in-transit threshold as a duration
    pub fn stuck_in_transit_threshold(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.stuck_in_transit_minutes)
    }

    /// Run length as a duration
    pub fn run_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.duration_minutes as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args() -> CliArgs {
        CliArgs::try_parse_from(["test"]).unwrap()
    }

    #[test]
    fn test_yard_config_default() {
        let config = YardConfig::default();

        assert_eq!(config.stuck_in_transit_minutes, 5);
        assert_eq!(config.low_speed_threshold_kmh, 30.0);
        assert_eq!(config.alert_interval_secs, 10);
        assert_eq!(config.arrival_interval_secs, 5);
        assert_eq!(config.progression_interval_secs, 7);
        assert_eq!(config.progression_probability, 0.5);
        assert_eq!(config.normal_vehicle_weight, 0.7);
        assert_eq!(config.service_vehicle_weight, 0.2);
        assert_eq!(config.cegonha_vehicle_weight, 0.1);
        assert_eq!(config.not_found_policy, NotFoundPolicy::Report);
        assert_eq!(config.output_format, "json");
        assert!(config.seed.is_none());
        assert!(!config.realtime);
        config.validate().unwrap();
    }

    #[test]
    fn test_cli_parsing() {
        let args = CliArgs::try_parse_from([
            "test",
            "--duration-minutes",
            "90",
            "--seed",
            "42",
            "--ignore-missing",
            "--output-format",
            "text",
        ])
        .unwrap();
        assert_eq!(args.duration_minutes, Some(90));
        assert_eq!(args.seed, Some(42));
        assert!(args.ignore_missing);

        let config = YardConfig::from_cli_args(args).unwrap();
        assert_eq!(config.duration_minutes, 90);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.not_found_policy, NotFoundPolicy::Ignore);
        assert_eq!(config.get_output_format().unwrap(), OutputFormat::Text);
    }

    #[test]
    fn test_cli_without_flags_uses_defaults() {
        let config = YardConfig::from_cli_args(bare_args()).unwrap();
        assert_eq!(config.duration_minutes, 60);
        assert_eq!(config.not_found_policy, NotFoundPolicy::Report);
    }

    #[test]
    fn test_config_file_loading() {
        use std::io::Write;
        use tempfile::Builder;

        let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        let config_json = r#"{
            "stuck_in_transit_minutes": 8,
            "low_speed_threshold_kmh": 25.0,
            "arrival_interval_secs": 3,
            "not_found_policy": "ignore",
            "seed": 12345
        }"#;
        temp_file.write_all(config_json.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = YardConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.stuck_in_transit_minutes, 8);
        assert_eq!(config.low_speed_threshold_kmh, 25.0);
        assert_eq!(config.arrival_interval_secs, 3);
        assert_eq!(config.not_found_policy, NotFoundPolicy::Ignore);
        assert_eq!(config.seed, Some(12345));

        // Unspecified fields fall back to defaults
        assert_eq!(config.progression_interval_secs, 7);
        assert_eq!(config.alert_interval_secs, 10);
    }

    #[test]
    fn test_cli_overrides_config_file() {
        use std::io::Write;
        use tempfile::Builder;

        let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        temp_file.write_all(br#"{ "seed": 1, "duration_minutes": 30 }"#).unwrap();
        temp_file.flush().unwrap();

        let path = temp_file.path().to_str().unwrap().to_string();
        let args =
            CliArgs::try_parse_from(["test", "--config", path.as_str(), "--seed", "99"]).unwrap();
        let config = YardConfig::from_cli_args(args).unwrap();

        assert_eq!(config.seed, Some(99));
        assert_eq!(config.duration_minutes, 30);
    }

    #[test]
    fn test_config_file_errors() {
        let missing = YardConfig::from_file("/definitely/not/here.json");
        assert!(matches!(missing, Err(ConfigError::FileNotFound(_))));

        let temp_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let unsupported = YardConfig::from_file(temp_file.path());
        assert!(matches!(unsupported, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validation_rejects_zero_interval() {
        let config = YardConfig { progression_interval_secs: 0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_bad_thresholds() {
        let config = YardConfig { stuck_in_transit_minutes: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidThreshold { .. })));

        let config = YardConfig { low_speed_threshold_kmh: f64::NAN, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidThreshold { .. })));
    }

    #[test]
    fn test_validation_rejects_bad_percentages_and_weights() {
        let config = YardConfig { progression_probability: 1.5, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidPercentage { .. })
        ));

        let config = YardConfig { cegonha_vehicle_weight: 0.5, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidWeightSum { .. })));
    }

    #[test]
    fn test_validation_rejects_unknown_output_format() {
        let config = YardConfig { output_format: "xlsx".to_string(), ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::UnknownOutputFormat(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yard.json");
        let config = YardConfig { seed: Some(5), duration_minutes: 15, ..Default::default() };
        config.save_to_file(&path).unwrap();

        let loaded = YardConfig::from_file(&path).unwrap();
        assert_eq!(loaded.seed, Some(5));
        assert_eq!(loaded.duration_minutes, 15);
    }

    #[test]
    fn test_duration_helpers() {
        let config = YardConfig::default();
        assert_eq!(config.stuck_in_transit_threshold(), chrono::Duration::minutes(5));
        assert_eq!(config.run_duration(), chrono::Duration::minutes(60));
    }
}
