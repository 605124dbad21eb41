use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{RelaxationPolicy, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub relaxation: RelaxationSettings,
    #[serde(default)]
    pub activity: ActivitySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
        }
    }
}

fn default_top_k() -> usize { 5 }
fn default_max_top_k() -> usize { 50 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

/// Point values of every compatibility signal
///
/// These are product tuning constants, not derived values; override them per
/// deployment instead of editing code.
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_role_complementary")]
    pub role_complementary: u32,
    #[serde(default = "default_location_exact")]
    pub location_exact: u32,
    #[serde(default = "default_location_region")]
    pub location_region: u32,
    #[serde(default = "default_interest_per_shared")]
    pub interest_per_shared: u32,
    #[serde(default = "default_interest_cap")]
    pub interest_cap: u32,
    #[serde(default = "default_skill_per_shared")]
    pub skill_per_shared: u32,
    #[serde(default = "default_skill_cap")]
    pub skill_cap: u32,
    #[serde(default = "default_experience_same")]
    pub experience_same: u32,
    #[serde(default = "default_experience_different")]
    pub experience_different: u32,
    #[serde(default = "default_investor_domain_per_shared")]
    pub investor_domain_per_shared: u32,
    #[serde(default = "default_investor_domain_cap")]
    pub investor_domain_cap: u32,
    #[serde(default = "default_investor_budget_bonus")]
    pub investor_budget_bonus: u32,
    #[serde(default = "default_age_within_5_years")]
    pub age_within_5_years: u32,
    #[serde(default = "default_age_within_10_years")]
    pub age_within_10_years: u32,
    #[serde(default = "default_activity_max")]
    pub activity_max: u32,
    #[serde(default = "default_activity_min_denominator")]
    pub activity_min_denominator: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            role_complementary: default_role_complementary(),
            location_exact: default_location_exact(),
            location_region: default_location_region(),
            interest_per_shared: default_interest_per_shared(),
            interest_cap: default_interest_cap(),
            skill_per_shared: default_skill_per_shared(),
            skill_cap: default_skill_cap(),
            experience_same: default_experience_same(),
            experience_different: default_experience_different(),
            investor_domain_per_shared: default_investor_domain_per_shared(),
            investor_domain_cap: default_investor_domain_cap(),
            investor_budget_bonus: default_investor_budget_bonus(),
            age_within_5_years: default_age_within_5_years(),
            age_within_10_years: default_age_within_10_years(),
            activity_max: default_activity_max(),
            activity_min_denominator: default_activity_min_denominator(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            role_complementary: config.role_complementary,
            location_exact: config.location_exact,
            location_region: config.location_region,
            interest_per_shared: config.interest_per_shared,
            interest_cap: config.interest_cap,
            skill_per_shared: config.skill_per_shared,
            skill_cap: config.skill_cap,
            experience_same: config.experience_same,
            experience_different: config.experience_different,
            investor_domain_per_shared: config.investor_domain_per_shared,
            investor_domain_cap: config.investor_domain_cap,
            investor_budget_bonus: config.investor_budget_bonus,
            age_within_5_years: config.age_within_5_years,
            age_within_10_years: config.age_within_10_years,
            activity_max: config.activity_max,
            activity_min_denominator: config.activity_min_denominator,
        }
    }
}

fn default_role_complementary() -> u32 { 18 }
fn default_location_exact() -> u32 { 10 }
fn default_location_region() -> u32 { 6 }
fn default_interest_per_shared() -> u32 { 3 }
fn default_interest_cap() -> u32 { 15 }
fn default_skill_per_shared() -> u32 { 4 }
fn default_skill_cap() -> u32 { 20 }
fn default_experience_same() -> u32 { 8 }
fn default_experience_different() -> u32 { 4 }
fn default_investor_domain_per_shared() -> u32 { 3 }
fn default_investor_domain_cap() -> u32 { 6 }
fn default_investor_budget_bonus() -> u32 { 2 }
fn default_age_within_5_years() -> u32 { 5 }
fn default_age_within_10_years() -> u32 { 3 }
fn default_activity_max() -> u32 { 10 }
fn default_activity_min_denominator() -> u32 { 3 }

#[derive(Debug, Clone, Deserialize)]
pub struct RelaxationSettings {
    #[serde(default = "default_exact_min_score")]
    pub exact_min_score: u32,
    #[serde(default = "default_region_min_score")]
    pub region_min_score: u32,
    #[serde(default = "default_open_min_score")]
    pub open_min_score: u32,
    #[serde(default = "default_max_passes")]
    pub max_passes: u8,
}

impl Default for RelaxationSettings {
    fn default() -> Self {
        Self {
            exact_min_score: default_exact_min_score(),
            region_min_score: default_region_min_score(),
            open_min_score: default_open_min_score(),
            max_passes: default_max_passes(),
        }
    }
}

impl From<&RelaxationSettings> for RelaxationPolicy {
    fn from(settings: &RelaxationSettings) -> Self {
        Self {
            exact_min_score: settings.exact_min_score,
            region_min_score: settings.region_min_score,
            open_min_score: settings.open_min_score,
            max_passes: settings.max_passes,
        }
    }
}

fn default_exact_min_score() -> u32 { 50 }
fn default_region_min_score() -> u32 { 40 }
fn default_open_min_score() -> u32 { 30 }
fn default_max_passes() -> u8 { 3 }

/// Document store holding authored content, used for activity counts
///
/// Activity fetching is disabled when `endpoint` is unset; requests must then
/// carry their own counts or score activity as zero.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivitySettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub database_id: Option<String>,
    #[serde(default = "default_activity_collection")]
    pub collection: String,
    #[serde(default = "default_author_field")]
    pub author_field: String,
    #[serde(default = "default_activity_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_activity_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_activity_cache_size")]
    pub cache_size: u64,
}

impl Default for ActivitySettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            project_id: None,
            database_id: None,
            collection: default_activity_collection(),
            author_field: default_author_field(),
            timeout_secs: default_activity_timeout(),
            cache_ttl_secs: default_activity_cache_ttl(),
            cache_size: default_activity_cache_size(),
        }
    }
}

fn default_activity_collection() -> String { "posts".to_string() }
fn default_author_field() -> String { "authorId".to_string() }
fn default_activity_timeout() -> u64 { 5 }
fn default_activity_cache_ttl() -> u64 { 300 }
fn default_activity_cache_size() -> u64 { 10_000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local override file (config/local.toml)
    /// 4. Environment variables (prefixed with FOUNDER_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FOUNDER_MATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    pub fn relaxation_policy(&self) -> RelaxationPolicy {
        RelaxationPolicy::from(&self.relaxation)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("FOUNDER_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_weights_match_policy_table() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
    }

    #[test]
    fn test_default_relaxation_matches_policy() {
        let policy = RelaxationPolicy::from(&RelaxationSettings::default());
        assert_eq!(policy, RelaxationPolicy::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_partial_file() {
        let path = std::env::temp_dir().join(format!(
            "founder-match-config-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[matching]\ndefault_top_k = 8\n\n[scoring.weights]\nskill_per_shared = 5\n\n[relaxation]\nmax_passes = 2"
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.matching.default_top_k, 8);
        assert_eq!(settings.matching.max_top_k, 50);
        assert_eq!(settings.scoring_weights().skill_per_shared, 5);
        assert_eq!(settings.scoring_weights().skill_cap, 20);
        assert_eq!(settings.relaxation_policy().max_passes, 2);
        assert_eq!(settings.server.port, 8080);
        assert!(settings.activity.endpoint.is_none());
    }
}
