//! Application configuration. Artifact paths point at the externally trained
//! classifier and encoders; thresholds and placeholders drive scoring.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_ENV: &str = "STUDENT_SUCCESS_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Trained model, encoders and feature manifest
    pub artifacts: ArtifactsConfig,
    /// Historical student records for reporting
    pub dataset: DatasetConfig,
    /// Optional CSV exports for the registration queue and intervention log
    pub session: SessionConfig,
    /// Values substituted for signals unknown at registration time
    pub placeholders: PlaceholderConfig,
    /// Risk tier cutoffs
    pub risk: RiskConfig,
    /// Rule-based flag cutoffs shared by the assembler and risk factors
    pub flags: FlagConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory holding all artifacts
    pub dir: PathBuf,
    /// Model file: `.json` (logistic) or `.onnx`
    pub model_file: String,
    /// Encoder classes per categorical field
    pub encoders_file: String,
    /// Ordered feature names the model was trained with; checked on load when present
    pub features_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

/// Unset paths keep the queue and log in memory for the life of the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub registrations: Option<PathBuf>,
    pub interventions: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    pub attendance_rate_pct: f32,
    pub grade_average_pct: f32,
    pub courses_failed: u32,
    pub warnings_issued: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Probability (percent) at or above which a candidate is medium risk
    pub medium_threshold_pct: f64,
    /// Probability (percent) at or above which a candidate is high risk
    pub high_threshold_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagConfig {
    /// Distance strictly above this is "far"
    pub far_distance_km: f32,
    /// Age strictly above this is "mature"
    pub mature_age: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
            model_file: "model.json".to_string(),
            encoders_file: "encoders.json".to_string(),
            features_file: Some("features.json".to_string()),
        }
    }
}

impl ArtifactsConfig {
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(&self.model_file)
    }

    pub fn encoders_path(&self) -> PathBuf {
        self.dir.join(&self.encoders_file)
    }

    pub fn features_path(&self) -> Option<PathBuf> {
        self.features_file.as_ref().map(|f| self.dir.join(f))
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("student_data_scored.csv"),
        }
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            attendance_rate_pct: 80.0,
            grade_average_pct: 55.0,
            courses_failed: 0,
            warnings_issued: 0,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            medium_threshold_pct: 30.0,
            high_threshold_pct: 55.0,
        }
    }
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            far_distance_km: 40.0,
            mature_age: 30,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<AppConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }

    /// Config path from `STUDENT_SUCCESS_CONFIG`, falling back to `config.json`
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.json"))
    }
}
