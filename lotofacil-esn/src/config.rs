use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EsnConfig {
    pub reservoir_size: usize,
    pub spectral_radius: f64,
    pub sparsity: f64,
    pub leaking_rate: f64,
    pub ridge_lambda: f64,
    pub input_scaling: f64,
    /// Number of preceding draws fed to the reservoir for each prediction.
    pub window: usize,
    pub noise_amplitude: f64,
    pub seed: u64,
}

impl Default for EsnConfig {
    fn default() -> Self {
        Self {
            reservoir_size: 200,
            spectral_radius: 0.95,
            sparsity: 0.9,
            leaking_rate: 0.3,
            ridge_lambda: 1e-2,
            input_scaling: 0.5,
            window: 10,
            noise_amplitude: 1e-4,
            seed: 42,
        }
    }
}

impl EsnConfig {
    pub fn validate(&self) -> Result<()> {
        if self.reservoir_size == 0 {
            bail!("reservoir_size must be > 0");
        }
        if self.window == 0 {
            bail!("window must be > 0");
        }
        if !(0.0..1.0).contains(&self.sparsity) {
            bail!("sparsity must be in [0, 1), got {}", self.sparsity);
        }
        if !(0.0..=1.0).contains(&self.leaking_rate) {
            bail!("leaking_rate must be in [0, 1], got {}", self.leaking_rate);
        }
        if self.input_scaling <= 0.0 || self.spectral_radius <= 0.0 {
            bail!("input_scaling and spectral_radius must be > 0");
        }
        if self.ridge_lambda <= 0.0 || self.noise_amplitude < 0.0 {
            bail!("ridge_lambda must be > 0 and noise_amplitude >= 0");
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire {:?}", path))?;
        let config: EsnConfig = serde_json::from_str(&json)
            .with_context(|| format!("JSON invalide dans {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
        Ok(())
    }
}
