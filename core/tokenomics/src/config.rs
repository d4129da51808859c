// citrate/core/tokenomics/src/config.rs

use crate::bonding_curve::{BondingCurve, CurveParams};
use crate::dynamic_supply::{DynamicSupply, DynamicSupplyParams};
use crate::emission::{EmissionParams, EmissionSchedule};
use crate::integration::QuadratureConfig;
use crate::vesting::{VestingParams, VestingWallet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tokenomics configuration.
///
/// Every section except `quadrature` is optional; hosts build only the
/// controllers they configure. Amounts are hex-encoded `U256` strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenomicsConfig {
    /// Numerical integration settings shared by all curves
    #[serde(default)]
    pub quadrature: QuadratureConfig,

    #[serde(default)]
    pub curve: Option<CurveParams>,

    #[serde(default)]
    pub vesting: Option<VestingParams>,

    #[serde(default)]
    pub dynamic_supply: Option<DynamicSupplyParams>,

    #[serde(default)]
    pub emission: Option<EmissionParams>,
}

impl TokenomicsConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("Failed to parse tokenomics config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize tokenomics config")
    }

    pub fn validate(&self) -> Result<()> {
        self.quadrature.validate()?;
        if let Some(curve) = &self.curve {
            curve.shape.validate().context("Invalid [curve] section")?;
        }
        Ok(())
    }

    pub fn build_curve(&self) -> Result<BondingCurve> {
        let params = self.curve.as_ref().context("No [curve] section configured")?;
        Ok(BondingCurve::from_params(params, self.quadrature)?)
    }

    pub fn build_vesting(&self) -> Result<VestingWallet> {
        let params = self.vesting.as_ref().context("No [vesting] section configured")?;
        let mut wallet = VestingWallet::new();
        wallet.create_vesting_schedule(params)?;
        Ok(wallet)
    }

    pub fn build_dynamic_supply(&self) -> Result<DynamicSupply> {
        let params = self
            .dynamic_supply
            .as_ref()
            .context("No [dynamic_supply] section configured")?;
        Ok(DynamicSupply::initialize(params)?)
    }

    pub fn build_emission(&self) -> Result<EmissionSchedule> {
        let params = self.emission.as_ref().context("No [emission] section configured")?;
        Ok(EmissionSchedule::initialize(params)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{CurveKind, CurveShape};
    use crate::math::PRECISION;
    use primitive_types::U256;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TokenomicsConfig::from_json("{}").unwrap();
        assert_eq!(config.quadrature, QuadratureConfig::default());
        assert!(config.curve.is_none());
        assert!(config.build_curve().is_err());
    }

    #[test]
    fn test_round_trip_through_file() {
        let config = TokenomicsConfig {
            curve: Some(CurveParams {
                shape: CurveShape::Sigmoid {
                    max_price: U256::from(1_000_000u64),
                    steepness: PRECISION,
                    midpoint: PRECISION * 50,
                },
                initial_supply: U256::zero(),
                initial_reserve: U256::zero(),
            }),
            dynamic_supply: Some(DynamicSupplyParams::default()),
            ..Default::default()
        };

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

        let loaded = TokenomicsConfig::from_file(file.path()).unwrap();
        let curve = loaded.build_curve().unwrap();
        assert_eq!(curve.kind().unwrap(), CurveKind::Sigmoid);
        // far below the midpoint the sigmoid has flattened to zero
        assert_eq!(curve.get_spot_price().unwrap(), U256::zero());
        assert_eq!(
            loaded.build_dynamic_supply().unwrap().current_supply(),
            DynamicSupplyParams::default().base_supply
        );
    }

    #[test]
    fn test_invalid_quadrature_is_rejected() {
        let err = TokenomicsConfig::from_json(r#"{"quadrature": {"simpson_steps": 7}}"#).unwrap_err();
        assert!(err.to_string().contains("simpson_steps"));
    }

    #[test]
    fn test_missing_file() {
        let err = TokenomicsConfig::from_file("/nonexistent/tokenomics.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
