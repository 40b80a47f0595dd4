use serde::Deserialize;

use crate::protocols::BENEFICIARY_ADDRESS;

/// Caller-supplied parsing options.
///
/// Deserializes from partial JSON; absent fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    /// Look for AMM operations inside the inner instructions of foreign
    /// top-level instructions (aggregator routes, vault strategies).
    pub scan_cpi: bool,
    /// Owners allowed to receive a swap's beneficiary fee leg. Empty means
    /// the structural fee-leg heuristic decides alone.
    pub fee_collectors: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            scan_cpi: true,
            fee_collectors: Vec::new(),
        }
    }
}

impl ParserConfig {
    /// Default options with the stabble vault beneficiary as the only
    /// accepted fee collector.
    pub fn with_stabble_beneficiary() -> Self {
        Self {
            fee_collectors: vec![BENEFICIARY_ADDRESS.to_string()],
            ..Self::default()
        }
    }

    pub fn accepts_fee_collector(&self, owner: Option<&str>) -> bool {
        if self.fee_collectors.is_empty() {
            return true;
        }
        owner.is_some_and(|o| self.fee_collectors.iter().any(|c| c == o))
    }
}
