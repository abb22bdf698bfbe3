//! Vehicle-policy override CSV.
//!
//! Expected headers:
//! model,low_speed_lkas_fault,low_lane_warning,lfa_mfa
//!
//! Example:
//! model,low_speed_lkas_fault,low_lane_warning,lfa_mfa
//! HYUNDAI_GENESIS,true,true,false
//! SONATA,false,false,true
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PolicyRow {
    pub model: String,
    /// Steering must be withheld below `lkas.low_speed_kph` unless the MDPS is moved off bus 0.
    pub low_speed_lkas_fault: bool,
    /// Lane-departure warnings use the low-severity level.
    pub low_lane_warning: bool,
    /// Emit the 20 Hz LFA MFA display frame.
    pub lfa_mfa: bool,
}

pub fn load_policy_csv(path: &std::path::Path) -> eyre::Result<Vec<PolicyRow>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open policy CSV {:?}: {}", path, e))?;
    parse_policy(rdr).map_err(|e| e.wrap_err(format!("policy CSV {path:?}")))
}

/// Parse policy rows from any reader; used by `load_policy_csv` and tests.
pub fn parse_policy<R: std::io::Read>(mut rdr: csv::Reader<R>) -> eyre::Result<Vec<PolicyRow>> {
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers: {}", e))?
        .clone();
    let expected = ["model", "low_speed_lkas_fault", "low_lane_warning", "lfa_mfa"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "policy CSV must have headers '{}', got: {}",
            expected.join(","),
            actual.join(",")
        );
    }

    let mut rows: Vec<PolicyRow> = Vec::new();
    for (idx, rec) in rdr.deserialize::<PolicyRow>().enumerate() {
        let row = rec.map_err(|e| eyre::eyre!("invalid CSV row {}: {}", idx + 2, e))?;
        if row.model.is_empty() {
            eyre::bail!("invalid CSV row {}: empty model", idx + 2);
        }
        if rows.iter().any(|r| r.model == row.model) {
            eyre::bail!("policy CSV lists model {} more than once", row.model);
        }
        rows.push(row);
    }
    Ok(rows)
}
