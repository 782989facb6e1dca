//! Export of the experiment log and derived statistics
//!
//! Two formats:
//! - CSV: one row per trial (`Intento,Resultados,Exitos,Timestamp`), optionally
//!   followed by a statistics block
//! - JSON: [`ExportableStatistics`], a fixed and versioned schema
//!
//! Exporting an empty log is refused with [`Error::EmptyExperiment`] rather
//! than producing an empty file.

use std::io::Write;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::experiment::{ExperimentLog, SuccessEvent};
use crate::stats::{BinomialResult, ConfidenceInterval, DistributionPoint};
use crate::{Error, Result};

/// Header row of the trial table.
pub const CSV_HEADER: &str = "Intento,Resultados,Exitos,Timestamp";

/// Current [`ExportableStatistics`] schema version.
pub const STATISTICS_SCHEMA_VERSION: u32 = 1;

/// Suggested file name for an export made on `date`.
#[must_use]
pub fn default_file_name(date: NaiveDate) -> String {
    format!("experimento_dados_{}.csv", date.format("%Y-%m-%d"))
}

/// Render the log (and optionally `stats`) as CSV text.
///
/// # Errors
///
/// Returns `EmptyExperiment` if the log has no trials.
pub fn to_csv(log: &ExperimentLog, stats: Option<&BinomialResult>) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, log, stats)?;
    String::from_utf8(buffer).map_err(|e| Error::Io(std::io::Error::other(e)))
}

/// Write the log (and optionally `stats`) as CSV to `writer`.
///
/// # Errors
///
/// Returns `EmptyExperiment` if the log has no trials, or `Io` if writing fails.
pub fn write_csv<W: Write>(
    mut writer: W,
    log: &ExperimentLog,
    stats: Option<&BinomialResult>,
) -> Result<()> {
    if log.is_empty() {
        warn!("export refused: no trials recorded");
        return Err(Error::EmptyExperiment);
    }

    writeln!(writer, "{CSV_HEADER}")?;
    for row in log.export_rows() {
        writeln!(
            writer,
            "{},\"{}\",{},{}",
            row.index,
            row.results,
            row.successes,
            row.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
        )?;
    }

    if let Some(stats) = stats {
        write_statistics_block(&mut writer, stats)?;
    }

    info!(
        rows = log.len(),
        with_statistics = stats.is_some(),
        "experiment exported as CSV"
    );
    Ok(())
}

fn write_statistics_block<W: Write>(writer: &mut W, stats: &BinomialResult) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Parametros")?;
    writeln!(writer, "n,{}", stats.n)?;
    writeln!(writer, "p,{:.6}", stats.p)?;
    writeln!(writer, "q,{:.6}", stats.q)?;

    writeln!(writer)?;
    writeln!(writer, "Distribucion")?;
    writeln!(writer, "k,P(X=k),P(X<=k)")?;
    for point in &stats.distribution {
        writeln!(
            writer,
            "{},{:.8},{:.8}",
            point.k, point.probability, point.cumulative_probability
        )?;
    }

    let ci = &stats.confidence_interval;
    writeln!(writer)?;
    writeln!(writer, "Intervalo de confianza ({}%)", ci.confidence)?;
    writeln!(writer, "Inferior,{:.6}", ci.lower)?;
    writeln!(writer, "Superior,{:.6}", ci.upper)?;

    writeln!(writer)?;
    writeln!(writer, "Resumen")?;
    writeln!(writer, "Media,{:.6}", stats.mean)?;
    writeln!(writer, "Varianza,{:.6}", stats.variance)?;
    writeln!(writer, "Desviacion estandar,{:.6}", stats.standard_deviation)?;
    writeln!(writer, "Exitos observados,{}", stats.observed_successes)?;
    writeln!(writer, "Intentos,{}", stats.total_trials)?;
    writeln!(
        writer,
        "Probabilidad observada,{:.6}",
        stats.observed_probability
    )?;
    writeln!(writer, "Chi cuadrado,{:.6}", stats.chi_square)?;
    Ok(())
}

/// Exportable statistics, schema version [`STATISTICS_SCHEMA_VERSION`].
///
/// Every field is named here; nothing is discovered at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportableStatistics {
    /// Schema version of this payload.
    pub schema_version: u32,
    /// When the payload was produced.
    pub exported_at: DateTime<Utc>,
    /// Success definition in use.
    pub success_event: SuccessEvent,
    /// Binomial trial count.
    pub n: u32,
    /// Success probability.
    pub p: f64,
    /// Failure probability.
    pub q: f64,
    /// n·p
    pub mean: f64,
    /// n·p·q
    pub variance: f64,
    /// √variance
    pub standard_deviation: f64,
    /// Successes observed.
    pub observed_successes: u64,
    /// Trials observed.
    pub total_trials: u64,
    /// Observed success proportion.
    pub observed_probability: f64,
    /// Chi-square style deviation.
    pub chi_square: f64,
    /// 95% interval.
    pub confidence_interval: ConfidenceInterval,
    /// PMF/CDF table.
    pub distribution: Vec<DistributionPoint>,
}

impl ExportableStatistics {
    /// Snapshot `stats` at `exported_at`.
    #[must_use]
    pub fn new(stats: &BinomialResult, exported_at: DateTime<Utc>) -> Self {
        Self {
            schema_version: STATISTICS_SCHEMA_VERSION,
            exported_at,
            success_event: stats.success_event,
            n: stats.n,
            p: stats.p,
            q: stats.q,
            mean: stats.mean,
            variance: stats.variance,
            standard_deviation: stats.standard_deviation,
            observed_successes: stats.observed_successes,
            total_trials: stats.total_trials,
            observed_probability: stats.observed_probability,
            chi_square: stats.chi_square,
            confidence_interval: stats.confidence_interval,
            distribution: stats.distribution.clone(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&BinomialResult> for ExportableStatistics {
    fn from(stats: &BinomialResult) -> Self {
        Self::new(stats, Utc::now())
    }
}
