use super::error::ExtractError;
use super::extractor::QaExtractor;
use super::models::ExtractionResult;
use crate::threading::{Thread, thread_to_llm_text};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Outcome of running extraction over a batch of threads.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// Successful results, in thread order
    pub results: Vec<ExtractionResult>,
    /// Threads whose extraction call failed
    pub failed: usize,
}

impl ExtractionReport {
    /// Results that produced at least one Q&A pair.
    pub fn with_qas(&self) -> Vec<&ExtractionResult> {
        self.results.iter().filter(|result| result.has_qas()).collect()
    }
}

/// Run `extractor` over every thread, one at a time.
///
/// A failing thread is logged and skipped; the remaining threads are still
/// processed. Results without a `channel` or `thread_ts` inherit them from
/// the source thread.
pub async fn extract_threads<E: QaExtractor>(
    extractor: &E,
    threads: &[Thread],
    model: &str,
) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    for (index, thread) in threads.iter().enumerate() {
        let transcript = thread_to_llm_text(thread);
        debug!(
            "extracting thread {} ({} of {}, {} messages)",
            thread.thread_ts,
            index + 1,
            threads.len(),
            thread.message_count()
        );

        match extractor.extract_qas(&transcript, model).await {
            Ok(mut result) => {
                if result.channel.is_empty() {
                    result.channel = thread.channel.clone();
                }
                if result.thread_ts.is_empty() {
                    result.thread_ts = thread.thread_ts.clone();
                }
                report.results.push(result);
            }
            Err(err) => {
                warn!("extractor failed for thread {}: {}", thread.thread_ts, err);
                report.failed += 1;
            }
        }
    }

    info!(
        "extraction finished: {} results, {} with Q&A pairs, {} failed",
        report.results.len(),
        report.with_qas().len(),
        report.failed
    );
    report
}

/// Write one compact JSON object per line.
pub fn write_jsonl(path: &Path, results: &[ExtractionResult]) -> Result<usize, ExtractError> {
    let write_err = |source| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(write_err)?);
    for result in results {
        serde_json::to_writer(&mut writer, result)?;
        writer.write_all(b"\n").map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;
    Ok(results.len())
}

/// Write the results that carry Q&A pairs as a two-space indented JSON
/// array, returning how many were written.
pub fn write_qa_json(path: &Path, results: &[ExtractionResult]) -> Result<usize, ExtractError> {
    let write_err = |source| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    };

    let kept: Vec<&ExtractionResult> = results.iter().filter(|result| result.has_qas()).collect();

    let mut writer = BufWriter::new(File::create(path).map_err(write_err)?);
    serde_json::to_writer_pretty(&mut writer, &kept)?;
    writer.write_all(b"\n").map_err(write_err)?;
    writer.flush().map_err(write_err)?;
    Ok(kept.len())
}
