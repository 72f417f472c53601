//! Per-file aggregation of classified modules.

use super::endpoint::EndpointClassifier;
use super::module::ModuleClassifier;
use crate::error::Result;
use crate::parser::ModuleBlock;
use crate::stats::Stats;
use crate::types::FileData;
use std::path::Path;

/// Classifies every module block of a file into a [`FileData`].
pub struct FileAggregator<'a, C> {
    classifier: &'a ModuleClassifier<C>,
}

impl<'a, C: EndpointClassifier> FileAggregator<'a, C> {
    /// Aggregate with the given classifier.
    #[must_use]
    pub const fn new(classifier: &'a ModuleClassifier<C>) -> Self {
        Self { classifier }
    }

    /// Classify `blocks` in order and assemble the file record.
    ///
    /// Counters are only touched once every block has been classified: the
    /// file is counted (even when it declares no modules) together with one
    /// module per block. Empty results are returned as-is; dropping them is
    /// up to the caller.
    ///
    /// # Errors
    ///
    /// Returns the first classification error; no partial record is returned
    /// and nothing is counted.
    pub fn aggregate(&self, path: &Path, blocks: &[ModuleBlock], stats: &Stats) -> Result<FileData> {
        let modules = blocks
            .iter()
            .map(|block| {
                if block.entries.len() > 1 {
                    tracing::debug!(
                        module = %block.name,
                        ignored = block.entries.len() - 1,
                        "Module declared with several bodies, classifying the first"
                    );
                }
                let entry = block.first_entry().cloned().unwrap_or_default();
                self.classifier.resolve(&block.name, &entry.source, &entry.version)
            })
            .collect::<Result<Vec<_>>>()?;

        stats.add_file();
        stats.add_modules(modules.len());

        let file = FileData {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            modules,
        };

        tracing::debug!(file = %path.display(), modules = file.modules.len(), "Aggregated file");
        Ok(file)
    }
}
