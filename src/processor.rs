use crate::catalog::{FieldCatalog, FieldSpec};
use crate::image::{ImageMetadata, ImageWriter, LoadedImage, WriteError};
use crate::validation::ValidationError;
use log::warn;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// One rejected field: the spec it was validated against, the raw value that
/// was dropped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub spec: FieldSpec,
    pub value: String,
    pub reason: ValidationError,
}

/// The outcome of one sanitization sweep over one image's metadata.
///
/// Consumed by the save path to emit a single aggregated warning, then
/// discarded; it is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizationReport {
    entries: Vec<ReportEntry>,
}

impl SanitizationReport {
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for SanitizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", entry.spec.keyword, entry.reason)?;
        }
        Ok(())
    }
}

/// Sweeps the metadata once, validating every cataloged field that is present
/// and dropping every value that fails its VR grammar.
///
/// Keys without a catalog entry are left untouched, fields absent from the
/// metadata are skipped, and no validation failure ever escapes: one bad
/// field cannot abort processing of the rest of the image. Running the sweep
/// again on already-sanitized metadata yields an empty report.
pub fn sanitize(catalog: &FieldCatalog, metadata: &mut ImageMetadata) -> SanitizationReport {
    let mut report = SanitizationReport::default();

    for spec in catalog.iter() {
        let outcome = match metadata.get(&spec.keyword) {
            Some(value) => spec.validate_value(value),
            None => continue,
        };

        if let Err(reason) = outcome {
            let value = metadata.remove(&spec.keyword).unwrap_or_default();
            report.entries.push(ReportEntry {
                spec: spec.clone(),
                value,
                reason,
            });
        }
    }

    report
}

/// Saves images through an external [`ImageWriter`], running exactly one
/// sanitization sweep per image first.
///
/// Validation failures never block persistence: the offending values are
/// dropped and the whole image gets a single aggregated warning record, so an
/// image with many bad fields does not flood the log. Only writer errors
/// propagate.
///
/// # Example
///
/// ```no_run
/// use std::path::{Path, PathBuf};
/// use dicom_sanitization::image::{ImageWriter, LoadedImage, WriteError};
/// use dicom_sanitization::processor::Saver;
///
/// struct RawWriter;
///
/// impl ImageWriter for RawWriter {
///     fn write(&self, image: &LoadedImage, dir: &Path) -> Result<PathBuf, WriteError> {
///         let path = dir.join(&image.name);
///         std::fs::write(&path, &image.pixel_data)?;
///         Ok(path)
///     }
/// }
///
/// let saver = Saver::new(RawWriter);
/// let mut image = LoadedImage::new("image.mhd", "/data/image.mhd");
/// saver.save(&mut image, Path::new("/tmp/out")).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Saver<W: ImageWriter> {
    catalog: FieldCatalog,
    writer: W,
}

impl<W: ImageWriter> Saver<W> {
    /// Creates a saver policing the standard field catalog.
    pub fn new(writer: W) -> Self {
        Self::with_catalog(writer, FieldCatalog::default())
    }

    pub fn with_catalog(writer: W, catalog: FieldCatalog) -> Self {
        Self { catalog, writer }
    }

    /// Sanitizes the image's metadata, logs at most one warning for the whole
    /// image, then delegates to the writer. Returns the path of the written
    /// file.
    pub fn save(&self, image: &mut LoadedImage, output_directory: &Path) -> Result<PathBuf> {
        let report = sanitize(&self.catalog, &mut image.metadata);
        if !report.is_empty() {
            warn!(
                "ValidationError: dropped {} invalid metadata field(s) from '{}': {}",
                report.len(),
                image.name,
                report
            );
        }

        let path = self.writer.write(image, output_directory)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::vr::ValueRepresentation;

    fn metadata(entries: &[(&str, &str)]) -> ImageMetadata {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_sanitize_all_valid() {
        let catalog = FieldCatalog::default();
        let mut md = metadata(&[
            ("PatientID", "1234"),
            ("PatientAge", "042Y"),
            ("StudyDate", "20210923"),
        ]);

        let report = sanitize(&catalog, &mut md);
        assert!(report.is_empty());
        assert_eq!(md.len(), 3);
    }

    #[test]
    fn test_sanitize_drops_invalid_value() {
        let catalog = FieldCatalog::default();
        let mut md = metadata(&[("PatientAge", "invalid age"), ("PatientSex", "F")]);

        let report = sanitize(&catalog, &mut md);
        assert_eq!(report.len(), 1);

        let entry = &report.entries()[0];
        assert_eq!(entry.spec.keyword, "PatientAge");
        assert_eq!(entry.value, "invalid age");

        assert!(!md.contains_key("PatientAge"));
        assert_eq!(md.get("PatientSex"), Some("F"));
    }

    #[test]
    fn test_sanitize_collects_all_failures() {
        let catalog = FieldCatalog::default();
        let mut md = metadata(&[
            ("PatientAge", "invalid age"),
            ("StudyDate", "invalid date"),
            ("StudyInstanceUID", "invalid uid"),
        ]);

        let report = sanitize(&catalog, &mut md);
        assert_eq!(report.len(), 3);
        assert!(md.is_empty());
    }

    #[test]
    fn test_sanitize_skips_unknown_keys() {
        let catalog = FieldCatalog::default();
        let mut md = metadata(&[("NotACatalogKey", "anything \\ goes here")]);

        let report = sanitize(&catalog, &mut md);
        assert!(report.is_empty());
        assert_eq!(md.get("NotACatalogKey"), Some("anything \\ goes here"));
    }

    #[test]
    fn test_sanitize_skips_absent_fields() {
        let catalog = FieldCatalog::default();
        let mut md = ImageMetadata::new();

        let report = sanitize(&catalog, &mut md);
        assert!(report.is_empty());
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let catalog = FieldCatalog::default();
        let mut md = metadata(&[("PatientAge", "invalid age"), ("PatientSex", "F")]);

        let first = sanitize(&catalog, &mut md);
        assert_eq!(first.len(), 1);

        let second = sanitize(&catalog, &mut md);
        assert!(second.is_empty());
    }

    #[test]
    fn test_sanitize_respects_field_specific_limit() {
        let catalog = CatalogBuilder::new()
            .field(
                FieldSpec::new("PatientID", ValueRepresentation::LongString, "patient_id")
                    .with_max_length(16),
            )
            .build();
        let mut md = metadata(&[("PatientID", "a-rather-long-patient-identifier")]);

        let report = sanitize(&catalog, &mut md);
        assert_eq!(report.len(), 1);
        assert!(!md.contains_key("PatientID"));
    }

    #[test]
    fn test_sanitize_concurrently_with_shared_catalog() {
        use std::sync::Arc;
        use std::thread;

        let catalog = Arc::new(FieldCatalog::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                thread::spawn(move || {
                    let mut md = [
                        ("PatientAge".to_owned(), "invalid age".to_owned()),
                        ("PatientID".to_owned(), format!("patient-{i}")),
                    ]
                    .into_iter()
                    .collect::<ImageMetadata>();
                    sanitize(&catalog, &mut md).len()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }

    #[test]
    fn test_report_display_names_fields_and_reasons() {
        let catalog = FieldCatalog::default();
        let mut md = metadata(&[("PatientAge", "old"), ("StudyDate", "20210229")]);

        let report = sanitize(&catalog, &mut md);
        let message = report.to_string();
        assert!(message.contains("PatientAge: AS value \"old\""));
        assert!(message.contains("StudyDate: DA value \"20210229\""));
        assert!(message.contains("; "));
    }
}
