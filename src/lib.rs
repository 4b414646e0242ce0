//! Validation and sanitization of DICOM-style metadata headers.
//!
//! Medical image headers carry free-form text fields that are supposed to
//! follow the DICOM value-representation (VR) grammars: ages like `"042Y"`,
//! `YYYYMMDD` dates, dotted-numeric unique identifiers, and so on. This crate
//! checks already-extracted header values against those grammars and cleans
//! an image's metadata before it is handed to an on-disk writer. A bad field
//! is dropped and reported, never a reason to abort the conversion: the image
//! is still saved and the whole incident is one warning log record.
//!
//! It does not parse binary DICOM streams and does not define an output
//! format; loading and writing stay with external collaborators behind the
//! [`image::ImageWriter`] seam.
//!
//! # Example
//!
//! ```
//! use dicom_sanitization::catalog::FieldCatalog;
//! use dicom_sanitization::image::ImageMetadata;
//! use dicom_sanitization::processor::sanitize;
//!
//! let catalog = FieldCatalog::default();
//! let mut metadata = ImageMetadata::new();
//! metadata.set("PatientAge", "042Y");
//! metadata.set("StudyDate", "not a date");
//!
//! let report = sanitize(&catalog, &mut metadata);
//! assert_eq!(report.len(), 1);
//! assert_eq!(metadata.get("PatientAge"), Some("042Y"));
//! assert_eq!(metadata.get("StudyDate"), None);
//! ```

pub mod catalog;
pub mod image;
pub mod processor;
pub mod validation;
pub mod vr;

pub use catalog::{CatalogBuilder, CatalogError, FieldCatalog, FieldSpec};
pub use image::{ImageMetadata, ImageWriter, LoadedImage, WriteError};
pub use processor::{sanitize, ReportEntry, SanitizationReport, Saver};
pub use validation::{validate, ValidationError};
pub use vr::ValueRepresentation;
