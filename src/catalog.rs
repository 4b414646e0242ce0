use crate::validation::{validate_with_limit, ValidationError};
use crate::vr::ValueRepresentation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate catalog keyword: {0}")]
    DuplicateKeyword(String),
}

/// The declared shape of one known metadata field: its header keyword, VR and
/// human-readable label, plus an optional length limit tighter than the VR
/// default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub keyword: String,
    pub vr: ValueRepresentation,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl FieldSpec {
    pub fn new(keyword: &str, vr: ValueRepresentation, label: &str) -> Self {
        Self {
            keyword: keyword.into(),
            vr,
            label: label.into(),
            max_length: None,
        }
    }

    /// Sets a field-specific maximum length. It can only tighten the VR
    /// default; a wider limit has no effect.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Validates a candidate value against this field's VR grammar and its
    /// optional length override.
    pub fn validate_value(&self, value: &str) -> Result<(), ValidationError> {
        validate_with_limit(self.vr, value, self.max_length)
    }
}

/// The fixed mapping from known metadata keywords to their [`FieldSpec`].
///
/// Built once at startup and read-only afterward, so it can be shared freely
/// between worker threads. Keys absent from the catalog are deliberately not
/// validated at all: only fields the system understands are policed.
///
/// # Example
///
/// ```
/// use dicom_sanitization::catalog::FieldCatalog;
///
/// let catalog = FieldCatalog::default();
/// let spec = catalog.lookup("PatientAge").unwrap();
/// assert!(spec.validate_value("042Y").is_ok());
/// assert!(spec.validate_value("42").is_err());
/// assert!(catalog.lookup("PixelBandwidth").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    fields: BTreeMap<String, FieldSpec>,
}

impl Default for FieldCatalog {
    /// The default catalog is [`FieldCatalog::standard_fields`].
    fn default() -> Self {
        Self::standard_fields()
    }
}

impl FieldCatalog {
    /// A catalog with no entries; every key is treated as unknown.
    pub fn empty() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder(Self::empty())
    }

    pub fn lookup(&self, keyword: &str) -> Option<&FieldSpec> {
        self.fields.get(keyword)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds a catalog from a JSON array of field specs.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let specs: Vec<FieldSpec> = serde_json::from_str(json)?;
        let mut builder = Self::builder();
        for spec in specs {
            if builder.0.fields.contains_key(&spec.keyword) {
                return Err(CatalogError::DuplicateKeyword(spec.keyword));
            }
            builder = builder.field(spec);
        }
        Ok(builder.build())
    }

    /// Serializes the catalog as a JSON array of field specs.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let specs: Vec<&FieldSpec> = self.fields.values().collect();
        Ok(serde_json::to_string_pretty(&specs)?)
    }

    /// The catalog of header fields policed by default.
    pub fn standard_fields() -> Self {
        use ValueRepresentation::*;

        Self::builder()
            .field(FieldSpec::new("PatientID", LongString, "patient_id"))
            .field(FieldSpec::new("PatientName", PersonName, "patient_name"))
            .field(FieldSpec::new("PatientBirthDate", Date, "patient_birth_date"))
            .field(FieldSpec::new("PatientAge", AgeString, "patient_age"))
            .field(FieldSpec::new("PatientSex", CodeString, "patient_sex"))
            .field(FieldSpec::new("StudyDate", Date, "study_date"))
            .field(FieldSpec::new("StudyInstanceUID", UniqueIdentifier, "study_instance_uid"))
            .field(FieldSpec::new("SeriesInstanceUID", UniqueIdentifier, "series_instance_uid"))
            .field(FieldSpec::new("StudyDescription", LongString, "study_description"))
            .field(FieldSpec::new("SeriesDescription", LongString, "series_description"))
            .build()
    }
}

/// Builder for [`FieldCatalog`] instances.
///
/// # Example
///
/// ```
/// use dicom_sanitization::catalog::{FieldCatalog, FieldSpec};
/// use dicom_sanitization::vr::ValueRepresentation;
///
/// let catalog = FieldCatalog::builder()
///     .field(FieldSpec::new("StationName", ValueRepresentation::CodeString, "station_name"))
///     .build();
/// assert_eq!(catalog.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogBuilder(FieldCatalog);

impl CatalogBuilder {
    pub fn new() -> Self {
        CatalogBuilder(FieldCatalog::empty())
    }

    /// Registers a field spec, replacing any previous spec with the same
    /// keyword.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.0.fields.insert(spec.keyword.clone(), spec);
        self
    }

    pub fn build(self) -> FieldCatalog {
        self.0
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
