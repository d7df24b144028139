//! Catalog record types
//!
//! A `CatalogRecord` is one row of the materialized catalog snapshot. Field
//! names map onto the flattened column names produced by the upstream
//! geojson-to-columnar ingestion job, so a snapshot row deserializes
//! directly. Every descriptive attribute is optional; only `id` is required.
//! Embedded-JSON columns (contact, distributor, credits, ...) are kept as
//! raw strings here and parsed none-safely by the detail projection.

use serde::{Deserialize, Serialize};

/// One metadata record from the catalog snapshot.
///
/// `parent_id` forms a forest over records. It is not validated: a dangling
/// reference degrades to "no parent found" at resolution time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "features_properties_id")]
    pub id: String,

    #[serde(rename = "features_properties_parentIdentifier", default)]
    pub parent_id: Option<String>,

    #[serde(rename = "features_properties_title_en", default)]
    pub title_en: String,

    #[serde(rename = "features_properties_title_fr", default)]
    pub title_fr: String,

    /// Geometry passes through untouched; the shape varies by record type.
    #[serde(rename = "features_geometry_coordinates", default)]
    pub coordinates: Option<serde_json::Value>,

    #[serde(rename = "features_properties_description_en", default)]
    pub description_en: Option<String>,

    #[serde(rename = "features_properties_description_fr", default)]
    pub description_fr: Option<String>,

    #[serde(rename = "features_properties_date_published_date", default)]
    pub published: Option<String>,

    /// ISO-8601 timestamp of the last record modification
    #[serde(rename = "features_properties_date_modified", default)]
    pub date_modified: Option<String>,

    #[serde(rename = "features_properties_keywords_en", default)]
    pub keywords_en: Option<String>,

    #[serde(rename = "features_properties_keywords_fr", default)]
    pub keywords_fr: Option<String>,

    #[serde(rename = "features_properties_topicCategory", default)]
    pub topic_category: Option<String>,

    #[serde(rename = "features_properties_date_created_date", default)]
    pub created: Option<String>,

    #[serde(rename = "features_properties_spatialRepresentation", default)]
    pub spatial_representation: Option<String>,

    #[serde(rename = "features_properties_type", default)]
    pub record_type: Option<String>,

    #[serde(rename = "features_properties_temporalExtent_begin", default)]
    pub temporal_begin: Option<String>,

    #[serde(rename = "features_properties_temporalExtent_end", default)]
    pub temporal_end: Option<String>,

    #[serde(rename = "features_properties_refSys", default)]
    pub ref_sys: Option<String>,

    #[serde(rename = "features_properties_refSys_version", default)]
    pub ref_sys_version: Option<String>,

    #[serde(rename = "features_properties_status", default)]
    pub status: Option<String>,

    #[serde(rename = "features_properties_maintenance", default)]
    pub maintenance: Option<String>,

    #[serde(rename = "features_properties_metadataStandard_en", default)]
    pub metadata_standard: Option<String>,

    #[serde(rename = "features_properties_metadataStandardVersion", default)]
    pub metadata_standard_version: Option<String>,

    #[serde(rename = "features_properties_distributionFormat_name", default)]
    pub distribution_format_name: Option<String>,

    #[serde(rename = "features_properties_distributionFormat_format", default)]
    pub distribution_format_format: Option<String>,

    #[serde(rename = "features_properties_useLimits_en", default)]
    pub use_limits_en: Option<String>,

    #[serde(rename = "features_properties_useLimits_fr", default)]
    pub use_limits_fr: Option<String>,

    #[serde(rename = "features_properties_accessConstraints", default)]
    pub access_constraints: Option<String>,

    #[serde(rename = "features_properties_otherConstraints_en", default)]
    pub other_constraints: Option<String>,

    #[serde(rename = "features_properties_dateStamp", default)]
    pub date_stamp: Option<String>,

    #[serde(rename = "features_properties_dataSetURI", default)]
    pub data_set_uri: Option<String>,

    #[serde(rename = "features_properties_locale_language", default)]
    pub locale_language: Option<String>,

    #[serde(rename = "features_properties_locale_country", default)]
    pub locale_country: Option<String>,

    #[serde(rename = "features_properties_locale_encoding", default)]
    pub locale_encoding: Option<String>,

    #[serde(rename = "features_properties_language", default)]
    pub language: Option<String>,

    #[serde(rename = "features_properties_characterSet", default)]
    pub character_set: Option<String>,

    #[serde(rename = "features_properties_environmentDescription", default)]
    pub environment_description: Option<String>,

    #[serde(rename = "features_properties_supplementalInformation_en", default)]
    pub supplemental_information: Option<String>,

    // Embedded-JSON columns, kept raw until projection
    #[serde(rename = "features_properties_contact", default)]
    pub contact: Option<String>,

    #[serde(rename = "features_properties_distributor", default)]
    pub distributor: Option<String>,

    #[serde(rename = "features_properties_credits", default)]
    pub credits: Option<String>,

    #[serde(rename = "features_properties_options", default)]
    pub options: Option<String>,

    #[serde(rename = "features_properties_graphicOverview", default)]
    pub graphic_overview: Option<String>,

    #[serde(rename = "features_properties_plugins", default)]
    pub plugins: Option<String>,

    #[serde(rename = "features_similarity", default)]
    pub similarity: Option<String>,

    #[serde(rename = "features_properties_sourceSystemName", default)]
    pub source_system_name: Option<String>,

    #[serde(rename = "features_properties_eoCollection", default)]
    pub eo_collection: Option<String>,

    #[serde(rename = "features_properties_eoFilters", default)]
    pub eo_filters: Option<String>,
}

impl CatalogRecord {
    /// Create a minimal record (mainly for tests and fixtures)
    pub fn new(id: impl Into<String>, title_en: impl Into<String>, title_fr: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title_en: title_en.into(),
            title_fr: title_fr.into(),
            ..Default::default()
        }
    }

    /// Set the parent identifier
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Project this record to the bilingual related-record shape.
    ///
    /// Relationship responses historically call the titles
    /// `description_en`/`description_fr`; that naming is part of the wire
    /// contract and is kept as-is.
    pub fn related(&self) -> RelatedRecord {
        RelatedRecord {
            id: self.id.clone(),
            description_en: self.title_en.clone(),
            description_fr: self.title_fr.clone(),
        }
    }
}

/// Bilingual projection of a record used in relationship responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedRecord {
    pub id: String,
    pub description_en: String,
    pub description_fr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot_row() {
        let row = r#"{
            "features_properties_id": "abc-123",
            "features_properties_parentIdentifier": "root-1",
            "features_properties_title_en": "Elevation Model",
            "features_properties_title_fr": "Modèle d'élévation",
            "features_properties_topicCategory": "elevation",
            "features_properties_contact": "[{\"organisation\": {\"en\": \"NRCan\"}}]"
        }"#;

        let record: CatalogRecord = serde_json::from_str(row).unwrap();
        assert_eq!(record.id, "abc-123");
        assert_eq!(record.parent_id.as_deref(), Some("root-1"));
        assert_eq!(record.title_en, "Elevation Model");
        assert_eq!(record.topic_category.as_deref(), Some("elevation"));
        // Absent attributes default rather than fail
        assert!(record.description_en.is_none());
        assert!(record.credits.is_none());
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let row = r#"{ "features_properties_title_en": "No id here" }"#;
        assert!(serde_json::from_str::<CatalogRecord>(row).is_err());
    }

    #[test]
    fn test_related_projection_uses_titles() {
        let record = CatalogRecord::new("a", "Alpha", "Alpha (fr)");
        let related = record.related();
        assert_eq!(related.id, "a");
        assert_eq!(related.description_en, "Alpha");
        assert_eq!(related.description_fr, "Alpha (fr)");
    }
}
