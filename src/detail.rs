//! Full bilingual detail projection
//!
//! Shapes one catalog record into the detail-lookup response item. Bilingual
//! attributes (description, keywords, use limits) are selected by requested
//! language; embedded-JSON columns are parsed none-safely, degrading to
//! `null` on absence or malformed content instead of failing the response.

use serde_json::{json, Value};

use crate::record::CatalogRecord;

/// Sentinel for an open-ended temporal extent
const TEMPORAL_PRESENT: &str = "Present";
/// Placeholder when a temporal begin is absent or unparseable
const TEMPORAL_EPOCH: &str = "0001-01-01";

/// Requested response language for detail queries.
///
/// Unlike relationship queries, detail queries require an explicit valid
/// language; there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Fr,
}

impl Language {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Language::En),
            "fr" => Some(Language::Fr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }
}

/// Parse an embedded-JSON column, degrading to `null`
fn json_or_null(raw: Option<&String>) -> Value {
    raw.and_then(|s| serde_json::from_str(s).ok()).unwrap_or(Value::Null)
}

/// A plain optional string column as a JSON value
fn text(raw: &Option<String>) -> Value {
    raw.as_deref().map(Value::from).unwrap_or(Value::Null)
}

/// Synthesize `{begin, end}` from the two temporal extent columns
fn temporal_extent(record: &CatalogRecord) -> Value {
    json!({
        "begin": record.temporal_begin.as_deref().unwrap_or(TEMPORAL_EPOCH),
        "end": record.temporal_end.as_deref().unwrap_or(TEMPORAL_PRESENT),
    })
}

/// Synthesize the locale object from its three columns; any missing part
/// collapses the whole locale to `null`
fn locale(record: &CatalogRecord) -> Value {
    match (&record.locale_language, &record.locale_country, &record.locale_encoding) {
        (Some(language), Some(country), Some(encoding)) => json!({
            "language": language,
            "country": country,
            "encoding": encoding,
        }),
        _ => Value::Null,
    }
}

/// Project one record into the full bilingual detail item
pub fn detail_item(record: &CatalogRecord, lang: Language) -> Value {
    let (description, keywords, use_limits) = match lang {
        Language::En => (&record.description_en, &record.keywords_en, &record.use_limits_en),
        Language::Fr => (&record.description_fr, &record.keywords_fr, &record.use_limits_fr),
    };

    json!({
        "id": record.id,
        "coordinates": record.coordinates.clone().unwrap_or(Value::Null),
        "title_en": record.title_en,
        "title_fr": record.title_fr,
        "description": text(description),
        "published": text(&record.published),
        "keywords": text(keywords),
        "topicCategory": text(&record.topic_category),
        "created": text(&record.created),
        "spatialRepresentation": text(&record.spatial_representation),
        "type": text(&record.record_type),
        "temporalExtent": temporal_extent(record),
        "refSys": text(&record.ref_sys),
        "refSys_version": text(&record.ref_sys_version),
        "status": text(&record.status),
        "maintenance": text(&record.maintenance),
        "metadataStandard": text(&record.metadata_standard),
        "metadataStandardVersion": text(&record.metadata_standard_version),
        "distributionFormat_name": text(&record.distribution_format_name),
        "distributionFormat_format": text(&record.distribution_format_format),
        "useLimits": text(use_limits),
        "accessConstraints": text(&record.access_constraints),
        "otherConstraints": text(&record.other_constraints),
        "dateStamp": text(&record.date_stamp),
        "dataSetURI": text(&record.data_set_uri),
        "locale": locale(record),
        "language": text(&record.language),
        "characterSet": text(&record.character_set),
        "environmentDescription": text(&record.environment_description),
        "supplementalInformation": text(&record.supplemental_information),
        "graphicOverview": json_or_null(record.graphic_overview.as_ref()),
        "contact": json_or_null(record.contact.as_ref()),
        "distributor": json_or_null(record.distributor.as_ref()),
        "credits": json_or_null(record.credits.as_ref()),
        "options": json_or_null(record.options.as_ref()),
        "plugins": json_or_null(record.plugins.as_ref()),
        "similarity": json_or_null(record.similarity.as_ref()),
        "sourceSystemName": text(&record.source_system_name),
        "eoCollection": text(&record.eo_collection),
        "eoFilters": json_or_null(record.eo_filters.as_ref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CatalogRecord {
        let mut record = CatalogRecord::new("abc", "Title EN", "Title FR");
        record.description_en = Some("English description".into());
        record.description_fr = Some("Description française".into());
        record.keywords_en = Some("maps; elevation".into());
        record.keywords_fr = Some("cartes; élévation".into());
        record.use_limits_en = Some("Open Government Licence".into());
        record.use_limits_fr = Some("Licence du gouvernement ouvert".into());
        record.contact = Some(r#"[{"organisation": {"en": "NRCan"}}]"#.into());
        record
    }

    #[test]
    fn test_bilingual_selection() {
        let record = record();

        let en = detail_item(&record, Language::En);
        assert_eq!(en["description"], "English description");
        assert_eq!(en["keywords"], "maps; elevation");
        assert_eq!(en["useLimits"], "Open Government Licence");

        let fr = detail_item(&record, Language::Fr);
        assert_eq!(fr["description"], "Description française");
        // Both titles always ship regardless of language
        assert_eq!(fr["title_en"], "Title EN");
        assert_eq!(fr["title_fr"], "Title FR");
    }

    #[test]
    fn test_embedded_json_parsed() {
        let item = detail_item(&record(), Language::En);
        assert_eq!(item["contact"][0]["organisation"]["en"], "NRCan");
    }

    #[test]
    fn test_malformed_contact_degrades_to_null() {
        let mut record = record();
        record.contact = Some("{ not valid json".into());

        let item = detail_item(&record, Language::En);
        assert_eq!(item["contact"], Value::Null);
        // The rest of the response is unaffected
        assert_eq!(item["id"], "abc");
    }

    #[test]
    fn test_temporal_extent_defaults() {
        let mut record = record();
        record.temporal_begin = None;
        record.temporal_end = None;
        let item = detail_item(&record, Language::En);
        assert_eq!(item["temporalExtent"]["begin"], TEMPORAL_EPOCH);
        assert_eq!(item["temporalExtent"]["end"], TEMPORAL_PRESENT);

        record.temporal_begin = Some("1972-07-23".into());
        record.temporal_end = Some("2011-10-05".into());
        let item = detail_item(&record, Language::En);
        assert_eq!(item["temporalExtent"]["begin"], "1972-07-23");
        assert_eq!(item["temporalExtent"]["end"], "2011-10-05");
    }

    #[test]
    fn test_partial_locale_collapses_to_null() {
        let mut record = record();
        record.locale_language = Some("eng".into());
        record.locale_country = Some("CAN".into());
        // encoding missing
        let item = detail_item(&record, Language::En);
        assert_eq!(item["locale"], Value::Null);

        record.locale_encoding = Some("utf8".into());
        let item = detail_item(&record, Language::En);
        assert_eq!(item["locale"]["country"], "CAN");
    }

    #[test]
    fn test_language_parse_is_strict() {
        assert_eq!(Language::parse("en"), Some(Language::En));
        assert_eq!(Language::parse("fr"), Some(Language::Fr));
        assert_eq!(Language::parse("EN"), None);
        assert_eq!(Language::parse("de"), None);
    }
}
