use std::sync::OnceLock;

use serde_json::{Map, Value};
use tracker_logging::tracker_debug;
use url::Url;

use crate::result::{
    AnalysisResult, ArticleInfo, ReferenceEntry, ReliabilityVerdict, SkippedReference, NO_SUMMARY,
    UNAVAILABLE,
};

/// Builds the display model from the service's result object.
///
/// Never fails: missing or mistyped fields fall back to [`UNAVAILABLE`], empty
/// lists or an empty verdict.
pub fn assemble(raw: &Value) -> AnalysisResult {
    let root = raw.as_object().unwrap_or_else(|| {
        tracker_debug!("result payload is not an object; assembling defaults");
        empty_map()
    });

    let article = object(root, "article");
    let references = object(root, "reference_processing");

    AnalysisResult {
        url: text_or_default(root, &["url"]),
        article: ArticleInfo {
            title: text_or_default(article, &["title", "headline"]),
            author: text_or_default(article, &["author"]),
            summary: text_or_default(article, &["summary"]),
            published_date: text_or_default(article, &["publishDate", "published_date"]),
        },
        claims: strings(article, "claims"),
        verdict: verdict(object(root, "cross_reference")),
        references: entries(references, "successful")
            .filter_map(reference_entry)
            .collect(),
        skipped: entries(references, "skipped")
            .filter_map(skipped_entry)
            .collect(),
        max_references_used: root.get("max_references_used").and_then(Value::as_u64),
    }
}

/// Host of `url` without a leading `www.` label.
pub fn source_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    (!host.is_empty()).then(|| host.to_string())
}

fn verdict(cross_reference: &Map<String, Value>) -> ReliabilityVerdict {
    let is_misleading = ["isMisleading", "is_misleading"]
        .iter()
        .find_map(|key| cross_reference.get(*key).and_then(Value::as_bool))
        .unwrap_or(false);
    let confidence = cross_reference
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(0.0, 1.0));

    ReliabilityVerdict {
        is_misleading,
        confidence,
        explanation: text(cross_reference, &["explanation"]),
        reasons: strings(cross_reference, "reasons"),
    }
}

fn reference_entry(value: &Value) -> Option<ReferenceEntry> {
    let owned;
    let entry = match value {
        Value::Object(map) => map,
        Value::String(url) => {
            owned = url_only(url);
            &owned
        }
        other => {
            tracker_debug!("ignoring reference entry of unexpected shape: {other}");
            return None;
        }
    };

    let url = text(entry, &["url"]);
    let source = text(entry, &["source"])
        .or_else(|| url.as_deref().and_then(source_domain))
        .unwrap_or_else(|| UNAVAILABLE.to_string());
    let analysis = object(entry, "analysis");
    let summary = text(entry, &["summary"])
        .or_else(|| text(analysis, &["summary"]))
        .or_else(|| text(entry, &["snippet"]))
        .unwrap_or_else(|| NO_SUMMARY.to_string());

    Some(ReferenceEntry {
        url: url.unwrap_or_else(|| UNAVAILABLE.to_string()),
        source,
        title: text_or_default(entry, &["title", "headline"]),
        author: text_or_default(entry, &["author"]),
        publish_date: text_or_default(entry, &["publishDate", "published_date"]),
        summary,
        claims: strings(analysis, "claims"),
    })
}

fn skipped_entry(value: &Value) -> Option<SkippedReference> {
    let owned;
    let entry = match value {
        Value::Object(map) => map,
        Value::String(url) => {
            owned = url_only(url);
            &owned
        }
        other => {
            tracker_debug!("ignoring skipped entry of unexpected shape: {other}");
            return None;
        }
    };
    Some(SkippedReference {
        url: text_or_default(entry, &["url"]),
        title: text_or_default(entry, &["title", "headline"]),
        reason: text_or_default(entry, &["reason"]),
    })
}

fn url_only(url: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("url".to_string(), Value::String(url.to_string()));
    map
}

fn empty_map() -> &'static Map<String, Value> {
    static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

fn object<'a>(map: &'a Map<String, Value>, key: &str) -> &'a Map<String, Value> {
    map.get(key)
        .and_then(Value::as_object)
        .unwrap_or_else(|| empty_map())
}

fn entries<'a>(map: &'a Map<String, Value>, key: &str) -> impl Iterator<Item = &'a Value> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

/// First non-blank string among `keys`.
fn text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        map.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
    })
}

fn text_or_default(map: &Map<String, Value>, keys: &[&str]) -> String {
    text(map, keys).unwrap_or_else(|| UNAVAILABLE.to_string())
}

fn strings(map: &Map<String, Value>, key: &str) -> Vec<String> {
    entries(map, key)
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::source_domain;

    #[test]
    fn strips_leading_www_only() {
        assert_eq!(
            source_domain("https://www.bbc.co.uk/news/1").as_deref(),
            Some("bbc.co.uk")
        );
        assert_eq!(
            source_domain("https://news.www.example.com/").as_deref(),
            Some("news.www.example.com")
        );
    }

    #[test]
    fn unparseable_url_has_no_domain() {
        assert_eq!(source_domain("not a url"), None);
    }
}
