//! Forgiving field decoders for server columns that may be null or loosely typed.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode `null` as `T::default()`. Pair with `#[serde(default)]` to also cover absent keys.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A 0–100 score sent as an integer, a float, a numeric string, or null.
pub(crate) fn percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    let number = match raw {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(number.clamp(0.0, 100.0).round() as u8)
}

/// A list of display strings. Objects and other scalars are kept as their JSON text;
/// a lone string becomes a one-item list.
pub(crate) fn text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|v| !v.is_null())
            .map(stringify)
            .collect(),
        Some(other) => vec![stringify(other)],
    })
}

pub(crate) fn stringify(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "percent")]
        score: u8,
        #[serde(default, deserialize_with = "text_list")]
        notes: Vec<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<Value>,
    }

    fn decode(json: &str) -> Row {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn percent_accepts_loose_numbers() {
        assert_eq!(decode(r#"{"score": 80}"#).score, 80);
        assert_eq!(decode(r#"{"score": 72.6}"#).score, 73);
        assert_eq!(decode(r#"{"score": "55"}"#).score, 55);
        assert_eq!(decode(r#"{"score": 250}"#).score, 100);
        assert_eq!(decode(r#"{"score": -3}"#).score, 0);
        assert_eq!(decode(r#"{"score": null}"#).score, 0);
        assert_eq!(decode("{}").score, 0);
    }

    #[test]
    fn text_list_keeps_objects_as_json_text() {
        let p = decode(r#"{"notes": ["plain", {"campo": "x", "texto": "y"}, null, 3]}"#);
        assert_eq!(
            p.notes,
            vec![
                "plain".to_string(),
                r#"{"campo":"x","texto":"y"}"#.to_string(),
                "3".to_string()
            ]
        );
        assert_eq!(decode(r#"{"notes": "só uma"}"#).notes, vec!["só uma".to_string()]);
        assert!(decode(r#"{"notes": null}"#).notes.is_empty());
    }

    #[test]
    fn null_decodes_as_default() {
        assert!(decode(r#"{"tags": null}"#).tags.is_empty());
        assert_eq!(decode(r#"{"tags": [1]}"#).tags.len(), 1);
    }
}
