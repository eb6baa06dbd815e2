//! Analyst verdict
//!
//! The remote analyst answers in Portuguese:
//! `{veredito, confianca, resumo, pontos_positivos, riscos}`. The model behind it
//! is not always well behaved, so every field is read leniently.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Label used when the analyst returns none
pub const DEFAULT_VERDICT_LABEL: &str = "NEUTRO";

/// Confidence assumed when the analyst returns none
pub const DEFAULT_CONFIDENCE: i64 = 5;

pub const MIN_CONFIDENCE: i64 = 1;
pub const MAX_CONFIDENCE: i64 = 10;

/// Structured verdict returned by `POST /api/analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default = "default_label", deserialize_with = "lenient_label")]
    pub veredito: String,

    /// Raw confidence as sent; clamp with [`clamp_confidence`] before display
    #[serde(default = "default_confidence", deserialize_with = "lenient_confidence")]
    pub confianca: i64,

    #[serde(default, deserialize_with = "lenient_text")]
    pub resumo: String,

    #[serde(default, deserialize_with = "lenient_list")]
    pub pontos_positivos: Vec<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub riscos: Vec<String>,
}

fn default_label() -> String {
    DEFAULT_VERDICT_LABEL.to_string()
}

fn default_confidence() -> i64 {
    DEFAULT_CONFIDENCE
}

fn lenient_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => s,
        _ => default_label(),
    })
}

fn lenient_confidence<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or(DEFAULT_CONFIDENCE))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Presentation category of a verdict label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictClass {
    Buy,
    Avoid,
    Neutral,
}

impl VerdictClass {
    /// Classify a free-form label. Case-insensitive; "COMPRA" wins over "EVITAR".
    pub fn classify(label: &str) -> Self {
        let label = label.to_uppercase();
        if label.contains("COMPRA") {
            VerdictClass::Buy
        } else if label.contains("EVITAR") {
            VerdictClass::Avoid
        } else {
            VerdictClass::Neutral
        }
    }

    /// CSS modifier used by the result card
    pub fn css_class(&self) -> &'static str {
        match self {
            VerdictClass::Buy => "compra",
            VerdictClass::Avoid => "evitar",
            VerdictClass::Neutral => "neutro",
        }
    }
}

/// Clamp a raw confidence into 1..=10
pub fn clamp_confidence(raw: i64) -> u8 {
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify() {
        assert_eq!(VerdictClass::classify("FORTE COMPRA"), VerdictClass::Buy);
        assert_eq!(VerdictClass::classify("compra moderada"), VerdictClass::Buy);
        assert_eq!(VerdictClass::classify("Evitar"), VerdictClass::Avoid);
        assert_eq!(VerdictClass::classify("NEUTRO"), VerdictClass::Neutral);
        assert_eq!(VerdictClass::classify(""), VerdictClass::Neutral);
        assert_eq!(VerdictClass::classify("COMPRA? talvez EVITAR"), VerdictClass::Buy);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for label in ["COMPRA", "evitar agora", "hold", "ÁGUA"] {
            let class = VerdictClass::classify(label);
            assert_eq!(class, VerdictClass::classify(&label.to_lowercase()));
            assert_eq!(class, VerdictClass::classify(&label.to_uppercase()));
        }
    }

    #[test]
    fn test_clamp_confidence() {
        assert_eq!(clamp_confidence(-3), 1);
        assert_eq!(clamp_confidence(0), 1);
        assert_eq!(clamp_confidence(7), 7);
        assert_eq!(clamp_confidence(11), 10);
        assert_eq!(clamp_confidence(i64::MAX), 10);
    }

    #[test]
    fn test_lenient_verdict() {
        let verdict: Verdict = serde_json::from_value(json!({
            "veredito": null,
            "confianca": "8",
            "resumo": null,
            "pontos_positivos": ["liquidez ok", 3, null],
            "riscos": "nenhum"
        }))
        .unwrap();

        assert_eq!(verdict.veredito, "NEUTRO");
        assert_eq!(verdict.confianca, 8);
        assert_eq!(verdict.resumo, "");
        assert_eq!(verdict.pontos_positivos, vec!["liquidez ok", "3"]);
        assert!(verdict.riscos.is_empty());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let verdict: Verdict = serde_json::from_value(json!({})).unwrap();
        assert_eq!(verdict.veredito, "NEUTRO");
        assert_eq!(verdict.confianca, 5);

        let fractional: Verdict = serde_json::from_value(json!({"confianca": 7.9})).unwrap();
        assert_eq!(fractional.confianca, 7);

        let garbage: Verdict = serde_json::from_value(json!({"confianca": "alta"})).unwrap();
        assert_eq!(garbage.confianca, 5);
    }
}
