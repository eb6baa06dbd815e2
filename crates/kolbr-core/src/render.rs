//! Result rendering
//!
//! Maps the outcome of an analysis into what the user sees. Pure: no I/O.

use std::fmt;

use serde::Serialize;

use crate::verdict::{clamp_confidence, Verdict, VerdictClass};

/// Placeholder shown in place of an empty bullet list
pub const EMPTY_LIST_PLACEHOLDER: &str = "—";

/// Line-break convention of the rendered card
pub const LINE_BREAK: &str = "<br>";

const UNAVAILABLE_MESSAGE: &str = "Análise indisponível.";
const LOADING_MESSAGE: &str = "KOLBR Analyst analisando...";

/// State emitted by the presentation pipeline, always `Loading` then `Done`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "presentation", rename_all = "snake_case")]
pub enum AnalysisState {
    Loading,
    Done(Presentation),
}

/// Terminal presentation of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Presentation {
    /// Something failed along the way; `message` is already labeled
    Error { message: String },
    /// The analyst answered with nothing
    Unavailable,
    Verdict(PresentationModel),
}

/// Display-ready view of a [`Verdict`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationModel {
    /// Upper-cased verdict label
    pub label: String,
    pub class: VerdictClass,
    /// Clamped into 1..=10
    pub confidence: u8,
    pub confidence_pct: u8,
    /// Always `100 - confidence_pct`
    pub risk_pct: u8,
    /// Escaped, with line breaks converted to [`LINE_BREAK`]
    pub summary: String,
    /// Raw bullet text; escaped only when joined for display
    pub positives: Vec<String>,
    pub risks: Vec<String>,
}

impl PresentationModel {
    pub fn from_verdict(verdict: &Verdict) -> Self {
        let label = verdict.veredito.to_uppercase();
        let confidence = clamp_confidence(verdict.confianca);
        let confidence_pct = confidence * 10;

        Self {
            class: VerdictClass::classify(&label),
            label,
            confidence,
            confidence_pct,
            risk_pct: 100 - confidence_pct,
            summary: sanitize_summary(&verdict.resumo),
            positives: verdict.pontos_positivos.clone(),
            risks: verdict.riscos.clone(),
        }
    }

    pub fn positives_text(&self) -> String {
        bullet_text(&self.positives)
    }

    pub fn risks_text(&self) -> String {
        bullet_text(&self.risks)
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="result-card">
    <div class="veredito veredito--{class}">{label}</div>
    <div class="confianca-bar"><div class="confianca-fill" style="width:{conf_pct}%"></div></div>
    <div class="confianca-label">Confiança: {conf}/10</div>
    <div class="risk-bar-wrap">
        <span class="risk-label">Risco</span>
        <div class="risk-bar"><div class="risk-fill" style="width:{risk_pct}%"></div></div>
    </div>
    <div class="resumo">{summary}</div>
    <div class="section"><strong>Pontos positivos</strong><br>{positives}</div>
    <div class="section"><strong>Riscos</strong><br>{risks}</div>
</div>"#,
            class = self.class.css_class(),
            label = escape_html(&self.label),
            conf_pct = self.confidence_pct,
            conf = self.confidence,
            risk_pct = self.risk_pct,
            summary = self.summary,
            positives = self.positives_text(),
            risks = self.risks_text(),
        )
    }
}

impl Presentation {
    pub fn to_html(&self) -> String {
        match self {
            Presentation::Error { message } => {
                format!(r#"<div class="error-msg">{}</div>"#, escape_html(message))
            }
            Presentation::Unavailable => {
                format!(r#"<div class="error-msg">{}</div>"#, UNAVAILABLE_MESSAGE)
            }
            Presentation::Verdict(model) => model.to_html(),
        }
    }
}

impl AnalysisState {
    pub fn to_html(&self) -> String {
        match self {
            AnalysisState::Loading => format!(
                r#"<div class="result-card shimmer-loading"><p class="shimmer-msg">{}</p></div>"#,
                LOADING_MESSAGE
            ),
            AnalysisState::Done(presentation) => presentation.to_html(),
        }
    }
}

/// Render the outcome of an analysis.
///
/// `Ok(None)` means the analyst answered but had no verdict.
pub fn render<E: fmt::Display>(outcome: Result<Option<Verdict>, E>) -> Presentation {
    match outcome {
        Err(e) => Presentation::Error {
            message: e.to_string(),
        },
        Ok(None) => Presentation::Unavailable,
        Ok(Some(verdict)) => Presentation::Verdict(PresentationModel::from_verdict(&verdict)),
    }
}

fn bullet_text(items: &[String]) -> String {
    if items.is_empty() {
        return EMPTY_LIST_PLACEHOLDER.to_string();
    }
    items
        .iter()
        .map(|item| format!("• {}", escape_html(item)))
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

fn sanitize_summary(summary: &str) -> String {
    escape_html(summary)
        .replace("\r\n", "\n")
        .replace('\n', LINE_BREAK)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KolbrError;

    fn verdict(label: &str, confidence: i64) -> Verdict {
        Verdict {
            veredito: label.to_string(),
            confianca: confidence,
            resumo: String::new(),
            pontos_positivos: vec![],
            riscos: vec![],
        }
    }

    fn model(presentation: Presentation) -> PresentationModel {
        match presentation {
            Presentation::Verdict(model) => model,
            other => panic!("expected a verdict, got {:?}", other),
        }
    }

    #[test]
    fn test_strong_buy() {
        let model = model(render::<KolbrError>(Ok(Some(verdict("FORTE COMPRA", 8)))));

        assert_eq!(model.class, VerdictClass::Buy);
        assert_eq!(model.confidence_pct, 80);
        assert_eq!(model.risk_pct, 20);
        assert_eq!(model.label, "FORTE COMPRA");
    }

    #[test]
    fn test_confidence_is_clamped() {
        let low = model(render::<KolbrError>(Ok(Some(verdict("evitar", 0)))));
        assert_eq!(low.confidence, 1);
        assert_eq!(low.confidence_pct, 10);
        assert_eq!(low.label, "EVITAR");
        assert_eq!(low.class, VerdictClass::Avoid);

        let high = model(render::<KolbrError>(Ok(Some(verdict("NEUTRO", 42)))));
        assert_eq!(high.confidence, 10);
        assert_eq!(high.confidence_pct, 100);
        assert_eq!(high.risk_pct, 0);
    }

    #[test]
    fn test_risk_and_confidence_sum_to_100() {
        for raw in -5..=20 {
            let model = model(render::<KolbrError>(Ok(Some(verdict("x", raw)))));
            assert_eq!(model.confidence_pct as u16 + model.risk_pct as u16, 100);
        }
    }

    #[test]
    fn test_bullets_and_placeholder() {
        let mut v = verdict("COMPRA", 6);
        v.pontos_positivos = vec!["Liquidez alta".into(), "KOL top 3".into()];
        let model = model(render::<KolbrError>(Ok(Some(v))));

        assert_eq!(model.positives_text(), "• Liquidez alta<br>• KOL top 3");
        assert_eq!(model.risks_text(), "—");
    }

    #[test]
    fn test_bullets_escaped_only_for_display() {
        let mut v = verdict("COMPRA", 6);
        v.pontos_positivos = vec!["<b>LP</b> & MC".into()];
        v.riscos = vec!["dev \"anon\"".into()];
        let model = model(render::<KolbrError>(Ok(Some(v))));

        assert_eq!(model.positives, vec!["<b>LP</b> & MC".to_string()]);
        assert_eq!(model.positives_text(), "• &lt;b&gt;LP&lt;/b&gt; &amp; MC");
        assert_eq!(model.risks_text(), "• dev &quot;anon&quot;");

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["positives"][0], "<b>LP</b> & MC");

        let html = model.to_html();
        assert!(html.contains("&lt;b&gt;LP&lt;/b&gt;"));
        assert!(!html.contains("<b>LP</b>"));
    }

    #[test]
    fn test_summary_line_breaks_and_escaping() {
        let mut v = verdict("NEUTRO", 5);
        v.resumo = "linha 1\nlinha 2\r\n<b>MC</b> & LP".into();
        let model = model(render::<KolbrError>(Ok(Some(v))));

        assert_eq!(
            model.summary,
            "linha 1<br>linha 2<br>&lt;b&gt;MC&lt;/b&gt; &amp; LP"
        );
    }

    #[test]
    fn test_error_and_unavailable() {
        let err = render(Err(KolbrError::Remote { status: 503 }));
        assert_eq!(
            err,
            Presentation::Error {
                message: "Remote error: API returned 503".into()
            }
        );
        assert!(err.to_html().contains("API returned 503"));

        let none = render::<KolbrError>(Ok(None));
        assert_eq!(none, Presentation::Unavailable);
        assert!(none.to_html().contains("Análise indisponível."));
    }

    #[test]
    fn test_card_html() {
        let html = render::<KolbrError>(Ok(Some(verdict("forte compra", 8)))).to_html();
        assert!(html.contains("veredito--compra"));
        assert!(html.contains("width:80%"));
        assert!(html.contains("width:20%"));
        assert!(html.contains("Confiança: 8/10"));
    }

    #[test]
    fn test_state_serialization() {
        let loading = serde_json::to_value(AnalysisState::Loading).unwrap();
        assert_eq!(loading["state"], "loading");

        let done = serde_json::to_value(AnalysisState::Done(Presentation::Unavailable)).unwrap();
        assert_eq!(done["state"], "done");
        assert_eq!(done["presentation"]["kind"], "unavailable");
    }
}
