//! Server-rendered HTML for the evaluator page.
//!
//! The page works without JavaScript: inputs post back to `/` and the page
//! refreshes itself while metadata loads or a prediction is running.

use crate::form::{FormController, Status};
use crate::risk_meter::RiskMeter;

/// Prefix of input names in the posted form, keeping feature names apart from
/// the `action` field.
pub const FIELD_PREFIX: &str = "f:";

/// Escapes text for use in HTML element content and quoted attributes.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the full page for the current controller state.
pub fn render_page(controller: &FormController, backend_host: &str) -> String {
    let refresh = match controller.status() {
        Status::Loading | Status::Predicting => r#"<meta http-equiv="refresh" content="1">"#,
        _ => "",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
{refresh}
<title>Course Load Evaluator</title>
</head>
<body>
<div class="page">
{header}
<main class="grid">
{inputs}
{result}
</main>
<footer class="footer">
  <span class="muted">Tip: Keep your backend running at <code>{host}</code> while using the UI.</span>
</footer>
</div>
</body>
</html>"#,
        refresh = refresh,
        header = render_header(controller, backend_host),
        inputs = render_inputs(controller),
        result = render_result(controller),
        host = html_escape(backend_host),
    )
}

fn render_header(controller: &FormController, backend_host: &str) -> String {
    let model = controller
        .meta()
        .map(|m| html_escape(&m.model_tag))
        .unwrap_or_else(|| "…".to_string());

    format!(
        r#"<header class="header">
  <div>
    <h1>Course Load Evaluator</h1>
    <p class="sub">Enter your course-load features to estimate risk of overload.</p>
  </div>
  <div class="metaCard">
    <div class="metaRow"><span class="metaLabel">Backend</span><span class="metaValue">{host}</span></div>
    <div class="metaRow"><span class="metaLabel">Model</span><span class="metaValue">{model}</span></div>
  </div>
</header>"#,
        host = html_escape(backend_host),
        model = model,
    )
}

fn disabled(flag: bool) -> &'static str {
    if flag {
        " disabled"
    } else {
        ""
    }
}

fn render_inputs(controller: &FormController) -> String {
    let status = controller.status();
    let mut body = String::new();

    if status == Status::Loading {
        body.push_str("<p>Loading model metadata…</p>\n");
    }

    if controller.form_visible() {
        let fields: String = controller
            .form()
            .fields()
            .iter()
            .map(|field| {
                format!(
                    r#"    <label class="field">
      <div class="fieldLabel">{label}</div>
      <input class="input" name="{prefix}{name}" value="{value}" placeholder="Enter a value">
    </label>
"#,
                    label = html_escape(&field.name),
                    prefix = FIELD_PREFIX,
                    name = html_escape(&field.name),
                    value = html_escape(&field.value),
                )
            })
            .collect();

        let error = if controller.error_message().is_empty() {
            String::new()
        } else {
            format!(
                "  <div class=\"error\">{}</div>\n",
                html_escape(controller.error_message())
            )
        };

        let predicting = status == Status::Predicting;
        let submit_label = if predicting {
            "Evaluating…"
        } else {
            "Evaluate risk"
        };
        let cancel = if predicting {
            "  <button class=\"btn btnGhost\" type=\"submit\" name=\"action\" value=\"cancel\">Cancel</button>\n"
        } else {
            ""
        };

        body.push_str(&format!(
            r#"<form class="form" method="post" action="/">
  <div class="formGrid">
{fields}  </div>
{error}  <button class="btn btnPrimary" type="submit" name="action" value="submit"{submit_disabled}>{submit_label}</button>
{cancel}</form>
"#,
            fields = fields,
            error = error,
            submit_disabled = disabled(predicting),
            submit_label = submit_label,
            cancel = cancel,
        ));
    } else if status == Status::Error && !controller.error_message().is_empty() {
        // Metadata failed: no form, only the message.
        body.push_str(&format!(
            "<div class=\"error\">{}</div>\n",
            html_escape(controller.error_message())
        ));
    }

    format!(
        r#"<section class="card">
  <div class="cardHeader">
    <h2>Inputs</h2>
    <form class="btnRow" method="post" action="/">
      <button class="btn btnGhost" type="submit" name="action" value="example"{example_disabled}>Fill example</button>
    </form>
  </div>
{body}</section>"#,
        example_disabled = disabled(!controller.can_fill_example()),
        body = body,
    )
}

fn render_result(controller: &FormController) -> String {
    let body = match controller.result() {
        None => "  <p class=\"muted\">Run an evaluation to see a risk score and risk category.</p>\n"
            .to_string(),
        Some(result) => {
            let meter = RiskMeter::new(result.risk_score.unwrap_or(f64::NAN), &result.risk_level);
            let raw = serde_json::to_string_pretty(&result.raw).unwrap_or_default();
            format!(
                r#"{meter}
  <div class="resultBox">
    <div class="resultRow"><span class="muted">Risk score</span><span class="strong">{score}</span></div>
    <div class="resultRow"><span class="muted">Risk level</span><span class="strong">{level}</span></div>
  </div>
  <details class="details">
    <summary>Raw response</summary>
    <pre>{raw}</pre>
  </details>
"#,
                meter = meter.render_html(),
                score = result.score_text(),
                level = html_escape(&meter.badge()),
                raw = html_escape(&raw),
            )
        }
    };

    format!(
        r#"<section class="card">
  <h2>Result</h2>
{body}</section>"#,
        body = body
    )
}
