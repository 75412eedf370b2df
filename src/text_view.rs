//! Plain-text rendering of the evaluator page for the terminal shell.

use crate::form::{FormController, Status};
use crate::risk_meter::RiskMeter;

pub fn render_header(controller: &FormController, backend_host: &str) -> String {
    let model = controller
        .meta()
        .map(|m| m.model_tag.as_str())
        .unwrap_or("…");
    format!(
        "Course Load Evaluator\nEnter your course-load features to estimate risk of overload.\n\n  Backend  {}\n  Model    {}\n",
        backend_host, model
    )
}

/// Inputs section: one line per feature, the error message, and the submit state.
pub fn render_inputs(controller: &FormController) -> String {
    let mut out = String::from("Inputs\n");

    if controller.status() == Status::Loading {
        out.push_str("  Loading model metadata…\n");
        return out;
    }

    if controller.form_visible() {
        let fields = controller.form().fields();
        let width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
        if fields.is_empty() {
            out.push_str("  (the model expects no features)\n");
        }
        for field in fields {
            let value = if field.value.is_empty() {
                "<empty>"
            } else {
                field.value.as_str()
            };
            out.push_str(&format!("  {:<width$}  {}\n", field.name, value, width = width));
        }
    }

    if !controller.error_message().is_empty() {
        out.push_str(&format!("  ! {}\n", controller.error_message()));
    }

    if controller.status() == Status::Predicting {
        out.push_str("  Evaluating…\n");
    }

    out
}

/// Result section: placeholder, or meter plus score and level.
pub fn render_result(controller: &FormController) -> String {
    let mut out = String::from("Result\n");
    match controller.result() {
        None => out.push_str("  Run an evaluation to see a risk score and risk category.\n"),
        Some(result) => {
            let meter = RiskMeter::new(result.risk_score.unwrap_or(f64::NAN), &result.risk_level);
            for line in meter.render_text().lines() {
                out.push_str(&format!("  {}\n", line));
            }
            out.push_str(&format!("  Risk score  {}\n", result.score_text()));
            out.push_str(&format!("  Risk level  {}\n", meter.badge()));
        }
    }
    out
}

/// Raw JSON of the latest result as the backend sent it, if any.
pub fn render_raw(controller: &FormController) -> Option<String> {
    controller
        .result()
        .and_then(|r| serde_json::to_string_pretty(&r.raw).ok())
}

pub fn render_page(controller: &FormController, backend_host: &str) -> String {
    format!(
        "{}\n{}\n{}",
        render_header(controller, backend_host),
        render_inputs(controller),
        render_result(controller)
    )
}
