//! HTML rendering for the dashboard page.
//!
//! The page is small enough to assemble with `format!`; every piece of
//! dynamic text goes through [`escape_html`].

use std::fmt::Write;

use crate::query::RenderModel;

/// plotly.js bundle used to draw charts.
const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 72rem; color: #222; }
h1 { font-size: 1.6rem; }
form { margin-bottom: 1.5rem; }
select, button { font-size: 1rem; padding: 0.3rem 0.6rem; }
pre { background: #f5f5f5; padding: 1rem; overflow-x: auto; }
table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
th, td { border: 1px solid #ddd; padding: 0.35rem 0.6rem; text-align: left; }
th { background: #fafafa; }
.error { color: #a40000; background: #fdecea; padding: 0.8rem 1rem; border-radius: 4px; }
.timing { color: #555; }
"#;

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Makes JSON safe to inline in a `<script>` element.
fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}

/// Renders the full dashboard page.
///
/// `model` is `None` on the landing page.
pub fn render_page(query_names: &[&str], model: Option<&RenderModel>) -> String {
    let selected = model.and_then(|m| m.query_name.as_deref());

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n<title>NYC Taxi Analytics</title>\n");
    let _ = writeln!(html, "<style>{STYLE}</style>");
    let _ = writeln!(html, "<script src=\"{PLOTLY_JS}\"></script>");
    html.push_str("</head>\n<body>\n<h1>NYC Taxi Analytics</h1>\n");

    render_form(&mut html, query_names, selected);
    if let Some(model) = model {
        render_model(&mut html, model);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, query_names: &[&str], selected: Option<&str>) {
    html.push_str("<form method=\"post\" action=\"/query\">\n");
    html.push_str("<label for=\"query\">Analysis:</label>\n");
    html.push_str("<select name=\"query\" id=\"query\">\n");
    for name in query_names {
        let escaped = escape_html(name);
        let marker = if selected == Some(*name) { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{escaped}\"{marker}>{escaped}</option>");
    }
    html.push_str("</select>\n<button type=\"submit\">Run</button>\n</form>\n");
}

fn render_model(html: &mut String, model: &RenderModel) {
    if let Some(name) = &model.query_name {
        let _ = writeln!(html, "<h2>{}</h2>", escape_html(name));
    }
    if let Some(explanation) = &model.explanation {
        let _ = writeln!(html, "<p class=\"explanation\">{}</p>", escape_html(explanation));
    }
    if let Some(sql) = &model.sql {
        let _ = writeln!(html, "<pre class=\"sql\">{}</pre>", escape_html(sql.trim()));
    }

    if let Some(error) = &model.error {
        let _ = writeln!(html, "<div class=\"error\">{}</div>", escape_html(error));
        return;
    }

    if let Some(seconds) = model.elapsed_seconds {
        let _ = writeln!(
            html,
            "<p class=\"timing\">Execution time: {seconds:.2} seconds</p>"
        );
    }

    if let Some(chart) = &model.chart {
        let figure = escape_script_json(&chart.to_plotly().to_string());
        html.push_str("<div id=\"chart\"></div>\n");
        let _ = writeln!(
            html,
            "<script>const figure = {figure};\nPlotly.newPlot('chart', figure.data, figure.layout);</script>"
        );
    }

    render_table(html, model);
}

fn render_table(html: &mut String, model: &RenderModel) {
    html.push_str("<table>\n<thead><tr>");
    for column in &model.column_names {
        let _ = write!(html, "<th>{}</th>", escape_html(column));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &model.rows {
        html.push_str("<tr>");
        for value in row {
            let _ = write!(html, "<td>{}</td>", escape_html(&value.to_display_string()));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}
