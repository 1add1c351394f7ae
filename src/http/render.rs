// src/http/render.rs

//! Minimal HTML pages around the captured text. Tool output is shown
//! verbatim (escaped) in `<pre>` blocks; nothing is parsed.

use std::fmt::Write;

use crate::exec::Capture;
use crate::pipeline::TriggerOutcome;

const TITLE: &str = "sitehook";

/// GET page: history and the trigger form.
pub fn history_page(history: &Capture) -> String {
    let mut body = String::new();
    push_history(&mut body, history);
    page(TITLE, &body)
}

/// POST page: history, then the fetch+update report and step statuses.
pub fn trigger_page(outcome: &TriggerOutcome) -> String {
    let mut body = String::new();
    push_history(&mut body, &outcome.history);

    body.push_str("<h2>Pull log</h2>\n<pre id=\"report\">");
    body.push_str(&escape_html(outcome.report.text()));
    body.push_str("</pre>\n<ul id=\"steps\">\n");
    for step in outcome.report.steps() {
        let _ = writeln!(body, "<li>{}: {}</li>", step.op, step.status);
    }
    body.push_str("</ul>\n");

    match outcome.build.files_written {
        Some(n) => {
            let _ = writeln!(body, "<p id=\"build\">Site rebuilt ({n} files).</p>");
        }
        None => body.push_str("<p id=\"build\">Site rebuilt.</p>\n"),
    }

    page(TITLE, &body)
}

pub fn error_page(heading: &str, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<pre id=\"error\">{}</pre>\n",
        escape_html(heading),
        escape_html(message)
    );
    page(TITLE, &body)
}

fn push_history(body: &mut String, history: &Capture) {
    body.push_str("<h1>Repository history</h1>\n<pre id=\"history\">");
    body.push_str(&escape_html(&history.text));
    body.push_str("</pre>\n");
    body.push_str(
        "<form method=\"post\"><button type=\"submit\">Pull, update and rebuild</button></form>\n",
    );
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
