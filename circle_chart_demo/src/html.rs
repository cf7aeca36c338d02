// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single-page report: one row of SVG frames per scripted step.

/// One scripted step and the frames it produced.
#[derive(Debug)]
pub(crate) struct Section {
    title: String,
    frames: Vec<String>,
}

impl Section {
    pub(crate) fn new(title: impl Into<String>, frames: Vec<String>) -> Self {
        Self {
            title: title.into(),
            frames,
        }
    }
}

pub(crate) fn render_report(title: &str, sections: &[Section]) -> String {
    let title = escape_xml(title);
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{title}</title>\n"));
    out.push_str(
        "<style>\n\
         body { font-family: sans-serif; background: #202020; color: #eeeeee; }\n\
         .frames { display: flex; flex-wrap: wrap; gap: 8px; }\n\
         .frames svg { width: 150px; height: 150px; }\n\
         </style>\n",
    );
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h1>{title}</h1>\n"));

    for section in sections {
        out.push_str(&format!(
            "<h2>{} <small>({} frames)</small></h2>\n",
            escape_xml(&section.title),
            section.frames.len()
        ));
        out.push_str("<div class=\"frames\">\n");
        for frame in &section.frames {
            out.push_str(frame);
        }
        out.push_str("</div>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
