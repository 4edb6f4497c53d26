//! Rendering and writing of the two report artifacts.
//!
//! The structured report is the lossless JSON form of every file result.
//! The HTML report is a single table with one row per category label,
//! listing each distinct value once, plus a link to the JSON file so a
//! reader can trace values back to files.
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::aggregate::{aggregate, CategoryMatchSet};
use crate::errors::{ScanError, ScanResult};
use crate::results::ScanOutput;

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Search Results</title>
    <style>
        table {
            width: 100%;
            border-collapse: collapse;
        }
        table, th, td {
            border: 1px solid black;
        }
        th, td {
            padding: 15px;
            text-align: left;
            vertical-align: top;
        }
        th {
            background-color: #f2f2f2;
        }
    </style>
</head>
<body>
    <h1>Search Results</h1>
"#;

const HTML_TAIL: &str = "    </table>
</body>
</html>
";

/// Both renderings of one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub json: Vec<u8>,
    pub html: Vec<u8>,
}

/// Where the reports were written and how large they are
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub json_path: PathBuf,
    pub json_size: u64,
    pub html_path: PathBuf,
    pub html_size: u64,
}

/// Renders the structured and tabular reports.
///
/// `json_link` is the href the HTML report uses to point at the structured
/// report. Neither input is modified.
pub fn render(
    output: &ScanOutput,
    aggregated: &CategoryMatchSet,
    json_link: &str,
) -> ScanResult<RenderedReport> {
    Ok(RenderedReport {
        json: output.to_json()?,
        html: render_html(aggregated, json_link).into_bytes(),
    })
}

/// Renders the category table
pub fn render_html(aggregated: &CategoryMatchSet, json_link: &str) -> String {
    let mut html = String::from(HTML_HEAD);

    // Writing to a String cannot fail
    let _ = writeln!(
        html,
        "    <p>For detailed results, see the <a href=\"{}\">JSON file</a>.</p>",
        escape_html(json_link)
    );
    html.push_str("    <table>\n");
    html.push_str("        <tr>\n            <th>Pattern Category</th>\n            <th>Matches</th>\n        </tr>\n");

    for (label, matches) in aggregated {
        let cell = matches
            .iter()
            .map(|m| escape_html(m))
            .collect::<Vec<_>>()
            .join("<br>");
        let _ = writeln!(
            html,
            "        <tr>\n            <td>{}</td>\n            <td>{}</td>\n        </tr>",
            escape_html(label),
            cell
        );
    }

    html.push_str(HTML_TAIL);
    html
}

/// Renders both reports for `output` and writes them next to each other as
/// `<prefix>.json` and `<prefix>.html`.
pub fn write_reports(output: &ScanOutput, prefix: &str) -> ScanResult<ReportFiles> {
    let json_path = PathBuf::from(format!("{}.json", prefix));
    let html_path = PathBuf::from(format!("{}.html", prefix));

    // Both files share a directory, so the link is just the file name
    let json_link = json_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ScanError::config_error(format!("invalid output prefix: {:?}", prefix)))?;

    if let Some(parent) = json_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let aggregated = aggregate(&output.file_results);
    let report = render(output, &aggregated, &json_link)?;

    fs::write(&json_path, &report.json)?;
    fs::write(&html_path, &report.html)?;

    let files = ReportFiles {
        json_size: file_size(&json_path)?,
        html_size: file_size(&html_path)?,
        json_path,
        html_path,
    };
    info!(
        "Wrote {} ({} bytes) and {} ({} bytes)",
        files.json_path.display(),
        files.json_size,
        files.html_path.display(),
        files.html_size
    );
    Ok(files)
}

fn file_size(path: &Path) -> ScanResult<u64> {
    Ok(fs::metadata(path)?.len())
}

/// Escapes text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
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
