pub mod html;

use crate::db::models::IndexRow;
use crate::db::Database;
use html::Element;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where the external file server is expected to listen.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

const TITLE: &str = "midi data";

// Everything except unreserved characters, including `/`
const LINK_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Database error: {0}")]
    Db(#[from] crate::db::DbError),
    #[error("Failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub struct ReportSummary {
    pub groupings: usize,
    pub files_listed: usize,
}

/// Link target for a file: the base URL plus the fully percent-encoded path.
pub fn file_link(base_url: &str, name: &str) -> String {
    format!("{}{}", base_url, utf8_percent_encode(name, LINK_ENCODE_SET))
}

/// Navigation text for a grouping label.
pub fn display_label(label: &str) -> String {
    label.replace('_', " ")
}

/// Build the full HTML document from the index.
pub fn render_report(db: &Database, base_url: &str) -> Result<(String, ReportSummary), ReportError> {
    let groupings = db.distinct_groupings()?;
    log::debug!("Groupings: {}", groupings.join(", "));
    let rows = db.rows_ordered_by_grouping()?;

    let mut nav_ul = Element::new("ul");
    let mut sections: Vec<(String, Element)> = Vec::with_capacity(groupings.len());
    let mut section_index: HashMap<String, usize> = HashMap::new();

    for label in &groupings {
        let mut a = Element::new("a");
        a.set_attributes([("href", format!("#{label}"))])
            .add_text(display_label(label));
        let mut li = Element::new("li");
        li.append_child(a);
        nav_ul.append_child(li);

        section_index.insert(label.clone(), sections.len());
        sections.push((label.clone(), Element::new("ul")));
    }

    let mut files_listed = 0;
    for row in &rows {
        let Some(idx) = row.keys.as_ref().and_then(|k| section_index.get(k)) else {
            log::debug!("Not listed (no grouping): {}", row.name);
            continue;
        };
        sections[*idx].1.append_child(file_item(row, base_url));
        files_listed += 1;
    }

    let mut article = Element::new("article");
    for (label, ul) in sections {
        let mut h3 = Element::new("h3");
        h3.set_attributes([("id", label.as_str())]).add_text(label.as_str());
        article.append_child(h3).append_child(ul);
    }

    let mut nav = Element::new("nav");
    nav.append_child(nav_ul);

    let mut meta = Element::new("meta");
    meta.set_attributes([("charset", "utf-8")]);
    let mut title = Element::new("title");
    title.add_text(TITLE);
    let mut head = Element::new("head");
    head.append_child(meta).append_child(title);

    let mut body = Element::new("body");
    body.append_child(nav).append_child(article);

    let mut root = Element::new("html");
    root.append_child(head).append_child(body);

    let document = format!("<!DOCTYPE html>\n{}\n", root.render());
    Ok((
        document,
        ReportSummary {
            groupings: groupings.len(),
            files_listed,
        },
    ))
}

/// One list entry: a heading link to the file, then either the error text
/// or the grouping label, noteset and note count.
fn file_item(row: &IndexRow, base_url: &str) -> Element {
    let mut a = Element::new("a");
    a.set_attributes([("href", file_link(base_url, &row.name))])
        .add_text(row.name.as_str());
    let mut h3 = Element::new("h3");
    h3.append_child(a);

    let mut li = Element::new("li");
    li.append_child(h3);

    if let Some(errors) = row.errors.as_deref() {
        let mut p = Element::new("p");
        p.add_text(errors);
        li.append_child(p);
        return li;
    }

    let lines = [
        row.keys.clone().unwrap_or_default(),
        row.noteset.clone().unwrap_or_default(),
        row.notecount.map(|n| n.to_string()).unwrap_or_default(),
    ];
    for line in lines {
        let mut p = Element::new("p");
        p.add_text(line);
        li.append_child(p);
    }
    li
}

/// Render the report and write it to `output`, replacing any existing file.
pub fn write_report(db: &Database, output: &Path, base_url: &str) -> Result<ReportSummary, ReportError> {
    let (document, summary) = render_report(db, base_url)?;
    std::fs::write(output, document).map_err(|source| ReportError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    log::info!(
        "Wrote {} ({} groupings, {} files)",
        output.display(),
        summary.groupings,
        summary.files_listed
    );
    Ok(summary)
}
