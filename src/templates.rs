//! Server-rendered HTML for the scraper form.
//!
//! One page does everything: source picker, source-specific inputs, notices,
//! the result table and the CSV download button.

use crate::models::{
    LIMIT_MAX, LIMIT_MIN, NoticeLevel, PAGES_MAX, PAGES_MIN, ResultTable, Source,
};
use crate::session::{Results, Session};
use itertools::Itertools;

pub const APP_TITLE: &str = "Scraper App (Berita & Instagram)";

/// Render the whole page for the current session.
pub fn render_page(session: &Session) -> String {
    let selected = session.params().source;
    let picker = render_source_picker(selected);
    let form = render_fetch_form(session);
    let notices = render_notices(session);
    let results = session.results().map(render_results).unwrap_or_default();

    let content = format!(
        r#"<div class="container">
<h1>{title}</h1>
<p class="lead">Pilih sumber data yang ingin diambil:</p>
{picker}
{form}
{notices}
{results}
</div>"#,
        title = html_escape(APP_TITLE),
    );

    build_page(APP_TITLE, &content)
}

fn render_source_picker(selected: Source) -> String {
    let options: String = Source::ALL
        .iter()
        .map(|source| {
            let checked = if *source == selected { " checked" } else { "" };
            format!(
                r#"<label class="radio"><input type="radio" name="source" value="{value}" onchange="this.form.submit()"{checked}> {name}</label>"#,
                value = source.slug(),
                name = html_escape(source.display_name()),
            )
        })
        .collect();

    format!(
        r#"<form method="get" action="/" class="picker">
<fieldset><legend>Pilih sumber:</legend>{options}</fieldset>
<noscript><button type="submit">Pilih</button></noscript>
</form>"#
    )
}

fn render_fetch_form(session: &Session) -> String {
    let params = session.params();
    let inputs = match params.source {
        Source::KompasTv => String::new(),
        Source::CnnIndonesia => slider(
            "pages",
            "Jumlah halaman CNN yang ingin diambil",
            PAGES_MIN,
            PAGES_MAX,
            params.pages,
        ),
        Source::InstagramComments => format!(
            r#"<label for="post_url">Masukkan URL postingan Instagram:</label>
<input type="url" id="post_url" name="post_url" value="{url}" placeholder="https://www.instagram.com/p/...">
{limit}"#,
            url = html_escape(&params.post_url),
            limit = slider(
                "limit",
                "Jumlah komentar yang ingin diambil",
                LIMIT_MIN,
                LIMIT_MAX,
                params.limit,
            ),
        ),
    };

    format!(
        r#"<form method="post" action="/scrape" class="fetch">
<input type="hidden" name="source" value="{source}">
{inputs}
<button type="submit" class="action-btn">Mulai Scraping</button>
</form>"#,
        source = params.source.slug(),
    )
}

fn slider(name: &str, label: &str, min: u32, max: u32, value: u32) -> String {
    format!(
        r#"<label for="{name}">{label}: <output id="{name}_out">{value}</output></label>
<input type="range" id="{name}" name="{name}" min="{min}" max="{max}" value="{value}" oninput="document.getElementById('{name}_out').value=this.value">"#,
        label = html_escape(label),
    )
}

fn render_notices(session: &Session) -> String {
    session
        .notices()
        .iter()
        .map(|notice| {
            let class = match notice.level {
                NoticeLevel::Success => "success",
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            };
            format!(
                r#"<div class="notice notice-{class}">{}</div>"#,
                html_escape(&notice.message)
            )
        })
        .join("\n")
}

fn render_results(results: &Results) -> String {
    format!(
        r#"<div class="results">
<p class="meta">Diambil pada {at}</p>
{table}
<a class="action-btn" href="/export" download="{filename}">Simpan ke CSV</a>
</div>"#,
        at = results.fetched_at.format("%Y-%m-%d %H:%M:%S"),
        table = render_table(&results.table),
        filename = html_escape(&results.source.export_filename()),
    )
}

/// Render a result table with a leading row-number column.
pub fn render_table(table: &ResultTable) -> String {
    let head = table
        .headers()
        .iter()
        .map(|h| format!("<th>{}</th>", html_escape(h)))
        .join("");
    let body = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cells = row
                .iter()
                .map(|cell| format!("<td>{}</td>", html_escape(cell)))
                .join("");
            format!("<tr><td class=\"idx\">{i}</td>{cells}</tr>")
        })
        .join("\n");

    format!(
        "<table class=\"data\">\n<thead><tr><th></th>{head}</tr></thead>\n<tbody>\n{body}\n</tbody>\n</table>"
    )
}

fn build_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
*{{margin:0;padding:0;box-sizing:border-box;}}
body{{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;color:#1a1a1a;background:#fafafa;}}
.container{{max-width:960px;margin:0 auto;padding:24px;}}
h1{{font-size:28px;margin-bottom:12px;}}
.lead{{margin-bottom:12px;color:#333;}}
fieldset{{border:none;margin-bottom:16px;}}
legend{{font-size:14px;color:#555;margin-bottom:6px;}}
.radio{{display:block;margin:4px 0;}}
form.fetch label{{display:block;font-size:14px;margin:12px 0 4px;}}
form.fetch input[type=url]{{width:100%;padding:8px;border:1px solid #ccc;border-radius:4px;}}
form.fetch input[type=range]{{width:100%;}}
.action-btn{{display:inline-block;margin-top:16px;padding:8px 18px;background:#ff4b4b;color:#fff;border:none;border-radius:4px;text-decoration:none;font-size:14px;cursor:pointer;}}
.action-btn:hover{{background:#d93636;}}
.notice{{margin-top:16px;padding:12px 16px;border-radius:4px;font-size:14px;}}
.notice-success{{background:#e8f5e9;color:#1b5e20;}}
.notice-warning{{background:#fff8e1;color:#795548;}}
.notice-error{{background:#fdecea;color:#b71c1c;}}
.results{{margin-top:16px;}}
.results .meta{{font-size:12px;color:#888;margin-bottom:8px;}}
table.data{{width:100%;border-collapse:collapse;background:#fff;font-size:14px;}}
table.data th,table.data td{{border:1px solid #e0e0e0;padding:6px 10px;text-align:left;vertical-align:top;}}
table.data th{{background:#f5f5f5;}}
table.data td.idx{{color:#888;width:1%;}}
</style>
</head>
<body>
{content}
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
