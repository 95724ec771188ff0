#![forbid(unsafe_code)]

//! Server-rendered HTML. Every dynamic value goes through `escape_html`;
//! the SVG produced by graphviz is the only markup embedded verbatim.

use bubbles_core::dot::RankDir;
use bubbles_core::graph::ProjectGraph;
use bubbles_core::ids::ProjectId;
use bubbles_storage::ProjectRow;
use std::fmt::Write as _;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub(crate) struct ProjectPage<'a> {
    pub project: &'a ProjectRow,
    pub graph: &'a ProjectGraph,
    pub rankdir: RankDir,
    pub svg: Option<&'a str>,
    pub render_error: Option<&'a str>,
    pub source: &'a str,
}

/// Where a mutation sends the browser afterwards.
pub(crate) fn project_href(id: ProjectId, rankdir: RankDir) -> String {
    let mut out = format!("/projects?pID={id}");
    if rankdir.is_vertical() {
        out.push_str("&vertical");
    }
    out
}

pub(crate) fn ts_ms_to_rfc3339(ts_ms: i64) -> String {
    let nanos = (ts_ms as i128) * 1_000_000i128;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

pub(crate) fn project_list(projects: &[ProjectRow]) -> String {
    let mut content = String::from("<strong>Projects</strong>\n");
    if projects.is_empty() {
        content.push_str("<p>no projects yet</p>\n");
    } else {
        content.push_str("<ul>\n");
        for project in projects {
            let _ = writeln!(
                content,
                "\t<li><a href=\"/projects?pID={id}\">{name}</a> <small>{created}</small> \
                 <a hx-delete=\"/projects?pID={id}\" style=\"text-decoration: none;\" \
                 hx-confirm=\"Are you sure you want to delete this project?\">&#x1F5D1;</a></li>",
                id = project.id,
                name = escape_html(&project.name),
                created = ts_ms_to_rfc3339(project.created_at_ms),
            );
        }
        content.push_str("</ul>\n");
    }
    base(&content)
}

pub(crate) fn project_page(page: &ProjectPage<'_>) -> String {
    let id = page.project.id;
    let vertical_suffix = if page.rankdir.is_vertical() {
        "&vertical"
    } else {
        ""
    };
    let mut content = String::new();

    let _ = writeln!(
        content,
        "<strong>Project: {}</strong>",
        escape_html(&page.project.name)
    );
    let (toggle_href, toggle_label) = if page.rankdir.is_vertical() {
        (project_href(id, RankDir::LeftToRight), "horizontal")
    } else {
        (project_href(id, RankDir::TopToBottom), "vertical")
    };
    let _ = writeln!(
        content,
        "<section><a href=\"/projects?pID={id}&download{vertical_suffix}\" class=\"secondary\">download</a> \
         <a href=\"{}\" class=\"secondary\">{toggle_label}</a> \
         <a href=\"/api/graph?pID={id}{vertical_suffix}\" class=\"secondary\">json</a></section>",
        escape_html(&toggle_href),
    );

    content.push_str("<section><div id=\"svg-container\">\n");
    if let Some(svg) = page.svg {
        content.push_str(svg);
    }
    content.push_str("</div></section>\n");

    if let Some(err) = page.render_error {
        let _ = writeln!(
            content,
            "<section><p>renderer failed:</p><pre>{}</pre></section>",
            escape_html(err)
        );
    }

    content.push_str("<datalist id=\"knownBubbles\">\n");
    for name in page.graph.known_activities() {
        let _ = writeln!(content, "\t<option>{}</option>", escape_html(name));
    }
    content.push_str("</datalist>\n");

    let _ = writeln!(
        content,
        "<form method=\"POST\" enctype=\"application/x-www-form-urlencoded\" action=\"/store?pID={id}{vertical_suffix}\">\n\
         \t<fieldset class=\"grid\">\n\
         \t\t<input type=\"text\" list=\"knownBubbles\" name=\"newLeft\">\n\
         \t\t<input type=\"text\" list=\"knownBubbles\" name=\"newCenter\">\n\
         \t\t<input type=\"text\" list=\"knownBubbles\" name=\"newRight\">\n\
         \t\t<input type=\"submit\" value=\"add\" class=\"outline contrast\"/>\n\
         \t</fieldset>\n\
         </form>"
    );

    if page.graph.is_empty() {
        content.push_str("<p>no pairs yet</p>\n");
    }
    content.push_str("<table class=\"striped\"><tbody>\n");
    for pair in page.graph.pairs() {
        let remove_href = format!(
            "/remove?pID={id}&left={}&right={}{vertical_suffix}",
            query_value(&pair.left),
            query_value(&pair.right)
        );
        let _ = writeln!(
            content,
            "\t<tr><td>{}</td><td>{}</td><td><button hx-delete=\"{}\" class=\"outline contrast\">remove</button></td></tr>",
            escape_html(&pair.left),
            escape_html(&pair.right),
            escape_html(&remove_href),
        );
    }
    content.push_str("</tbody></table>\n");

    let _ = writeln!(
        content,
        "<details><summary>rename</summary>\
         <form method=\"POST\" enctype=\"application/x-www-form-urlencoded\" action=\"/rename?pID={id}{vertical_suffix}\">\
         <label>from: <input type=\"text\" list=\"knownBubbles\" name=\"from\"></label>\
         <label>to: <input type=\"text\" name=\"to\"></label>\
         <input type=\"submit\" value=\"rename\"/></form></details>"
    );
    let _ = writeln!(
        content,
        "<details><summary>delete</summary>\
         <form method=\"POST\" enctype=\"application/x-www-form-urlencoded\" action=\"/delete?pID={id}{vertical_suffix}\">\
         <label>activity: <input type=\"text\" list=\"knownBubbles\" name=\"activity\"></label>\
         <input type=\"submit\" value=\"delete\"/></form></details>"
    );
    let _ = writeln!(
        content,
        "<details><summary>source</summary><pre>{}</pre></details>",
        escape_html(page.source)
    );

    base(&content)
}

fn base(content: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en" data-theme="light">
	<head>
		<meta charset="utf-8">
		<meta name="viewport" content="width=device-width, initial-scale=1">
		<script src="https://cdn.jsdelivr.net/npm/htmx.org@2.0.6/dist/htmx.min.js"></script>
		<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css">
		<style>
			#svg-container {{ text-align: center; }}
			#svg-container svg {{ max-width: 100%; height: auto; }}
		</style>
	</head>
	<body hx-boost="true">
		<header class="container">
			<nav>
				<ul><li><a href="/" class="secondary"><strong>Bubbles</strong></a></li></ul>
				<ul><li>
					<form method="POST" enctype="application/x-www-form-urlencoded" action="/projects/new">
						<input type="text" name="name" placeholder="project name"/>
						<input type="submit" value="create"/>
					</form>
				</li></ul>
			</nav>
		</header>
		<main class="container">
{content}
		</main>
	</body>
</html>
"#
    )
}

pub(crate) fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn project_href_keeps_layout() {
        let id = ProjectId::try_new(5).unwrap();
        assert_eq!(project_href(id, RankDir::LeftToRight), "/projects?pID=5");
        assert_eq!(
            project_href(id, RankDir::TopToBottom),
            "/projects?pID=5&vertical"
        );
    }

    #[test]
    fn timestamps_format_as_rfc3339() {
        assert_eq!(ts_ms_to_rfc3339(0), "1970-01-01T00:00:00Z");
        assert_eq!(ts_ms_to_rfc3339(86_400_000), "1970-01-02T00:00:00Z");
    }
}
