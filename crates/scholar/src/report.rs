use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::models::{ProfileRecord, NO_TOPICS};

pub fn render_profile_card(profile: &ProfileRecord) -> String {
    let avatar = profile
        .image_url
        .as_deref()
        .map(|src| {
            format!(
                "<img src=\"{}\" alt=\"Researcher photo\" width=\"120\" style=\"border-radius:10px;\"/>",
                attr(src)
            )
        })
        .unwrap_or_default();

    let topics = if profile.topics.is_empty() {
        NO_TOPICS.to_string()
    } else {
        profile.topics.join(", ")
    };

    format!(
        "<div style=\"display:flex; align-items:center; gap:20px; margin-bottom:20px;\">\n\
         {avatar}\n\
         <div>\n\
         <h2>{name}</h2>\n\
         <p><b>Affiliation:</b> {affiliation}</p>\n\
         <p><b>Contact:</b> {contact}</p>\n\
         <p><b>Topics:</b> {topics}</p>\n\
         </div>\n\
         </div>\n",
        avatar = avatar,
        name = text(&profile.name),
        affiliation = text(&profile.affiliation),
        contact = text(&profile.contact),
        topics = text(&topics),
    )
}

pub fn render_metrics_table(profile: &ProfileRecord) -> String {
    let m = &profile.metrics;
    let rows = [
        ("Citations", &m.citations_total, &m.citations_recent),
        ("h-index", &m.h_index_total, &m.h_index_recent),
        ("i10-index", &m.i10_total, &m.i10_recent),
    ];

    let mut html = String::from(
        "<table border=\"1\" cellpadding=\"8\" style=\"border-collapse:collapse; margin-bottom:20px;\">\n\
         <tr style=\"background:#f0f0f0\"><th>Metric</th><th>All</th><th>Recent</th></tr>\n",
    );
    for (label, all, recent) in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            label,
            text(all),
            text(recent)
        ));
    }
    html.push_str("</table>\n");
    html
}

pub fn render_publications_table(profile: &ProfileRecord) -> String {
    let mut html = String::from(
        "<table border=\"1\" cellpadding=\"6\" style=\"border-collapse:collapse; width:100%\">\n\
         <tr style=\"background:#f0f0f0\"><th>Title</th><th>Authors</th><th>Venue</th><th>Citations</th><th>Year</th></tr>\n",
    );
    for publication in &profile.publications {
        html.push_str(&format!(
            "<tr><td><a href=\"{}\" target=\"_blank\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            attr(&publication.link),
            text(&publication.title),
            text(&publication.authors_summary),
            text(&publication.venue),
            text(&publication.citation_count),
            text(&publication.year),
        ));
    }
    html.push_str("</table>\n");
    html
}

/// Card, metrics and publications, in display order.
pub fn render_report(profile: &ProfileRecord) -> String {
    [
        render_profile_card(profile),
        render_metrics_table(profile),
        render_publications_table(profile),
    ]
    .concat()
}
