use html_escape::{encode_double_quoted_attribute, encode_text};

/// Status line shown above the report.
pub enum Notice<'a> {
    Info(&'a str),
    Success(&'a str),
    Error(&'a str),
}

impl Notice<'_> {
    fn render(&self) -> String {
        let (color, message) = match self {
            Notice::Info(m) => ("#31708f", m),
            Notice::Success(m) => ("#3c763d", m),
            Notice::Error(m) => ("#a94442", m),
        };
        format!(
            "<p class=\"notice\" style=\"color:{};\">{}</p>\n",
            color,
            encode_text(message)
        )
    }
}

/// Full page: the form, then any notices, then the report fragment.
pub fn render_page(url: &str, notices: &[Notice<'_>], report: Option<&str>) -> String {
    let notices_html: String = notices.iter().map(Notice::render).collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Scholar profile</title></head>
<body style="font-family:sans-serif; max-width:1100px; margin:20px auto;">
<form method="post" action="/fetch">
  <label for="url">Researcher's Google Scholar profile URL:</label>
  <input type="text" id="url" name="url" value="{url}" style="width:70%;"/>
  <button type="submit">Fetch</button>
</form>
{notices}{report}
</body>
</html>
"#,
        url = encode_double_quoted_attribute(url),
        notices = notices_html,
        report = report.unwrap_or_default(),
    )
}
