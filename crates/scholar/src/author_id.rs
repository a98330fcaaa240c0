use url::Url;

const USER_TOKEN: &str = "user=";

/// Pulls the author id out of a profile URL.
///
/// The `user` query parameter wins when the URL parses. Otherwise the text
/// between the first `user=` and the next `&` is returned as-is; that fallback
/// does not check where in the URL the token appeared.
pub fn extract_author_id(profile_url: &str) -> Option<String> {
    let profile_url = profile_url.trim();
    if profile_url.is_empty() {
        return None;
    }

    if let Ok(parsed) = Url::parse(profile_url) {
        let from_query = parsed
            .query_pairs()
            .find(|(key, value)| key == "user" && !value.is_empty())
            .map(|(_, value)| value.into_owned());
        if from_query.is_some() {
            return from_query;
        }
    }

    let (_, rest) = profile_url.split_once(USER_TOKEN)?;
    let id = rest.split('&').next().unwrap_or_default();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
