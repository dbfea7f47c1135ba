//! URL stepping: `urlincrement`, `urlroot`, `urlparent`

use url::Url;

/// Add `count` to the last number in the URL, keeping zero padding.
///
/// `None` when the URL has no digits, or the result would be negative.
pub fn increment(url: &Url, count: i64) -> Option<Url> {
    let text = url.as_str();
    let end = text.rfind(|c: char| c.is_ascii_digit())? + 1;
    let start = text[..end]
        .rfind(|c: char| !c.is_ascii_digit())
        .map_or(0, |i| i + 1);

    let digits = &text[start..end];
    let number: i128 = digits.parse().ok()?;
    let next = number.checked_add(i128::from(count))?;
    if next < 0 {
        return None;
    }

    let mut replacement = next.to_string();
    if digits.starts_with('0') {
        while replacement.len() < digits.len() {
            replacement.insert(0, '0');
        }
    }

    Url::parse(&format!("{}{}{}", &text[..start], replacement, &text[end..])).ok()
}

/// The URL with its path reset to `/` and no query or fragment.
pub fn root(url: &Url) -> Option<Url> {
    if url.cannot_be_a_base() {
        return None;
    }

    let mut rooted = url.clone();
    rooted.set_path("/");
    rooted.set_query(None);
    rooted.set_fragment(None);

    (rooted != *url).then_some(rooted)
}

/// Go up `count` levels.
///
/// Each level strips, in turn, the fragment, the query, the last path
/// segment, and finally the leftmost subdomain label. A bare two-label
/// domain has no parent.
pub fn parent(url: &Url, count: usize) -> Option<Url> {
    if url.cannot_be_a_base() {
        return None;
    }

    let mut current = url.clone();
    for _ in 0..count {
        if current.fragment().is_some_and(|f| !f.is_empty()) {
            current.set_fragment(None);
        } else if current.query().is_some_and(|q| !q.is_empty()) {
            current.set_query(None);
        } else if current.path() != "/" {
            let mut segments: Vec<String> = current
                .path()
                .trim_start_matches('/')
                .split('/')
                .map(str::to_string)
                .collect();
            segments.pop();
            current.set_path(&format!("/{}", segments.join("/")));
        } else {
            let host = current.host_str()?.to_string();
            let labels: Vec<&str> = host.split('.').collect();
            if labels.len() <= 2 {
                return None;
            }
            current.set_host(Some(&labels[1..].join("."))).ok()?;
        }
    }

    Some(current)
}
