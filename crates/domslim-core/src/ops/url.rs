/// Last path segment of a URL with fragment and query stripped
///
/// `https://cdn.example.com/img/logo.png?v=2#top` becomes `logo.png`.
pub fn file_name(url: &str) -> &str {
    let last = url.rsplit('/').next().unwrap_or(url);
    let last = last.split('#').next().unwrap_or(last);
    last.split('?').next().unwrap_or(last)
}
