//! Path building from loose segments.

/// Join path segments into a single `/`-prefixed path.
///
/// Each segment is split on `/`, leading dots are stripped from every piece,
/// and empty pieces or pieces starting with `?` are dropped. When the last
/// segment starts with `?` it is appended verbatim as the query string. A
/// single trailing `/` is removed.
///
/// A lone query segment is returned unchanged, and no segments at all give an
/// empty path.
///
/// `..` is not resolved against its parent: stripping the dots leaves an empty
/// piece, which is dropped.
///
/// # Example
///
/// ```
/// use fetcher_core::build_path;
///
/// assert_eq!(build_path(["api", "v1", "users", "123/"]), "/api/v1/users/123");
/// assert_eq!(build_path(["users", "?page=1"]), "/users?page=1");
/// assert_eq!(build_path(["?page=1"]), "?page=1");
/// assert_eq!(build_path(["/"]), "");
/// assert_eq!(build_path::<[&str; 0], _>([]), "");
/// ```
#[must_use]
pub fn build_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let segments: Vec<S> = segments.into_iter().collect();
    let Some(last) = segments.last().map(AsRef::as_ref) else {
        return String::new();
    };

    let query = last.starts_with('?').then_some(last);
    if let (1, Some(query)) = (segments.len(), query) {
        return query.to_string();
    }

    let pieces: Vec<&str> = segments
        .iter()
        .flat_map(|segment| segment.as_ref().split('/'))
        .map(|piece| piece.trim_start_matches('.'))
        .filter(|piece| !piece.is_empty() && !piece.starts_with('?'))
        .collect();

    let mut path = format!("/{}{}", pieces.join("/"), query.unwrap_or_default());
    if path.ends_with('/') {
        path.pop();
    }
    path
}
