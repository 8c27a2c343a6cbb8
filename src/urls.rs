use crate::ApiConfig;

/// Join a base URL and a path with exactly one slash between them. An
/// absolute `path` wins outright and an empty side leaves the other
/// untouched. This is plain string manipulation, it does not validate
/// that the result is a well-formed URL.
pub fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with("http") {
        return path.to_string();
    }
    if base.is_empty() {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.strip_suffix('/').unwrap_or(base),
        path.strip_prefix('/').unwrap_or(path)
    )
}

/// Resolve the configured list and upload endpoints against the base URL.
pub fn resolve_endpoints(api: &ApiConfig) -> (String, String) {
    (
        join_url(&api.base_url, &api.list_path),
        join_url(&api.base_url, &api.upload_path),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_a_single_slash() {
        assert_eq!(
            join_url("https://cdn.example.com/", "/photo.jpg"),
            "https://cdn.example.com/photo.jpg"
        );
        assert_eq!(
            join_url("https://cdn.example.com", "photo.jpg"),
            "https://cdn.example.com/photo.jpg"
        );
    }

    #[test]
    fn empty_sides_pass_through() {
        assert_eq!(join_url("", "x.jpg"), "x.jpg");
        assert_eq!(join_url("https://cdn.example.com", ""), "https://cdn.example.com");
        assert_eq!(join_url("", ""), "");
    }

    #[test]
    fn absolute_paths_ignore_the_base() {
        assert_eq!(join_url("base", "http://other/x"), "http://other/x");
        assert_eq!(join_url("base", "https://other/x"), "https://other/x");
    }

    #[test]
    fn only_one_slash_is_stripped_per_side() {
        assert_eq!(join_url("a//", "//b"), "a///b");
    }

    #[test]
    fn endpoints_resolve_from_config() {
        let api = ApiConfig {
            base_url: "https://wedding.example.com/".to_string(),
            list_path: "/photos".to_string(),
            upload_path: "/photos".to_string(),
        };
        let (list, upload) = resolve_endpoints(&api);
        assert_eq!(list, "https://wedding.example.com/photos");
        assert_eq!(upload, "https://wedding.example.com/photos");
    }

    #[test]
    fn bare_paths_survive_an_empty_base() {
        let (list, upload) = resolve_endpoints(&ApiConfig::default());
        assert_eq!(list, "/photos");
        assert_eq!(upload, "/photos");
    }
}
