use reqwest::Url;

/// Whether the offline manager should handle a request at all. Anything
/// else is left to the browser untouched.
pub fn should_intercept(origin: &Url, allowed_hosts: &[String], url: &Url) -> bool {
    if url.origin() == origin.origin() {
        return true;
    }
    url.host_str()
        .is_some_and(|host| allowed_hosts.iter().any(|allowed| allowed.eq_ignore_ascii_case(host)))
}
