/// Extract a short type name from the full module path.
///
/// Given `"growth_advisor::components::TopKSelector"`, returns `"TopKSelector"`.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
