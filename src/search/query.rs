use crate::store::AliasSnapshot;

/// Search text that means "browse everything in the organizations".
const BROWSE_MARKER: &str = "*";

/// `org:` clause for every organization, space-joined in configured order.
pub fn organization_scope(organizations: &[String]) -> String {
    organizations
        .iter()
        .map(|org| format!("org:{org}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the GitHub search query for the user's text.
///
/// - blank text or `*` browses the organizations
/// - text matching one or more alias labels becomes `repo:` clauses for the
///   aliased repositories; organization scoping is dropped in that case
/// - anything else is searched within the organizations
pub fn build_query(
    text: &str,
    organizations: &[String],
    aliases: Option<&AliasSnapshot>,
) -> String {
    let trimmed = text.trim();
    let org_scope = organization_scope(organizations);

    if trimmed.is_empty() || trimmed == BROWSE_MARKER {
        return org_scope;
    }

    if let Some(aliases) = aliases.filter(|a| !a.is_empty()) {
        let repo_clauses: Vec<String> = aliases
            .matching(trimmed)
            .map(|entry| format!("repo:{}", entry.repo_full_name))
            .collect();
        if !repo_clauses.is_empty() {
            return repo_clauses.join(" ");
        }
    }

    if org_scope.is_empty() {
        trimmed.to_string()
    } else {
        format!("{trimmed} {org_scope}")
    }
}

/// Whether a built query is worth sending to GitHub at all.
pub fn should_execute(query: &str) -> bool {
    !query.trim().is_empty()
}
