use crate::models::{RankedRepository, RepositoryRecord};
use crate::store::{AliasSnapshot, BookmarkSet, RecentList};

/// Order fetched repositories for display.
///
/// GitHub already returns them by stars, descending. Bookmarked repositories
/// move to the top; within each bookmark group, repositories whose alias
/// matches the search text come first when there is search text. The sort is
/// stable, so ties keep the star order.
pub fn rank_results(
    results: Vec<RepositoryRecord>,
    bookmarks: &BookmarkSet,
    aliases: &AliasSnapshot,
    search_text: &str,
) -> Vec<RankedRepository> {
    // Blank text matches no alias, so only bookmarks reorder browse results
    let alias_matches = aliases.matching_repo_ids(search_text);

    let mut ranked: Vec<RankedRepository> = results
        .into_iter()
        .map(|repo| RankedRepository {
            bookmarked: bookmarks.contains(repo.id),
            alias: aliases.alias_for(repo.id).map(str::to_string),
            repo,
        })
        .collect();

    ranked.sort_by_key(|r| (!r.bookmarked, !alias_matches.contains(&r.repo.id)));
    ranked
}

/// The "Recently Opened" section shown above the results of an empty search.
pub fn recent_section(recent: &RecentList, search_text: &str) -> Vec<RepositoryRecord> {
    if !search_text.trim().is_empty() {
        return Vec::new();
    }
    recent.displayable().cloned().collect()
}

/// Find the record for an opened repository: latest results first, then the
/// recent list.
pub fn find_opened<'a>(
    repo_id: u64,
    results: &'a [RepositoryRecord],
    recent: &'a RecentList,
) -> Option<&'a RepositoryRecord> {
    results
        .iter()
        .find(|r| r.id == repo_id)
        .or_else(|| recent.find(repo_id))
}
