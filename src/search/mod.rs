pub mod query;
pub mod rank;

pub use query::{build_query, organization_scope, should_execute};
pub use rank::{find_opened, rank_results, recent_section};
