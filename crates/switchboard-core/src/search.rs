// ── Client-side search ──
//
// Scores switches against a query without a round trip. Visibility is a
// view-only classification: nothing here mutates the store.

use indexmap::IndexMap;
use tracing::trace;

use crate::model::Switch;

const EXACT: f64 = 3.0;
const PREFIX: f64 = 2.0;
const SUBSTRING: f64 = 1.0;
const FUZZY: f64 = 0.5;

/// Score one already-lowercased field against an already-lowercased query.
///
/// Exact match beats prefix beats substring beats an in-order scatter of
/// the query's characters. Closer length ratios score higher within the
/// substring and fuzzy tiers.
fn field_score(field: &str, query: &str) -> f64 {
    if field.is_empty() || query.is_empty() {
        return 0.0;
    }
    if field == query {
        EXACT
    } else if field.starts_with(query) {
        PREFIX
    } else if field.contains(query) {
        SUBSTRING + coverage(query, field)
    } else if is_subsequence(query, field) {
        FUZZY * coverage(query, field)
    } else {
        0.0
    }
}

/// Share of `field` the query accounts for, in chars.
#[allow(clippy::cast_precision_loss)]
fn coverage(query: &str, field: &str) -> f64 {
    query.chars().count() as f64 / field.chars().count() as f64
}

/// `true` if every char of `needle` appears in `haystack`, in order.
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut hay = haystack.chars();
    needle.chars().all(|c| hay.any(|h| h == c))
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

fn haystacks(switch: &Switch) -> [String; 3] {
    [
        switch.key.to_lowercase(),
        switch.name.as_deref().unwrap_or_default().to_lowercase(),
        switch.description.as_deref().unwrap_or_default().to_lowercase(),
    ]
}

fn sum_scores(fields: &[String; 3], query: &str) -> f64 {
    fields.iter().map(|f| field_score(f, query)).sum()
}

/// Relevance of `switch` to `query`, summed over key, name and
/// description. Absent fields contribute nothing.
pub fn score(switch: &Switch, query: &str) -> f64 {
    sum_scores(&haystacks(switch), &normalize(query))
}

/// The switches that should stay visible for `query`, in input order.
///
/// An empty query keeps everything; otherwise only non-zero scores remain.
pub fn filter<'a, I, S>(switches: I, query: &str) -> Vec<&'a S>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<Switch> + 'a,
{
    let query = normalize(query);
    if query.is_empty() {
        return switches.into_iter().collect();
    }
    switches
        .into_iter()
        .filter(|s| sum_scores(&haystacks(s.as_ref()), &query) > 0.0)
        .collect()
}

// ── Precomputed index ────────────────────────────────────────────────

struct Entry {
    key: String,
    fields: [String; 3],
}

/// Lowercased search fields for a set of switches, built once and
/// classified per query.
pub struct SearchIndex {
    entries: Vec<Entry>,
}

impl SearchIndex {
    pub fn new<'a, I, S>(switches: I) -> Self
    where
        I: IntoIterator<Item = &'a S>,
        S: AsRef<Switch> + 'a,
    {
        let entries = switches
            .into_iter()
            .map(|s| {
                let s = s.as_ref();
                Entry {
                    key: s.key.clone(),
                    fields: haystacks(s),
                }
            })
            .collect();
        Self { entries }
    }

    /// Hidden marker per key, in input order: `true` means hide.
    ///
    /// An empty query hides nothing.
    pub fn classify(&self, query: &str) -> IndexMap<String, bool> {
        let query = normalize(query);
        let hidden: IndexMap<String, bool> = self
            .entries
            .iter()
            .map(|e| {
                let hide = !query.is_empty() && sum_scores(&e.fields, &query) <= 0.0;
                (e.key.clone(), hide)
            })
            .collect();
        trace!(
            %query,
            hidden = hidden.values().filter(|h| **h).count(),
            "search classified"
        );
        hidden
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::store::SwitchStore;

    fn switch(key: &str, name: Option<&str>, desc: Option<&str>) -> Switch {
        let mut sw = Switch::new(key, Status::Disabled);
        sw.name = name.map(str::to_owned);
        sw.description = desc.map(str::to_owned);
        sw
    }

    #[test]
    fn tiers_are_ordered() {
        let exact = field_score("beta", "beta");
        let prefix = field_score("beta_rollout", "beta");
        let substring = field_score("new_beta", "beta");
        let fuzzy = field_score("bxexta", "beta");
        assert_eq!(exact, 3.0);
        assert_eq!(prefix, 2.0);
        assert!(substring > 1.0 && substring < prefix);
        assert!(fuzzy > 0.0 && fuzzy < 1.0);
        assert_eq!(field_score("gamma", "beta"), 0.0);
    }

    #[test]
    fn scores_sum_over_fields_case_insensitively() {
        let sw = switch("beta", Some("BETA"), Some("Beta rollout"));
        assert_eq!(score(&sw, "Beta"), 3.0 + 3.0 + 2.0);
    }

    #[test]
    fn absent_description_contributes_zero() {
        let sw = switch("beta", None, None);
        assert_eq!(score(&sw, "beta"), 3.0);
        assert_eq!(score(&sw, "rollout"), 0.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let sw = switch("checkout_v2", Some("Checkout"), Some("new checkout flow"));
        assert_eq!(score(&sw, "chk"), score(&sw, "chk"));
    }

    #[test]
    fn empty_query_keeps_everything() {
        let all = vec![switch("a", None, None), switch("b", None, None)];
        assert_eq!(filter(&all, "").len(), 2);
        assert_eq!(filter(&all, "   ").len(), 2);
    }

    #[test]
    fn filter_keeps_exactly_nonzero_scores() {
        let all = vec![
            switch("beta", None, None),
            switch("gamma", Some("Gamma"), Some("has a beta flag")),
            switch("delta", Some("Delta"), None),
        ];
        let kept: Vec<_> = filter(&all, "beta").iter().map(|s| s.key.as_str()).collect();
        assert_eq!(kept, vec!["beta", "gamma"]);
        for sw in &all {
            assert_eq!(kept.contains(&sw.key.as_str()), score(sw, "beta") > 0.0);
        }
    }

    #[test]
    fn classify_marks_hidden_without_touching_store() {
        let store = SwitchStore::new();
        store.upsert(switch("beta", None, None));
        store.upsert(switch("gamma", None, None));
        let version = store.version();

        let index = SearchIndex::new(&store.all());
        let hidden = index.classify("gam");
        assert!(hidden["beta"]);
        assert!(!hidden["gamma"]);
        assert!(index.classify("").values().all(|h| !h));

        assert_eq!(store.version(), version);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn classify_agrees_with_filter() {
        let all = vec![
            switch("checkout", Some("Checkout"), Some("payment flow")),
            switch("beta", None, None),
        ];
        let hidden = SearchIndex::new(&all).classify("flow");
        let kept: Vec<_> = filter(&all, "flow").iter().map(|s| s.key.as_str()).collect();
        assert_eq!(kept, vec!["checkout"]);
        assert!(!hidden["checkout"]);
        assert!(hidden["beta"]);
    }
}
