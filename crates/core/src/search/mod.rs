//! Search controller: runs the match engine over the index, samples, sorts,
//! and tracks when the grid must be rebuilt.

use std::cmp::Ordering;
use std::collections::HashSet;

use fastrand::Rng;

use crate::filter::{MatchQuery, SearchState, SortKey, parse_advance_search};
use crate::index::{IndexError, MediaResource, ResourceIndex};
use crate::media::basename;

/// A gallery search over one [`ResourceIndex`].
///
/// `results` holds the filtered (and sampled) resources in discovery order;
/// `sorted` is derived from it by [`MediaSearch::update_sort`]. Any change
/// that alters what is shown raises the redraw flag, which only the grid
/// clears after a full rebuild.
#[derive(Debug, Default)]
pub struct MediaSearch {
    state: SearchState,
    results: Vec<MediaResource>,
    sorted: Vec<MediaResource>,
    /// Key and direction `sorted` was built with; `None` after fresh data.
    applied: Option<(SortKey, bool)>,
    redraw: bool,
}

impl MediaSearch {
    pub fn new(state: SearchState) -> Self {
        Self { state, redraw: true, ..Default::default() }
    }

    /// Search over an already filtered list, kept in the given order.
    #[cfg(test)]
    pub(crate) fn with_results(state: SearchState, results: Vec<MediaResource>) -> Self {
        let mut search = Self { state, results, ..Default::default() };
        let (sort, reverse) = (search.state.sort, search.state.reverse);
        search.update_sort(sort, reverse);
        search
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Resources to display, filtered and sorted.
    pub fn items(&self) -> &[MediaResource] {
        &self.sorted
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    pub fn mark_redraw(&mut self) {
        self.redraw = true;
    }

    /// Called by the grid once a full rebuild has consumed the items.
    pub fn finish_redraw(&mut self) {
        self.redraw = false;
    }

    fn edit(&mut self, f: impl FnOnce(&mut SearchState)) {
        f(&mut self.state);
        self.redraw = true;
    }

    pub fn set_path(&mut self, path: &str) {
        self.edit(|s| s.path = path.to_string());
    }

    pub fn set_name(&mut self, name: &str) {
        self.edit(|s| s.name = name.to_string());
    }

    pub fn set_regex(&mut self, regex: &str) {
        self.edit(|s| s.regex = regex.to_string());
    }

    pub fn set_tag(&mut self, tag: &str) {
        self.edit(|s| s.tag = tag.to_string());
    }

    /// Set a frontmatter-field filter; empty text removes it.
    pub fn set_field(&mut self, field: &str, text: &str) {
        self.edit(|s| {
            if text.trim().is_empty() {
                s.front.remove(field);
            } else {
                s.front.insert(field.to_string(), text.to_string());
            }
        });
    }

    pub fn set_match_case(&mut self, match_case: bool) {
        self.edit(|s| s.match_case = match_case);
    }

    pub fn set_exclusive(&mut self, exclusive: bool) {
        self.edit(|s| s.exclusive = exclusive);
    }

    pub fn set_random(&mut self, count: usize) {
        self.edit(|s| s.random = count);
    }

    /// Request a fresh random sample on the next [`MediaSearch::update_data`].
    pub fn reseed(&mut self) {
        self.redraw = true;
    }

    pub fn set_custom_list(&mut self, indices: Vec<usize>) {
        self.edit(|s| s.custom_list = indices);
    }

    pub fn set_max_width(&mut self, width: u32) {
        self.edit(|s| s.max_width = width.max(1));
    }

    pub fn set_max_height(&mut self, height: Option<u32>) {
        self.edit(|s| s.max_height = height);
    }

    pub fn clear_filter(&mut self) {
        self.edit(SearchState::clear_filter);
    }

    /// Replace the filters from a free-text query.
    pub fn apply_query(&mut self, raw: &str) {
        self.edit(|s| parse_advance_search(raw, s));
    }

    /// Replace the whole state from a serialized filter block.
    pub fn set_filter(&mut self, text: &str) {
        self.edit(|s| s.set_filter(text));
    }

    pub fn get_filter(&self) -> String {
        self.state.get_filter()
    }

    /// Re-run the match engine over the whole index.
    ///
    /// Applies the custom index list, then the random sample, then re-sorts
    /// with the current key. Returns the number of resources kept.
    pub fn update_data(
        &mut self,
        index: &ResourceIndex,
        rng: &mut Rng,
    ) -> Result<usize, IndexError> {
        index.ensure_ready()?;

        let query = MatchQuery::from_state(&self.state);
        let mut filtered: Vec<MediaResource> = index
            .resources()
            .filter(|r| query.evaluate(&r.path, index.metadata_for(&r.path)))
            .cloned()
            .collect();

        if !self.state.custom_list.is_empty() {
            filtered = self
                .state
                .custom_list
                .iter()
                .filter_map(|&i| filtered.get(i).cloned())
                .collect();
        }

        if self.state.random > 0 {
            let picks = sample_indices(filtered.len(), self.state.random, rng);
            filtered = picks.into_iter().map(|i| filtered[i].clone()).collect();
        }

        tracing::debug!("search kept {} of {} resources", filtered.len(), index.len());
        self.results = filtered;
        self.applied = None;
        self.redraw = true;
        self.update_sort(self.state.sort, self.state.reverse);
        Ok(self.results.len())
    }

    /// Apply a sort key and direction.
    ///
    /// Nothing happens when neither differs from the order currently shown
    /// and the search is not dirty. A key change, fresh data or a pending
    /// redraw sorts the filtered list from scratch and then reverses it if
    /// requested; a direction change alone reverses the current list in
    /// place. Returns whether the list was reordered.
    pub fn update_sort(&mut self, key: SortKey, reverse: bool) -> bool {
        let (key_changed, reverse_changed) = match self.applied {
            Some((applied_key, applied_reverse)) => {
                (key != applied_key, reverse != applied_reverse)
            }
            None => (true, true),
        };
        if !key_changed && !reverse_changed && !self.redraw {
            return false;
        }

        if key_changed || self.redraw {
            self.sorted = self.results.clone();
            if key != SortKey::Unsorted {
                self.sorted.sort_by(|a, b| compare(key, a, b));
            }
            if reverse {
                self.sorted.reverse();
            }
        } else {
            self.sorted.reverse();
        }

        self.applied = Some((key, reverse));
        self.state.sort = key;
        self.state.reverse = reverse;
        self.redraw = true;
        true
    }
}

/// Draw `count` distinct indices below `len`, rejecting repeats.
/// The result is in ascending order so discovery order survives sampling.
pub fn sample_indices(len: usize, count: usize, rng: &mut Rng) -> Vec<usize> {
    let count = count.min(len);
    let mut seen = HashSet::with_capacity(count);
    let mut picks = Vec::with_capacity(count);
    while picks.len() < count {
        let i = rng.usize(0..len);
        if seen.insert(i) {
            picks.push(i);
        }
    }
    picks.sort_unstable();
    picks
}

/// Case-folded comparison with a case-sensitive tiebreak.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn compare(key: SortKey, a: &MediaResource, b: &MediaResource) -> Ordering {
    match key {
        SortKey::Unsorted => Ordering::Equal,
        SortKey::Name => locale_cmp(basename(&a.path), basename(&b.path)),
        SortKey::Path => locale_cmp(&a.path, &b.path),
        // dates and sizes are newest / largest first
        SortKey::CDate => b.stat.created.cmp(&a.stat.created),
        SortKey::MDate => b.stat.modified.cmp(&a.stat.modified),
        SortKey::Size => b.stat.size.cmp(&a.stat.size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::FileStat;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn resource(path: &str, mtime: i64, size: u64) -> MediaResource {
        let t = Utc.timestamp_opt(mtime, 0).unwrap();
        MediaResource::new(path, FileStat { created: t, modified: t, size })
    }

    fn search_with(resources: Vec<MediaResource>) -> MediaSearch {
        MediaSearch::with_results(SearchState::default(), resources)
    }

    fn paths(search: &MediaSearch) -> Vec<&str> {
        search.items().iter().map(|r| r.path.as_str()).collect()
    }

    fn sample() -> Vec<MediaResource> {
        vec![
            resource("b/Zeta.png", 20, 5),
            resource("a/alpha.png", 10, 50),
            resource("c/beta.png", 30, 1),
        ]
    }

    #[rstest]
    #[case(SortKey::Unsorted, vec!["b/Zeta.png", "a/alpha.png", "c/beta.png"])]
    #[case(SortKey::Name, vec!["a/alpha.png", "c/beta.png", "b/Zeta.png"])]
    #[case(SortKey::Path, vec!["a/alpha.png", "b/Zeta.png", "c/beta.png"])]
    #[case(SortKey::MDate, vec!["c/beta.png", "b/Zeta.png", "a/alpha.png"])]
    #[case(SortKey::Size, vec!["a/alpha.png", "b/Zeta.png", "c/beta.png"])]
    fn sorts_by_key(#[case] key: SortKey, #[case] expected: Vec<&str>) {
        let mut search = search_with(sample());
        search.update_sort(key, false);
        assert_eq!(paths(&search), expected);
    }

    #[test]
    fn update_sort_is_idempotent() {
        let mut search = search_with(sample());
        assert!(search.update_sort(SortKey::Name, true));
        let first: Vec<String> = paths(&search).iter().map(|s| s.to_string()).collect();
        search.finish_redraw();
        assert!(!search.update_sort(SortKey::Name, true));
        assert_eq!(paths(&search), first);
    }

    #[test]
    fn reverse_alone_flips_in_place() {
        let mut search = search_with(sample());
        search.update_sort(SortKey::Name, false);
        search.finish_redraw();
        search.update_sort(SortKey::Name, true);
        assert_eq!(paths(&search), vec!["b/Zeta.png", "c/beta.png", "a/alpha.png"]);
        search.finish_redraw();
        search.update_sort(SortKey::Name, false);
        assert_eq!(paths(&search), vec!["a/alpha.png", "c/beta.png", "b/Zeta.png"]);
    }

    #[test]
    fn reverse_is_a_list_reversal() {
        let mut search = search_with(vec![
            resource("x.png", 5, 1),
            resource("y.png", 5, 1),
            resource("z.png", 9, 1),
        ]);
        // stable sort gives z, x, y; reversing flips the tie too
        search.update_sort(SortKey::MDate, true);
        assert_eq!(paths(&search), vec!["y.png", "x.png", "z.png"]);
    }

    #[test]
    fn loaded_filter_block_resorts_even_when_state_already_matches() {
        let mut search = search_with(vec![
            resource("b/a.png", 1, 1),
            resource("a/z.png", 1, 1),
            resource("c/m.png", 1, 1),
        ]);
        search.update_sort(SortKey::Name, false);
        search.finish_redraw();
        assert_eq!(paths(&search), vec!["b/a.png", "c/m.png", "a/z.png"]);

        search.set_filter("```gallery-search\nsort:PATH\nreverseOrder:true\n```");
        let (key, reverse) = (search.state().sort, search.state().reverse);
        assert_eq!((key, reverse), (SortKey::Path, true));

        assert!(search.update_sort(key, reverse));
        assert_eq!(paths(&search), vec!["c/m.png", "b/a.png", "a/z.png"]);
    }

    #[test]
    fn pending_redraw_forces_full_sort() {
        let mut search = search_with(sample());
        search.update_sort(SortKey::Name, false);
        search.finish_redraw();
        assert!(!search.update_sort(SortKey::Name, false));

        search.reseed();
        assert!(search.update_sort(SortKey::Name, false));
        assert_eq!(paths(&search), vec!["a/alpha.png", "c/beta.png", "b/Zeta.png"]);
    }

    #[test]
    fn setters_raise_redraw() {
        let mut search = search_with(sample());
        search.finish_redraw();
        search.set_tag("cat");
        assert!(search.needs_redraw());

        search.finish_redraw();
        search.update_sort(SortKey::Size, false);
        assert!(search.needs_redraw());

        search.finish_redraw();
        assert!(!search.update_sort(SortKey::Size, false));
        assert!(!search.needs_redraw());

        search.clear_filter();
        assert!(search.needs_redraw());
    }

    #[test]
    fn sampling_draws_distinct_indices() {
        let mut rng = Rng::with_seed(7);
        let picks = sample_indices(10, 4, &mut rng);
        assert_eq!(picks.len(), 4);
        let unique: HashSet<_> = picks.iter().collect();
        assert_eq!(unique.len(), 4);
        assert!(picks.windows(2).all(|w| w[0] < w[1]));
        assert!(picks.iter().all(|&i| i < 10));
    }

    #[test]
    fn sampling_caps_at_population() {
        let mut rng = Rng::with_seed(1);
        assert_eq!(sample_indices(3, 10, &mut rng), vec![0, 1, 2]);
        assert!(sample_indices(0, 5, &mut rng).is_empty());
    }

    #[test]
    fn update_data_requires_ready_index() {
        let index = ResourceIndex::new(None);
        let mut search = MediaSearch::default();
        let mut rng = Rng::with_seed(0);
        assert!(matches!(search.update_data(&index, &mut rng), Err(IndexError::NotReady(_))));
    }
}
