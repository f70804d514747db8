//! Grid layout: decides whether the gallery must be rebuilt, resized or left
//! alone, and places items into columns.

use std::collections::HashSet;

use crate::media::is_video;
use crate::search::MediaSearch;

/// Horizontal space reserved for the scrollbar and padding, in pixels.
pub const GUTTER: f64 = 17.0;

/// Growth below this many pixels does not relayout a clean grid.
pub const RESIZE_TOLERANCE: f64 = 20.0;

/// Upper bound on the number of columns.
pub const MAX_COLUMNS: usize = 256;

/// One placed media item.
#[derive(Debug, Clone, PartialEq)]
pub struct GridItem {
    pub locator: String,
    pub path: String,
    pub is_video: bool,
    pub selected: bool,
    pub max_height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    pub width: f64,
    pub items: Vec<GridItem>,
}

/// What a rebuild produced, for the presentation layer to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct RebuildReport {
    pub columns: usize,
    pub column_width: f64,
    /// Scroll offset to restore, immediately and again after the host's own
    /// layout pass.
    pub scroll_restore: Option<f64>,
    /// Locators of freshly created images that need lazy-load observers.
    pub lazy_load: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOutcome {
    /// Container has no width yet.
    Deferred,
    /// Clean grid and a small growth; nothing to do.
    Skipped,
    /// Same column count; only widths changed.
    Resized { column_width: f64 },
    Rebuilt(RebuildReport),
}

/// Number of columns for a container: `ceil(width / max_item_width)`, between
/// 1 and [`MAX_COLUMNS`].
pub fn column_count(width: f64, max_item_width: u32) -> usize {
    let max = f64::from(max_item_width.max(1));
    ((width / max).ceil() as usize).clamp(1, MAX_COLUMNS)
}

/// Pixel width of each of `columns` columns.
pub fn column_width(width: f64, columns: usize) -> f64 {
    ((width - GUTTER) / columns.max(1) as f64).max(0.0)
}

#[derive(Debug, Default)]
pub struct MediaGrid {
    columns: Vec<Column>,
    last_width: f64,
    laid_out: bool,
    scroll: f64,
    selection: HashSet<String>,
}

impl MediaGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn items(&self) -> impl Iterator<Item = &GridItem> {
        self.columns.iter().flat_map(|c| c.items.iter())
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Record the container's scroll offset as reported by the host.
    pub fn set_scroll(&mut self, offset: f64) {
        self.scroll = offset.max(0.0);
    }

    /// Lay out the search results for a container `width` pixels wide.
    pub fn update_display(&mut self, search: &mut MediaSearch, width: f64) -> LayoutOutcome {
        if !width.is_finite() || width <= 0.0 {
            return LayoutOutcome::Deferred;
        }

        let dirty = search.needs_redraw();
        if !dirty
            && self.laid_out
            && width >= self.last_width
            && width - self.last_width < RESIZE_TOLERANCE
        {
            return LayoutOutcome::Skipped;
        }

        let count = column_count(width, search.state().max_width);
        if !dirty && self.laid_out && count == self.columns.len() {
            let column_width = column_width(width, count);
            for column in &mut self.columns {
                column.width = column_width;
            }
            self.last_width = width;
            return LayoutOutcome::Resized { column_width };
        }

        if count != self.columns.len() {
            search.mark_redraw();
        }
        LayoutOutcome::Rebuilt(self.rebuild(search, width, count))
    }

    fn rebuild(&mut self, search: &mut MediaSearch, width: f64, count: usize) -> RebuildReport {
        let scroll = self.scroll;
        let selection = std::mem::take(&mut self.selection);
        let column_width = column_width(width, count);
        let max_height = search.state().max_height;

        self.columns = (0..count).map(|_| Column { width: column_width, items: Vec::new() }).collect();

        let mut lazy_load = Vec::new();
        for (i, resource) in search.items().iter().enumerate() {
            let item = GridItem {
                locator: resource.key.clone(),
                path: resource.path.clone(),
                is_video: is_video(&resource.key),
                selected: selection.contains(&resource.key),
                max_height,
            };
            if item.selected {
                self.selection.insert(item.locator.clone());
            }
            if !item.is_video {
                lazy_load.push(item.locator.clone());
            }
            self.columns[i % count].items.push(item);
        }

        search.finish_redraw();
        self.laid_out = true;
        self.last_width = width;
        tracing::debug!("grid rebuilt: {} items in {} columns", search.len(), count);

        RebuildReport {
            columns: count,
            column_width,
            scroll_restore: (scroll > 0.0).then_some(scroll),
            lazy_load,
        }
    }

    fn set_selected(&mut self, locator: &str, selected: bool) -> bool {
        let mut found = false;
        for item in self.columns.iter_mut().flat_map(|c| c.items.iter_mut()) {
            if item.locator == locator {
                item.selected = selected;
                found = true;
            }
        }
        if found {
            if selected {
                self.selection.insert(locator.to_string());
            } else {
                self.selection.remove(locator);
            }
        }
        found
    }

    /// Select a placed item. Returns false if no item has this locator.
    pub fn select(&mut self, locator: &str) -> bool {
        self.set_selected(locator, true)
    }

    /// Flip an item's selection. Returns the new state.
    pub fn toggle_select(&mut self, locator: &str) -> bool {
        let selected = !self.selection.contains(locator);
        self.set_selected(locator, selected) && selected
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        for item in self.columns.iter_mut().flat_map(|c| c.items.iter_mut()) {
            item.selected = false;
        }
    }

    pub fn is_selected(&self, locator: &str) -> bool {
        self.selection.contains(locator)
    }

    /// Vault paths of selected items in placement order.
    pub fn selected_paths(&self) -> Vec<&str> {
        self.items().filter(|i| i.selected).map(|i| i.path.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SearchState;
    use crate::index::MediaResource;
    use crate::vault::FileStat;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn search_with(paths: &[&str], max_width: u32) -> MediaSearch {
        let t = Utc.timestamp_opt(1, 0).unwrap();
        let stat = FileStat { created: t, modified: t, size: 1 };
        let resources = paths.iter().map(|p| MediaResource::new(p, stat)).collect();
        MediaSearch::with_results(SearchState { max_width, ..Default::default() }, resources)
    }

    fn key(path: &str) -> String {
        format!("app://local/{path}?1000")
    }

    #[rstest]
    #[case(1000.0, 200, 5)]
    #[case(1001.0, 200, 6)]
    #[case(150.0, 200, 1)]
    #[case(0.5, 200, 1)]
    #[case(1.0e12, 1, MAX_COLUMNS)]
    fn column_count_rounds_up(#[case] width: f64, #[case] max: u32, #[case] expected: usize) {
        assert_eq!(column_count(width, max), expected);
    }

    #[rstest]
    #[case(f64::INFINITY)]
    #[case(f64::NAN)]
    #[case(-5.0)]
    fn unusable_width_defers(#[case] width: f64) {
        let mut search = search_with(&["a.png"], 200);
        let mut grid = MediaGrid::new();
        assert_eq!(grid.update_display(&mut search, width), LayoutOutcome::Deferred);
        assert!(grid.columns().is_empty());
    }

    #[test]
    fn zero_width_defers() {
        let mut search = search_with(&["a.png"], 200);
        let mut grid = MediaGrid::new();
        assert_eq!(grid.update_display(&mut search, 0.0), LayoutOutcome::Deferred);
        assert!(search.needs_redraw());
    }

    #[test]
    fn rebuild_places_round_robin() {
        let mut search = search_with(&["a.png", "b.png", "c.mp4", "d.png", "e.png"], 200);
        let mut grid = MediaGrid::new();

        let LayoutOutcome::Rebuilt(report) = grid.update_display(&mut search, 617.0) else {
            panic!("expected rebuild");
        };

        assert_eq!(report.columns, 4);
        assert_eq!(report.column_width, 150.0);
        assert!(!search.needs_redraw());
        let layout: Vec<Vec<&str>> = grid
            .columns()
            .iter()
            .map(|c| c.items.iter().map(|i| i.path.as_str()).collect())
            .collect();
        assert_eq!(layout, vec![vec!["a.png", "e.png"], vec!["b.png"], vec!["c.mp4"], vec!["d.png"]]);
        assert!(grid.columns()[2].items[0].is_video);
        assert_eq!(report.lazy_load.len(), 4);
        assert!(!report.lazy_load.contains(&key("c.mp4")));
    }

    #[test]
    fn small_growth_skips_and_shrink_resizes() {
        let mut search = search_with(&["a.png", "b.png"], 200);
        let mut grid = MediaGrid::new();
        grid.update_display(&mut search, 617.0);

        assert_eq!(grid.update_display(&mut search, 630.0), LayoutOutcome::Skipped);
        assert_eq!(
            grid.update_display(&mut search, 610.0),
            LayoutOutcome::Resized { column_width: (610.0 - GUTTER) / 4.0 }
        );
    }

    #[test]
    fn column_count_change_rebuilds() {
        let mut search = search_with(&["a.png", "b.png"], 200);
        let mut grid = MediaGrid::new();
        grid.update_display(&mut search, 617.0);

        let outcome = grid.update_display(&mut search, 1000.0);
        assert!(matches!(outcome, LayoutOutcome::Rebuilt(ref r) if r.columns == 5));
    }

    #[test]
    fn dirty_search_always_rebuilds() {
        let mut search = search_with(&["a.png"], 200);
        let mut grid = MediaGrid::new();
        grid.update_display(&mut search, 617.0);

        search.set_tag("cat");
        assert!(matches!(grid.update_display(&mut search, 617.0), LayoutOutcome::Rebuilt(_)));
    }

    #[test]
    fn rebuild_restores_selection_and_scroll() {
        let mut search = search_with(&["a.png", "b.png", "c.png"], 200);
        let mut grid = MediaGrid::new();
        grid.update_display(&mut search, 617.0);

        assert!(grid.select(&key("b.png")));
        grid.set_scroll(340.0);
        search.mark_redraw();

        let LayoutOutcome::Rebuilt(report) = grid.update_display(&mut search, 617.0) else {
            panic!("expected rebuild");
        };
        assert_eq!(report.scroll_restore, Some(340.0));
        assert_eq!(grid.selected_paths(), vec!["b.png"]);
    }

    #[test]
    fn selection_of_vanished_items_is_dropped() {
        let mut search = search_with(&["a.png", "b.png"], 200);
        let mut grid = MediaGrid::new();
        grid.update_display(&mut search, 617.0);
        grid.select(&key("b.png"));

        let mut search = search_with(&["a.png"], 200);
        grid.update_display(&mut search, 617.0);
        assert!(!grid.is_selected(&key("b.png")));
        assert!(grid.selected_paths().is_empty());
    }

    #[test]
    fn toggle_and_clear_selection() {
        let mut search = search_with(&["a.png", "b.png"], 200);
        let mut grid = MediaGrid::new();
        grid.update_display(&mut search, 617.0);

        assert!(grid.toggle_select(&key("a.png")));
        assert!(!grid.toggle_select(&key("a.png")));
        assert!(!grid.select("app://local/missing.png?1"));
        grid.select(&key("a.png"));
        grid.select(&key("b.png"));
        grid.clear_selection();
        assert!(grid.selected_paths().is_empty());
    }

    #[test]
    fn max_height_is_applied() {
        let mut search = search_with(&["a.png"], 200);
        search.set_max_height(Some(300));
        let mut grid = MediaGrid::new();
        grid.update_display(&mut search, 617.0);
        assert_eq!(grid.items().next().unwrap().max_height, Some(300));
    }
}
