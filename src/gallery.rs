use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{Category, ContentItem, WallPosition};
use crate::error::QueryParseError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "new")]
    NewestFirst,
    #[serde(rename = "old")]
    OldestFirst,
}

impl FromStr for SortOrder {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" | "newest" => Ok(SortOrder::NewestFirst),
            "old" | "oldest" => Ok(SortOrder::OldestFirst),
            _ => Err(QueryParseError::Sort(s.to_string())),
        }
    }
}

/// Tab selection: every category, or exactly one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn key(self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.key(),
        }
    }

    pub fn accepts(self, category: Option<Category>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => category == Some(wanted),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CategoryFilter {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

/// What the visitor asked to see. Owned by whoever renders the gallery.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryState {
    pub search_text: String,
    pub category: CategoryFilter,
    pub sort: SortOrder,
}

impl QueryState {
    pub fn new(search_text: impl Into<String>, category: CategoryFilter, sort: SortOrder) -> Self {
        Self {
            search_text: search_text.into(),
            category,
            sort,
        }
    }

    pub fn needle(&self) -> String {
        self.search_text.trim().to_lowercase()
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        self.category.accepts(item.category) && matches_text(item, &self.needle())
    }
}

fn matches_text(item: &ContentItem, needle: &str) -> bool {
    needle.is_empty() || item.haystack().contains(needle)
}

/// Year ordering; undated items go last in either direction.
fn compare_years(a: Option<i32>, b: Option<i32>, sort: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match sort {
            SortOrder::NewestFirst => b.cmp(&a),
            SortOrder::OldestFirst => a.cmp(&b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Items passing both the category and text filters, stably sorted by year.
pub fn filter_and_sort<'a>(items: &'a [ContentItem], query: &QueryState) -> Vec<&'a ContentItem> {
    filtered_positions(items, query).into_iter().map(|i| &items[i]).collect()
}

fn filtered_positions(items: &[ContentItem], query: &QueryState) -> Vec<usize> {
    let needle = query.needle();
    let mut positions: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| query.category.accepts(item.category) && matches_text(item, &needle))
        .map(|(i, _)| i)
        .collect();

    positions.sort_by(|&a, &b| compare_years(items[a].year, items[b].year, query.sort));
    positions
}

/// Badge numbers for the category tabs. Ignores the search text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    all: usize,
    per_category: BTreeMap<Category, usize>,
}

impl CategoryCounts {
    pub fn from_items(items: &[ContentItem]) -> Self {
        let mut per_category: BTreeMap<Category, usize> = Category::ALL.into_iter().map(|c| (c, 0)).collect();

        for category in items.iter().filter_map(|item| item.category) {
            *per_category.entry(category).or_insert(0) += 1;
        }

        Self {
            all: items.len(),
            per_category,
        }
    }

    pub fn count(&self, filter: CategoryFilter) -> usize {
        match filter {
            CategoryFilter::All => self.all,
            CategoryFilter::Only(category) => self.per_category.get(&category).copied().unwrap_or(0),
        }
    }

    /// `(key, count)` pairs in tab order, starting with `all`.
    pub fn entries(&self) -> Vec<(&'static str, usize)> {
        std::iter::once(("all", self.all))
            .chain(Category::ALL.into_iter().map(|c| (c.key(), self.count(CategoryFilter::Only(c)))))
            .collect()
    }
}

/// Full-screen viewer over the filtered sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lightbox {
    #[default]
    Closed,
    Open(usize),
}

impl Lightbox {
    /// Open at `index` of a sequence of length `len`. Out of range leaves the state alone.
    pub fn open(self, index: usize, len: usize) -> Self {
        if index < len { Lightbox::Open(index) } else { self }
    }

    pub fn close(self) -> Self {
        Lightbox::Closed
    }

    pub fn next(self, len: usize) -> Self {
        match self {
            Lightbox::Open(i) if len > 0 => Lightbox::Open((i + 1) % len),
            _ => Lightbox::Closed,
        }
    }

    pub fn prev(self, len: usize) -> Self {
        match self {
            Lightbox::Open(i) if len > 0 => Lightbox::Open((i + len - 1) % len),
            _ => Lightbox::Closed,
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Lightbox::Closed => None,
            Lightbox::Open(i) => Some(i),
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Lightbox::Open(_))
    }
}

/// A collection plus the visitor's query and lightbox position.
///
/// The filtered view and the tab counts are cached and recomputed whenever their inputs
/// change. Changing the items or the query while the lightbox is open closes it.
#[derive(Clone, Debug)]
pub struct Gallery {
    items: Vec<ContentItem>,
    counts: CategoryCounts,
    query: QueryState,
    view: Vec<usize>,
    lightbox: Lightbox,
}

impl Gallery {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self::with_query(items, QueryState::default())
    }

    pub fn with_query(items: Vec<ContentItem>, query: QueryState) -> Self {
        let counts = CategoryCounts::from_items(&items);
        let view = filtered_positions(&items, &query);
        Self {
            items,
            counts,
            query,
            view,
            lightbox: Lightbox::Closed,
        }
    }

    pub fn set_items(&mut self, items: Vec<ContentItem>) {
        self.items = items;
        self.counts = CategoryCounts::from_items(&self.items);
        self.refresh();
    }

    pub fn set_query(&mut self, query: QueryState) {
        if query != self.query {
            self.query = query;
            self.refresh();
        }
    }

    pub fn set_search(&mut self, search_text: impl Into<String>) {
        let query = QueryState {
            search_text: search_text.into(),
            ..self.query.clone()
        };
        self.set_query(query);
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        let query = QueryState {
            category,
            ..self.query.clone()
        };
        self.set_query(query);
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        let query = QueryState {
            sort,
            ..self.query.clone()
        };
        self.set_query(query);
    }

    fn refresh(&mut self) {
        self.view = filtered_positions(&self.items, &self.query);
        if let Lightbox::Open(index) = self.lightbox {
            debug!(index, "filtered view changed, closing lightbox");
            self.lightbox = Lightbox::Closed;
        }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn counts(&self) -> &CategoryCounts {
        &self.counts
    }

    pub fn visible(&self) -> impl Iterator<Item = &ContentItem> + '_ {
        self.view.iter().map(|&i| &self.items[i])
    }

    pub fn visible_len(&self) -> usize {
        self.view.len()
    }

    pub fn lightbox(&self) -> Lightbox {
        self.lightbox
    }

    pub fn open(&mut self, index: usize) {
        self.lightbox = self.lightbox.open(index, self.view.len());
    }

    pub fn close(&mut self) {
        self.lightbox = self.lightbox.close();
    }

    pub fn next(&mut self) {
        self.lightbox = self.lightbox.next(self.view.len());
    }

    pub fn prev(&mut self) {
        self.lightbox = self.lightbox.prev(self.view.len());
    }

    pub fn active(&self) -> Option<&ContentItem> {
        self.lightbox
            .index()
            .and_then(|i| self.view.get(i))
            .map(|&position| &self.items[position])
    }
}

/// First item whose title contains `needle`, ignoring case.
pub fn find_by_title<'a>(items: &'a [ContentItem], needle: &str) -> Option<&'a ContentItem> {
    let needle = needle.to_lowercase();
    items.iter().find(|item| item.title.to_lowercase().contains(&needle))
}

/// Paintings grouped by where they hang, each group in collection order.
#[derive(Debug, Default, PartialEq)]
pub struct WallSections<'a> {
    pub portfolio: Vec<&'a ContentItem>,
    pub pre_portfolio: Vec<&'a ContentItem>,
    pub unplaced: Vec<&'a ContentItem>,
}

impl<'a> WallSections<'a> {
    pub fn partition(items: &'a [ContentItem]) -> Self {
        let mut sections = WallSections::default();
        for item in items {
            match item.wall_position {
                Some(WallPosition::Portfolio) => sections.portfolio.push(item),
                Some(WallPosition::PrePortfolio) => sections.pre_portfolio.push(item),
                None => sections.unplaced.push(item),
            }
        }
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn ids<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> Vec<&'a str> {
        items.into_iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn default_query_returns_everything_newest_first() {
        let items = seed::projects();
        let result = filter_and_sort(&items, &QueryState::default());

        assert_eq!(ids(result), ["p1", "p3", "p5", "p2", "p6", "p4"]);
    }

    #[test]
    fn oldest_first_keeps_insertion_order_for_equal_years() {
        let items = seed::projects();
        let query = QueryState::new("", CategoryFilter::All, SortOrder::OldestFirst);

        assert_eq!(ids(filter_and_sort(&items, &query)), ["p4", "p2", "p6", "p1", "p3", "p5"]);
    }

    #[test]
    fn search_is_case_insensitive_and_trimmed() {
        let items = seed::projects();
        let query = QueryState::new("  UNITY ", CategoryFilter::All, SortOrder::NewestFirst);

        assert_eq!(ids(filter_and_sort(&items, &query)), ["p3", "p6"]);
    }

    #[test]
    fn search_matches_mixed_case_tags() {
        let items = vec![ContentItem::new("x", "Jam", "x.png").with_tags(["Unity"])];
        let query = QueryState::new("unity", CategoryFilter::All, SortOrder::NewestFirst);

        assert_eq!(filter_and_sort(&items, &query).len(), 1);
    }

    #[test]
    fn category_and_text_filters_combine() {
        let items = seed::projects();
        let query = QueryState::new("oil", CategoryFilter::Only(Category::Game), SortOrder::NewestFirst);
        assert!(filter_and_sort(&items, &query).is_empty());

        let query = QueryState::new("oil", CategoryFilter::Only(Category::Painting), SortOrder::NewestFirst);
        assert_eq!(ids(filter_and_sort(&items, &query)), ["p1", "p4"]);
    }

    #[test]
    fn undated_items_sort_last_both_ways() {
        let items = vec![
            ContentItem::new("undated", "Sketch", "s.png"),
            ContentItem::new("old", "Old", "o.png").with_year(2001),
            ContentItem::new("new", "New", "n.png").with_year(2020),
        ];

        let newest = QueryState::default();
        assert_eq!(ids(filter_and_sort(&items, &newest)), ["new", "old", "undated"]);

        let oldest = QueryState::new("", CategoryFilter::All, SortOrder::OldestFirst);
        assert_eq!(ids(filter_and_sort(&items, &oldest)), ["old", "new", "undated"]);
    }

    #[test]
    fn counts_cover_every_tab() {
        let counts = CategoryCounts::from_items(&seed::projects());

        assert_eq!(
            counts.entries(),
            [("all", 6), ("painting", 2), ("3d", 2), ("game", 2)]
        );
        assert_eq!(CategoryCounts::from_items(&[]).count(CategoryFilter::Only(Category::Game)), 0);
    }

    #[test]
    fn uncategorized_items_only_count_towards_all() {
        let items = vec![ContentItem::new("a", "A", "a.png")];
        let counts = CategoryCounts::from_items(&items);

        assert_eq!(counts.count(CategoryFilter::All), 1);
        assert_eq!(counts.count(CategoryFilter::Only(Category::Painting)), 0);
    }

    #[test]
    fn parses_query_keys() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!("3d".parse::<CategoryFilter>(), Ok(CategoryFilter::Only(Category::ThreeD)));
        assert_eq!("old".parse::<SortOrder>(), Ok(SortOrder::OldestFirst));
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn lightbox_wraps_both_directions() {
        assert_eq!(Lightbox::Closed.open(0, 3).prev(3), Lightbox::Open(2));
        assert_eq!(Lightbox::Closed.open(2, 3).next(3), Lightbox::Open(0));
        assert_eq!(Lightbox::Open(1).close(), Lightbox::Closed);
    }

    #[test]
    fn lightbox_ignores_open_on_empty_or_out_of_range() {
        assert_eq!(Lightbox::Closed.open(0, 0), Lightbox::Closed);
        assert_eq!(Lightbox::Closed.open(5, 3), Lightbox::Closed);
        assert_eq!(Lightbox::Closed.next(3), Lightbox::Closed);
        assert_eq!(Lightbox::Closed.prev(3), Lightbox::Closed);
    }

    #[test]
    fn gallery_navigates_the_filtered_view() {
        let mut gallery = Gallery::new(seed::projects());
        gallery.set_category(CategoryFilter::Only(Category::Game));
        assert_eq!(gallery.visible_len(), 2);

        gallery.open(0);
        assert_eq!(gallery.active().map(|p| p.id.as_str()), Some("p3"));
        gallery.next();
        assert_eq!(gallery.active().map(|p| p.id.as_str()), Some("p6"));
        gallery.next();
        assert_eq!(gallery.active().map(|p| p.id.as_str()), Some("p3"));
        gallery.close();
        assert!(gallery.active().is_none());
    }

    #[test]
    fn gallery_closes_lightbox_when_query_changes() {
        let mut gallery = Gallery::new(seed::projects());
        gallery.open(3);
        assert!(gallery.lightbox().is_open());

        gallery.set_search("unity");
        assert_eq!(gallery.lightbox(), Lightbox::Closed);
        assert_eq!(ids(gallery.visible()), ["p3", "p6"]);
    }

    #[test]
    fn gallery_keeps_lightbox_when_query_is_unchanged() {
        let mut gallery = Gallery::new(seed::projects());
        gallery.open(1);
        gallery.set_sort(SortOrder::NewestFirst);

        assert_eq!(gallery.lightbox(), Lightbox::Open(1));
    }

    #[test]
    fn gallery_recounts_on_new_items() {
        let mut gallery = Gallery::new(seed::projects());
        gallery.open(0);
        gallery.set_items(seed::paintings_fallback());

        assert_eq!(gallery.counts().count(CategoryFilter::All), 2);
        assert_eq!(gallery.lightbox(), Lightbox::Closed);
    }

    #[test]
    fn finds_titles_by_fragment() {
        let items = seed::projects();
        assert_eq!(find_by_title(&items, "ultramarine").map(|p| p.id.as_str()), Some("p4"));
        assert!(find_by_title(&items, "taj").is_none());
    }

    #[test]
    fn partitions_wall_positions_in_order() {
        let mut a = ContentItem::new("a", "A", "a.png");
        a.wall_position = Some(WallPosition::Portfolio);
        let mut b = ContentItem::new("b", "B", "b.png");
        b.wall_position = Some(WallPosition::PrePortfolio);
        let c = ContentItem::new("c", "C", "c.png");
        let mut d = ContentItem::new("d", "D", "d.png");
        d.wall_position = Some(WallPosition::Portfolio);
        let items = vec![a, b, c, d];

        let sections = WallSections::partition(&items);
        assert_eq!(ids(sections.portfolio), ["a", "d"]);
        assert_eq!(ids(sections.pre_portfolio), ["b"]);
        assert_eq!(ids(sections.unplaced), ["c"]);
    }
}
