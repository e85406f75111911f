//! In-memory catalog: views, search and pagination over parsed records

use crate::constants::PAGE_SIZE;
use crate::types::{DefaultViewPolicy, ImageRecord};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::Range;
use thiserror::Error;
use tracing::debug;

/// Rejected page navigation. The current page is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("'{0}' is not a page number")]
    NotANumber(String),
    #[error("page {requested} is outside 1..={total}")]
    OutOfRange { requested: usize, total: usize },
}

/// One page of the current view, handed to the renderer
#[derive(Debug)]
pub struct Page<'a> {
    pub records: Vec<&'a ImageRecord>,
    /// 1-based
    pub index: usize,
    pub total_pages: usize,
    pub view_len: usize,
}

/// Number of pages for a view of `len` records. Never less than one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Slice bounds of 1-based `page_index`, or `None` when it is out of range.
pub fn page_bounds(len: usize, page_size: usize, page_index: usize) -> Option<Range<usize>> {
    if page_index == 0 || page_index > total_pages(len, page_size) {
        return None;
    }
    let start = (page_index - 1) * page_size;
    Some(start.min(len)..(start + page_size).min(len))
}

/// Parse the text of a page-jump field
pub fn parse_page_input(input: &str) -> Result<usize, NavError> {
    input
        .trim()
        .parse()
        .map_err(|_| NavError::NotANumber(input.trim().to_string()))
}

pub struct Catalog {
    records: Vec<ImageRecord>,
    // Indices into `records`
    view: Vec<usize>,
    page_index: usize,
    page_size: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Catalog {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            view: Vec::new(),
            page_index: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replace every record. The view stays empty until a view is requested.
    pub fn load(&mut self, records: Vec<ImageRecord>) {
        debug!(count = records.len(), "Catalog loaded");
        self.records = records;
        self.view.clear();
        self.page_index = 1;
    }

    #[cfg(test)]
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.view.len(), self.page_size)
    }

    /// Records of the current view, in view order
    #[cfg(test)]
    pub fn view_records(&self) -> impl Iterator<Item = &ImageRecord> + '_ {
        self.view.iter().map(move |&i| &self.records[i])
    }

    /// Build the home view according to `policy`
    pub fn default_view<R: Rng + ?Sized>(&mut self, policy: &DefaultViewPolicy, rng: &mut R) {
        self.view = match policy {
            DefaultViewPolicy::Shuffle => {
                let mut all: Vec<usize> = (0..self.records.len()).collect();
                all.shuffle(rng);
                all
            }
            DefaultViewPolicy::KeywordCurated { keywords } => self.curated(keywords, rng),
        };
        self.page_index = 1;
        debug!(len = self.view.len(), ?policy, "Default view built");
    }

    /// Keyword matches plus a random top-up fill the first page in random
    /// order. Records left out of the top-up follow in random order. When the
    /// matches alone fill a page, only the matches are shown.
    fn curated<R: Rng + ?Sized>(&self, keywords: &[String], rng: &mut R) -> Vec<usize> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let (mut matches, mut others): (Vec<usize>, Vec<usize>) =
            (0..self.records.len()).partition(|&i| {
                let title = self.records[i].title.to_lowercase();
                keywords.iter().any(|k| title.contains(k.as_str()))
            });

        if matches.len() >= self.page_size {
            matches.shuffle(rng);
            return matches;
        }

        others.shuffle(rng);
        let top_up = (self.page_size - matches.len()).min(others.len());
        let rest = others.split_off(top_up);

        let mut view = matches;
        view.extend(others);
        view.shuffle(rng);
        view.extend(rest);
        view
    }

    /// Case-insensitive substring search over titles, in catalog order.
    /// The query is matched as typed, surrounding spaces included. A blank
    /// query shows the whole catalog unshuffled. Returns the hit count.
    pub fn search(&mut self, query: &str) -> usize {
        let blank = query.trim().is_empty();
        let query = query.to_lowercase();
        self.view = if blank {
            (0..self.records.len()).collect()
        } else {
            self.records
                .iter()
                .enumerate()
                .filter(|(_, r)| r.title.to_lowercase().contains(&query))
                .map(|(i, _)| i)
                .collect()
        };
        self.page_index = 1;
        debug!(query = %query, hits = self.view.len(), "Search applied");
        self.view.len()
    }

    pub fn current_page(&self) -> Page<'_> {
        let range = page_bounds(self.view.len(), self.page_size, self.page_index)
            .unwrap_or(0..0);
        Page {
            records: self.view[range].iter().map(|&i| &self.records[i]).collect(),
            index: self.page_index,
            total_pages: self.total_pages(),
            view_len: self.view.len(),
        }
    }

    /// Jump to a 1-based page. Out-of-range targets leave the page unchanged.
    pub fn go_to_page(&mut self, target: usize) -> Result<(), NavError> {
        let total = self.total_pages();
        if !(1..=total).contains(&target) {
            return Err(NavError::OutOfRange {
                requested: target,
                total,
            });
        }
        self.page_index = target;
        Ok(())
    }

    /// Returns true if the page changed
    pub fn next(&mut self) -> bool {
        if self.page_index < self.total_pages() {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Returns true if the page changed
    pub fn previous(&mut self) -> bool {
        if self.page_index > 1 {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn record(i: usize, title: &str) -> ImageRecord {
        ImageRecord::new(format!("https://img.example/{}.jpg", i), title)
    }

    /// 150 records, the first 20 titled with "love"
    fn love_catalog() -> Catalog {
        let records = (0..150)
            .map(|i| {
                if i < 20 {
                    record(i, &format!("Lovely LOVE note {}", i))
                } else {
                    record(i, &format!("Sunset {}", i))
                }
            })
            .collect();
        let mut catalog = Catalog::default();
        catalog.load(records);
        catalog
    }

    fn plain_catalog(n: usize) -> Catalog {
        let mut catalog = Catalog::default();
        catalog.load((0..n).map(|i| record(i, &format!("Photo {}", i))).collect());
        catalog
    }

    fn urls(page: &Page<'_>) -> Vec<String> {
        page.records.iter().map(|r| r.url.clone()).collect()
    }

    fn curated() -> DefaultViewPolicy {
        DefaultViewPolicy::KeywordCurated {
            keywords: vec!["love".to_string()],
        }
    }

    #[test]
    fn total_pages_never_zero() {
        assert_eq!(total_pages(0, 100), 1);
        assert_eq!(total_pages(1, 100), 1);
        assert_eq!(total_pages(100, 100), 1);
        assert_eq!(total_pages(101, 100), 2);
        assert_eq!(total_pages(250, 100), 3);
    }

    #[test]
    fn page_bounds_rejects_out_of_range() {
        assert_eq!(page_bounds(250, 100, 3), Some(200..250));
        assert_eq!(page_bounds(0, 100, 1), Some(0..0));
        assert_eq!(page_bounds(250, 100, 0), None);
        assert_eq!(page_bounds(250, 100, 4), None);
    }

    #[test]
    fn curated_scenario_fills_first_page() {
        let mut catalog = love_catalog();
        let mut rng = StdRng::seed_from_u64(7);
        catalog.default_view(&curated(), &mut rng);

        assert_eq!(catalog.total_pages(), 2);
        let first = catalog.current_page();
        assert_eq!(first.records.len(), 100);
        let love_on_first = first
            .records
            .iter()
            .filter(|r| r.title.to_lowercase().contains("love"))
            .count();
        assert_eq!(love_on_first, 20);
        let first_urls: HashSet<_> = urls(&first).into_iter().collect();
        assert_eq!(first_urls.len(), 100);

        catalog.go_to_page(2).unwrap();
        let second = catalog.current_page();
        assert_eq!(second.records.len(), 50);
        let second_urls: HashSet<_> = urls(&second).into_iter().collect();
        assert_eq!(second_urls.len(), 50);
        assert!(first_urls.is_disjoint(&second_urls));
        assert!(second.records.iter().all(|r| !r.title.contains("LOVE")));
    }

    #[test]
    fn curated_with_enough_matches_excludes_others() {
        let mut catalog = Catalog::default();
        let records = (0..130)
            .map(|i| record(i, if i < 110 { "love" } else { "other" }))
            .collect();
        catalog.load(records);
        catalog.default_view(&curated(), &mut StdRng::seed_from_u64(1));

        assert_eq!(catalog.view_len(), 110);
        assert!(catalog.view_records().all(|r| r.title == "love"));
    }

    #[test]
    fn curated_without_keywords_tops_up_from_everything() {
        let mut catalog = plain_catalog(30);
        let policy = DefaultViewPolicy::KeywordCurated {
            keywords: vec!["  ".to_string()],
        };
        catalog.default_view(&policy, &mut StdRng::seed_from_u64(3));
        assert_eq!(catalog.view_len(), 30);
        assert_eq!(catalog.total_pages(), 1);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut catalog = plain_catalog(250);
        catalog.default_view(&DefaultViewPolicy::Shuffle, &mut StdRng::seed_from_u64(42));

        let seen: HashSet<_> = catalog.view_records().map(|r| r.url.clone()).collect();
        assert_eq!(seen.len(), 250);
        assert_eq!(catalog.total_pages(), 3);
    }

    #[test]
    fn shuffle_is_reproducible_with_seed() {
        let mut a = plain_catalog(50);
        let mut b = plain_catalog(50);
        a.default_view(&DefaultViewPolicy::Shuffle, &mut StdRng::seed_from_u64(9));
        b.default_view(&DefaultViewPolicy::Shuffle, &mut StdRng::seed_from_u64(9));
        assert!(a.view_records().eq(b.view_records()));
    }

    #[test]
    fn pages_reconstruct_the_view() {
        let mut catalog = plain_catalog(345);
        catalog.default_view(&DefaultViewPolicy::Shuffle, &mut StdRng::seed_from_u64(5));
        let expected: Vec<_> = catalog.view_records().cloned().collect();

        let mut rebuilt = Vec::new();
        for p in 1..=catalog.total_pages() {
            catalog.go_to_page(p).unwrap();
            rebuilt.extend(catalog.current_page().records.into_iter().cloned());
        }
        assert_eq!(rebuilt, expected);
    }

    #[test]
    fn search_matches_titles_case_insensitively() {
        let mut catalog = Catalog::default();
        catalog.load(vec![
            ImageRecord::new("https://love.example/1.jpg", "Sunset"),
            ImageRecord::new("https://x/2.jpg", "Red HEARTS"),
            ImageRecord::new("https://x/3.jpg", "hearts and roses"),
        ]);
        assert_eq!(catalog.search("hearts"), 2);
        let titles: Vec<_> = catalog.view_records().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Red HEARTS", "hearts and roses"]);

        // url is not searched
        assert_eq!(catalog.search("love"), 0);
        assert_eq!(catalog.total_pages(), 1);
    }

    #[test]
    fn blank_search_is_full_catalog_in_order() {
        let mut catalog = plain_catalog(120);
        let mut rng = StdRng::seed_from_u64(11);
        catalog.default_view(&DefaultViewPolicy::Shuffle, &mut rng);

        catalog.search("");
        let empty: Vec<_> = catalog.view_records().cloned().collect();
        catalog.search("   ");
        let spaces: Vec<_> = catalog.view_records().cloned().collect();

        assert_eq!(empty, spaces);
        assert_eq!(empty, catalog.records().to_vec());
    }

    #[test]
    fn repeating_a_search_returns_to_first_page() {
        let mut catalog = Catalog::new(5);
        catalog.load((0..20).map(|i| record(i, "love")).collect());
        catalog.search("love");
        catalog.go_to_page(3).unwrap();
        let hits = catalog.search("love");
        assert_eq!(hits, 20);
        assert_eq!(catalog.page_index(), 1);
    }

    #[test]
    fn search_keeps_surrounding_spaces() {
        let mut catalog = Catalog::default();
        catalog.load(vec![
            ImageRecord::new("https://x/1.jpg", "Lovely day"),
            ImageRecord::new("https://x/2.jpg", "A lovely rose"),
            ImageRecord::new("https://x/3.jpg", "glove "),
        ]);
        assert_eq!(catalog.search("love"), 3);

        assert_eq!(catalog.search(" love"), 1);
        let titles: Vec<_> = catalog.view_records().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["A lovely rose"]);

        assert_eq!(catalog.search("love "), 1);
        let urls: Vec<_> = catalog.view_records().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["https://x/3.jpg"]);
    }

    #[test]
    fn view_changes_reset_page() {
        let mut catalog = plain_catalog(300);
        catalog.search("");
        catalog.go_to_page(3).unwrap();
        catalog.search("photo");
        assert_eq!(catalog.page_index(), 1);

        catalog.go_to_page(2).unwrap();
        catalog.default_view(&DefaultViewPolicy::Shuffle, &mut StdRng::seed_from_u64(0));
        assert_eq!(catalog.page_index(), 1);

        catalog.go_to_page(2).unwrap();
        catalog.load(Vec::new());
        assert_eq!(catalog.page_index(), 1);
        assert_eq!(catalog.view_len(), 0);
    }

    #[test]
    fn go_to_page_is_idempotent() {
        let mut catalog = plain_catalog(250);
        catalog.search("");
        catalog.go_to_page(2).unwrap();
        let once = urls(&catalog.current_page());
        catalog.go_to_page(2).unwrap();
        let twice = urls(&catalog.current_page());
        assert_eq!(once, twice);
    }

    #[test]
    fn invalid_jump_keeps_current_page() {
        let mut catalog = plain_catalog(250);
        catalog.search("");
        catalog.go_to_page(2).unwrap();
        let before = urls(&catalog.current_page());

        assert_eq!(
            catalog.go_to_page(4),
            Err(NavError::OutOfRange {
                requested: 4,
                total: 3
            })
        );
        assert!(catalog.go_to_page(0).is_err());
        assert_eq!(catalog.page_index(), 2);
        assert_eq!(urls(&catalog.current_page()), before);
    }

    #[test]
    fn small_catalog_has_one_page() {
        let mut catalog = plain_catalog(5);
        catalog.default_view(&DefaultViewPolicy::Shuffle, &mut StdRng::seed_from_u64(2));
        assert_eq!(catalog.total_pages(), 1);
        assert!(!catalog.previous());
        assert!(!catalog.next());
        assert_eq!(catalog.page_index(), 1);
        assert_eq!(catalog.current_page().records.len(), 5);
    }

    #[test]
    fn next_and_previous_stop_at_edges() {
        let mut catalog = plain_catalog(201);
        catalog.search("");
        assert!(catalog.next());
        assert!(catalog.next());
        assert!(!catalog.next());
        assert_eq!(catalog.page_index(), 3);
        assert_eq!(catalog.current_page().records.len(), 1);
        assert!(catalog.previous());
        assert!(catalog.previous());
        assert!(!catalog.previous());
        assert_eq!(catalog.page_index(), 1);
    }

    #[test]
    fn empty_view_still_reports_one_page() {
        let mut catalog = plain_catalog(10);
        catalog.search("nothing matches this");
        let page = catalog.current_page();
        assert!(page.records.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.index, 1);
    }

    #[test]
    fn page_input_parsing() {
        assert_eq!(parse_page_input(" 3 "), Ok(3));
        assert_eq!(
            parse_page_input("three"),
            Err(NavError::NotANumber("three".to_string()))
        );
        assert!(parse_page_input("-1").is_err());
        assert!(parse_page_input("").is_err());
    }
}
