//! Crawl pipeline tests against an in-memory site
use async_trait::async_trait;
use calamine::{Data, Reader, open_workbook_auto};
use product_sheet_crawler_lib::application::{CrawlSession, export_records};
use product_sheet_crawler_lib::infrastructure::{
    CrawlSettings, FetchError, PageFetcher, SelectorConfig, WebCrawler, XlsxTableWriter,
};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use url::Url;

const LINK_CLASS: &str = "a-link-normal s-underline-text s-underline-link-text s-link-style a-text-normal";

struct FakeSite {
    pages: HashMap<String, String>,
}

#[async_trait]
impl PageFetcher for FakeSite {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn entry(name: &str, href: &str) -> String {
    format!(
        r#"<div class="a-section a-spacing-small a-spacing-top-small">
             <a class="{LINK_CLASS}" href="{href}"><span class="a-size-medium a-color-base a-text-normal">{name}</span></a>
             <span class="a-icon-alt">4.5 out of 5 stars</span>
             <span class="a-price-whole">19.</span><span class="a-price-fraction">99</span>
           </div>"#
    )
}

fn attribute_table(rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(k, v)| {
            format!(
                r#"<tr><td class="a-span3"><span class="a-text-bold">{k}</span></td><td class="a-span9"><span class="a-size-base">{v}</span></td></tr>"#
            )
        })
        .collect();
    format!(r#"<table class="a-normal a-spacing-micro">{rows}</table>"#)
}

fn site() -> FakeSite {
    let listing = format!(
        r#"<div class="s-main-slot s-result-list s-search-results sg-row">{}{}{}</div>"#,
        entry("Widget", "/dp/W1"),
        entry("Gizmo", "/dp/G1"),
        entry("Widget", "/dp/W1"),
    );
    let pages = HashMap::from([
        ("https://shop.test/s?k=widget".to_string(), listing),
        (
            "https://shop.test/dp/W1".to_string(),
            attribute_table(&[("Brand", "Acme"), ("Color", "Red")]),
        ),
        (
            "https://shop.test/dp/G1".to_string(),
            attribute_table(&[("Brand", "Gadgetry"), ("Weight", "2 kg")]),
        ),
    ]);
    FakeSite { pages }
}

/// Serves `site` until `interrupt_at` is requested, then cancels the crawl
/// and never answers that request.
struct InterruptingSite {
    site: FakeSite,
    interrupt_at: String,
    cancel: CancellationToken,
}

#[async_trait]
impl PageFetcher for InterruptingSite {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if url == self.interrupt_at {
            self.cancel.cancel();
            std::future::pending::<()>().await;
        }
        self.site.fetch(url).await
    }
}

fn session_with<F: PageFetcher>(fetcher: F) -> CrawlSession<F> {
    let settings = CrawlSettings {
        site_domain: Url::parse("https://shop.test").unwrap(),
        max_concurrent_requests: 2,
        follow_pagination: false,
        max_pages: 1,
    };
    CrawlSession::new(WebCrawler::new(fetcher, &SelectorConfig::default(), settings).unwrap())
}

fn session() -> CrawlSession<FakeSite> {
    session_with(site())
}

#[tokio::test]
async fn crawled_products_become_deduplicated_rows() {
    let seeds = vec!["https://shop.test/s?k=widget".to_string()];
    let (stats, collection) = session()
        .collect(&seeds, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(stats.records_emitted, 3);
    assert_eq!(collection.pages_visited, 4);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("OutputData.xlsx");
    let mut writer = XlsxTableWriter::new(&path, "Sheet1");
    let summary = export_records(collection.records, &mut writer).unwrap();
    assert_eq!(summary.written, 2);
    assert_eq!(summary.duplicates, 1);

    let mut workbook = open_workbook_auto(&path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    let header: Vec<String> = range.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
    assert_eq!(header, vec!["Product Name", "Rating", "Price", "Brand", "Color", "Weight"]);

    assert_eq!(range.get_value((1, 0)), Some(&Data::String("Widget".into())));
    assert_eq!(range.get_value((1, 2)), Some(&Data::String("19.99".into())));
    assert_eq!(range.get_value((1, 4)), Some(&Data::String("Red".into())));
    assert_eq!(range.get_value((2, 0)), Some(&Data::String("Gizmo".into())));
    assert_eq!(range.get_value((2, 5)), Some(&Data::String("2 kg".into())));
    assert!(matches!(range.get_value((2, 4)), None | Some(Data::Empty)));
}

#[tokio::test]
async fn cancelled_crawl_collects_nothing_but_still_returns() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let (stats, collection) = session()
        .collect(&["https://shop.test/s?k=widget".to_string()], &cancel)
        .await
        .unwrap();

    assert!(stats.cancelled);
    assert!(collection.records.is_empty());
}

#[tokio::test]
async fn records_collected_before_interrupt_are_still_exported() {
    let cancel = CancellationToken::new();
    let fetcher = InterruptingSite {
        site: site(),
        interrupt_at: "https://shop.test/s?k=gizmo".to_string(),
        cancel: cancel.clone(),
    };
    let seeds = vec![
        "https://shop.test/s?k=widget".to_string(),
        "https://shop.test/s?k=gizmo".to_string(),
        "https://shop.test/s?k=never".to_string(),
    ];

    let (stats, collection) = session_with(fetcher).collect(&seeds, &cancel).await.unwrap();

    assert!(stats.cancelled);
    assert_eq!(stats.seeds, 2);
    let names: Vec<&str> = collection.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Widget", "Gizmo", "Widget"]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("OutputData.xlsx");
    let mut writer = XlsxTableWriter::new(&path, "Sheet1");
    let summary = export_records(collection.records, &mut writer).unwrap();
    assert_eq!(summary.written, 2);

    let mut workbook = open_workbook_auto(&path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    assert_eq!(range.get_value((1, 0)), Some(&Data::String("Widget".into())));
    assert_eq!(range.get_value((2, 0)), Some(&Data::String("Gizmo".into())));
}
