//! Dependents-page scraping fallback.
//!
//! When the external lookup tool is unavailable, the public
//! `<owner>/<repo>/network/dependents` page still lists dependent
//! repositories. Rows are `div.Box-row` with one anchor for the owner and
//! one hovercard anchor for the repository; pagination is a single link in
//! `div.paginate-container`.

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use devreach_shared::{Dependent, ReachError, RepoRef, Result};

/// User-Agent string for scrape requests.
const USER_AGENT: &str = concat!("devreach/", env!("CARGO_PKG_VERSION"));

/// Hard cap on pages followed; the page lists 30 rows each, far more than
/// any run's processing cap consumes.
pub(crate) const MAX_PAGES: usize = 3;

/// Fetch and scrape the dependents listing for `target`.
pub(crate) async fn scrape_dependents(target: &RepoRef, base: &str) -> Result<Vec<Dependent>> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| ReachError::Network(format!("failed to build HTTP client: {e}")))?;

    let mut url = Url::parse(&format!(
        "{}/{}/{}/network/dependents",
        base.trim_end_matches('/'),
        target.owner,
        target.repo
    ))
    .map_err(|e| ReachError::Resolver(format!("invalid dependents URL: {e}")))?;
    let mut dependents = Vec::new();

    for page in 1..=MAX_PAGES {
        debug!(%url, page, "fetching dependents page");

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ReachError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReachError::Network(format!("{url}: HTTP {status}")));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ReachError::Network(format!("{url}: failed to read body: {e}")))?;

        let (mut page_deps, next) = parse_dependents_page(&html);
        if page_deps.is_empty() {
            warn!(%url, "no dependent rows found on page");
        }
        dependents.append(&mut page_deps);

        // Pagination links may be relative; resolve against the current page.
        match next.and_then(|href| url.join(&href).ok()) {
            Some(next_url) => url = next_url,
            None => break,
        }
    }

    Ok(dependents)
}

/// Extract `owner/repo` rows and the next-page link from one listing page.
fn parse_dependents_page(html: &str) -> (Vec<Dependent>, Option<String>) {
    let doc = Html::parse_document(html);
    let row_sel = Selector::parse("div.Box-row").expect("valid selector");
    let owner_sel =
        Selector::parse("a[data-repository-hovercards-enabled]").expect("valid selector");
    let repo_sel = Selector::parse(r#"a[data-hovercard-type="repository"]"#).expect("valid selector");
    let next_sel = Selector::parse("div.paginate-container a").expect("valid selector");

    let mut dependents = Vec::new();
    for row in doc.select(&row_sel) {
        let owner = row
            .select(&owner_sel)
            .next()
            .map(|a| a.text().collect::<String>().trim().to_string());
        let repo = row
            .select(&repo_sel)
            .next()
            .map(|a| a.text().collect::<String>().trim().to_string());

        if let (Some(owner), Some(repo)) = (owner, repo) {
            dependents.push(Dependent {
                name: Some(format!("{owner}/{repo}")),
                stars: None,
            });
        }
    }

    let next = doc
        .select(&next_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    (dependents, next)
}
