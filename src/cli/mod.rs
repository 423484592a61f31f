pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::{AdlensError, Result};
use crate::domain::Query;

#[derive(Parser)]
#[command(name = "adlens")]
#[command(about = "Facebook Ads Library collector and creative-angle analyzer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect ads by scrolling the rendered library feed
    Scrape {
        #[command(flatten)]
        query: QueryArgs,

        /// Output file for the run document
        #[arg(short, long, default_value = "facebook_ads.json")]
        output: PathBuf,

        /// Show the browser window instead of running headless
        #[arg(long)]
        no_headless: bool,

        /// Override the maximum number of scroll cycles
        #[arg(long)]
        max_scrolls: Option<u32>,
    },
    /// Collect ads through the official Ads Archive API
    Api {
        #[command(flatten)]
        query: QueryArgs,

        /// Ads Archive access token
        #[arg(short, long)]
        token: String,

        /// Output file for the run document
        #[arg(short, long, default_value = "facebook_ads.json")]
        output: PathBuf,

        /// Results per API page
        #[arg(long, default_value_t = 500)]
        limit: u32,
    },
    /// Analyze a previously collected run document
    Analyze {
        /// Run document to analyze
        input: PathBuf,

        /// Export the summary to a JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

/// Search parameters: either a full library URL or the discrete values.
#[derive(Args)]
pub struct QueryArgs {
    /// Full Ads Library URL (alternative to the discrete parameters)
    #[arg(long, conflicts_with_all = ["page_id", "search_term"])]
    pub url: Option<String>,

    /// Advertiser page id
    #[arg(long)]
    pub page_id: Option<String>,

    /// Search term
    #[arg(long)]
    pub search_term: Option<String>,

    /// Window start, YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,

    /// Window end, YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<String>,

    /// Country code
    #[arg(long, default_value = "FR")]
    pub country: String,
}

impl QueryArgs {
    /// Turn the arguments into a validated [`Query`].
    ///
    /// Missing parameters are input errors, reported before anything is
    /// launched.
    pub fn resolve(&self) -> Result<Query> {
        if let Some(ref url) = self.url {
            let query = Query::from_url(url)?;
            if query.start_date.is_empty() || query.end_date.is_empty() {
                return Err(AdlensError::InvalidInput(
                    "URL carries no start_date[min]/start_date[max]; pass --start-date/--end-date instead".into(),
                ));
            }
            return Ok(query);
        }

        match (&self.page_id, &self.search_term, &self.start_date, &self.end_date) {
            (Some(page_id), Some(term), Some(start), Some(end)) => {
                Ok(Query::new(page_id, term, start, end, &self.country))
            }
            _ => Err(AdlensError::InvalidInput(
                "provide either --url or all of --page-id, --search-term, --start-date, --end-date"
                    .into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(url: Option<&str>) -> QueryArgs {
        QueryArgs {
            url: url.map(String::from),
            page_id: None,
            search_term: None,
            start_date: None,
            end_date: None,
            country: "FR".to_string(),
        }
    }

    #[test]
    fn test_resolve_from_full_url() {
        let url = "https://www.facebook.com/ads/library/?q=probiotiques&view_all_page_id=42\
                   &start_date[min]=2025-01-01&start_date[max]=2025-12-31&country=FR";
        let query = args(Some(url)).resolve().unwrap();
        assert_eq!(query.page_id, "42");
        assert_eq!(query.start_date, "2025-01-01");
    }

    #[test]
    fn test_resolve_rejects_url_without_window() {
        let url = "https://www.facebook.com/ads/library/?q=probiotiques&view_all_page_id=42";
        assert!(args(Some(url)).resolve().is_err());
    }

    #[test]
    fn test_resolve_requires_all_discrete_parameters() {
        let mut incomplete = args(None);
        incomplete.page_id = Some("42".into());
        incomplete.search_term = Some("probiotiques".into());
        // Dates missing.
        assert!(incomplete.resolve().is_err());
    }

    #[test]
    fn test_resolve_discrete_parameters() {
        let mut full = args(None);
        full.page_id = Some("42".into());
        full.search_term = Some("probiotiques".into());
        full.start_date = Some("2025-01-01".into());
        full.end_date = Some("2025-12-31".into());
        let query = full.resolve().unwrap();
        assert!(query.url.is_some());
    }
}
