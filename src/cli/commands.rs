use std::path::Path;

use crate::angles::{self, Taxonomy};
use crate::api::AdsArchiveClient;
use crate::app::Result;
use crate::collector::{ChromePage, Collector, CollectorConfig};
use crate::dates;
use crate::domain::{CollectionResult, DateWindow, Query};
use crate::output::{self, RunDocument};
use crate::report;

/// Scrape the rendered library feed and write the run document.
pub async fn scrape(
    query: Query,
    output_path: &Path,
    headless: bool,
    max_scrolls: Option<u32>,
) -> Result<()> {
    // Window bounds are validated before any browser is launched.
    let window = DateWindow::new(
        dates::parse_iso_date(&query.start_date)?,
        dates::parse_iso_date(&query.end_date)?,
    );

    let mut config = CollectorConfig {
        headless,
        ..CollectorConfig::default()
    };
    if let Some(budget) = max_scrolls {
        config.max_scrolls = budget;
    }

    let url = query.url.clone().unwrap_or_else(|| query.build_url());
    println!("Navigation vers: {url}");

    let page = ChromePage::open(&url, &config).await?;
    let collector = Collector::new(config);
    let result = collector.collect(&page, window).await;

    if let Err(e) = page.close().await {
        tracing::warn!(error = %e, "browser did not close cleanly");
    }

    finish_run(result, query, output_path)
}

/// Collect through the official API and write the run document.
pub async fn api(query: Query, token: String, limit: u32, output_path: &Path) -> Result<()> {
    // Same pre-flight validation as the scraper path.
    dates::parse_iso_date(&query.start_date)?;
    dates::parse_iso_date(&query.end_date)?;

    println!("Utilisation de l'API Ads Archive...");
    let client = AdsArchiveClient::new(token);
    let ads = client.search(&query, limit).await?;

    let mut result = CollectionResult::new();
    for ad in ads {
        result.insert(ad);
    }

    finish_run(result, query, output_path)
}

fn finish_run(result: CollectionResult, query: Query, output_path: &Path) -> Result<()> {
    let report = angles::classify(result.ads(), &Taxonomy::default());
    let document = RunDocument::from_run(result, report, query);
    output::write_document(output_path, &document)?;

    if document.success {
        println!("\n✓ Succès ! {} publicités récupérées", document.total_ads);
    } else {
        println!(
            "\n✗ Run interrompu ({}) — {} publicités partielles conservées",
            document.error.as_deref().unwrap_or("erreur inconnue"),
            document.total_ads
        );
    }
    println!("✓ Données sauvegardées dans: {}", output_path.display());
    Ok(())
}

/// Render the angle report for a stored run document.
pub fn analyze(input: &Path, export: Option<&Path>) -> Result<()> {
    let document = output::read_document(input)?;

    if !document.success {
        println!(
            "⚠ Ce run s'était terminé en erreur: {}",
            document.error.as_deref().unwrap_or("inconnue")
        );
    }

    print!("{}", report::render(&document));

    if let Some(path) = export {
        let summary = report::summarize(&document);
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)?;
        println!("📄 Résumé exporté : {}", path.display());
    }

    Ok(())
}
