//! Reporter: renders a run document into analyst-readable text and a
//! compact JSON summary.
//!
//! Pure functions of the document; the CLI decides where the text goes.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::angles::{AngleCategory, AngleReport};
use crate::domain::{AdRecord, Platform};
use crate::output::RunDocument;

const RULE: &str = "======================================================================";

/// Counts and exemplars for one taxonomy group, in export form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupSummary {
    pub counts: BTreeMap<String, u64>,
    pub examples: BTreeMap<String, AdRecord>,
}

impl GroupSummary {
    fn from_group(group: &BTreeMap<String, AngleCategory>) -> Self {
        Self {
            counts: group.iter().map(|(k, v)| (k.clone(), v.count)).collect(),
            examples: group
                .iter()
                .map(|(k, v)| (k.clone(), v.exemplar.clone()))
                .collect(),
        }
    }
}

/// Compact export written by `analyze --export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_ads: usize,
    pub period: Period,
    pub promotional_angles: GroupSummary,
    pub product_angles: GroupSummary,
    pub benefit_angles: GroupSummary,
    pub monthly_distribution: BTreeMap<String, u64>,
    pub unique_headlines: Vec<String>,
    pub unique_ctas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    pub start: String,
    pub end: String,
}

/// Build the exportable summary for a document.
pub fn summarize(document: &RunDocument) -> Summary {
    let empty = AngleReport::default();
    let angles = document.creative_angles.as_ref().unwrap_or(&empty);

    Summary {
        total_ads: document.total_ads,
        period: Period {
            start: document.query.start_date.clone(),
            end: document.query.end_date.clone(),
        },
        promotional_angles: GroupSummary::from_group(&angles.promotional),
        product_angles: GroupSummary::from_group(&angles.products),
        benefit_angles: GroupSummary::from_group(&angles.benefits),
        monthly_distribution: angles.monthly_distribution.clone(),
        unique_headlines: angles.unique_headlines.clone(),
        unique_ctas: angles.unique_ctas.clone(),
    }
}

/// Render the full text report.
pub fn render(document: &RunDocument) -> String {
    let mut out = String::new();
    let empty = AngleReport::default();
    let angles = document.creative_angles.as_ref().unwrap_or(&empty);
    let total = document.total_ads;

    header(&mut out, "📊 VUE D'ENSEMBLE");
    let _ = writeln!(out, "Total de publicités récupérées : {total}");
    let _ = writeln!(
        out,
        "Publicités dans la période     : {}",
        document.stats.ads_in_range
    );
    let _ = writeln!(
        out,
        "Publicités hors période        : {}",
        document.stats.ads_out_of_range
    );
    let _ = writeln!(
        out,
        "Nombre de scrolls effectués    : {}",
        document.stats.scrolls_performed
    );
    if document.expected_total > 0 {
        let _ = writeln!(out, "Total annoncé par la page      : {}", document.expected_total);
    }
    let _ = writeln!(out, "\n🔍 Recherche");
    let _ = writeln!(out, "  Terme : {}", document.query.search_term);
    let _ = writeln!(
        out,
        "  Période : {} → {}",
        document.query.start_date, document.query.end_date
    );
    let _ = writeln!(out, "  Pays : {}", document.query.country);

    header(&mut out, "🎯 ANGLES PROMOTIONNELS");
    render_count_group(&mut out, &angles.promotional, total, BarScale::HalfCount);

    header(&mut out, "📦 ANGLES PRODUITS");
    render_count_group(&mut out, &angles.products, total, BarScale::Percentage);

    header(&mut out, "💊 BÉNÉFICES SANTÉ MIS EN AVANT");
    render_count_group(&mut out, &angles.benefits, total, BarScale::Percentage);

    header(&mut out, "📅 CHRONOLOGIE DES CAMPAGNES");
    if angles.monthly_distribution.is_empty() {
        let _ = writeln!(out, "  Aucune information de date disponible");
    } else {
        for (month, count) in &angles.monthly_distribution {
            let bar = "█".repeat(*count as usize);
            let _ = writeln!(out, "  {month:15} : {count:3} {bar}");
        }
    }

    header(&mut out, "✍️  EXEMPLES DE COPY (HEADLINES)");
    for (i, headline) in angles.unique_headlines.iter().take(15).enumerate() {
        let _ = writeln!(out, "  {:2}. {}", i + 1, headline);
    }

    header(&mut out, "🎬 CALL-TO-ACTIONS UTILISÉS");
    for (i, cta) in angles.unique_ctas.iter().take(10).enumerate() {
        let _ = writeln!(out, "  {:2}. {}", i + 1, cta);
    }

    header(&mut out, "💡 INSIGHTS STRATÉGIQUES");
    render_insights(&mut out, document, angles);

    let _ = writeln!(out, "\n{RULE}");
    out
}

enum BarScale {
    /// One bar block per two ads (absolute counts).
    HalfCount,
    /// One bar block per five percentage points.
    Percentage,
}

fn header(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "  {title}");
    let _ = writeln!(out, "{RULE}\n");
}

fn render_count_group(
    out: &mut String,
    group: &BTreeMap<String, AngleCategory>,
    total_ads: usize,
    scale: BarScale,
) {
    if group.is_empty() {
        let _ = writeln!(out, "  Aucun angle identifié");
        return;
    }

    for (name, category) in by_count_desc(group) {
        match scale {
            BarScale::HalfCount => {
                let bar = "█".repeat((category.count / 2) as usize);
                let _ = writeln!(out, "  {name:30} : {:3} {bar}", category.count);
            }
            BarScale::Percentage => {
                let pct = if total_ads > 0 {
                    category.count as f64 / total_ads as f64 * 100.0
                } else {
                    0.0
                };
                let bar = "█".repeat((pct / 5.0) as usize);
                let _ = writeln!(out, "  {name:30} : {:3} ({pct:5.1}%) {bar}", category.count);
            }
        }

        let _ = writeln!(out, "\n  💡 Exemple de créa typique:");
        render_exemplar(out, &category.exemplar);
        let _ = writeln!(out);
    }
}

fn render_exemplar(out: &mut String, ad: &AdRecord) {
    let period = format!(
        "{} → {}",
        ad.date_start_text.as_deref().unwrap_or("N/A"),
        ad.date_end_text.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(out, "    📅 Période: {period}");
    let _ = writeln!(out, "    🆔 ID: {}", ad.id);
    if !ad.platforms.is_empty() {
        let platforms: Vec<String> = ad
            .platforms
            .iter()
            .map(|p| platform_name(*p).to_string())
            .collect();
        let _ = writeln!(out, "    📱 Plateformes: {}", platforms.join(", "));
    }
    if !ad.text_lines.is_empty() {
        let _ = writeln!(out, "    📝 Contenu:");
        for (i, line) in ad.text_lines.iter().take(5).enumerate() {
            let shown: String = line.chars().take(80).collect();
            let ellipsis = if line.chars().count() > 80 { "..." } else { "" };
            let _ = writeln!(out, "       {}. {shown}{ellipsis}", i + 1);
        }
    }
}

fn render_insights(out: &mut String, document: &RunDocument, angles: &AngleReport) {
    let total = document.total_ads;

    if let Some((name, category)) = by_count_desc(&angles.promotional).into_iter().next() {
        let _ = writeln!(out, "✓ Angle promotionnel principal : {name}");
        let _ = writeln!(out, "  Utilisé dans {} publicités", category.count);
    }

    if !angles.products.is_empty() {
        let _ = writeln!(out, "\n✓ Mix produits :");
        for (name, category) in by_count_desc(&angles.products).into_iter().take(3) {
            let _ = writeln!(out, "  - {name} : {} mentions", category.count);
        }
    }

    if let Some((name, category)) = by_count_desc(&angles.benefits).into_iter().next() {
        if total > 0 {
            let share = category.count as f64 / total as f64 * 100.0;
            let _ = writeln!(out, "\n✓ Bénéfice le plus mis en avant : {name}");
            let _ = writeln!(out, "  Utilisé dans {share:.0}% des pubs");
        }
    }

    if total > 0 && !angles.unique_headlines.is_empty() {
        let ratio = angles.unique_headlines.len() as f64 / total as f64;
        if ratio > 0.8 {
            let _ = writeln!(
                out,
                "\n✓ Forte diversité des headlines : {} headlines pour {total} pubs",
                angles.unique_headlines.len()
            );
            let _ = writeln!(out, "  → Tests A/B intensifs sur les accroches");
        } else if ratio < 0.3 {
            let _ = writeln!(
                out,
                "\n✓ Headlines réutilisés : {} headlines pour {total} pubs",
                angles.unique_headlines.len()
            );
            let _ = writeln!(out, "  → Approche plus conservative, messages éprouvés");
        }
    }

    let platforms = platform_counts(&document.ads);
    if platforms.len() > 1 {
        let names: Vec<&str> = platforms.keys().map(|p| platform_name(*p)).collect();
        let _ = writeln!(
            out,
            "\n✓ Stratégie multi-plateformes : {} plateformes",
            platforms.len()
        );
        let _ = writeln!(out, "  → {}", names.join(", "));
    }
}

fn by_count_desc(group: &BTreeMap<String, AngleCategory>) -> Vec<(&String, &AngleCategory)> {
    let mut entries: Vec<_> = group.iter().collect();
    entries.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
    entries
}

fn platform_counts(ads: &[AdRecord]) -> BTreeMap<Platform, u64> {
    let mut counts = BTreeMap::new();
    for ad in ads {
        for platform in &ad.platforms {
            *counts.entry(*platform).or_insert(0) += 1;
        }
    }
    counts
}

fn platform_name(platform: Platform) -> &'static str {
    match platform {
        Platform::Facebook => "Facebook",
        Platform::Instagram => "Instagram",
        Platform::Messenger => "Messenger",
        Platform::AudienceNetwork => "Audience Network",
    }
}
