//! Angle Classifier: buckets collected ad text into marketing-angle
//! categories.
//!
//! The taxonomy is configuration, not control flow: each group is an
//! ordered list of `(category id, predicate)` rules, so adding a category
//! never touches the classification loop. Three groups are evaluated
//! independently (promotional, product focus, health benefit) and a single
//! ad can contribute one count to each.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::AdRecord;

/// Discount mentions like "-20%"; the capture itself names the category.
static PROMO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-\d+%)").expect("valid regex"));

/// Headline length bounds (chars): shorter is a button, longer is body copy.
const HEADLINE_MIN_CHARS: usize = 10;
const HEADLINE_MAX_CHARS: usize = 150;

/// CTA line length bounds.
const CTA_MIN_CHARS: usize = 5;
const CTA_MAX_CHARS: usize = 60;

/// Keyword predicate over lower-cased creative text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Predicate {
    /// Every keyword must appear.
    AllOf(Vec<String>),
    /// At least one keyword must appear.
    AnyOf(Vec<String>),
}

impl Predicate {
    pub fn matches(&self, lower_text: &str) -> bool {
        match self {
            Predicate::AllOf(words) => words.iter().all(|w| lower_text.contains(w.as_str())),
            Predicate::AnyOf(words) => words.iter().any(|w| lower_text.contains(w.as_str())),
        }
    }
}

/// One named classification bucket definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub predicate: Predicate,
}

impl Rule {
    fn all_of(id: &str, words: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            predicate: Predicate::AllOf(words.iter().map(|w| w.to_string()).collect()),
        }
    }

    fn any_of(id: &str, words: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            predicate: Predicate::AnyOf(words.iter().map(|w| w.to_string()).collect()),
        }
    }
}

/// The fixed angle taxonomy a run classifies against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    pub products: Vec<Rule>,
    pub benefits: Vec<Rule>,
    /// Lower-cased markers that flag a line as a call-to-action.
    pub cta_keywords: Vec<String>,
}

impl Default for Taxonomy {
    /// The probiotics-advertiser taxonomy this tool was built around.
    fn default() -> Self {
        Self {
            products: vec![
                Rule::all_of("Focus Probiotiques", &["probiotiques", "indispensable"]),
                Rule::any_of("Focus Glutamine", &["glutamine"]),
                Rule::any_of("DIJO RESET", &["reset"]),
                Rule::any_of("Pack/Bundle", &["pack", "associez"]),
            ],
            benefits: vec![
                Rule::any_of("Équilibre microbiote", &["microbiote"]),
                Rule::any_of("Flore intestinale", &["flore intestinale"]),
                Rule::any_of("Anti-ballonnements", &["ventre gonflé", "ballonnement"]),
                Rule::any_of(
                    "Perte de poids / Métabolisme",
                    &["poids", "minceur", "métabolisme"],
                ),
                Rule::any_of("Anti-stress", &["stress", "anxiété"]),
            ],
            cta_keywords: ["learn more", "découvrez", "profitez", "prenez soin"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Occurrence count plus the first matching record, kept as the exemplar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AngleCategory {
    pub count: u64,
    pub exemplar: AdRecord,
}

/// Full classification of a collected set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AngleReport {
    pub promotional: BTreeMap<String, AngleCategory>,
    pub products: BTreeMap<String, AngleCategory>,
    pub benefits: BTreeMap<String, AngleCategory>,
    /// Launch counts keyed "YYYY-MM", from parsed start dates.
    pub monthly_distribution: BTreeMap<String, u64>,
    /// Distinct headlines (first creative line), discovery order.
    pub unique_headlines: Vec<String>,
    /// Distinct call-to-action lines, discovery order.
    pub unique_ctas: Vec<String>,
}

impl AngleReport {
    pub fn total_classified(&self) -> usize {
        self.promotional.len() + self.products.len() + self.benefits.len()
    }
}

/// Classify every record against the taxonomy.
///
/// One increment per matching ad per category, regardless of how many
/// times a keyword occurs in its text. The first matching record becomes
/// the category exemplar and is never replaced.
pub fn classify(ads: &[AdRecord], taxonomy: &Taxonomy) -> AngleReport {
    let mut report = AngleReport::default();
    let mut seen_headlines = HashSet::new();
    let mut seen_ctas = HashSet::new();

    for ad in ads {
        let text = ad.joined_text();
        let lower = ad.joined_text_lower();

        if let Some(caps) = PROMO_RE.captures(&text) {
            bump(&mut report.promotional, &caps[1], ad);
        }
        for rule in &taxonomy.products {
            if rule.predicate.matches(&lower) {
                bump(&mut report.products, &rule.id, ad);
            }
        }
        for rule in &taxonomy.benefits {
            if rule.predicate.matches(&lower) {
                bump(&mut report.benefits, &rule.id, ad);
            }
        }

        if let Some(headline) = ad.headline() {
            let chars = headline.chars().count();
            if chars > HEADLINE_MIN_CHARS
                && chars < HEADLINE_MAX_CHARS
                && seen_headlines.insert(headline.to_string())
            {
                report.unique_headlines.push(headline.to_string());
            }
        }

        for line in &ad.text_lines {
            let line_lower = line.to_lowercase();
            let chars = line.chars().count();
            if chars > CTA_MIN_CHARS
                && chars < CTA_MAX_CHARS
                && taxonomy.cta_keywords.iter().any(|k| line_lower.contains(k.as_str()))
                && seen_ctas.insert(line.clone())
            {
                report.unique_ctas.push(line.clone());
            }
        }

        if let Some(date) = ad.date_start {
            let month = date.format("%Y-%m").to_string();
            *report.monthly_distribution.entry(month).or_insert(0) += 1;
        }
    }

    report
}

fn bump(group: &mut BTreeMap<String, AngleCategory>, id: &str, ad: &AdRecord) {
    group
        .entry(id.to_string())
        .or_insert_with(|| AngleCategory {
            count: 0,
            exemplar: ad.clone(),
        })
        .count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ad(id: &str, lines: &[&str]) -> AdRecord {
        let mut ad = AdRecord::new(id.to_string());
        ad.text_lines = lines.iter().map(|l| l.to_string()).collect();
        ad
    }

    #[test]
    fn test_promo_and_product_from_one_ad() {
        let ads = vec![ad(
            "1",
            &["profitez de -20% sur nos probiotiques indispensables"],
        )];
        let report = classify(&ads, &Taxonomy::default());

        assert_eq!(report.promotional["-20%"].count, 1);
        assert_eq!(report.products["Focus Probiotiques"].count, 1);
    }

    #[test]
    fn test_groups_are_independent() {
        let ads = vec![ad(
            "1",
            &["-30% sur la glutamine, fini le stress et le ventre gonflé"],
        )];
        let report = classify(&ads, &Taxonomy::default());

        assert!(report.promotional.contains_key("-30%"));
        assert!(report.products.contains_key("Focus Glutamine"));
        assert!(report.benefits.contains_key("Anti-stress"));
        assert!(report.benefits.contains_key("Anti-ballonnements"));
    }

    #[test]
    fn test_one_increment_per_ad_not_per_occurrence() {
        let ads = vec![ad("1", &["microbiote microbiote microbiote"])];
        let report = classify(&ads, &Taxonomy::default());
        assert_eq!(report.benefits["Équilibre microbiote"].count, 1);
    }

    #[test]
    fn test_exemplar_is_first_match_and_never_replaced() {
        let ads = vec![
            ad("first", &["une cure reset pour bien commencer"]),
            ad("second", &["DIJO RESET : le programme complet et détaillé"]),
        ];
        let report = classify(&ads, &Taxonomy::default());

        let category = &report.products["DIJO RESET"];
        assert_eq!(category.count, 2);
        assert_eq!(category.exemplar.id, "first");
    }

    #[test]
    fn test_all_of_requires_every_keyword() {
        let ads = vec![ad("1", &["nos probiotiques sont excellents"])];
        let report = classify(&ads, &Taxonomy::default());
        // "indispensable" is missing.
        assert!(!report.products.contains_key("Focus Probiotiques"));
    }

    #[test]
    fn test_headlines_and_ctas_deduped_in_order() {
        let ads = vec![
            ad("1", &["Un ventre apaisé au quotidien", "Découvrez la cure"]),
            ad("2", &["Un ventre apaisé au quotidien", "Learn More maintenant"]),
            ad("3", &["Deuxième accroche testée ici"]),
        ];
        let report = classify(&ads, &Taxonomy::default());

        assert_eq!(
            report.unique_headlines,
            vec!["Un ventre apaisé au quotidien", "Deuxième accroche testée ici"]
        );
        assert_eq!(
            report.unique_ctas,
            vec!["Découvrez la cure", "Learn More maintenant"]
        );
    }

    #[test]
    fn test_monthly_distribution() {
        let mut a = ad("1", &["texte"]);
        a.date_start = NaiveDate::from_ymd_opt(2025, 3, 10);
        let mut b = ad("2", &["texte"]);
        b.date_start = NaiveDate::from_ymd_opt(2025, 3, 25);
        let mut c = ad("3", &["texte"]);
        c.date_start = NaiveDate::from_ymd_opt(2025, 4, 1);

        let report = classify(&[a, b, c], &Taxonomy::default());
        assert_eq!(report.monthly_distribution["2025-03"], 2);
        assert_eq!(report.monthly_distribution["2025-04"], 1);
    }

    #[test]
    fn test_unmatched_ads_classify_nowhere() {
        let ads = vec![ad("1", &["rien d'intéressant dans ce texte"])];
        let report = classify(&ads, &Taxonomy::default());
        assert_eq!(report.total_classified(), 0);
    }
}
