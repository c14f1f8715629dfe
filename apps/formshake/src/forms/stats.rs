//! Translation coverage per form and language.
//!
//! A translation is classified by how many of the form's keys it covers
//! and is only published once its entry count reaches
//! `PUBLISH_THRESHOLD` of the form's key count.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::errors::AppError;
use crate::forms::models::{FormDefinition, Translation};
use crate::forms::store::Catalog;

pub const PUBLISH_THRESHOLD: f32 = 0.8;
/// Below this share of covered keys a translation is `NearMissing`.
pub const NEAR_MISSING_THRESHOLD: f32 = 0.2;

/// Completeness class, worst first. Any extra entry makes a translation `Extra`
/// regardless of its share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStyle {
    Extra,
    Missing,
    NearMissing,
    Incomplete,
    NearComplete,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coverage {
    pub translated: usize,
    /// Number of keys in the form.
    pub total: usize,
    pub extra_count: usize,
    pub style: CoverageStyle,
    pub published: bool,
    /// Keys without a translation; only listed in verbose reports.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub untranslated: Vec<String>,
    /// Translated strings the form no longer contains; only listed in verbose reports.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormStats {
    pub form_id: String,
    pub title: Option<String>,
    pub keys: usize,
    pub languages: BTreeMap<String, Coverage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub languages: Vec<String>,
    pub forms: Vec<FormStats>,
}

/// Whether `translation` covers enough of `form` to be served.
pub fn is_published(form: &FormDefinition, translation: &Translation) -> bool {
    translation.len() as f32 >= PUBLISH_THRESHOLD * form.keys().len() as f32
}

/// Coverage of `form` by `translation`; an absent translation is `Missing`.
pub fn coverage(form: &FormDefinition, translation: Option<&Translation>, verbose: bool) -> Coverage {
    let keys = form.keys();
    let tkeys: BTreeSet<&str> = translation
        .map(|t| t.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let translated = keys.intersection(&tkeys).count();
    let untranslated: Vec<&str> = keys.difference(&tkeys).copied().collect();
    let extra: Vec<&str> = tkeys.difference(&keys).copied().collect();

    let n = keys.len() as f32;
    let covered = translated as f32;
    let style = if !extra.is_empty() {
        CoverageStyle::Extra
    } else if translated == 0 {
        CoverageStyle::Missing
    } else if covered < n * NEAR_MISSING_THRESHOLD {
        CoverageStyle::NearMissing
    } else if covered < n * PUBLISH_THRESHOLD {
        CoverageStyle::Incomplete
    } else if translated < keys.len() {
        CoverageStyle::NearComplete
    } else {
        CoverageStyle::Complete
    };

    let listed = |items: Vec<&str>| -> Vec<String> {
        if verbose {
            items.into_iter().map(str::to_string).collect()
        } else {
            Vec::new()
        }
    };

    Coverage {
        translated,
        total: keys.len(),
        extra_count: extra.len(),
        style,
        published: translation.is_some_and(|t| is_published(form, t)),
        untranslated: listed(untranslated),
        extra: listed(extra),
    }
}

/// Coverage of every catalogued form in every known language, optionally
/// narrowed to one form and/or one language.
pub fn build_report(
    catalog: &Catalog,
    form_id: Option<&str>,
    lang_id: Option<&str>,
    verbose: bool,
) -> Result<StatsReport, AppError> {
    let mut languages: BTreeSet<&str> = catalog
        .values()
        .flat_map(|entry| entry.translations.keys().map(String::as_str))
        .collect();

    if let Some(lang_id) = lang_id {
        if !languages.contains(lang_id) {
            return Err(AppError::NotFound(format!("No '{lang_id}' translations")));
        }
        languages = BTreeSet::from([lang_id]);
    }
    if let Some(form_id) = form_id {
        if !catalog.contains_key(form_id) {
            return Err(AppError::NotFound(format!("Form '{form_id}' not found")));
        }
    }

    let forms = catalog
        .iter()
        .filter(|(id, _)| form_id.map_or(true, |f| f == id.as_str()))
        .map(|(id, entry)| FormStats {
            form_id: id.clone(),
            title: entry.form.title.clone(),
            keys: entry.form.keys().len(),
            languages: languages
                .iter()
                .map(|&lang| {
                    let translation = entry.translations.get(lang);
                    (lang.to_string(), coverage(&entry.form, translation, verbose))
                })
                .collect(),
        })
        .collect();

    Ok(StatsReport {
        languages: languages.into_iter().map(str::to_string).collect(),
        forms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::models::FormRow;
    use crate::forms::store::CatalogEntry;

    /// A form with keys "k0".."k{n-1}".
    fn make_form(n: usize) -> FormDefinition {
        FormDefinition {
            title: Some("Kindergeld".to_string()),
            page_width: 595.0,
            page_height: 842.0,
            rows: (0..n)
                .map(|i| FormRow {
                    page: 0,
                    x1: 0.0,
                    y1: i as f32 * 20.0,
                    x2: 100.0,
                    y2: i as f32 * 20.0 + 10.0,
                    content: format!("k{i}"),
                    append: None,
                    align: Default::default(),
                })
                .collect(),
        }
    }

    fn make_translation(keys: impl IntoIterator<Item = &'static str>) -> Translation {
        keys.into_iter()
            .map(|k| (k.to_string(), k.to_uppercase()))
            .collect()
    }

    #[test]
    fn test_styles_follow_covered_share() {
        let form = make_form(10);
        let cases = [
            (vec![], CoverageStyle::Missing),
            (vec!["k0"], CoverageStyle::NearMissing),
            (vec!["k0", "k1"], CoverageStyle::Incomplete),
            (vec!["k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7"], CoverageStyle::NearComplete),
            (
                vec!["k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7", "k8", "k9"],
                CoverageStyle::Complete,
            ),
        ];
        for (keys, style) in cases {
            let t = make_translation(keys.clone());
            assert_eq!(coverage(&form, Some(&t), false).style, style, "{keys:?}");
        }
    }

    #[test]
    fn test_extra_entries_win() {
        let form = make_form(2);
        let t = make_translation(["k0", "k1", "Alte Zeile"]);
        let c = coverage(&form, Some(&t), true);
        assert_eq!(c.style, CoverageStyle::Extra);
        assert_eq!(c.translated, 2);
        assert_eq!(c.extra, vec!["Alte Zeile".to_string()]);
        assert!(c.published);
    }

    #[test]
    fn test_absent_translation_is_missing_and_unpublished() {
        let c = coverage(&make_form(3), None, true);
        assert_eq!(c.style, CoverageStyle::Missing);
        assert_eq!(c.untranslated, vec!["k0", "k1", "k2"]);
        assert!(!c.published);
    }

    #[test]
    fn test_publish_threshold() {
        let form = make_form(5);
        assert!(!is_published(&form, &make_translation(["k0", "k1", "k2"])));
        assert!(is_published(&form, &make_translation(["k0", "k1", "k2", "k3"])));
    }

    #[test]
    fn test_verbose_controls_lists() {
        let form = make_form(3);
        let t = make_translation(["k0"]);
        let quiet = coverage(&form, Some(&t), false);
        assert!(quiet.untranslated.is_empty());
        assert_eq!(coverage(&form, Some(&t), true).untranslated, vec!["k1", "k2"]);
    }

    fn make_catalog() -> Catalog {
        let mut kg = CatalogEntry {
            form: make_form(2),
            translations: BTreeMap::new(),
        };
        kg.translations.insert("en".to_string(), make_translation(["k0", "k1"]));
        let mut pkh = CatalogEntry {
            form: make_form(4),
            translations: BTreeMap::new(),
        };
        pkh.translations.insert("tr".to_string(), make_translation(["k0"]));

        Catalog::from([("KG".to_string(), kg), ("PKH".to_string(), pkh)])
    }

    #[test]
    fn test_report_covers_every_form_language_pair() {
        let report = build_report(&make_catalog(), None, None, false).expect("report");
        assert_eq!(report.languages, vec!["en", "tr"]);
        assert_eq!(report.forms.len(), 2);

        let kg = &report.forms[0];
        assert_eq!(kg.form_id, "KG");
        assert_eq!(kg.title.as_deref(), Some("Kindergeld"));
        assert_eq!(kg.languages["en"].style, CoverageStyle::Complete);
        assert_eq!(kg.languages["tr"].style, CoverageStyle::Missing);

        let pkh = &report.forms[1];
        assert_eq!(pkh.languages["tr"].style, CoverageStyle::Incomplete);
        assert!(!pkh.languages["tr"].published);
    }

    #[test]
    fn test_report_filters() {
        let catalog = make_catalog();
        let report = build_report(&catalog, Some("PKH"), Some("tr"), false).expect("report");
        assert_eq!(report.languages, vec!["tr"]);
        assert_eq!(report.forms.len(), 1);
        assert_eq!(report.forms[0].languages.len(), 1);

        assert!(matches!(
            build_report(&catalog, Some("BerH"), None, false),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            build_report(&catalog, None, Some("fa"), false),
            Err(AppError::NotFound(_))
        ));
    }
}
