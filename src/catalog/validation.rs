use std::collections::HashSet;

use super::Catalog;

/// Validate a configured ballot at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_catalog(catalog: &Catalog) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if catalog.id.trim().is_empty() {
        errors.push("ballot.id: must not be empty".to_string());
    }

    if catalog.categories.is_empty() {
        errors.push("ballot.categories: at least one category is required".to_string());
    }

    let mut seen_ids = HashSet::new();
    for (i, category) in catalog.categories.iter().enumerate() {
        if category.id.trim().is_empty() {
            errors.push(format!("ballot.categories[{}].id: must not be empty", i));
        } else if !seen_ids.insert(category.id.as_str()) {
            errors.push(format!(
                "ballot.categories[{}].id: duplicate id '{}'",
                i, category.id
            ));
        }

        if category.nominees.is_empty() {
            errors.push(format!(
                "ballot.categories[{}].nominees: at least one nominee is required",
                i
            ));
        }

        let mut seen_nominees = HashSet::new();
        for (j, nominee) in category.nominees.iter().enumerate() {
            if !seen_nominees.insert(nominee.as_str()) {
                errors.push(format!(
                    "ballot.categories[{}].nominees[{}]: duplicate nominee '{}'",
                    i, j, nominee
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a pick against the ballot before it is written.
pub fn validate_pick(
    catalog: &Catalog,
    category_id: &str,
    will_win: Option<&str>,
    should_win: Option<&str>,
) -> Result<(), Vec<String>> {
    let Some(category) = catalog.category(category_id) else {
        return Err(vec![format!(
            "unknown category '{}' (see `will-win categories`)",
            category_id
        )]);
    };

    let mut errors = Vec::new();
    for (label, value) in [("will win", will_win), ("should win", should_win)] {
        if let Some(nominee) = value {
            if !category.has_nominee(nominee) {
                errors.push(format!(
                    "{}: '{}' is not nominated for {}",
                    label, nominee, category.name
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    fn category(id: &str, nominees: &[&str]) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_uppercase(),
            nominees: nominees.iter().map(|n| n.to_string()).collect(),
        }
    }

    fn catalog(categories: Vec<Category>) -> Catalog {
        Catalog {
            id: "test-show".to_string(),
            name: "Test Show".to_string(),
            ceremony: None,
            categories,
        }
    }

    #[test]
    fn test_default_catalog_is_valid() {
        assert!(validate_catalog(&Catalog::default()).is_ok());
    }

    #[test]
    fn test_empty_categories() {
        let errors = validate_catalog(&catalog(vec![])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("ballot.categories"));
    }

    #[test]
    fn test_duplicate_category_id() {
        let errors = validate_catalog(&catalog(vec![
            category("sound", &["F1"]),
            category("sound", &["Sinners"]),
        ]))
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("ballot.categories[1].id"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut bad = catalog(vec![
            category("", &[]),
            category("sound", &["F1", "F1"]),
        ]);
        bad.id = " ".to_string();
        let errors = validate_catalog(&bad).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[3].contains("duplicate nominee 'F1'"));
    }

    #[test]
    fn test_valid_pick() {
        let catalog = Catalog::default();
        assert!(validate_pick(&catalog, "best_picture", Some("Sinners"), Some("Hamnet")).is_ok());
        assert!(validate_pick(&catalog, "best_picture", None, None).is_ok());
    }

    #[test]
    fn test_unknown_category() {
        let catalog = Catalog::default();
        let errors = validate_pick(&catalog, "best_stunts", Some("F1"), None).unwrap_err();
        assert!(errors[0].contains("unknown category 'best_stunts'"));
    }

    #[test]
    fn test_off_ballot_nominees_both_reported() {
        let catalog = Catalog::default();
        let errors =
            validate_pick(&catalog, "sound", Some("Hamnet"), Some("Barbie")).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("will win"));
        assert!(errors[1].starts_with("should win"));
    }
}
