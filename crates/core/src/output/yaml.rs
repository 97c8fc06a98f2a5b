//! YAML output formatter

use crate::output::FormatError;
use serde::Serialize;

/// Format any serializable output as YAML
pub fn format_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, FormatError> {
    serde_yaml::to_string(data).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreadcrumbItem, CrumbKind, ResolvedTrail, Scenario};

    #[test]
    fn test_format_yaml() {
        let trail = ResolvedTrail {
            scenario: Scenario::Search {
                term: "mugs".to_string(),
            },
            items: vec![BreadcrumbItem::current(CrumbKind::Search, "Search Results for \"mugs\"")],
        };
        let yaml = format_yaml(&trail).unwrap();
        assert!(yaml.contains("scenario: search"));
        assert!(yaml.contains("items:"));
        assert!(yaml.contains("is_current: true"));
    }
}
