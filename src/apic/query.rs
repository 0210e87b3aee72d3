//! Class query and managed-object URL construction.

/// Path for posting to (or reading) a single managed object by DN.
pub fn mo_path(dn: &str) -> String {
    format!("/api/node/mo/{dn}.json")
}

/// Builder for `/api/node/class/<class>.json` queries.
#[derive(Debug, Clone)]
pub struct ClassQuery {
    class: String,
    filters: Vec<(String, String)>,
    subtree_full: bool,
    config_only: bool,
}

impl ClassQuery {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            filters: Vec::new(),
            subtree_full: false,
            config_only: false,
        }
    }

    /// Require `<class>.<prop> == value`. Multiple filters are and-ed.
    #[must_use]
    pub fn filter_eq(mut self, prop: &str, value: &str) -> Self {
        self.filters.push((prop.to_string(), value.to_string()));
        self
    }

    /// Return the full subtree of each match.
    #[must_use]
    pub fn subtree_full(mut self) -> Self {
        self.subtree_full = true;
        self
    }

    /// Return only configurable properties.
    #[must_use]
    pub fn config_only(mut self) -> Self {
        self.config_only = true;
        self
    }

    fn filter_expression(&self) -> Option<String> {
        if self.filters.is_empty() {
            return None;
        }
        let terms: Vec<String> = self
            .filters
            .iter()
            .map(|(prop, value)| {
                let escaped = value.replace('"', "\\\"");
                format!("eq({}.{prop},\"{escaped}\")", self.class)
            })
            .collect();
        Some(format!("and({})", terms.join(",")))
    }

    /// Request path including the query string.
    pub fn path(&self) -> String {
        let mut params = Vec::new();
        if let Some(expr) = self.filter_expression() {
            params.push(format!("query-target-filter={}", urlencoding::encode(&expr)));
        }
        if self.subtree_full {
            params.push("rsp-subtree=full".to_string());
        }
        if self.config_only {
            params.push("rsp-prop-include=config-only".to_string());
        }

        let mut path = format!("/api/node/class/{}.json", self.class);
        if !params.is_empty() {
            path.push('?');
            path.push_str(&params.join("&"));
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mo_path() {
        assert_eq!(
            mo_path("uni/infra/funcprof/accbundle-pg2"),
            "/api/node/mo/uni/infra/funcprof/accbundle-pg2.json"
        );
    }

    #[test]
    fn test_query_without_filter() {
        let path = ClassQuery::new("infraAccBndlGrp")
            .subtree_full()
            .config_only()
            .path();
        assert_eq!(
            path,
            "/api/node/class/infraAccBndlGrp.json?rsp-subtree=full&rsp-prop-include=config-only"
        );
    }

    #[test]
    fn test_query_name_filter_is_encoded() {
        let path = ClassQuery::new("infraAccBndlGrp")
            .filter_eq("name", "vpc-esx01")
            .subtree_full()
            .config_only()
            .path();
        assert_eq!(
            path,
            "/api/node/class/infraAccBndlGrp.json?query-target-filter=and%28eq%28infraAccBndlGrp.name%2C%22vpc-esx01%22%29%29&rsp-subtree=full&rsp-prop-include=config-only"
        );
    }

    #[test]
    fn test_query_bare_class() {
        assert_eq!(ClassQuery::new("fvTenant").path(), "/api/node/class/fvTenant.json");
    }

    #[test]
    fn test_filter_expression_multiple_terms() {
        let query = ClassQuery::new("infraAccPortGrp")
            .filter_eq("name", "srv")
            .filter_eq("descr", "say \"hi\"");
        assert_eq!(
            query.filter_expression().unwrap(),
            r#"and(eq(infraAccPortGrp.name,"srv"),eq(infraAccPortGrp.descr,"say \"hi\""))"#
        );
    }
}
