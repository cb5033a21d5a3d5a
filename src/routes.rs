/// Where `/` sends the browser.
pub const ROOT_REDIRECT: &str = "/projects";

/// The views reachable by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Projects,
    NewProject,
    ProjectEditor(String),
}

impl AppRoute {
    pub fn href(&self) -> String {
        match self {
            AppRoute::Projects => "/projects".to_string(),
            AppRoute::NewProject => "/projects/new".to_string(),
            AppRoute::ProjectEditor(id) => format!("/projects/{}", id),
        }
    }

    /// Match a browser path against the route table. `/` resolves to its redirect target.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [] => Self::from_path(ROOT_REDIRECT),
            ["projects"] => Some(AppRoute::Projects),
            ["projects", "new"] => Some(AppRoute::NewProject),
            ["projects", id] if !id.is_empty() => Some(AppRoute::ProjectEditor(id.to_string())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href() {
        assert_eq!(AppRoute::Projects.href(), "/projects");
        assert_eq!(AppRoute::NewProject.href(), "/projects/new");
        assert_eq!(AppRoute::ProjectEditor("abc".into()).href(), "/projects/abc");
    }

    #[test]
    fn test_root_redirects_to_projects() {
        assert_eq!(AppRoute::from_path("/"), Some(AppRoute::Projects));
        assert_eq!(AppRoute::from_path(""), Some(AppRoute::Projects));
    }

    #[test]
    fn test_new_wins_over_project_id() {
        assert_eq!(AppRoute::from_path("/projects/new"), Some(AppRoute::NewProject));
        assert_eq!(
            AppRoute::from_path("/projects/1f0e-42/"),
            Some(AppRoute::ProjectEditor("1f0e-42".into()))
        );
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        assert_eq!(AppRoute::from_path("/projects?sort=name"), Some(AppRoute::Projects));
        assert_eq!(
            AppRoute::from_path("/projects/abc#frames"),
            Some(AppRoute::ProjectEditor("abc".into()))
        );
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(AppRoute::from_path("/health"), None);
        assert_eq!(AppRoute::from_path("/projects/abc/frames"), None);
    }

    #[test]
    fn test_href_round_trips_through_from_path() {
        for route in [
            AppRoute::Projects,
            AppRoute::NewProject,
            AppRoute::ProjectEditor("p-9".into()),
        ] {
            assert_eq!(AppRoute::from_path(&route.href()), Some(route));
        }
    }
}
