// 🧭 Route table and sidebar navigation

/// A view reachable by path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    Expenses,
    Tasks,
    NotFound,
}

/// Paths that all render the dashboard
pub const DASHBOARD_ALIASES: &[&str] = &[
    "/dashboard",
    "/reports",
    "/family",
    "/home",
    "/analytics",
    "/settings",
];

impl Route {
    /// Resolve a request path; the query string and a trailing slash are ignored
    pub fn resolve(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/" => Route::Landing,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/expenses" => Route::Expenses,
            "/tasks" => Route::Tasks,
            p if DASHBOARD_ALIASES.contains(&p) => Route::Dashboard,
            _ => Route::NotFound,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Gestão Doméstica",
            Route::Login => "Entrar",
            Route::Register => "Criar Conta",
            Route::Dashboard => "Dashboard",
            Route::Expenses => "Gestão de Despesas",
            Route::Tasks => "Sistema de Tarefas",
            Route::NotFound => "Página não encontrada",
        }
    }

    /// Views rendered inside the sidebar layout
    pub fn has_layout(&self) -> bool {
        matches!(
            self,
            Route::Landing | Route::Dashboard | Route::Expenses | Route::Tasks
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub title: &'static str,
    pub href: &'static str,
    pub description: Option<&'static str>,
}

/// Main sidebar section
pub const NAVIGATION: &[NavItem] = &[
    NavItem { title: "Dashboard", href: "/dashboard", description: Some("Visão geral") },
    NavItem { title: "Despesas", href: "/expenses", description: Some("Gestão financeira") },
    NavItem { title: "Tarefas", href: "/tasks", description: Some("Organização doméstica") },
    NavItem { title: "Calendário", href: "/calendar", description: Some("Agenda mensal") },
    NavItem { title: "Relatórios", href: "/reports", description: Some("Análises e gráficos") },
    NavItem { title: "Família", href: "/family", description: Some("Membros da casa") },
];

/// Secondary sidebar section
pub const QUICK_ACTIONS: &[NavItem] = &[
    NavItem { title: "Casa", href: "/home", description: None },
    NavItem { title: "Análises", href: "/analytics", description: None },
    NavItem { title: "Configurações", href: "/settings", description: None },
];

/// Sidebar highlight: the dashboard entry is also active on `/`
pub fn is_active(href: &str, current_path: &str) -> bool {
    if href == "/dashboard" && current_path == "/" {
        return true;
    }
    current_path.starts_with(href)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table() {
        assert_eq!(Route::resolve("/"), Route::Landing);
        assert_eq!(Route::resolve("/login"), Route::Login);
        assert_eq!(Route::resolve("/register"), Route::Register);
        assert_eq!(Route::resolve("/expenses"), Route::Expenses);
        assert_eq!(Route::resolve("/tasks"), Route::Tasks);
        for alias in DASHBOARD_ALIASES {
            assert_eq!(Route::resolve(alias), Route::Dashboard, "{alias}");
        }
    }

    #[test]
    fn test_unknown_paths_are_not_found() {
        assert_eq!(Route::resolve("/calendar"), Route::NotFound);
        assert_eq!(Route::resolve("/expenses/1"), Route::NotFound);
        assert_eq!(Route::resolve("/auth/forgot-password"), Route::NotFound);
    }

    #[test]
    fn test_resolve_ignores_query_and_trailing_slash() {
        assert_eq!(Route::resolve("/expenses/?q=luz"), Route::Expenses);
        assert_eq!(Route::resolve("/tasks?status=completed"), Route::Tasks);
        assert_eq!(Route::resolve(""), Route::Landing);
    }

    #[test]
    fn test_is_active() {
        assert!(is_active("/dashboard", "/"));
        assert!(is_active("/expenses", "/expenses"));
        assert!(!is_active("/tasks", "/expenses"));
        assert!(!is_active("/expenses", "/"));
    }

    #[test]
    fn test_auth_views_have_no_layout() {
        assert!(!Route::Login.has_layout());
        assert!(!Route::NotFound.has_layout());
        assert!(Route::Expenses.has_layout());
    }
}
