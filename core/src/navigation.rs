//! Client-side routes and the layout state derived from them.
//!
//! # Design
//! A browser path is parsed into a `Route` once per navigation. The layout
//! state (`ViewState`) is then computed from the route alone: which section
//! is active, whether the schedules sidebar is shown and which of its
//! entries is highlighted. Nothing here performs I/O.

/// Sub-views of the schedules section, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleTab {
    Principal,
    Soa,
    Nomina,
    BaseDatos,
}

impl ScheduleTab {
    pub const ALL: [ScheduleTab; 4] = [
        ScheduleTab::Principal,
        ScheduleTab::Soa,
        ScheduleTab::Nomina,
        ScheduleTab::BaseDatos,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            ScheduleTab::Principal => "/horarios",
            ScheduleTab::Soa => "/horarios/soa",
            ScheduleTab::Nomina => "/horarios/nomina",
            ScheduleTab::BaseDatos => "/horarios/bd",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScheduleTab::Principal => "Horario Principal",
            ScheduleTab::Soa => "SOA",
            ScheduleTab::Nomina => "Nómina",
            ScheduleTab::BaseDatos => "Base de Datos",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, which redirects to the main schedule view.
    Home,
    Profesores,
    Materias,
    Aulas,
    Restricciones,
    Solicitudes,
    ImportarExcel,
    Versiones,
    Horarios(ScheduleTab),
    /// Any other path, kept as requested.
    NotFound(String),
}

impl Route {
    /// Parse a browser path. Query strings, fragments and a trailing slash
    /// are ignored; matching is case-sensitive.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            "/profesores" => Route::Profesores,
            "/materias" => Route::Materias,
            "/aulas" => Route::Aulas,
            "/restricciones" => Route::Restricciones,
            "/solicitudes" => Route::Solicitudes,
            "/importar-excel" => Route::ImportarExcel,
            "/versiones" => Route::Versiones,
            "/horarios" => Route::Horarios(ScheduleTab::Principal),
            "/horarios/soa" => Route::Horarios(ScheduleTab::Soa),
            "/horarios/nomina" => Route::Horarios(ScheduleTab::Nomina),
            "/horarios/bd" => Route::Horarios(ScheduleTab::BaseDatos),
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// Parse and follow the index redirect.
    pub fn resolve(path: &str) -> Route {
        match Route::parse(path) {
            Route::Home => Route::Horarios(ScheduleTab::Principal),
            route => route,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Profesores => "/profesores".to_string(),
            Route::Materias => "/materias".to_string(),
            Route::Aulas => "/aulas".to_string(),
            Route::Restricciones => "/restricciones".to_string(),
            Route::Solicitudes => "/solicitudes".to_string(),
            Route::ImportarExcel => "/importar-excel".to_string(),
            Route::Versiones => "/versiones".to_string(),
            Route::Horarios(tab) => tab.path().to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }
}

/// Which part of the app is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    General,
    /// Anywhere under `/horarios`. `None` for a sub-path with no view.
    Schedules(Option<ScheduleTab>),
}

const SCHEDULES_ROOT: &str = "/horarios";

fn under_schedules_root(path: &str) -> bool {
    path.strip_prefix(SCHEDULES_ROOT)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// A navigation control: a label, its target and whether it is highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: &'static str,
    pub path: &'static str,
    pub selected: bool,
}

/// Top bar destinations, always visible.
pub const TOP_BAR: [(&str, &str); 8] = [
    ("Profesores", "/profesores"),
    ("Materias", "/materias"),
    ("Aulas", "/aulas"),
    ("Restricciones", "/restricciones"),
    ("Horarios", "/horarios"),
    ("Solicitudes", "/solicitudes"),
    ("Importar Excel", "/importar-excel"),
    ("Versiones", "/versiones"),
];

pub const APP_TITLE: &str = "Sistema de Horarios Académicos";

/// Layout state for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub route: Route,
    pub section: Section,
    /// Secondary navigation, present only in the schedules section.
    pub sidebar: Option<Vec<NavEntry>>,
    /// Link back to `/`, present only on the not-found view.
    pub home_link: Option<NavEntry>,
}

impl ViewState {
    pub fn for_route(route: Route) -> Self {
        let section = match &route {
            Route::Horarios(tab) => Section::Schedules(Some(*tab)),
            Route::NotFound(path) if under_schedules_root(path) => Section::Schedules(None),
            _ => Section::General,
        };
        let sidebar = match section {
            Section::Schedules(active) => Some(
                ScheduleTab::ALL
                    .iter()
                    .map(|tab| NavEntry {
                        label: tab.label(),
                        path: tab.path(),
                        selected: Some(*tab) == active,
                    })
                    .collect(),
            ),
            Section::General => None,
        };
        let home_link = match route {
            Route::NotFound(_) => Some(NavEntry {
                label: "Ir a Inicio",
                path: "/",
                selected: false,
            }),
            _ => None,
        };
        Self {
            route,
            section,
            sidebar,
            home_link,
        }
    }

    pub fn top_bar(&self) -> Vec<NavEntry> {
        TOP_BAR
            .iter()
            .map(|&(label, path)| NavEntry {
                label,
                path,
                selected: false,
            })
            .collect()
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar.is_some()
    }

    pub fn selected_sidebar_entry(&self) -> Option<&NavEntry> {
        self.sidebar.as_ref()?.iter().find(|entry| entry.selected)
    }
}

/// Holds the current view and recomputes it on every navigation.
#[derive(Debug, Clone)]
pub struct Navigator {
    view: ViewState,
}

impl Navigator {
    pub fn new(initial_path: &str) -> Self {
        Self {
            view: ViewState::for_route(Route::resolve(initial_path)),
        }
    }

    pub fn navigate(&mut self, path: &str) -> &ViewState {
        self.view = ViewState::for_route(Route::resolve(path));
        &self.view
    }

    pub fn current(&self) -> &ViewState {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_route() {
        let cases = [
            ("/", Route::Home),
            ("/profesores", Route::Profesores),
            ("/materias", Route::Materias),
            ("/aulas", Route::Aulas),
            ("/restricciones", Route::Restricciones),
            ("/solicitudes", Route::Solicitudes),
            ("/importar-excel", Route::ImportarExcel),
            ("/versiones", Route::Versiones),
            ("/horarios", Route::Horarios(ScheduleTab::Principal)),
            ("/horarios/soa", Route::Horarios(ScheduleTab::Soa)),
            ("/horarios/nomina", Route::Horarios(ScheduleTab::Nomina)),
            ("/horarios/bd", Route::Horarios(ScheduleTab::BaseDatos)),
        ];
        for (path, expected) in cases {
            assert_eq!(Route::parse(path), expected, "{path}");
            if expected != Route::Home {
                assert_eq!(expected.path(), path);
            }
        }
    }

    #[test]
    fn trailing_slash_and_query_are_ignored() {
        assert_eq!(Route::parse("/aulas/"), Route::Aulas);
        assert_eq!(
            Route::parse("/horarios/bd?x=1#top"),
            Route::Horarios(ScheduleTab::BaseDatos)
        );
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(Route::parse("/xyz"), Route::NotFound("/xyz".to_string()));
        assert_eq!(
            Route::parse("/horarios/otro"),
            Route::NotFound("/horarios/otro".to_string())
        );
        assert_eq!(
            Route::parse("/Profesores"),
            Route::NotFound("/Profesores".to_string())
        );
    }

    #[test]
    fn root_redirects_to_schedules() {
        assert_eq!(Route::resolve("/"), Route::Horarios(ScheduleTab::Principal));
        assert_eq!(Route::resolve(""), Route::Horarios(ScheduleTab::Principal));
    }

    #[test]
    fn database_tab_shows_sidebar_with_entry_highlighted() {
        let mut nav = Navigator::new("/profesores");
        let view = nav.navigate("/horarios/bd");

        assert_eq!(view.section, Section::Schedules(Some(ScheduleTab::BaseDatos)));
        let sidebar = view.sidebar.as_ref().unwrap();
        assert_eq!(sidebar.len(), 4);
        let selected: Vec<_> = sidebar.iter().filter(|e| e.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "Base de Datos");
        assert_eq!(selected[0].path, "/horarios/bd");
    }

    #[test]
    fn general_pages_hide_sidebar() {
        let mut nav = Navigator::new("/horarios");
        assert!(nav.current().sidebar_visible());

        let view = nav.navigate("/profesores");
        assert_eq!(view.section, Section::General);
        assert!(!view.sidebar_visible());
        assert!(view.selected_sidebar_entry().is_none());
    }

    #[test]
    fn not_found_offers_link_home() {
        let mut nav = Navigator::new("/");
        let view = nav.navigate("/xyz");
        assert!(matches!(view.route, Route::NotFound(_)));
        assert!(!view.sidebar_visible());
        let link = view.home_link.clone().unwrap();
        assert_eq!(link.path, "/");

        let home = nav.navigate(link.path);
        assert_eq!(home.route, Route::Horarios(ScheduleTab::Principal));
        assert!(home.home_link.is_none());
    }

    #[test]
    fn unknown_schedules_subpath_keeps_sidebar_without_selection() {
        let nav = Navigator::new("/horarios/otro");
        let view = nav.current();

        assert_eq!(view.route, Route::NotFound("/horarios/otro".to_string()));
        assert_eq!(view.section, Section::Schedules(None));
        assert!(view.sidebar_visible());
        assert_eq!(view.sidebar.as_ref().unwrap().len(), 4);
        assert!(view.selected_sidebar_entry().is_none());
        assert_eq!(view.home_link.as_ref().unwrap().path, "/");
    }

    #[test]
    fn schedules_root_matches_whole_segments() {
        assert!(under_schedules_root("/horarios"));
        assert!(under_schedules_root("/horarios/a/b"));
        assert!(!under_schedules_root("/horariosx"));
        assert!(!under_schedules_root("/profesores/horarios"));

        let view = ViewState::for_route(Route::resolve("/horariosx"));
        assert_eq!(view.section, Section::General);
        assert!(!view.sidebar_visible());
    }

    #[test]
    fn top_bar_has_eight_fixed_entries() {
        let view = ViewState::for_route(Route::Aulas);
        let bar = view.top_bar();
        assert_eq!(bar.len(), 8);
        assert_eq!(bar[0].label, "Profesores");
        assert_eq!(bar[7].path, "/versiones");
    }
}
