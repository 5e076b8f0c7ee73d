// web_app/browser.rs - FilterPort backed by the Leptos router (hydrate only)
//
// Must be constructed inside a `<Router>` so the location and navigate
// hooks resolve.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::location::Location;
use leptos_router::NavigateOptions;

use crate::web_app::model::FilterSet;
use crate::web_app::state::filters::{parse_query, to_query, FilterPort};

/// Mirrors filters into the browser URL with `history.replaceState`
#[derive(Clone)]
pub struct RouterFilterPort {
    location: Location,
    navigate: Rc<dyn Fn(&str, NavigateOptions)>,
}

impl RouterFilterPort {
    pub fn new() -> Self {
        let navigate = use_navigate();
        Self {
            location: use_location(),
            navigate: Rc::new(move |path: &str, options: NavigateOptions| navigate(path, options)),
        }
    }
}

impl FilterPort for RouterFilterPort {
    fn read(&self) -> FilterSet {
        parse_query(&self.location.search.get_untracked())
    }

    fn write(&self, filters: &FilterSet) {
        let pathname = self.location.pathname.get_untracked();
        let query = to_query(filters);
        let target = if query.is_empty() {
            pathname
        } else {
            format!("{}?{}", pathname, query)
        };
        (self.navigate)(
            &target,
            NavigateOptions {
                replace: true,
                scroll: false,
                ..Default::default()
            },
        );
    }
}
