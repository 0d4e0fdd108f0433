use std::rc::Rc;

use shared::config::AppConfig;
use shared::guard::NavigationGuard;
use shared::routes::RouteTable;

use crate::services::api::ApiService;
use crate::services::supabase::SupabaseAuth;
use crate::services::scheduler::BrowserScheduler;

/// Long-lived services, built once and handed to components via context.
///
/// The guard and the pages share the same auth client instance.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Rc<SupabaseAuth>,
    pub api: Rc<ApiService>,
    pub guard: Rc<NavigationGuard>,
}

impl AppContext {
    pub fn from_config(config: AppConfig) -> Self {
        let auth = Rc::new(SupabaseAuth::new(config.auth));
        let guard = NavigationGuard::new(
            RouteTable::canonical(),
            auth.clone(),
            Rc::new(BrowserScheduler),
            config.guard,
        );

        Self {
            auth,
            api: Rc::new(ApiService::new(config.api_base_url)),
            guard: Rc::new(guard),
        }
    }
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.auth, &other.auth)
            && Rc::ptr_eq(&self.api, &other.api)
            && Rc::ptr_eq(&self.guard, &other.guard)
    }
}
