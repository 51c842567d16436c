//! Path-to-page mapping.

/// Pages the app can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    OAuth,
    Payment,
    Checkout,
    NotFound,
}

impl Route {
    /// Match a `location.pathname`. A trailing slash is ignored.
    pub fn recognize(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path {
            "" => Self::Home,
            "/login" => Self::Login,
            // The provider redirect lands on /oauth/callback.
            "/oauth" | "/oauth/callback" => Self::OAuth,
            "/payment" => Self::Payment,
            "/checkout" => Self::Checkout,
            _ => Self::NotFound,
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Home | Self::NotFound => "/",
            Self::Login => "/login",
            Self::OAuth => "/oauth",
            Self::Payment => "/payment",
            Self::Checkout => "/checkout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_round_trips_its_path() {
        for route in [
            Route::Home,
            Route::Login,
            Route::OAuth,
            Route::Payment,
            Route::Checkout,
        ] {
            assert_eq!(Route::recognize(route.path()), route);
        }
    }

    #[test]
    fn oauth_callback_and_trailing_slash() {
        assert_eq!(Route::recognize("/oauth/callback"), Route::OAuth);
        assert_eq!(Route::recognize("/checkout/"), Route::Checkout);
        assert_eq!(Route::recognize(""), Route::Home);
    }

    #[test]
    fn unknown_paths() {
        assert_eq!(Route::recognize("/admin"), Route::NotFound);
        assert_eq!(Route::recognize("/login/extra"), Route::NotFound);
    }
}
