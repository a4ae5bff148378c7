//! Sign-in redirect port

/// Entry point the user is sent to when the session ends.
pub const SIGN_IN_PATH: &str = "/login";

/// Hook invoked when a credential refresh fails and the session is over.
///
/// Only interactive front ends install one. Headless clients leave it unset.
pub trait SignInRedirect: Send + Sync {
    /// Sends the user to the sign-in entry point.
    fn redirect(&self, entry_point: &str);
}
