pub mod login;
pub mod session;

pub use login::login_via_google;
pub use session::BrowserSession;
