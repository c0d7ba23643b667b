//! The API endpoints URIs.

/// The landing page.
pub const ROOT: &str = "/";
/// The log in page.
pub const LOG_IN_VIEW: &str = "/login";
/// The registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The page for resetting a forgotten password.
pub const RESET_PASSWORD_VIEW: &str = "/reset";
/// The route for static files.
pub const STATIC: &str = "/static";
/// The site icon.
pub const FAVICON: &str = "/favicon.ico";

/// The route for recording a transaction from an HTML form.
pub const ADD_FORM: &str = "/add";
/// The route for recording a transaction from a JSON body.
pub const ADD_TRANSACTION: &str = "/add_transaction";
/// The route for listing a user's transactions.
pub const GET_TRANSACTIONS: &str = "/get_transactions";
/// The route for downloading a spreadsheet or PDF report.
pub const EXPORT_REPORT: &str = "/export_report";
