mod health;
mod redirect;
mod token;
mod url;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use token::issue_token_handler;
pub use url::{create_url_handler, delete_url_handler, list_urls_handler};
