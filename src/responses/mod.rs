pub mod errors;
pub mod file;
pub mod html;
pub mod redirect;

pub use errors::{error_to_response, html_error_response, ResultResp};
pub use file::file_response;
pub use html::html_response;
pub use redirect::{redirect_response, redirect_with_cookie};
