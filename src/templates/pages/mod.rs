pub mod category;
pub mod contact;
pub mod explore;
pub mod forgot_password;
pub mod listing;
pub mod listing_form;
pub mod profile;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;

pub use category::{category_page, category_page_partial};
pub use contact::contact_page;
pub use explore::explore_page;
pub use forgot_password::{forgot_password_page, reset_requested_partial};
pub use listing::listing_page;
pub use listing_form::listing_form_page;
pub use profile::profile_page;
pub use reset_password::reset_password_page;
pub use sign_in::sign_in_page;
pub use sign_up::sign_up_page;
