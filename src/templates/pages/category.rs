use maud::{html, Markup};

use crate::domain::listing::Listing;
use crate::templates::components::{listing_card, load_more_item};
use crate::templates::desktop_layout;

/// Full category / offers page. `base_path` is the URL the "load more"
/// button fetches from ("/category/rent", "/offers", ...).
pub fn category_page(
    heading: &str,
    base_path: &str,
    items: &[Listing],
    next_cursor: Option<&str>,
    logged_in: bool,
) -> Markup {
    desktop_layout(
        heading,
        logged_in,
        html! {
            main class="container" {
                h1 class="page-title" { (heading) }

                @if items.is_empty() {
                    p { "No listings here yet." }
                } @else {
                    ul class="listing-list" {
                        @for listing in items {
                            (listing_card(listing, false))
                        }
                        @if let Some(cursor) = next_cursor {
                            (load_more_item(base_path, cursor))
                        }
                    }
                }
            }
        },
    )
}

/// The htmx continuation: just the next page's items plus (maybe) a fresh
/// "load more" row. Swapped in place of the old row, inside the existing ul.
pub fn category_page_partial(
    base_path: &str,
    items: &[Listing],
    next_cursor: Option<&str>,
) -> Markup {
    html! {
        @for listing in items {
            (listing_card(listing, false))
        }
        @if let Some(cursor) = next_cursor {
            (load_more_item(base_path, cursor))
        }
    }
}
