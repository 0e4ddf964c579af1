use maud::{html, Markup};

use crate::domain::listing::Listing;
use crate::util::format_price;

/// Horizontal strip of the newest listings, shown at the top of Explore.
pub fn recent_strip(listings: &[Listing]) -> Markup {
    if listings.is_empty() {
        return html! {};
    }

    html! {
        p class="section-heading" { "Recommended" }
        ul class="recent-strip" {
            @for listing in listings {
                li class="recent-strip-slide" {
                    a href=(format!("/category/{}/{}", listing.listing_type.as_str(), listing.id)) {
                        @if let Some(cover) = listing.cover_image() {
                            img src=(cover) alt=(listing.name);
                        }
                        p class="recent-strip-name" { (listing.name) }
                        p class="recent-strip-price" {
                            "$" (format_price(listing.display_price()))
                        }
                    }
                }
            }
        }
    }
}
