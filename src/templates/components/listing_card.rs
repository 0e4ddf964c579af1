use maud::{html, Markup};

use crate::domain::listing::{Listing, ListingType};
use crate::util::format_price;

/// One listing in a category / offers / profile list. `owner_actions` adds
/// the edit + delete controls shown on the owner's profile page.
pub fn listing_card(listing: &Listing, owner_actions: bool) -> Markup {
    let detail_url = format!(
        "/category/{}/{}",
        listing.listing_type.as_str(),
        listing.id
    );

    html! {
        li class="card listing-card" {
            a class="listing-card-link" href=(detail_url) {
                @if let Some(cover) = listing.cover_image() {
                    img class="listing-card-img" src=(cover) alt=(listing.name);
                }
                div class="listing-card-details" {
                    p class="listing-card-location" { (listing.location) }
                    p class="listing-card-name" { (listing.name) }
                    p class="listing-card-price" {
                        "$" (format_price(listing.display_price()))
                        @if listing.listing_type == ListingType::Rent { " / Month" }
                    }
                    div class="listing-card-facts" {
                        span {
                            @if listing.bedrooms > 1 { (listing.bedrooms) " Bedrooms" }
                            @else { "1 Bedroom" }
                        }
                        span {
                            @if listing.bathrooms > 1 { (listing.bathrooms) " Bathrooms" }
                            @else { "1 Bathroom" }
                        }
                    }
                }
            }
            @if owner_actions {
                div class="listing-card-actions" {
                    a class="button" href=(format!("/edit-listing/{}", listing.id)) { "Edit" }
                    button
                        class="button danger"
                        hx-post=(format!("/listings/{}/delete", listing.id))
                        hx-confirm="Delete this listing?"
                        hx-target="closest li"
                        hx-swap="outerHTML"
                    { "Delete" }
                }
            }
        }
    }
}

/// The "load more" row at the end of a paginated list. Lives inside the ul
/// so the htmx swap can replace it with the next page's items.
pub fn load_more_item(base_path: &str, cursor: &str) -> Markup {
    let href = format!("{base_path}?after={cursor}");
    html! {
        li id="load-more" class="load-more" {
            button
                hx-get=(href)
                hx-target="closest li"
                hx-swap="outerHTML"
            { "Load More" }
        }
    }
}
