use maud::{html, Markup, PreEscaped};

use crate::domain::listing::{Listing, ListingType};
use crate::templates::desktop_layout;
use crate::util::format_price;

/// Listing detail: image slides, facts, map, contact link.
/// `viewer_id` suppresses the contact link on the owner's own listing.
pub fn listing_page(listing: &Listing, viewer_id: Option<i64>, logged_in: bool) -> Markup {
    let is_owner = viewer_id == Some(listing.owner_id);
    let contact_href = format!(
        "/contact/{}?{}",
        listing.owner_id,
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("listingName", &listing.name)
            .finish()
    );

    // Leaflet reads these at runtime; the page itself stays server-rendered.
    let map_script = format!(
        "var map = L.map('listing-map').setView([{lat}, {lng}], 13);\n\
         L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{\n\
             attribution: '&copy; <a href=\"http://osm.org/copyright\">OpenStreetMap</a> contributors'\n\
         }}).addTo(map);\n\
         L.marker([{lat}, {lng}]).addTo(map);",
        lat = listing.latitude,
        lng = listing.longitude
    );

    desktop_layout(
        &listing.name,
        logged_in,
        html! {
            link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
            script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" {}

            main class="container" {
                ul class="listing-slides" {
                    @for image in &listing.image_urls {
                        li class="listing-slide" {
                            img src=(image) alt="Images of the house";
                        }
                    }
                }

                div class="listing-details" {
                    p class="listing-name" {
                        (listing.name) " - $" (format_price(listing.display_price()))
                        @if listing.listing_type == ListingType::Rent { " / Month" }
                    }
                    p class="listing-location" { (listing.location) }
                    p class="listing-type-badge" { "For " (listing.listing_type.label()) }
                    @if let Some(listed_on) = chrono::DateTime::from_timestamp(listing.created_at, 0) {
                        p class="listing-listed-on" { "Listed " (listed_on.format("%B %-d, %Y")) }
                    }

                    @if listing.offer {
                        @if let Some(discounted) = listing.discounted_price {
                            p class="listing-discount" {
                                "$" (format_price(listing.regular_price - discounted)) " discount"
                            }
                        }
                    }

                    ul class="listing-facts" {
                        li {
                            @if listing.bedrooms > 1 { (listing.bedrooms) " Bedrooms" }
                            @else { "1 Bedroom" }
                        }
                        li {
                            @if listing.bathrooms > 1 { (listing.bathrooms) " Bathrooms" }
                            @else { "1 Bathroom" }
                        }
                        @if listing.parking { li { "Parking Spot" } }
                        @if listing.furnished { li { "Furnished" } }
                    }

                    p class="section-heading" { "Location" }
                    div id="listing-map" class="listing-map" {}
                    script { (PreEscaped(map_script)) }

                    @if !is_owner {
                        a class="button primary" href=(contact_href) { "Contact Landlord" }
                    }
                }
            }
        },
    )
}
