use maud::{html, Markup};

use crate::auth::session::CurrentUser;
use crate::domain::listing::Listing;
use crate::templates::components::listing_card;
use crate::templates::desktop_layout;

pub fn profile_page(user: &CurrentUser, listings: &[Listing]) -> Markup {
    desktop_layout(
        "My Profile",
        true,
        html! {
            main class="container" {
                header class="profile-header" {
                    h1 class="page-title" { "My Profile" }
                    form method="post" action="/sign-out" {
                        button type="submit" class="button" { "Logout" }
                    }
                }

                section class="card" {
                    h3 { "Personal Details" }
                    form method="post" action="/profile/details" class="profile-details-form" {
                        label for="name" { "Name" }
                        input type="text" id="name" name="name" value=(user.name) required;

                        label for="email" { "Email" }
                        input type="text" id="email" value=(user.email) disabled;

                        button type="submit" class="button" { "Save" }
                    }
                }

                a class="card create-listing-link" href="/create-listing" {
                    p { "Sell or rent your home" }
                }

                section {
                    h3 { "Your Listings" }
                    @if listings.is_empty() {
                        p { "You have no listings yet." }
                    } @else {
                        ul class="listing-list" id="own-listings" {
                            @for listing in listings {
                                (listing_card(listing, true))
                            }
                        }
                    }
                }
            }
        },
    )
}
