use maud::{html, Markup};

use crate::domain::listing::Listing;
use crate::templates::components::recent_strip;
use crate::templates::desktop_layout;

pub fn explore_page(recent: &[Listing], logged_in: bool) -> Markup {
    desktop_layout(
        "Explore",
        logged_in,
        html! {
            main class="container" {
                h1 class="page-title" { "Explore" }

                (recent_strip(recent))

                p class="section-heading" { "Categories" }
                div class="explore-categories" {
                    a class="card explore-category" href="/category/rent" {
                        p class="explore-category-name" { "Places for rent" }
                    }
                    a class="card explore-category" href="/category/sale" {
                        p class="explore-category-name" { "Places for sale" }
                    }
                }
            }
        },
    )
}
