use maud::{html, Markup};

use crate::domain::listing::{Listing, ListingType};
use crate::templates::desktop_layout;

fn yes_no(name: &str, value: bool) -> Markup {
    html! {
        div class="form-buttons" {
            label {
                input type="radio" name=(name) value="true" checked[value];
                " Yes"
            }
            label {
                input type="radio" name=(name) value="false" checked[!value];
                " No"
            }
        }
    }
}

/// The create / edit listing form. `existing` prefills fields for edit;
/// `action` is where the multipart form posts back to.
pub fn listing_form_page(
    title: &str,
    action: &str,
    existing: Option<&Listing>,
    geocoding_enabled: bool,
) -> Markup {
    let listing_type = existing.map(|l| l.listing_type).unwrap_or(ListingType::Rent);
    let name = existing.map(|l| l.name.as_str()).unwrap_or("");
    let bedrooms = existing.map(|l| l.bedrooms).unwrap_or(1);
    let bathrooms = existing.map(|l| l.bathrooms).unwrap_or(1);
    let parking = existing.map(|l| l.parking).unwrap_or(false);
    let furnished = existing.map(|l| l.furnished).unwrap_or(false);
    let address = existing.map(|l| l.location.as_str()).unwrap_or("");
    let offer = existing.map(|l| l.offer).unwrap_or(false);
    let regular_price = existing.map(|l| l.regular_price).unwrap_or(50);
    let discounted_price = existing.and_then(|l| l.discounted_price).unwrap_or(50);

    desktop_layout(
        title,
        true,
        html! {
            main class="container narrow" {
                h1 class="page-title" { (title) }

                form method="post" action=(action) enctype="multipart/form-data" class="listing-form" {
                    label class="form-label" { "Sell / Rent" }
                    div class="form-buttons" {
                        label {
                            input type="radio" name="type" value="sale"
                                checked[listing_type == ListingType::Sale];
                            " Sell"
                        }
                        label {
                            input type="radio" name="type" value="rent"
                                checked[listing_type == ListingType::Rent];
                            " Rent"
                        }
                    }

                    label class="form-label" for="name" { "Name" }
                    input type="text" id="name" name="name" value=(name)
                        minlength="10" maxlength="32" required;

                    div class="form-rooms flex" {
                        div {
                            label class="form-label" for="bedrooms" { "Bedrooms" }
                            input type="number" id="bedrooms" name="bedrooms"
                                value=(bedrooms) min="1" max="50" required;
                        }
                        div {
                            label class="form-label" for="bathrooms" { "Bathrooms" }
                            input type="number" id="bathrooms" name="bathrooms"
                                value=(bathrooms) min="1" max="50" required;
                        }
                    }

                    label class="form-label" { "Parking spot" }
                    (yes_no("parking", parking))

                    label class="form-label" { "Furnished" }
                    (yes_no("furnished", furnished))

                    label class="form-label" for="address" { "Address" }
                    textarea id="address" name="address" required { (address) }

                    @if !geocoding_enabled {
                        div class="form-latlng flex" {
                            div {
                                label class="form-label" for="latitude" { "Latitude" }
                                input type="number" step="any" id="latitude" name="latitude"
                                    value=(existing.map(|l| l.latitude).unwrap_or(0.0)) required;
                            }
                            div {
                                label class="form-label" for="longitude" { "Longitude" }
                                input type="number" step="any" id="longitude" name="longitude"
                                    value=(existing.map(|l| l.longitude).unwrap_or(0.0)) required;
                            }
                        }
                    }

                    label class="form-label" { "Offer" }
                    (yes_no("offer", offer))

                    label class="form-label" for="regular_price" { "Regular Price" }
                    div class="form-price" {
                        input type="number" id="regular_price" name="regular_price"
                            value=(regular_price) min="50" max="750000000" required;
                        @if listing_type == ListingType::Rent {
                            span class="form-price-text" { "$ / Month" }
                        }
                    }

                    label class="form-label" for="discounted_price" { "Discounted Price" }
                    input type="number" id="discounted_price" name="discounted_price"
                        value=(discounted_price) min="50" max="750000000";

                    label class="form-label" for="images" { "Images" }
                    p class="images-info" { "The first image will be the cover (max 6)." }
                    input type="file" id="images" name="images"
                        accept=".jpg,.png,.jpeg" multiple;

                    button type="submit" class="button primary" { (title) }
                }
            }
        },
    )
}
