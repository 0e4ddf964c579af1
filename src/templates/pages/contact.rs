use maud::{html, Markup, PreEscaped};

use crate::templates::desktop_layout;

/// Contact the listing owner. The listing name arrives as a query
/// parameter (plain deep-linking); maud escapes it on render and it is
/// URL-encoded into the mailto link.
pub fn contact_page(
    owner_name: &str,
    owner_email: &str,
    listing_name: Option<&str>,
    logged_in: bool,
) -> Markup {
    let subject = listing_name.unwrap_or("Your listing");
    let mailto = format!(
        "mailto:{}?{}",
        owner_email,
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("Subject", subject)
            .finish()
    );

    // keep the typed message in sync with the mailto body
    let message_script = "document.getElementById('message').addEventListener('input', function () {\n\
         var a = document.getElementById('send-message');\n\
         var base = a.getAttribute('data-mailto');\n\
         a.setAttribute('href', base + '&body=' + encodeURIComponent(this.value));\n\
     });";

    desktop_layout(
        "Contact Landlord",
        logged_in,
        html! {
            main class="container narrow" {
                h1 class="page-title" { "Contact Landlord" }

                p class="contact-owner-name" { "Contact " (owner_name) }

                form class="auth-form" {
                    label for="message" { "Message" }
                    textarea id="message" name="message" rows="6" {}

                    a
                        id="send-message"
                        class="button primary"
                        href=(mailto)
                        data-mailto=(mailto)
                    { "Send Message" }
                }
                script { (PreEscaped(message_script)) }
            }
        },
    )
}
