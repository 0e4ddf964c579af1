use maud::{html, Markup};

use crate::templates::desktop_layout;

pub fn forgot_password_page() -> Markup {
    desktop_layout(
        "Forgot password",
        false,
        html! {
            main class="container narrow" {
                h1 { "Forgot Password" }
                p class="lead" {
                    "Enter your email and we’ll send you a link to choose a new password."
                }

                form
                    method="post"
                    action="/forgot-password"
                    hx-post="/forgot-password"
                    hx-target="#reset-result"
                    hx-swap="innerHTML"
                    hx-disabled-elt="button"
                    class="auth-form"
                {
                    label class="sr-only" for="email" { "Email address" }
                    input
                        type="email"
                        id="email"
                        name="email"
                        placeholder="you@domain.com"
                        autocomplete="email"
                        required;

                    button type="submit" class="button primary" { "Send Reset Link" }
                }

                div id="reset-result" {}

                p {
                    a href="/sign-in" { "Sign In" }
                }
            }
        },
    )
}

/// Swapped into #reset-result after the post. Deliberately identical for
/// known and unknown addresses.
pub fn reset_requested_partial(email: &str) -> Markup {
    html! {
        p class="notice" {
            "Check your email. If an account exists for "
            strong { (email) }
            ", a reset link is on its way."
        }
    }
}

/// Non-htmx fallback for the same post.
pub fn reset_requested_page(email: &str) -> Markup {
    desktop_layout(
        "Check your email",
        false,
        html! {
            main class="container narrow" {
                h1 { "Check your email" }
                (reset_requested_partial(email))
                p {
                    a href="/sign-in" { "Back to Sign In" }
                }
            }
        },
    )
}
