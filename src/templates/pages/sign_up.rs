use maud::{html, Markup};

use crate::templates::desktop_layout;

pub fn sign_up_page(google_enabled: bool) -> Markup {
    desktop_layout(
        "Sign up",
        false,
        html! {
            main class="container narrow" {
                h1 { "Create an account" }

                form method="post" action="/sign-up" class="auth-form" {
                    label for="name" { "Name" }
                    input type="text" id="name" name="name" autocomplete="name" required;

                    label for="email" { "Email" }
                    input type="email" id="email" name="email" autocomplete="email" required;

                    label for="password" { "Password" }
                    input type="password" id="password" name="password" autocomplete="new-password" minlength="6" required;

                    button type="submit" class="button primary" { "Sign Up" }
                }

                @if google_enabled {
                    div class="social-login" {
                        p { "or" }
                        a class="button google" href="/oauth/google" { "Sign up with Google" }
                    }
                }

                p {
                    a href="/sign-in" { "Sign In Instead" }
                }
            }
        },
    )
}
